use crate::calendar::{CalendarError, SlotKind};
use crate::model::{InternId, RosterError};
use chrono::NaiveDate;
use thiserror::Error;

/// Options d'assignation
#[derive(Debug, Clone, Copy)]
pub struct AssignOptions {
    /// Score de récence d'un interne qui n'a encore aucune garde.
    pub fresh_score: i64,
    /// Nombre maximal de sélections de candidat par essai.
    pub max_steps: usize,
}

impl Default for AssignOptions {
    fn default() -> Self {
        Self {
            fresh_score: 100,
            max_steps: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictKind {
    /// deux gardes trop rapprochées pour la même personne
    RestViolation { earlier: NaiveDate },
    /// personne non habilitée pour ce type de garde
    NotEligible,
    /// créneau resté vide
    Unassigned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub date: NaiveDate,
    pub slot: SlotKind,
    pub intern: Option<InternId>,
    pub kind: ConflictKind,
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("no available intern for {slot:?} on {date}")]
    NoAvailableCandidate { date: NaiveDate, slot: SlotKind },
    #[error("step limit of {limit} candidate selections exceeded")]
    StepLimitExceeded { limit: usize },
    #[error("slot {slot:?} does not exist on {date}")]
    MissingSlot { date: NaiveDate, slot: SlotKind },
    #[error("slot {slot:?} on {date} is already assigned")]
    SlotTaken { date: NaiveDate, slot: SlotKind },
    #[error("intern {intern:?} is not available for {slot:?} on {date}")]
    Unavailable {
        date: NaiveDate,
        slot: SlotKind,
        intern: InternId,
    },
    #[error("finished schedule has {count} conflict(s), first on {first}")]
    InvalidSchedule { count: usize, first: NaiveDate },
    #[error("unknown intern id: {0:?}")]
    UnknownIntern(InternId),
    #[error("no scheduling strategy configured")]
    NoStrategies,
    #[error("number of runs must be > 0")]
    NoRuns,
    #[error("all {attempts} trial(s) failed; first failure: {first}")]
    AllTrialsFailed {
        attempts: usize,
        first: Box<SchedError>,
    },
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SchedError {
    /// Vrai pour les échecs « aucun planning possible » (par opposition aux erreurs d'entrée).
    pub fn is_infeasible(&self) -> bool {
        match self {
            SchedError::NoAvailableCandidate { .. } | SchedError::StepLimitExceeded { .. } => true,
            SchedError::AllTrialsFailed { first, .. } => first.is_infeasible(),
            _ => false,
        }
    }
}
