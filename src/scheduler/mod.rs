mod conflicts;
mod greedy;
mod stats;
mod tally;
mod types;

pub use greedy::Greedy;
pub use stats::{pstdev, InternStatistics};
pub use tally::{Counts, Tally};
pub use types::{AssignOptions, Conflict, ConflictKind, SchedError};

use crate::calendar::{Month, SlotKind};
use crate::model::{Duty, InternId, Roster};
use chrono::NaiveDate;
use rand::Rng;

/// Algorithme de remplissage d'un mois.
pub trait Strategy<R: Rng>: Send + Sync {
    /// Identifiant de la variante, repris dans les résultats d'essai.
    fn name(&self) -> &'static str;
    fn generate(&self, scheduler: &mut Scheduler, rng: &mut R) -> Result<(), SchedError>;
}

/// Scheduler : état exclusif d'un essai (roster, mois, compteurs).
#[derive(Debug, Clone)]
pub struct Scheduler {
    roster: Roster,
    month: Month,
    tally: Tally,
    opts: AssignOptions,
    steps: usize,
}

impl Scheduler {
    pub fn new(roster: Roster, month: Month) -> Self {
        Self::with_options(roster, month, AssignOptions::default())
    }

    pub fn with_options(roster: Roster, month: Month, opts: AssignOptions) -> Self {
        let tally = Tally::new(roster.len());
        Self {
            roster,
            month,
            tally,
            opts,
            steps: 0,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }
    pub fn month(&self) -> &Month {
        &self.month
    }
    pub fn tally(&self) -> &Tally {
        &self.tally
    }
    pub fn options(&self) -> AssignOptions {
        self.opts
    }
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn candidates(&self, date: NaiveDate, duty: Duty) -> Vec<InternId> {
        self.roster.candidates(date, duty)
    }

    /// Jours écoulés depuis la dernière garde ; `fresh_score` si aucune.
    pub fn recency_score(&self, id: InternId, date: NaiveDate) -> i64 {
        match self.roster.get(id).and_then(|i| i.last_shift()) {
            Some(last) => (date - last).num_days(),
            None => self.opts.fresh_score,
        }
    }

    /// Consomme une sélection ; échoue au-delà de `max_steps`.
    pub fn begin_step(&mut self) -> Result<(), SchedError> {
        if self.steps >= self.opts.max_steps {
            return Err(SchedError::StepLimitExceeded {
                limit: self.opts.max_steps,
            });
        }
        self.steps += 1;
        Ok(())
    }

    /// Place `id` dans un créneau libre, enregistre la date chez l'interne et met à jour les compteurs.
    /// Refuse un interne indisponible (aptitude, jour interdit, repos).
    pub fn assign(
        &mut self,
        day_index: usize,
        slot: SlotKind,
        id: InternId,
    ) -> Result<(), SchedError> {
        if self.roster.get(id).is_none() {
            return Err(SchedError::UnknownIntern(id));
        }
        let day = self
            .month
            .day(day_index)
            .ok_or_else(|| anyhow::anyhow!("day index {day_index} out of range"))?;
        let date = day.date();
        match day.slot(slot) {
            None => return Err(SchedError::MissingSlot { date, slot }),
            Some(Some(_)) => return Err(SchedError::SlotTaken { date, slot }),
            Some(None) => {}
        }
        if !self.roster.availability(id, date, slot.duty()) {
            return Err(SchedError::Unavailable {
                date,
                slot,
                intern: id,
            });
        }
        if let Some(day) = self.month.day_mut(day_index) {
            day.set_slot(slot, id);
        }
        self.roster.record_shift(id, date);
        self.tally.record(id, date, slot);
        tracing::trace!(%date, slot = slot.label(), intern = id.index(), "assigned");
        Ok(())
    }

    pub fn run<R: Rng>(
        &mut self,
        strategy: &dyn Strategy<R>,
        rng: &mut R,
    ) -> Result<(), SchedError> {
        strategy.generate(self, rng)
    }

    /// Statistiques par interne ; pur, peut être rappelé sans effet.
    pub fn statistics(&self) -> Vec<InternStatistics> {
        stats::calculate_statistics(&self.roster, &self.tally)
    }

    pub fn score(&self) -> f64 {
        stats::calculate_score(&self.roster, &self.tally)
    }

    pub fn detect_conflicts(&self) -> Vec<Conflict> {
        conflicts::detect_conflicts(self)
    }

    pub fn into_parts(self) -> (Roster, Month, Tally) {
        (self.roster, self.month, self.tally)
    }
}
