use chrono::NaiveDate;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Repos minimal entre deux gardes, en jours (écart strictement inférieur = interdit).
pub const MIN_REST_DAYS: i64 = 2;

/// Identifiant fort d'un interne : index stable dans l'arène du `Roster`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InternId(usize);

impl InternId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Type de garde demandé à un interne.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Duty {
    /// Garde de service (une par jour)
    Department,
    /// Garde d'urgences (deux, un jour sur quatre)
    Er,
}

/// Enregistrement d'entrée, tel que fourni par l'import.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InternRecord {
    pub name: String,
    pub department: bool,
    pub er: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub forbidden_days: Vec<NaiveDate>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub desirable_days: Vec<NaiveDate>,
}

impl InternRecord {
    pub fn new<N: Into<String>>(name: N, department: bool, er: bool) -> Self {
        Self {
            name: name.into(),
            department,
            er,
            forbidden_days: Vec::new(),
            desirable_days: Vec::new(),
        }
    }
}

/// Interne et son état d'assignation pour l'essai en cours.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Intern {
    pub id: InternId,
    pub name: String,
    pub department: bool,
    pub er: bool,
    pub forbidden_days: Vec<NaiveDate>,
    pub desirable_days: Vec<NaiveDate>,
    /// Dates de garde, dans l'ordre d'assignation.
    pub shifts: Vec<NaiveDate>,
}

impl Intern {
    pub fn can_take(&self, duty: Duty) -> bool {
        match duty {
            Duty::Department => self.department,
            Duty::Er => self.er,
        }
    }

    /// Dernière garde (chronologiquement), si elle existe.
    pub fn last_shift(&self) -> Option<NaiveDate> {
        self.shifts.iter().max().copied()
    }

    /// Gardes triées chronologiquement.
    pub fn sorted_shifts(&self) -> Vec<NaiveDate> {
        let mut shifts = self.shifts.clone();
        shifts.sort_unstable();
        shifts
    }

    fn is_available(&self, date: NaiveDate, duty: Duty, min_rest_days: i64) -> bool {
        if !self.can_take(duty) {
            return false;
        }
        if self.forbidden_days.contains(&date) {
            return false;
        }
        !self
            .shifts
            .iter()
            .any(|shift| (date - *shift).num_days().abs() < min_rest_days)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("intern record #{index} has an empty name")]
    EmptyName { index: usize },
    #[error("duplicate intern name: {0}")]
    DuplicateName(String),
}

/// Liste des internes (arène indexée par `InternId`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Roster {
    interns: Vec<Intern>,
    min_rest_days: i64,
}

impl Roster {
    /// Construit le roster en validant chaque enregistrement.
    pub fn from_records(records: &[InternRecord]) -> Result<Self, RosterError> {
        let mut interns: Vec<Intern> = Vec::with_capacity(records.len());
        for (index, rec) in records.iter().enumerate() {
            let name = rec.name.trim();
            if name.is_empty() {
                return Err(RosterError::EmptyName { index });
            }
            if interns.iter().any(|i| i.name == name) {
                return Err(RosterError::DuplicateName(name.to_string()));
            }
            interns.push(Intern {
                id: InternId(index),
                name: name.to_string(),
                department: rec.department,
                er: rec.er,
                forbidden_days: rec.forbidden_days.clone(),
                desirable_days: rec.desirable_days.clone(),
                shifts: Vec::new(),
            });
        }
        Ok(Self {
            interns,
            min_rest_days: MIN_REST_DAYS,
        })
    }

    /// Allonge le repos minimal ; jamais en dessous de `MIN_REST_DAYS`.
    pub fn with_min_rest_days(mut self, days: i64) -> Self {
        self.min_rest_days = days.max(MIN_REST_DAYS);
        self
    }

    pub fn min_rest_days(&self) -> i64 {
        self.min_rest_days
    }

    pub fn len(&self) -> usize {
        self.interns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Intern> {
        self.interns.iter()
    }

    pub fn get(&self, id: InternId) -> Option<&Intern> {
        self.interns.get(id.0)
    }

    pub fn find_by_name<'a>(&'a self, name: &str) -> Option<&'a Intern> {
        self.interns.iter().find(|i| i.name == name)
    }

    pub fn name_of(&self, id: InternId) -> Option<&str> {
        self.get(id).map(|i| i.name.as_str())
    }

    /// Disponibilité : aptitude, jours interdits, et repos minimal autour de `date`.
    pub fn availability(&self, id: InternId, date: NaiveDate, duty: Duty) -> bool {
        self.get(id)
            .map(|i| i.is_available(date, duty, self.min_rest_days))
            .unwrap_or(false)
    }

    /// Tous les internes disponibles pour ce créneau (éventuellement aucun).
    pub fn candidates(&self, date: NaiveDate, duty: Duty) -> Vec<InternId> {
        self.interns
            .iter()
            .filter(|i| i.is_available(date, duty, self.min_rest_days))
            .map(|i| i.id)
            .collect()
    }

    /// Retourne `false` si l'id est inconnu.
    pub(crate) fn record_shift(&mut self, id: InternId, date: NaiveDate) -> bool {
        match self.interns.get_mut(id.0) {
            Some(intern) => {
                intern.shifts.push(date);
                true
            }
            None => false,
        }
    }

    /// Efface les gardes de tout le monde (début d'un nouvel essai).
    pub fn reset(&mut self) {
        for intern in &mut self.interns {
            intern.shifts.clear();
        }
    }
}
