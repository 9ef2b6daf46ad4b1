use crate::model::{Duty, InternId, Roster};
use chrono::{Datelike, NaiveDate};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Période du cycle des gardes d'urgences, en jours.
pub const ER_CYCLE_DAYS: i64 = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("first ER day {day} outside 1..={days_in_month}")]
    FirstErDayOutOfRange { day: u32, days_in_month: u32 },
    #[error("date {0} is not in the scheduled month")]
    DateNotInMonth(NaiveDate),
    #[error("day {day} outside 1..={days_in_month}")]
    DayOutOfRange { day: u32, days_in_month: u32 },
}

/// Créneau d'une journée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SlotKind {
    Department,
    Er1,
    Er2,
}

impl SlotKind {
    pub fn duty(self) -> Duty {
        match self {
            SlotKind::Department => Duty::Department,
            SlotKind::Er1 | SlotKind::Er2 => Duty::Er,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SlotKind::Department => "department",
            SlotKind::Er1 => "er_1",
            SlotKind::Er2 => "er_2",
        }
    }
}

/// Journée : une garde de service, plus une paire de gardes d'urgences les jours concernés.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Day {
    date: NaiveDate,
    department: Option<InternId>,
    er: Option<[Option<InternId>; 2]>,
}

impl Day {
    fn new(date: NaiveDate, requires_extra: bool) -> Self {
        Self {
            date,
            department: None,
            er: requires_extra.then_some([None, None]),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn requires_extra(&self) -> bool {
        self.er.is_some()
    }

    /// Créneaux existants, dans l'ordre de remplissage (urgences d'abord).
    pub fn slots(&self) -> &'static [SlotKind] {
        if self.requires_extra() {
            &[SlotKind::Er1, SlotKind::Er2, SlotKind::Department]
        } else {
            &[SlotKind::Department]
        }
    }

    /// `None` si le créneau n'existe pas ce jour-là, `Some(None)` s'il est libre.
    pub fn slot(&self, kind: SlotKind) -> Option<Option<InternId>> {
        match kind {
            SlotKind::Department => Some(self.department),
            SlotKind::Er1 => self.er.map(|pair| pair[0]),
            SlotKind::Er2 => self.er.map(|pair| pair[1]),
        }
    }

    pub fn department(&self) -> Option<InternId> {
        self.department
    }

    pub fn er(&self) -> Option<[Option<InternId>; 2]> {
        self.er
    }

    /// Retourne `false` si le créneau n'existe pas ou est déjà occupé.
    pub(crate) fn set_slot(&mut self, kind: SlotKind, id: InternId) -> bool {
        let cell = match (kind, self.er.as_mut()) {
            (SlotKind::Department, _) => &mut self.department,
            (SlotKind::Er1, Some(pair)) => &mut pair[0],
            (SlotKind::Er2, Some(pair)) => &mut pair[1],
            _ => return false,
        };
        if cell.is_some() {
            return false;
        }
        *cell = Some(id);
        true
    }

    pub fn is_complete(&self) -> bool {
        self.slots()
            .iter()
            .all(|kind| matches!(self.slot(*kind), Some(Some(_))))
    }
}

/// Recette de construction d'un mois (permet de le reconstruire à l'identique pour chaque essai).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalendarSpec {
    pub year: i32,
    pub month: u32,
    pub first_er_day: u32,
    /// Jours du mois forcés en urgences en plus du cycle.
    #[cfg_attr(feature = "serde", serde(default))]
    pub extra_er_days: Vec<u32>,
    /// Jours du mois retirés du cycle des urgences.
    #[cfg_attr(feature = "serde", serde(default))]
    pub no_er_days: Vec<u32>,
}

impl CalendarSpec {
    pub fn new(year: i32, month: u32, first_er_day: u32) -> Self {
        Self {
            year,
            month,
            first_er_day,
            extra_er_days: Vec::new(),
            no_er_days: Vec::new(),
        }
    }
}

/// Mois planifié : une `Day` par date, du 1er au dernier jour.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Month {
    year: i32,
    month: u32,
    first_er_day: u32,
    days: Vec<Day>,
}

impl Month {
    /// Construit le mois vide ; urgences quand `(jour - first_er_day) mod 4 == 0`.
    pub fn generate(year: i32, month: u32, first_er_day: u32) -> Result<Self, CalendarError> {
        let days_in_month = days_in_month(year, month)?;
        if first_er_day == 0 || first_er_day > days_in_month {
            return Err(CalendarError::FirstErDayOutOfRange {
                day: first_er_day,
                days_in_month,
            });
        }

        let mut days = Vec::with_capacity(days_in_month as usize);
        for day in 1..=days_in_month {
            let date = NaiveDate::from_ymd_opt(year, month, day)
                .ok_or(CalendarError::InvalidMonth { year, month })?;
            let offset = i64::from(day) - i64::from(first_er_day);
            days.push(Day::new(date, offset.rem_euclid(ER_CYCLE_DAYS) == 0));
        }

        Ok(Self {
            year,
            month,
            first_er_day,
            days,
        })
    }

    pub fn from_spec(spec: &CalendarSpec) -> Result<Self, CalendarError> {
        let mut month = Self::generate(spec.year, spec.month, spec.first_er_day)?;
        for day in &spec.extra_er_days {
            let date = month.date_of(*day)?;
            month.add_er_shift(date)?;
        }
        for day in &spec.no_er_days {
            let date = month.date_of(*day)?;
            month.remove_er_shift(date)?;
        }
        Ok(month)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_er_day(&self) -> u32 {
        self.first_er_day
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn day(&self, index: usize) -> Option<&Day> {
        self.days.get(index)
    }

    pub(crate) fn day_mut(&mut self, index: usize) -> Option<&mut Day> {
        self.days.get_mut(index)
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.days.iter().position(|d| d.date == date)
    }

    fn date_of(&self, day: u32) -> Result<NaiveDate, CalendarError> {
        NaiveDate::from_ymd_opt(self.year, self.month, day).ok_or(CalendarError::DayOutOfRange {
            day,
            days_in_month: self.days.len() as u32,
        })
    }

    /// Ajoute la paire de gardes d'urgences à `date` (sans effet si déjà présente).
    pub fn add_er_shift(&mut self, date: NaiveDate) -> Result<(), CalendarError> {
        let idx = self
            .index_of(date)
            .ok_or(CalendarError::DateNotInMonth(date))?;
        let day = &mut self.days[idx];
        if day.er.is_none() {
            day.er = Some([None, None]);
        }
        Ok(())
    }

    /// Retire la paire de gardes d'urgences de `date`.
    pub fn remove_er_shift(&mut self, date: NaiveDate) -> Result<(), CalendarError> {
        let idx = self
            .index_of(date)
            .ok_or(CalendarError::DateNotInMonth(date))?;
        self.days[idx].er = None;
        Ok(())
    }

    pub fn er_days(&self) -> Vec<u32> {
        self.days
            .iter()
            .filter(|d| d.requires_extra())
            .map(|d| d.date.day())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.days.iter().all(Day::is_complete)
    }

    /// Vue de présentation : noms résolus, `None` = non assigné.
    pub fn resolve(&self, roster: &Roster) -> Vec<ResolvedDay> {
        let name = |id: Option<InternId>| id.and_then(|i| roster.name_of(i)).map(str::to_owned);
        self.days
            .iter()
            .map(|d| ResolvedDay {
                date: d.date,
                requires_extra: d.requires_extra(),
                department: name(d.department),
                er: d.er.map(|[a, b]| [name(a), name(b)]),
            })
            .collect()
    }
}

/// Journée avec les noms des internes assignés.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResolvedDay {
    pub date: NaiveDate,
    pub requires_extra: bool,
    pub department: Option<String>,
    pub er: Option<[Option<String>; 2]>,
}

pub fn days_in_month(year: i32, month: u32) -> Result<u32, CalendarError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::InvalidMonth { year, month })?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or(CalendarError::InvalidMonth { year, month })?;
    Ok(next.signed_duration_since(first).num_days() as u32)
}
