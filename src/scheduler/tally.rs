use crate::calendar::SlotKind;
use crate::model::InternId;
use chrono::{Datelike, NaiveDate};

/// Compteurs d'un interne.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub shifts: u32,
    pub fridays: u32,
    pub saturdays: u32,
    pub sundays: u32,
    pub er: u32,
}

/// Compteurs d'équité tenus à jour à chaque assignation, indexés par `InternId`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    counts: Vec<Counts>,
}

impl Tally {
    pub fn new(interns: usize) -> Self {
        Self {
            counts: vec![Counts::default(); interns],
        }
    }

    pub fn record(&mut self, id: InternId, date: NaiveDate, slot: SlotKind) {
        let Some(c) = self.counts.get_mut(id.index()) else {
            return;
        };
        c.shifts += 1;
        if slot != SlotKind::Department {
            c.er += 1;
        }
        match date.weekday().number_from_monday() {
            5 => c.fridays += 1,
            6 => c.saturdays += 1,
            7 => c.sundays += 1,
            _ => {}
        }
    }

    pub fn get(&self, id: InternId) -> Counts {
        self.counts.get(id.index()).copied().unwrap_or_default()
    }

    /// Les cinq distributions (total, vendredis, samedis, dimanches, urgences) sur tout le roster.
    pub fn distributions(&self) -> [Vec<f64>; 5] {
        let column = |f: fn(&Counts) -> u32| -> Vec<f64> {
            self.counts.iter().map(|c| f64::from(f(c))).collect()
        };
        [
            column(|c| c.shifts),
            column(|c| c.fridays),
            column(|c| c.saturdays),
            column(|c| c.sundays),
            column(|c| c.er),
        ]
    }
}
