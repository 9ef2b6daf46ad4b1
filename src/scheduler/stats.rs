use super::tally::Tally;
use crate::model::{Intern, Roster};
use chrono::NaiveDate;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Statistiques descriptives d'un interne pour un planning terminé.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InternStatistics {
    pub name: String,
    pub days: u32,
    pub fridays: u32,
    pub saturdays: u32,
    pub sundays: u32,
    pub er_shifts: u32,
    /// gardes séparées de la précédente par un seul jour de repos
    pub sandwiches: u32,
    /// gardes tombées sur un jour souhaité
    pub desired_days: u32,
}

/// Écart-type de population (diviseur N). Vaut 0 pour 0 ou 1 valeur.
pub fn pstdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

fn gaps(sorted: &[NaiveDate]) -> Vec<i64> {
    sorted
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days())
        .collect()
}

fn intern_statistics(intern: &Intern, tally: &Tally) -> InternStatistics {
    let counts = tally.get(intern.id);
    let sorted = intern.sorted_shifts();
    let sandwiches = gaps(&sorted).iter().filter(|g| **g == 2).count() as u32;
    let desired_days = sorted
        .iter()
        .filter(|d| intern.desirable_days.contains(d))
        .count() as u32;

    InternStatistics {
        name: intern.name.clone(),
        days: sorted.len() as u32,
        fridays: counts.fridays,
        saturdays: counts.saturdays,
        sundays: counts.sundays,
        er_shifts: counts.er,
        sandwiches,
        desired_days,
    }
}

pub(super) fn calculate_statistics(roster: &Roster, tally: &Tally) -> Vec<InternStatistics> {
    roster
        .iter()
        .map(|intern| intern_statistics(intern, tally))
        .collect()
}

/// Somme des écarts-types des compteurs, plus l'écart-type des intervalles propres à chacun.
/// Plus bas = plus équitable.
pub(super) fn calculate_score(roster: &Roster, tally: &Tally) -> f64 {
    let spread: f64 = tally.distributions().iter().map(|d| pstdev(d)).sum();

    let spacing: f64 = roster
        .iter()
        .filter(|intern| intern.shifts.len() >= 2)
        .map(|intern| {
            let gaps: Vec<f64> = gaps(&intern.sorted_shifts())
                .into_iter()
                .map(|g| g as f64)
                .collect();
            pstdev(&gaps)
        })
        .sum();

    spread + spacing
}
