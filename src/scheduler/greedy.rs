use super::{SchedError, Scheduler, Strategy};
use crate::calendar::SlotKind;
use crate::model::InternId;
use chrono::NaiveDate;
use rand::seq::IndexedRandom;
use rand::Rng;

/// Glouton myope : à chaque créneau, l'interne disponible le plus reposé, égalités tirées au sort.
#[derive(Debug, Default, Clone, Copy)]
pub struct Greedy;

impl Greedy {
    pub const NAME: &'static str = "greedy";

    /// Choisit l'interne pour `slot` à `date` sans l'assigner.
    pub fn best_candidate<R: Rng>(
        scheduler: &mut Scheduler,
        date: NaiveDate,
        slot: SlotKind,
        rng: &mut R,
    ) -> Result<InternId, SchedError> {
        scheduler.begin_step()?;

        let candidates = scheduler.candidates(date, slot.duty());
        let Some(max_score) = candidates
            .iter()
            .map(|id| scheduler.recency_score(*id, date))
            .max()
        else {
            return Err(SchedError::NoAvailableCandidate { date, slot });
        };

        let best: Vec<InternId> = candidates
            .into_iter()
            .filter(|id| scheduler.recency_score(*id, date) == max_score)
            .collect();

        best.choose(rng)
            .copied()
            .ok_or(SchedError::NoAvailableCandidate { date, slot })
    }
}

impl<R: Rng> Strategy<R> for Greedy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn generate(&self, scheduler: &mut Scheduler, rng: &mut R) -> Result<(), SchedError> {
        for index in 0..scheduler.month().len() {
            let Some(day) = scheduler.month().day(index) else {
                break;
            };
            let (date, slots) = (day.date(), day.slots());

            // urgences d'abord : le second tirage voit le premier via la règle de repos
            for &slot in slots {
                let intern = Self::best_candidate(scheduler, date, slot, rng)?;
                scheduler.assign(index, slot, intern)?;
            }
        }
        Ok(())
    }
}
