use super::{Conflict, ConflictKind, Scheduler};
use crate::calendar::SlotKind;
use crate::model::InternId;
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub(super) fn detect_conflicts(scheduler: &Scheduler) -> Vec<Conflict> {
    let roster = scheduler.roster();
    let mut out = Vec::new();
    let mut by_intern: BTreeMap<InternId, Vec<(NaiveDate, SlotKind)>> = BTreeMap::new();

    for day in scheduler.month().days() {
        for &slot in day.slots() {
            let date = day.date();
            let Some(Some(id)) = day.slot(slot) else {
                out.push(Conflict {
                    date,
                    slot,
                    intern: None,
                    kind: ConflictKind::Unassigned,
                });
                continue;
            };

            let eligible = roster
                .get(id)
                .map(|i| i.can_take(slot.duty()) && !i.forbidden_days.contains(&date))
                .unwrap_or(false);
            if !eligible {
                out.push(Conflict {
                    date,
                    slot,
                    intern: Some(id),
                    kind: ConflictKind::NotEligible,
                });
            }
            by_intern.entry(id).or_default().push((date, slot));
        }
    }

    // Les jours sont parcourus dans l'ordre : chaque liste est déjà chronologique.
    for (id, shifts) in by_intern {
        for pair in shifts.windows(2) {
            let (earlier, _) = pair[0];
            let (date, slot) = pair[1];
            if (date - earlier).num_days() < roster.min_rest_days() {
                out.push(Conflict {
                    date,
                    slot,
                    intern: Some(id),
                    kind: ConflictKind::RestViolation { earlier },
                });
            }
        }
    }

    out
}
