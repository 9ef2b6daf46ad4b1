use crate::calendar::Month;
use crate::model::{InternId, Roster};
use crate::scheduler::InternStatistics;
use chrono::Datelike;
use std::fmt::Write;

/// Une ligne par jour: `2023-05-02 Tue  MD: Alice  ER: Bob, Chloé`.
/// Sans roster (mois vide), chaque créneau est affiché `-`.
pub fn render_month(month: &Month, roster: Option<&Roster>) -> String {
    let name = |id: Option<InternId>| -> String {
        match (id, roster) {
            (Some(id), Some(r)) => r.name_of(id).unwrap_or("?").to_string(),
            _ => "-".to_string(),
        }
    };

    let mut out = String::new();
    for day in month.days() {
        let date = day.date();
        let _ = write!(out, "{} {}  MD: {}", date, date.weekday(), name(day.department()));
        if let Some([a, b]) = day.er() {
            let _ = write!(out, "  ER: {}, {}", name(a), name(b));
        }
        out.push('\n');
    }
    out
}

pub fn render_statistics(statistics: &[InternStatistics]) -> String {
    let mut out = format!(
        "{:<16} {:>4} {:>4} {:>4} {:>4} {:>4} {:>5} {:>7}\n",
        "name", "days", "fri", "sat", "sun", "er", "sandw", "desired"
    );
    for s in statistics {
        let _ = writeln!(
            out,
            "{:<16} {:>4} {:>4} {:>4} {:>4} {:>4} {:>5} {:>7}",
            s.name, s.days, s.fridays, s.saturdays, s.sundays, s.er_shifts, s.sandwiches, s.desired_days
        );
    }
    out
}
