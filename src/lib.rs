#![forbid(unsafe_code)]
//! Garde — répartition mensuelle des gardes d'internes (service + urgences).
//!
//! - Glouton : l'interne disponible le plus reposé, égalités tirées au sort.
//! - Repos minimal de deux jours entre deux gardes d'une même personne.
//! - Score d'équité (écarts-types) ; plus bas = mieux.
//! - Essais multiples indépendants, en parallèle, graine reproductible.

pub mod calendar;
#[cfg(feature = "serde")]
pub mod config;
#[cfg(feature = "serde")]
pub mod io;
pub mod manager;
pub mod model;
pub mod report;
pub mod scheduler;

pub use calendar::{CalendarError, CalendarSpec, Day, Month, ResolvedDay, SlotKind};
pub use manager::{ManagerConfig, TrialFailure, TrialManager, TrialManagerBuilder, TrialReport, TrialResult};
pub use model::{Duty, Intern, InternId, InternRecord, Roster, RosterError, MIN_REST_DAYS};
pub use scheduler::{
    AssignOptions, Conflict, ConflictKind, Greedy, InternStatistics, SchedError, Scheduler, Strategy,
};
