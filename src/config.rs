use crate::calendar::CalendarSpec;
use crate::manager::ManagerConfig;
use crate::scheduler::AssignOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration d'une génération (fichier JSON) ; les options du CLI priment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub first_er_day: Option<u32>,
    #[serde(default)]
    pub extra_er_days: Vec<u32>,
    #[serde(default)]
    pub no_er_days: Vec<u32>,
    #[serde(default)]
    pub runs: Option<usize>,
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub max_steps: Option<usize>,
}

impl ScheduleConfig {
    pub fn runs(&self) -> usize {
        self.runs.unwrap_or(10)
    }

    pub fn workers(&self) -> usize {
        self.workers
            .unwrap_or_else(|| ManagerConfig::default().num_workers)
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
            .unwrap_or_else(|| AssignOptions::default().max_steps)
    }

    pub fn calendar(&self) -> Result<CalendarSpec> {
        let year = self.year.context("missing year")?;
        let month = self.month.context("missing month")?;
        let first_er_day = self.first_er_day.context("missing first_er_day")?;
        Ok(CalendarSpec {
            year,
            month,
            first_er_day,
            extra_er_days: self.extra_er_days.clone(),
            no_er_days: self.no_er_days.clone(),
        })
    }

    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig {
            num_runs: self.runs(),
            num_workers: self.workers(),
            seed: self.seed,
        }
    }

    pub fn assign_options(&self) -> AssignOptions {
        AssignOptions {
            max_steps: self.max_steps(),
            ..AssignOptions::default()
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ScheduleConfig> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    let config: ScheduleConfig = serde_json::from_slice(&data)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}
