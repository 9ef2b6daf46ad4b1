use crate::calendar::{Month, ResolvedDay};
use crate::manager::TrialReport;
use crate::model::{InternRecord, Roster};
use crate::scheduler::InternStatistics;
use anyhow::{bail, Context};
use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Import des internes depuis CSV: colonnes `name`, `department`, `er` obligatoires,
/// `forbidden_days` et `desirable_days` facultatives, dans n'importe quel ordre.
/// Les listes de jours sont des numéros de jour du mois séparés par des virgules.
pub fn import_interns_csv<P: AsRef<Path>>(
    path: P,
    year: i32,
    month: u32,
) -> anyhow::Result<Vec<InternRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let headers = rdr.headers()?.clone();
    let column = |wanted: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    };
    let required = |wanted: &str| {
        column(wanted).with_context(|| format!("missing `{wanted}` column in header"))
    };
    let name_col = required("name")?;
    let department_col = required("department")?;
    let er_col = required("er")?;
    let forbidden_col = column("forbidden_days");
    let desirable_col = column("desirable_days");

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(name_col).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid intern row (empty name)");
        }
        let department = parse_bool(rec.get(department_col).context("missing department")?.trim())
            .with_context(|| format!("invalid department value for {name}"))?;
        let er = parse_bool(rec.get(er_col).context("missing er")?.trim())
            .with_context(|| format!("invalid er value for {name}"))?;

        let mut record = InternRecord::new(name, department, er);
        if let Some(days) = forbidden_col.and_then(|col| rec.get(col)) {
            record.forbidden_days = parse_days(days, year, month)
                .with_context(|| format!("invalid forbidden_days for {name}"))?;
        }
        if let Some(days) = desirable_col.and_then(|col| rec.get(col)) {
            record.desirable_days = parse_days(days, year, month)
                .with_context(|| format!("invalid desirable_days for {name}"))?;
        }
        out.push(record);
    }
    Ok(out)
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" | "" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

fn parse_days(raw: &str, year: i32, month: u32) -> anyhow::Result<Vec<NaiveDate>> {
    raw.split(',')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            let day: u32 = chunk
                .parse()
                .with_context(|| format!("invalid day number: {chunk}"))?;
            NaiveDate::from_ymd_opt(year, month, day)
                .with_context(|| format!("day {day} not in {year}-{month:02}"))
        })
        .collect()
}

/// Export CSV du planning: header `date,weekday,department,er_1,er_2`
pub fn export_schedule_csv<P: AsRef<Path>>(
    path: P,
    month: &Month,
    roster: &Roster,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "weekday", "department", "er_1", "er_2"])?;
    for day in month.resolve(roster) {
        let date = day.date.to_string();
        let weekday = day.date.weekday().to_string();
        let [er_1, er_2] = day.er.clone().unwrap_or_default();
        w.write_record([
            date.as_str(),
            weekday.as_str(),
            day.department.as_deref().unwrap_or(""),
            er_1.as_deref().unwrap_or(""),
            er_2.as_deref().unwrap_or(""),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des statistiques (une ligne par interne).
pub fn export_statistics_csv<P: AsRef<Path>>(
    path: P,
    statistics: &[InternStatistics],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    for row in statistics {
        w.serialize(row)?;
    }
    w.flush()?;
    Ok(())
}

/// Rapport complet du meilleur essai, tel qu'exporté en JSON.
#[derive(Debug, Serialize)]
pub struct ScheduleReport<'a> {
    pub strategy: &'a str,
    pub trial: usize,
    pub seed: u64,
    pub score: f64,
    pub attempted: usize,
    pub failed: usize,
    pub days: Vec<ResolvedDay>,
    pub statistics: &'a [InternStatistics],
}

impl<'a> ScheduleReport<'a> {
    pub fn from_report(report: &'a TrialReport) -> Self {
        let best = &report.best;
        Self {
            strategy: best.strategy,
            trial: best.trial,
            seed: best.seed,
            score: best.score,
            attempted: report.attempted,
            failed: report.failures.len(),
            days: best.resolved_days(),
            statistics: &best.statistics,
        }
    }
}

/// Export JSON (jolie mise en forme), écrit de manière atomique.
pub fn export_report_json<P: AsRef<Path>>(path: P, report: &TrialReport) -> anyhow::Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_vec_pretty(&ScheduleReport::from_report(report))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).with_context(|| "atomic rename")?;
    Ok(())
}
