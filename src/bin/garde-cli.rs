#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use garde::{
    config::{load_config, ScheduleConfig},
    io,
    report::{render_month, render_statistics},
    CalendarSpec, Month, TrialManager,
};
use clap::{Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de répartition des gardes mensuelles d'internes
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer le meilleur planning sur plusieurs essais
    Run {
        /// CSV `name,department,er,forbidden_days,desirable_days`
        #[arg(long)]
        interns: String,
        /// Fichier JSON de configuration (optionnel)
        #[arg(long)]
        config: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        /// Premier jour d'urgences du mois (1..=31)
        #[arg(long)]
        first_er_day: Option<u32>,
        #[arg(long)]
        runs: Option<usize>,
        #[arg(long)]
        workers: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
        #[arg(long)]
        stats_csv: Option<String>,
    },

    /// Afficher le mois vide avec les jours d'urgences
    Calendar {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        first_er_day: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Run {
            interns,
            config,
            year,
            month,
            first_er_day,
            runs,
            workers,
            seed,
            out_json,
            out_csv,
            stats_csv,
        } => {
            let mut cfg = match config {
                Some(path) => load_config(path)?,
                None => ScheduleConfig::default(),
            };
            cfg.year = year.or(cfg.year);
            cfg.month = month.or(cfg.month);
            cfg.first_er_day = first_er_day.or(cfg.first_er_day);
            cfg.runs = runs.or(cfg.runs);
            cfg.workers = workers.or(cfg.workers);
            cfg.seed = seed.or(cfg.seed);

            let calendar: CalendarSpec = cfg.calendar().context("calendar settings")?;
            let records = io::import_interns_csv(&interns, calendar.year, calendar.month)?;

            let manager = TrialManager::builder()
                .with_config(cfg.manager_config())
                .with_options(cfg.assign_options())
                .build();

            match manager.run(&records, &calendar) {
                Ok(report) => {
                    let best = &report.best;
                    println!(
                        "score: {:.4} (trial {}, {} / {} failed)",
                        best.score,
                        best.trial,
                        report.failures.len(),
                        report.attempted
                    );
                    print!("{}", render_month(&best.month, Some(&best.roster)));
                    println!();
                    print!("{}", render_statistics(&best.statistics));

                    if let Some(path) = out_json {
                        io::export_report_json(path, &report)?;
                    }
                    if let Some(path) = out_csv {
                        io::export_schedule_csv(path, &best.month, &best.roster)?;
                    }
                    if let Some(path) = stats_csv {
                        io::export_statistics_csv(path, &best.statistics)?;
                    }
                    0
                }
                Err(err) if err.is_infeasible() => {
                    eprintln!("no feasible schedule: {err}");
                    // Code 2 = WARNING/INCOMPLETE
                    2
                }
                Err(err) => return Err(err.into()),
            }
        }
        Commands::Calendar {
            year,
            month,
            first_er_day,
        } => {
            let month = Month::generate(year, month, first_er_day)?;
            print!("{}", render_month(&month, None));
            0
        }
    };

    std::process::exit(code);
}
