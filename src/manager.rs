use crate::calendar::{CalendarSpec, Month, ResolvedDay};
use crate::model::{InternRecord, Roster};
use crate::scheduler::{AssignOptions, Greedy, InternStatistics, SchedError, Scheduler, Strategy};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManagerConfig {
    /// Essais par stratégie.
    pub num_runs: usize,
    pub num_workers: usize,
    /// Graine maîtresse ; `None` = entropie du système.
    pub seed: Option<u64>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            num_runs: 10,
            num_workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            seed: None,
        }
    }
}

/// Résultat figé d'un essai réussi.
#[derive(Debug, Clone)]
pub struct TrialResult {
    pub trial: usize,
    pub strategy: &'static str,
    pub seed: u64,
    pub score: f64,
    pub roster: Roster,
    pub month: Month,
    pub statistics: Vec<InternStatistics>,
}

impl TrialResult {
    pub fn resolved_days(&self) -> Vec<ResolvedDay> {
        self.month.resolve(&self.roster)
    }
}

#[derive(Debug)]
pub struct TrialFailure {
    pub trial: usize,
    pub strategy: &'static str,
    pub seed: u64,
    pub error: SchedError,
}

#[derive(Debug)]
pub struct TrialReport {
    /// Essai de score minimal (le plus petit indice en cas d'égalité).
    pub best: TrialResult,
    pub attempted: usize,
    pub failures: Vec<TrialFailure>,
}

struct Job {
    trial: usize,
    strategy: usize,
    seed: u64,
}

/// Relance le moteur sur des copies indépendantes et garde le planning le plus équitable.
pub struct TrialManager {
    config: ManagerConfig,
    options: AssignOptions,
    strategies: Vec<Box<dyn Strategy<ChaCha8Rng>>>,
}

impl TrialManager {
    pub fn new(
        config: ManagerConfig,
        options: AssignOptions,
        strategies: Vec<Box<dyn Strategy<ChaCha8Rng>>>,
    ) -> Self {
        Self {
            config,
            options,
            strategies,
        }
    }

    pub fn builder() -> TrialManagerBuilder {
        TrialManagerBuilder::new()
    }

    pub fn config(&self) -> ManagerConfig {
        self.config
    }

    #[tracing::instrument(level = "info", skip_all, fields(runs = self.config.num_runs))]
    pub fn run(
        &self,
        records: &[InternRecord],
        calendar: &CalendarSpec,
    ) -> Result<TrialReport, SchedError> {
        if self.strategies.is_empty() {
            return Err(SchedError::NoStrategies);
        }
        if self.config.num_runs == 0 {
            return Err(SchedError::NoRuns);
        }
        // Entrées invalides : échec immédiat, pas de nouvel essai.
        Roster::from_records(records)?;
        Month::from_spec(calendar)?;

        let mut master = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::seed_from_u64(rand::rng().next_u64()),
        };
        let seeds: Vec<u64> = (0..self.config.num_runs).map(|_| master.next_u64()).collect();
        let jobs: Vec<Job> = (0..self.strategies.len())
            .flat_map(|strategy| {
                seeds.iter().enumerate().map(move |(trial, seed)| Job {
                    trial,
                    strategy,
                    seed: *seed,
                })
            })
            .collect();

        let workers = self.config.num_workers.clamp(1, jobs.len());
        tracing::info!(
            trials = jobs.len(),
            workers,
            interns = records.len(),
            "starting trials"
        );

        let next = AtomicUsize::new(0);
        let next_ref = &next;
        let jobs_ref = &jobs;

        let mut outcomes: Vec<(usize, Result<TrialResult, SchedError>)> =
            std::thread::scope(|scope| {
                let mut handles = Vec::with_capacity(workers);
                for _ in 0..workers {
                    handles.push(scope.spawn(move || {
                        let mut out = Vec::new();
                        loop {
                            let k = next_ref.fetch_add(1, Ordering::Relaxed);
                            let Some(job) = jobs_ref.get(k) else {
                                break;
                            };
                            out.push((k, self.run_trial(job, records, calendar)));
                        }
                        out
                    }));
                }
                handles
                    .into_iter()
                    .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                    .collect()
            });
        outcomes.sort_by_key(|(k, _)| *k);

        let attempted = outcomes.len();
        let mut best: Option<TrialResult> = None;
        let mut failures = Vec::new();
        for (k, outcome) in outcomes {
            let job = &jobs[k];
            let strategy = self.strategies[job.strategy].name();
            match outcome {
                Ok(result) => {
                    tracing::debug!(trial = job.trial, strategy, score = result.score, "trial done");
                    if best.as_ref().map_or(true, |b| result.score < b.score) {
                        best = Some(result);
                    }
                }
                Err(error) => {
                    tracing::warn!(trial = job.trial, strategy, %error, "trial failed");
                    failures.push(TrialFailure {
                        trial: job.trial,
                        strategy,
                        seed: job.seed,
                        error,
                    });
                }
            }
        }

        match best {
            Some(best) => {
                tracing::info!(
                    score = best.score,
                    trial = best.trial,
                    failed = failures.len(),
                    "best schedule selected"
                );
                Ok(TrialReport {
                    best,
                    attempted,
                    failures,
                })
            }
            None => {
                let first = failures
                    .into_iter()
                    .next()
                    .map(|f| f.error)
                    .unwrap_or(SchedError::NoRuns);
                Err(SchedError::AllTrialsFailed {
                    attempts: attempted,
                    first: Box::new(first),
                })
            }
        }
    }

    /// Un essai : reconstruction du roster et du mois depuis les entrées, puis remplissage.
    fn run_trial(
        &self,
        job: &Job,
        records: &[InternRecord],
        calendar: &CalendarSpec,
    ) -> Result<TrialResult, SchedError> {
        let strategy = &self.strategies[job.strategy];
        let roster = Roster::from_records(records)?;
        let month = Month::from_spec(calendar)?;
        let mut scheduler = Scheduler::with_options(roster, month, self.options);
        let mut rng = ChaCha8Rng::seed_from_u64(job.seed);

        scheduler.run(strategy.as_ref(), &mut rng)?;

        let conflicts = scheduler.detect_conflicts();
        if let Some(first) = conflicts.first() {
            tracing::warn!(
                trial = job.trial,
                strategy = strategy.name(),
                count = conflicts.len(),
                "schedule rejected"
            );
            return Err(SchedError::InvalidSchedule {
                count: conflicts.len(),
                first: first.date,
            });
        }

        let statistics = scheduler.statistics();
        let score = scheduler.score();
        let (roster, month, _) = scheduler.into_parts();
        Ok(TrialResult {
            trial: job.trial,
            strategy: strategy.name(),
            seed: job.seed,
            score,
            roster,
            month,
            statistics,
        })
    }
}

pub struct TrialManagerBuilder {
    config: ManagerConfig,
    options: AssignOptions,
    strategies: Vec<Box<dyn Strategy<ChaCha8Rng>>>,
}

impl Default for TrialManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrialManagerBuilder {
    pub fn new() -> Self {
        Self {
            config: ManagerConfig::default(),
            options: AssignOptions::default(),
            strategies: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_runs(mut self, num_runs: usize) -> Self {
        self.config.num_runs = num_runs;
        self
    }

    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.config.num_workers = num_workers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn with_options(mut self, options: AssignOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_strategy(mut self, strategy: Box<dyn Strategy<ChaCha8Rng>>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Sans stratégie explicite, le glouton est utilisé.
    pub fn build(mut self) -> TrialManager {
        if self.strategies.is_empty() {
            self.strategies.push(Box::new(Greedy));
        }
        TrialManager::new(self.config, self.options, self.strategies)
    }
}
