use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use pizza_game::{FileStorage, GameStorage, MemoryStorage, Money, ParlourConfig, STORAGE_KEY};

use crate::logic::policy::GameplayStrategy;
use crate::logic::simulation::{DayOutcome, SimulationPlan, SimulationSummary, run_plan};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub strategy: String,
    pub seed: u64,
    pub passed: bool,
    pub days_planned: u32,
    pub days_played: u32,
    pub bankrupt_on: Option<u32>,
    pub failures: Vec<String>,
    pub final_cash: Money,
    pub total_profit: Money,
    pub mean_fulfillment: f64,
    pub mean_satisfaction: f64,
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    pub days: Vec<DayOutcome>,
}

impl ScenarioResult {
    fn from_summary(summary: SimulationSummary, duration: Duration) -> Self {
        let played = summary.days.len();
        let mean = |f: &dyn Fn(&DayOutcome) -> f64| {
            if played == 0 {
                0.0
            } else {
                summary.days.iter().map(f).sum::<f64>() / f64::from(clamp_u32(played))
            }
        };
        let mean_fulfillment = mean(&|d| d.fulfillment);
        let mean_satisfaction = mean(&|d| f64::from(d.satisfaction));
        Self {
            strategy: summary.plan.strategy.key().to_string(),
            seed: summary.plan.seed,
            passed: summary.violations.is_empty(),
            days_planned: summary.plan.days,
            days_played: clamp_u32(played),
            bankrupt_on: summary.bankrupt_on,
            total_profit: summary.total_profit(),
            final_cash: summary.final_state.cash,
            mean_fulfillment,
            mean_satisfaction,
            failures: summary.violations,
            duration,
            days: summary.days,
        }
    }
}

fn clamp_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Runs every (strategy, seed) pair and collects results.
pub struct LogicTester {
    cfg: ParlourConfig,
    save_dir: Option<PathBuf>,
    verbose: bool,
}

impl LogicTester {
    pub const fn new(cfg: ParlourConfig, save_dir: Option<PathBuf>, verbose: bool) -> Self {
        Self {
            cfg,
            save_dir,
            verbose,
        }
    }

    /// # Errors
    ///
    /// Returns an error if a storage backend fails mid-run.
    pub fn run(
        &self,
        strategies: &[GameplayStrategy],
        seeds: &[u64],
        days: u32,
    ) -> Result<Vec<ScenarioResult>> {
        let mut results = Vec::with_capacity(strategies.len() * seeds.len());
        for &strategy in strategies {
            for &seed in seeds {
                let plan = SimulationPlan {
                    strategy,
                    seed,
                    days,
                };
                if self.verbose {
                    println!(
                        "🧪 Playing {} (seed {seed}, {days} days)",
                        strategy.label().bright_white()
                    );
                }
                let result = self.run_single(&plan)?;
                self.report_progress(&result);
                results.push(result);
            }
        }
        Ok(results)
    }

    fn run_single(&self, plan: &SimulationPlan) -> Result<ScenarioResult> {
        let start = Instant::now();
        let summary = match &self.save_dir {
            Some(dir) => {
                let run_dir = dir.join(format!("{}-{}", plan.strategy.key(), plan.seed));
                let storage = FileStorage::new(&run_dir);
                storage
                    .delete_state(STORAGE_KEY)
                    .with_context(|| format!("failed to clear {}", run_dir.display()))?;
                run_plan(&self.cfg, storage, plan)
                    .with_context(|| format!("run persisted in {}", run_dir.display()))?
            }
            None => run_plan(&self.cfg, MemoryStorage::new(), plan)?,
        };
        Ok(ScenarioResult::from_summary(summary, start.elapsed()))
    }

    fn report_progress(&self, result: &ScenarioResult) {
        if !self.verbose {
            return;
        }
        if result.passed {
            println!(
                "  ✅ {} days, profit {}, cash {} ({:?})",
                result.days_played, result.total_profit, result.final_cash, result.duration
            );
        } else {
            for failure in &result.failures {
                println!("  ❌ {}", failure.red());
            }
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}
