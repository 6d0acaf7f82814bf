use crate::error::{SchedResult, SchedulerError};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub ga: GaParams,
    #[command(flatten)]
    pub weights: FitnessWeights,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GaParams {
    #[arg(long, default_value_t = 100)]
    pub population_size: usize,
    #[arg(long, default_value_t = 0.6)]
    pub crossover_rate: f64,
    #[arg(long, default_value_t = 0.3)]
    pub mutation_rate: f64,
    #[arg(long, default_value_t = 10)]
    pub generations: usize,

    // Off by default: the result is the best of the final population only.
    #[arg(long, default_value_t = false)]
    pub track_best_ever: bool,
}

impl Default for GaParams {
    fn default() -> Self {
        Self {
            population_size: 100,
            crossover_rate: 0.6,
            mutation_rate: 0.3,
            generations: 10,
            track_best_ever: false,
        }
    }
}

impl GaParams {
    pub fn validate(&self) -> SchedResult<()> {
        if self.population_size == 0 {
            return Err(SchedulerError::InvalidConfig(
                "population_size must be at least 1".to_string(),
            ));
        }
        if self.generations == 0 {
            return Err(SchedulerError::InvalidConfig(
                "generations must be at least 1".to_string(),
            ));
        }
        for (name, rate) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(SchedulerError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, rate
                )));
            }
        }
        Ok(())
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FitnessWeights {
    // === COVERAGE ===
    // Missing instruction costs more than a slight excess.
    #[arg(long, default_value_t = 100.0)]
    pub weight_coverage_under: f64,
    #[arg(long, default_value_t = 40.0)]
    pub weight_coverage_over: f64,

    // === COMPACTNESS ===
    #[arg(long, default_value_t = 10.0)]
    pub weight_gap: f64,
    #[arg(long, default_value_t = 20.0)]
    pub weight_overload: f64,

    // === PREFERENCES ===
    #[arg(long, default_value_t = 2.0)]
    pub weight_preferred_free: f64,
    #[arg(long, default_value_t = 1.0)]
    pub weight_preferred_busy: f64,

    // === ROOMS ===
    #[arg(long, default_value_t = 5.0)]
    pub weight_utilization: f64,
    #[arg(long, default_value_t = 0.5)]
    pub utilization_threshold: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            weight_coverage_under: 100.0,
            weight_coverage_over: 40.0,
            weight_gap: 10.0,
            weight_overload: 20.0,
            weight_preferred_free: 2.0,
            weight_preferred_busy: 1.0,
            weight_utilization: 5.0,
            utilization_threshold: 0.5,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SchedResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.ga.validate()?;
        Ok(config)
    }

    /// Overlays flags the user typed explicitly onto `self` (usually loaded from a file).
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident, $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(ga, population_size);
        update_if_present!(ga, crossover_rate);
        update_if_present!(ga, mutation_rate);
        update_if_present!(ga, generations);
        update_if_present!(ga, track_best_ever);

        update_if_present!(weights, weight_coverage_under);
        update_if_present!(weights, weight_coverage_over);
        update_if_present!(weights, weight_gap);
        update_if_present!(weights, weight_overload);
        update_if_present!(weights, weight_preferred_free);
        update_if_present!(weights, weight_preferred_busy);
        update_if_present!(weights, weight_utilization);
        update_if_present!(weights, utilization_threshold);
    }
}
