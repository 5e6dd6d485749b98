use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fmt::{Display, Formatter};

/// How the spread of a group is reported next to its mean.
#[derive(Debug, Default, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Dispersion {
    #[default]
    None,
    /// Population standard deviation divided by the square root of the sample count.
    StandardError,
    /// Two population standard deviations. Not a confidence interval.
    HeuristicSpread,
}

impl Dispersion {
    pub fn calculate(self, samples: &[f64]) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }

        match self {
            Dispersion::None => None,
            Dispersion::StandardError => Some(standard_error(samples)),
            Dispersion::HeuristicSpread => Some(heuristic_spread(samples)),
        }
    }
}

impl Display for Dispersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Dispersion::None => "none",
            Dispersion::StandardError => "standard error",
            Dispersion::HeuristicSpread => "2 std dev",
        };
        f.write_str(name)
    }
}

/// Symmetric error bar around a mean.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub struct ErrorBar {
    pub lower: f64,
    pub upper: f64,
}

impl ErrorBar {
    pub fn symmetric(value: f64) -> Self {
        ErrorBar {
            lower: value,
            upper: value,
        }
    }
}

/// `None` for an empty slice instead of NaN.
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.mean())
}

pub fn standard_error(samples: &[f64]) -> f64 {
    samples.population_std_dev() / (samples.len() as f64).sqrt()
}

pub fn heuristic_spread(samples: &[f64]) -> f64 {
    2.0 * samples.population_std_dev()
}

/// Expresses every sample relative to `baseline`.
pub fn normalize(samples: &[f64], baseline: f64) -> Vec<f64> {
    samples.iter().map(|sample| sample / baseline).collect()
}
