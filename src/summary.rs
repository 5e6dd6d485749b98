use crate::config::ChartConfig;
use crate::error::{Error, Result};
use crate::statistics::{self, Dispersion, ErrorBar};
use crate::table::ObservationTable;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Display;

/// Per-group means (and error bars) for every series and benchmark found in an
/// [`ObservationTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedTable {
    pub benchmarks: Vec<String>,
    pub baseline: Option<String>,
    pub dispersion: Dispersion,
    pub results: Vec<SeriesSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub name: String,
    pub entries: Vec<SummaryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub benchmark: String,
    pub samples: usize,
    #[serde(flatten)]
    pub aggregate: Aggregate,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub mean: f64,
    pub error: Option<ErrorBar>,
}

impl AggregatedTable {
    pub fn series(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|series| series.name.as_str())
    }

    pub fn get(&self, series: &str, benchmark: &str) -> Option<&Aggregate> {
        self.results
            .iter()
            .find(|s| s.name == series)?
            .entries
            .iter()
            .find(|entry| entry.benchmark == benchmark)
            .map(|entry| &entry.aggregate)
    }
}

impl Display for AggregatedTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(baseline) = &self.baseline {
            writeln!(f, "(relative to {baseline})")?;
        }
        for benchmark in &self.benchmarks {
            writeln!(f, "=== {benchmark} ===")?;
            for series in self.series() {
                if let Some(aggregate) = self.get(series, benchmark) {
                    writeln!(f, "{series:24}: {aggregate}")?;
                }
            }
        }
        Ok(())
    }
}

impl Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.error {
            Some(error) => write!(f, "{:.4} ± {:.4}", self.mean, error.upper),
            None => write!(f, "{:.4}", self.mean),
        }
    }
}

/// Reduces every group of `table` to its mean and the configured dispersion,
/// normalizing against `config.baseline` when one is set.
pub fn calculate_summary(table: &ObservationTable, config: &ChartConfig) -> Result<AggregatedTable> {
    let baselines = match &config.baseline {
        Some(baseline) => Some(baseline_means(table, baseline)?),
        None => None,
    };

    let mut results = Vec::with_capacity(table.series().len());
    for series in table.series() {
        let mut entries = Vec::with_capacity(table.benchmarks().len());
        for (idx, benchmark) in table.benchmarks().iter().enumerate() {
            let Some(samples) = table.samples(series, benchmark) else {
                continue;
            };

            let baseline = baselines.as_ref().map(|means| means[idx]);
            let aggregate = aggregate(table, series, benchmark, samples, baseline, config.dispersion)?;
            debug!("{series}/{benchmark}: {aggregate}");

            entries.push(SummaryEntry {
                benchmark: benchmark.clone(),
                samples: samples.len(),
                aggregate,
            });
        }

        results.push(SeriesSummary {
            name: series.clone(),
            entries,
        });
    }

    info!(
        "aggregated {} series over {} benchmarks",
        results.len(),
        table.benchmarks().len()
    );

    Ok(AggregatedTable {
        benchmarks: table.benchmarks().to_vec(),
        baseline: config.baseline.clone(),
        dispersion: config.dispersion,
        results,
    })
}

fn aggregate(
    table: &ObservationTable,
    series: &str,
    benchmark: &str,
    samples: &[f64],
    baseline: Option<f64>,
    dispersion: Dispersion,
) -> Result<Aggregate> {
    let mean = table.mean(series, benchmark)?;

    let (mean, spread) = match baseline {
        Some(baseline) => (
            mean / baseline,
            dispersion.calculate(&statistics::normalize(samples, baseline)),
        ),
        None => (mean, dispersion.calculate(samples)),
    };

    Ok(Aggregate {
        mean,
        error: spread.map(ErrorBar::symmetric),
    })
}

/// Baseline mean per benchmark, in benchmark order.
fn baseline_means(table: &ObservationTable, baseline: &str) -> Result<Vec<f64>> {
    if !table.series().iter().any(|series| series == baseline) {
        return Err(Error::BaselineNotFound {
            series: baseline.to_string(),
            benchmark: None,
        });
    }

    table
        .benchmarks()
        .iter()
        .map(|benchmark| {
            let mean = table.mean(baseline, benchmark).map_err(|_| Error::BaselineNotFound {
                series: baseline.to_string(),
                benchmark: Some(benchmark.clone()),
            })?;
            if mean == 0.0 || !mean.is_finite() {
                return Err(Error::DegenerateBaseline {
                    series: baseline.to_string(),
                    benchmark: benchmark.clone(),
                    mean,
                });
            }
            Ok(mean)
        })
        .collect()
}
