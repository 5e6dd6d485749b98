use crate::error::Result;
use crate::statistics::Dispersion;
use crate::table::{Layout, ObservationTable};
use std::str::FromStr;

const DEFAULT_X_LABEL: &str = "Benchmark";
const TIME_Y_LABEL: &str = "Execution Time (seconds)";
const SLOWDOWN_Y_LABEL: &str = "Slowdown";

/// Everything that varies between charts of the same input format.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub layout: Layout,
    /// Normalize against this series when set.
    pub baseline: Option<String>,
    pub dispersion: Dispersion,
    pub sums: Vec<DerivedSeries>,
    pub log_scale: bool,
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::grouped()
    }
}

impl ChartConfig {
    /// Plain means, one bar per series and benchmark.
    pub fn grouped() -> Self {
        ChartConfig {
            layout: Layout::Auto,
            baseline: None,
            dispersion: Dispersion::None,
            sums: Vec::new(),
            log_scale: false,
            title: None,
            x_label: DEFAULT_X_LABEL.to_string(),
            y_label: TIME_Y_LABEL.to_string(),
        }
    }

    /// Means relative to `baseline` with standard error bars.
    pub fn normalized(baseline: &str) -> Self {
        ChartConfig {
            baseline: Some(baseline.to_string()),
            dispersion: Dispersion::StandardError,
            y_label: SLOWDOWN_Y_LABEL.to_string(),
            ..Self::grouped()
        }
    }

    pub fn default_y_label(baseline: Option<&str>) -> &'static str {
        match baseline {
            Some(_) => SLOWDOWN_Y_LABEL,
            None => TIME_Y_LABEL,
        }
    }

    /// Adds the derived series, in order, so later sums may refer to earlier ones.
    pub fn derive_series(&self, table: ObservationTable) -> Result<ObservationTable> {
        self.sums
            .iter()
            .try_fold(table, |table, sum| table.with_sum(&sum.name, &sum.parts))
    }
}

/// A series defined as the element-wise sum of other series, written
/// `name=a+b` on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedSeries {
    pub name: String,
    pub parts: Vec<String>,
}

impl FromStr for DerivedSeries {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (name, parts) = s
            .split_once('=')
            .ok_or_else(|| format!("expected `name=a+b`, got `{s}`"))?;

        let name = name.trim();
        let parts = parts
            .split('+')
            .map(|part| part.trim().to_string())
            .collect::<Vec<_>>();

        if name.is_empty() || parts.iter().any(|part| part.is_empty()) {
            return Err(format!("empty series name in `{s}`"));
        }

        Ok(DerivedSeries {
            name: name.to_string(),
            parts,
        })
    }
}
