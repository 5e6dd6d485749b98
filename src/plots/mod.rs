use crate::config::ChartConfig;
use crate::error::{Error, Result};
use crate::summary::AggregatedTable;
use criterion_plot::prelude::*;
use log::info;
use std::path::Path;

mod bars;

static DEFAULT_FONT: &str = "Helvetica";
static SIZE: Size = Size(1280, 720);

const NUM_COLORS: usize = 8;
static SERIES_COLORS: [Color; NUM_COLORS] = [
    Color::Rgb(102, 194, 165),
    Color::Rgb(252, 141, 98),
    Color::Rgb(141, 160, 203),
    Color::Rgb(231, 138, 195),
    Color::Rgb(166, 216, 84),
    Color::Rgb(255, 217, 47),
    Color::Rgb(229, 196, 148),
    Color::Rgb(179, 179, 179),
];

/// Renders `summary` as a grouped bar chart to `path` and waits for gnuplot.
pub fn create_plot(summary: &AggregatedTable, config: &ChartConfig, path: &Path) -> Result<()> {
    let mut child = bars::grouped_bars(summary, config, path)
        .map_err(|e| Error::Plot(format!("couldn't spawn gnuplot: {e}")))?;

    let status = child
        .wait()
        .map_err(|e| Error::Plot(format!("couldn't wait for gnuplot: {e}")))?;
    if !status.success() {
        return Err(Error::Plot(format!("gnuplot exited with {status}")));
    }

    info!("wrote chart to {}", path.display());
    Ok(())
}

fn escape_underscores(string: &str) -> String {
    string.replace('_', "\\_")
}
