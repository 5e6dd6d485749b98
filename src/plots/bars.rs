// Original source dual-licensed under MIT / Apache 2: https://github.com/bheisler/criterion.rs/blob/master/src/plot/gnuplot_backend/summary.rs
// Modified to draw grouped bars with symmetric error bars

use crate::config::ChartConfig;
use crate::summary::AggregatedTable;
use criterion_plot::prelude::*;
use std::io;
use std::path::Path;
use std::process::Child;

use super::*;

/// Share of a benchmark slot covered by its bars.
const GROUP_WIDTH: f64 = 0.8;
/// Horizontal pixels available to the plot area, roughly.
const PLOT_WIDTH: f64 = 1100.0;

/// Centre of bar `series_idx` (out of `series_count`) within the slot of
/// benchmark `benchmark_idx`.
fn bar_position(benchmark_idx: usize, series_idx: usize, series_count: usize) -> f64 {
    let bar = GROUP_WIDTH / series_count as f64;
    benchmark_idx as f64 - GROUP_WIDTH / 2.0 + bar * (series_idx as f64 + 0.5)
}

fn bar_width(benchmark_count: usize, series_count: usize) -> LineWidth {
    let slot = PLOT_WIDTH / benchmark_count.max(1) as f64;
    LineWidth((slot * GROUP_WIDTH / series_count.max(1) as f64 * 0.9).max(1.0))
}

pub fn grouped_bars(
    summary: &AggregatedTable,
    config: &ChartConfig,
    path: &Path,
) -> io::Result<Child> {
    let mut figure = grouped_bars_figure(summary, config);
    figure.set(Output(path.to_path_buf())).draw()
}

fn grouped_bars_figure(summary: &AggregatedTable, config: &ChartConfig) -> Figure {
    let series = summary.series().collect::<Vec<_>>();
    let benchmark_count = summary.benchmarks.len();
    let width = bar_width(benchmark_count, series.len());

    let mut figure = Figure::new();
    figure
        .set(Font(DEFAULT_FONT))
        .set(SIZE)
        .configure(Key, |k| {
            k.set(Justification::Left)
                .set(Order::SampleText)
                .set(Position::Inside(Vertical::Top, Horizontal::Right))
        })
        .configure(Axis::BottomX, |a| {
            a.set(Label(config.x_label.clone()))
                .set(Range::Limits(-0.5, benchmark_count as f64 - 0.5))
                .set(TicLabels {
                    positions: (0..benchmark_count).map(|idx| idx as f64),
                    labels: summary.benchmarks.iter().map(|b| escape_underscores(b)),
                })
        })
        .configure(Axis::LeftY, |a| {
            let scale = if config.log_scale {
                Scale::Logarithmic
            } else {
                Scale::Linear
            };
            a.configure(Grid::Major, |g| g.show())
                .set(Label(config.y_label.clone()))
                .set(scale)
        });

    if let Some(title) = &config.title {
        figure.set(Title(escape_underscores(title)));
    }

    for (series_idx, name) in series.iter().enumerate() {
        let color = SERIES_COLORS[series_idx % NUM_COLORS];
        let bars = summary
            .benchmarks
            .iter()
            .enumerate()
            .filter_map(|(benchmark_idx, benchmark)| {
                summary.get(name, benchmark).map(|aggregate| {
                    (bar_position(benchmark_idx, series_idx, series.len()), aggregate)
                })
            })
            .collect::<Vec<_>>();

        figure.plot(
            Impulses {
                x: bars.iter().map(|(x, _)| *x),
                y: bars.iter().map(|(_, aggregate)| aggregate.mean),
            },
            |c| {
                c.set(color)
                    .set(width)
                    .set(Label(escape_underscores(name)))
            },
        );

        let errors = bars
            .iter()
            .filter_map(|(x, aggregate)| aggregate.error.map(|e| (*x, aggregate.mean, e)))
            .collect::<Vec<_>>();
        if !errors.is_empty() {
            figure.plot(
                YErrorBars {
                    x: errors.iter().map(|(x, _, _)| *x),
                    y: errors.iter().map(|(_, mean, _)| *mean),
                    y_low: errors.iter().map(|(_, mean, e)| mean - e.lower),
                    y_high: errors.iter().map(|(_, mean, e)| mean + e.upper),
                },
                |e| e.set(Color::Black).set(LineWidth(1.5)).set(PointSize(0.5)),
            );
        }
    }

    figure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::calculate_summary;
    use crate::table::{Layout, ObservationTable};

    #[test]
    fn test_bar_positions_are_centred_per_group() {
        let left = bar_position(2, 0, 2);
        let right = bar_position(2, 1, 2);

        assert!((left - 1.8).abs() < 1e-12);
        assert!((right - 2.2).abs() < 1e-12);
        assert!(((left + right) / 2.0 - 2.0).abs() < 1e-12);
        assert!((bar_position(0, 0, 1)).abs() < 1e-12);
    }

    fn script(summary: &AggregatedTable, config: &ChartConfig) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.gnuplot");
        grouped_bars_figure(summary, config).save(&path).unwrap();

        // inline sample data is binary
        String::from_utf8_lossy(&std::fs::read(path).unwrap()).into_owned()
    }

    fn summary(config: &ChartConfig) -> AggregatedTable {
        let input = "offset native
# alpha offset
2.0
4.0
# alpha native
1.0
3.0
# beta offset
5.0
# beta native
6.0
";
        let table = ObservationTable::parse(input, Layout::Auto).unwrap();
        calculate_summary(&table, config).unwrap()
    }

    #[test]
    fn test_script_has_one_bar_series_and_tic_per_benchmark() {
        let config = ChartConfig::grouped();
        let script = script(&summary(&config), &config);

        assert!(script.contains("alpha"));
        assert!(script.contains("beta"));
        assert_eq!(script.matches("impulses").count(), 2);
        assert!(!script.contains("yerrorbars"));
        assert!(!script.lines().any(|line| line.starts_with("set logscale")));
    }

    #[test]
    fn test_script_error_bars_follow_dispersion() {
        let config = ChartConfig::normalized("native");
        let script = script(&summary(&config), &config);

        assert_eq!(script.matches("yerrorbars").count(), 2);
        assert!(script.contains("Slowdown"));
    }

    #[test]
    fn test_script_log_scale() {
        let config = ChartConfig {
            log_scale: true,
            ..ChartConfig::grouped()
        };
        let script = script(&summary(&config), &config);

        assert!(script.lines().any(|line| line.starts_with("set logscale y")));
    }

    #[test]
    fn test_escape_underscores() {
        assert_eq!(escape_underscores("bp_set_count"), "bp\\_set\\_count");
    }
}
