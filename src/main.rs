// Renders a benchmark results file as a grouped bar chart.
//
// 1. Parse the results file into per-series, per-benchmark samples
// 2. Add derived series (`--sum`)
// 3. Aggregate: means, optional baseline normalization and error bars
// 4. Print the summary, dump it as JSON and plot it with gnuplot

use anyhow::Context;
use bench_chart::{persistence, plots, ChartConfig, DerivedSeries, Dispersion, Layout};
use clap::error::ErrorKind;
use clap::Parser;
use log::debug;
use std::path::PathBuf;
use std::process::exit;

#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct Options {
    /// Benchmark results file
    input: PathBuf,

    /// Input layout
    #[clap(long, value_enum, default_value_t = Layout::Auto)]
    layout: Layout,

    /// Normalize every series against this one
    #[clap(long)]
    baseline: Option<String>,

    /// Error bars; defaults to standard-error with --baseline, none otherwise
    #[clap(long, value_enum)]
    dispersion: Option<Dispersion>,

    /// Add a series summing others, e.g. `bp_total=bp_set+bp_get`
    #[clap(long = "sum", value_name = "NAME=A+B")]
    sums: Vec<DerivedSeries>,

    /// Logarithmic y axis
    #[clap(long)]
    log_scale: bool,

    #[clap(long)]
    title: Option<String>,

    #[clap(long)]
    x_label: Option<String>,

    #[clap(long)]
    y_label: Option<String>,

    /// Directory receiving the chart and the JSON summary
    #[clap(long, default_value = ".")]
    output_dir: PathBuf,

    /// Only print and dump the summary
    #[clap(long)]
    no_plot: bool,
}

impl Options {
    fn chart_config(&self) -> ChartConfig {
        let defaults = ChartConfig::grouped();
        let dispersion = self.dispersion.unwrap_or(match self.baseline {
            Some(_) => Dispersion::StandardError,
            None => Dispersion::None,
        });

        ChartConfig {
            layout: self.layout,
            baseline: self.baseline.clone(),
            dispersion,
            sums: self.sums.clone(),
            log_scale: self.log_scale,
            title: self.title.clone(),
            x_label: self.x_label.clone().unwrap_or(defaults.x_label),
            y_label: self
                .y_label
                .clone()
                .unwrap_or_else(|| ChartConfig::default_y_label(self.baseline.as_deref()).to_string()),
        }
    }
}

fn main() {
    init_logger();

    let opts = match Options::try_parse() {
        Ok(opts) => opts,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            exit(1);
        }
    };

    if let Err(e) = run(&opts) {
        eprintln!("error: {e:#}");
        exit(1);
    }
}

fn init_logger() {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(log::LevelFilter::Warn);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn run(opts: &Options) -> anyhow::Result<()> {
    let config = opts.chart_config();
    debug!("{config:?}");

    let input = opts.input.display();
    let table = persistence::read_table(&opts.input, config.layout)
        .with_context(|| format!("couldn't parse {input}"))?;
    let table = config
        .derive_series(table)
        .context("couldn't derive series")?;
    let summary = bench_chart::calculate_summary(&table, &config)
        .with_context(|| format!("couldn't aggregate {input}"))?;

    println!("{summary}");

    let summary_path = persistence::summary_path(&opts.input, &opts.output_dir);
    persistence::dump_summary(&summary_path, &summary)
        .with_context(|| format!("couldn't write {}", summary_path.display()))?;

    if !opts.no_plot {
        let chart_path = persistence::chart_path(&opts.input, &opts.output_dir);
        plots::create_plot(&summary, &config, &chart_path)
            .with_context(|| format!("couldn't plot {}", chart_path.display()))?;
    }

    Ok(())
}
