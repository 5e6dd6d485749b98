//! Parsing of line-oriented benchmark result files.
//!
//! A results file is a sequence of *marker lines*, which start with the `#`
//! token and name the destination of the samples that follow, and *sample
//! lines*, which hold one floating point value each:
//!
//! ```text
//! offset native
//! # bench1 offset
//! 2.0
//! 4.0
//! # bench1 native
//! 1.0
//! 3.0
//! ```
//!
//! The supported layouts are described on [`Layout`].

use crate::error::{Error, Result};
use crate::statistics;
use itertools::Itertools;
use log::debug;
use std::collections::HashMap;
use std::io::BufRead;

const MARKER: &str = "#";

/// Role tags of the headerless layout, in legend order.
pub const OFFSET: &str = "offset";
pub const NATIVE: &str = "native";

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum Layout {
    /// Pick a layout from the first non-blank line.
    #[default]
    Auto,
    /// `# <benchmark> <offset|native>` markers, two fixed series.
    Headerless,
    /// Legend line first, then `# <benchmark> <series>` markers.
    Headered,
    /// `# <benchmark>` markers followed by `<series> <value>` samples.
    Keyed,
}

impl Layout {
    fn detect(first_line: &str) -> Layout {
        let mut fields = first_line.split_whitespace();
        if fields.next() != Some(MARKER) {
            return Layout::Headered;
        }

        match fields.count() {
            1 => Layout::Keyed,
            2 => Layout::Headerless,
            _ => Layout::Headered,
        }
    }

    fn marker_arity(self) -> usize {
        match self {
            Layout::Keyed => 1,
            _ => 2,
        }
    }
}

/// Raw samples grouped by series and benchmark.
///
/// Benchmarks are kept in first-seen order and series in legend order (or
/// first-seen order when there is no legend). The table cannot be modified
/// once parsing is done; [`ObservationTable::with_sum`] returns a new table.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ObservationTable {
    benchmarks: Vec<String>,
    series: Vec<String>,
    samples: HashMap<String, HashMap<String, Vec<f64>>>,
}

impl ObservationTable {
    pub fn parse(input: &str, layout: Layout) -> Result<Self> {
        Self::from_reader(input.as_bytes(), layout)
    }

    pub fn from_reader<R: BufRead>(reader: R, layout: Layout) -> Result<Self> {
        let mut parser = TableParser::new(layout);
        for (idx, line) in reader.lines().enumerate() {
            parser.feed(idx + 1, &line?)?;
        }

        let table = parser.table;
        debug!(
            "parsed {} series over {} benchmarks",
            table.series.len(),
            table.benchmarks.len()
        );
        Ok(table)
    }

    pub fn benchmarks(&self) -> &[String] {
        &self.benchmarks
    }

    pub fn series(&self) -> &[String] {
        &self.series
    }

    pub fn contains_series(&self, series: &str) -> bool {
        self.samples.contains_key(series)
    }

    /// Samples of one group, `None` if no marker ever named it.
    pub fn samples(&self, series: &str, benchmark: &str) -> Option<&[f64]> {
        self.samples
            .get(series)?
            .get(benchmark)
            .map(|samples| samples.as_slice())
    }

    /// Arithmetic mean of one group. A group that was never declared counts as
    /// empty.
    pub fn mean(&self, series: &str, benchmark: &str) -> Result<f64> {
        self.samples(series, benchmark)
            .and_then(statistics::mean)
            .ok_or_else(|| Error::empty_series(series, benchmark))
    }

    /// Returns a copy of this table with an additional series `name` whose
    /// samples are the element-wise sum of `parts`.
    pub fn with_sum(&self, name: &str, parts: &[String]) -> Result<Self> {
        if self.contains_series(name) {
            return Err(Error::DuplicateSeries(name.to_string()));
        }
        if let Some(missing) = parts.iter().find(|part| !self.contains_series(part)) {
            return Err(Error::UnknownSeries(missing.clone()));
        }

        let mut sums = HashMap::new();
        for benchmark in &self.benchmarks {
            let columns = parts
                .iter()
                .map(|part| (part, self.samples(part, benchmark).unwrap_or_default()))
                .collect::<Vec<_>>();
            if columns.iter().all(|(_, samples)| samples.is_empty()) {
                continue;
            }

            let (first, first_samples) = columns[0];
            if let Some((other, other_samples)) = columns
                .iter()
                .find(|(_, samples)| samples.len() != first_samples.len())
            {
                return Err(Error::LengthMismatch {
                    benchmark: benchmark.clone(),
                    left: first.clone(),
                    left_len: first_samples.len(),
                    right: other.to_string(),
                    right_len: other_samples.len(),
                });
            }

            let summed = (0..first_samples.len())
                .map(|idx| columns.iter().map(|(_, samples)| samples[idx]).sum())
                .collect::<Vec<f64>>();
            sums.insert(benchmark.clone(), summed);
        }

        debug!("derived series {name} = {}", parts.iter().join(" + "));
        let mut table = self.clone();
        table.series.push(name.to_string());
        table.samples.insert(name.to_string(), sums);
        Ok(table)
    }

    fn add_series(&mut self, series: &str) {
        if !self.samples.contains_key(series) {
            self.series.push(series.to_string());
            self.samples.insert(series.to_string(), HashMap::new());
        }
    }

    fn add_benchmark(&mut self, benchmark: &str) {
        if !self.benchmarks.iter().any(|b| b == benchmark) {
            self.benchmarks.push(benchmark.to_string());
        }
    }

    fn destination(&mut self, series: &str, benchmark: &str) -> &mut Vec<f64> {
        self.samples
            .entry(series.to_string())
            .or_default()
            .entry(benchmark.to_string())
            .or_default()
    }
}

/// Single forward pass over the input lines.
struct TableParser {
    layout: Layout,
    legend_seen: bool,
    table: ObservationTable,
    current_series: Option<String>,
    current_benchmark: Option<String>,
}

impl TableParser {
    fn new(layout: Layout) -> Self {
        let mut parser = TableParser {
            layout,
            legend_seen: false,
            table: ObservationTable::default(),
            current_series: None,
            current_benchmark: None,
        };
        if layout == Layout::Headerless {
            parser.register_roles();
        }
        parser
    }

    fn register_roles(&mut self) {
        self.table.add_series(OFFSET);
        self.table.add_series(NATIVE);
    }

    fn feed(&mut self, line_no: usize, line: &str) -> Result<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        if self.layout == Layout::Auto {
            self.layout = Layout::detect(line);
            debug!("detected {:?} layout", self.layout);
            if self.layout == Layout::Headerless {
                self.register_roles();
            }
        }

        let mut fields = line.split_whitespace();
        let is_marker = fields.next() == Some(MARKER);

        if self.layout == Layout::Headered && !self.legend_seen {
            if is_marker {
                return Err(Error::format(line_no, line, "expected a legend line"));
            }
            if line.split_whitespace().all(|field| field.parse::<f64>().is_ok()) {
                return Err(Error::format(line_no, line, "sample before any marker line"));
            }
            self.legend_seen = true;
            for series in line.split_whitespace().unique() {
                self.table.add_series(series);
            }
            return Ok(());
        }

        if is_marker {
            self.marker(line_no, line, fields.collect())
        } else {
            self.sample(line_no, line)
        }
    }

    fn marker(&mut self, line_no: usize, line: &str, fields: Vec<&str>) -> Result<()> {
        let arity = self.layout.marker_arity();
        if fields.len() != arity {
            return Err(Error::format(
                line_no,
                line,
                format!("expected {arity} field(s) after `{MARKER}`"),
            ));
        }

        let benchmark = fields[0];
        let series = match self.layout {
            Layout::Keyed => None,
            Layout::Headerless => match fields[1] {
                role @ (OFFSET | NATIVE) => Some(role),
                role => {
                    return Err(Error::format(
                        line_no,
                        line,
                        format!("unknown role `{role}`, expected `{OFFSET}` or `{NATIVE}`"),
                    ))
                }
            },
            _ => match fields[1] {
                series if self.table.contains_series(series) => Some(series),
                series => {
                    return Err(Error::format(
                        line_no,
                        line,
                        format!("series `{series}` is not in the legend"),
                    ))
                }
            },
        };

        self.table.add_benchmark(benchmark);
        self.current_benchmark = Some(benchmark.to_string());
        self.current_series = series.map(str::to_string);
        if let Some(series) = series {
            self.table.destination(series, benchmark);
        }
        Ok(())
    }

    fn sample(&mut self, line_no: usize, line: &str) -> Result<()> {
        let Some(benchmark) = self.current_benchmark.as_deref() else {
            return Err(Error::format(line_no, line, "sample before any marker line"));
        };

        let (series, value) = match (self.layout, self.current_series.as_deref()) {
            (Layout::Keyed, _) => {
                let fields = line.split_whitespace().collect::<Vec<_>>();
                let [series, value] = fields[..] else {
                    return Err(Error::format(line_no, line, "expected `<series> <value>`"));
                };
                (series, value)
            }
            (_, Some(series)) => (series, line),
            (_, None) => {
                return Err(Error::format(line_no, line, "sample before any marker line"))
            }
        };

        let value = value
            .parse::<f64>()
            .map_err(|e| Error::format(line_no, line, format!("invalid sample ({e})")))?;
        if !value.is_finite() {
            return Err(Error::format(line_no, line, "non-finite sample"));
        }

        let (series, benchmark) = (series.to_string(), benchmark.to_string());
        self.table.add_series(&series);
        self.table.destination(&series, &benchmark).push(value);
        Ok(())
    }
}
