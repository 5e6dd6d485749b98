//! Aggregation of line-oriented benchmark results into per-series means,
//! optionally relative to a baseline series, and their rendering as grouped
//! bar charts.
//!
//! ```
//! use bench_chart::{calculate_summary, ChartConfig, Layout, ObservationTable};
//!
//! let input = "offset native\n# bench1 offset\n2.0\n4.0\n# bench1 native\n1.0\n3.0\n";
//! let table = ObservationTable::parse(input, Layout::Auto)?;
//! let summary = calculate_summary(&table, &ChartConfig::normalized("native"))?;
//!
//! assert_eq!(summary.get("offset", "bench1").unwrap().mean, 1.5);
//! assert_eq!(summary.get("native", "bench1").unwrap().mean, 1.0);
//! # Ok::<(), bench_chart::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod persistence;
pub mod plots;
pub mod statistics;
pub mod summary;
pub mod table;

pub use config::{ChartConfig, DerivedSeries};
pub use error::{Error, Result};
pub use statistics::{Dispersion, ErrorBar};
pub use summary::{calculate_summary, Aggregate, AggregatedTable};
pub use table::{Layout, ObservationTable};
