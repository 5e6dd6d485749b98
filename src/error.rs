pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Malformed input line.
    #[error("line {line}: {reason}: {content:?}")]
    Format {
        line: usize,
        content: String,
        reason: String,
    },
    /// Mean requested over a group without samples.
    #[error("no samples for series `{series}` in benchmark `{benchmark}`")]
    EmptySeries { series: String, benchmark: String },
    #[error("{}", baseline_not_found(.series, .benchmark.as_deref()))]
    BaselineNotFound {
        series: String,
        benchmark: Option<String>,
    },
    /// Baseline mean that cannot serve as a divisor (zero or not finite).
    #[error("baseline `{series}` has a mean of {mean} in benchmark `{benchmark}`")]
    DegenerateBaseline {
        series: String,
        benchmark: String,
        mean: f64,
    },
    #[error("unknown series `{0}`")]
    UnknownSeries(String),
    #[error("series `{0}` already exists")]
    DuplicateSeries(String),
    #[error("cannot sum series `{left}` ({left_len} samples) and `{right}` ({right_len} samples) in benchmark `{benchmark}`")]
    LengthMismatch {
        benchmark: String,
        left: String,
        left_len: usize,
        right: String,
        right_len: usize,
    },
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde: {0}")]
    Json(#[from] serde_json::Error),
    #[error("plot: {0}")]
    Plot(String),
}

impl Error {
    pub fn format(line: usize, content: &str, reason: impl Into<String>) -> Self {
        Self::Format {
            line,
            content: content.to_string(),
            reason: reason.into(),
        }
    }

    pub fn empty_series(series: &str, benchmark: &str) -> Self {
        Self::EmptySeries {
            series: series.to_string(),
            benchmark: benchmark.to_string(),
        }
    }
}

fn baseline_not_found(series: &str, benchmark: Option<&str>) -> String {
    match benchmark {
        Some(benchmark) => {
            format!("baseline `{series}` has no samples for benchmark `{benchmark}`")
        }
        None => format!("baseline series `{series}` not found"),
    }
}
