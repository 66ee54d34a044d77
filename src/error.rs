use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a run before or instead of a search.
///
/// Budget exhaustion is deliberately absent: running out of time or
/// evaluations is a regular outcome reported through the result object.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("score function '{score}' is not known for structure type '{structure}'")]
    UnknownScoreFunction { structure: String, score: String },

    #[error("k must be at least 1")]
    ZeroK,

    #[error("n ({n}) is smaller than k ({k})")]
    NotEnoughElements { n: usize, k: usize },

    #[error("pbf-block must be at least 1")]
    ZeroPbfBlock,

    #[error("input file '{path}' holds no instance data")]
    EmptyInput { path: PathBuf },

    #[error("could not parse line {line} of '{path}': {reason}")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("data point {index} has dimensionality {found}, expected {expected}")]
    DimensionalityMismatch {
        index: usize,
        found: usize,
        expected: usize,
    },

    #[error("could not read '{path}': {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write '{path}': {source}")]
    UnwritableOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("initial solution in '{path}' is unusable: {reason}")]
    InvalidInitialSolution { path: PathBuf, reason: String },
}

impl SearchError {
    /// The single JSON error object fatal cases print on stdout.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}
