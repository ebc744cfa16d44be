use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Market {
    Winner,
    Score,
    OverUnder,
}

impl Market {
    pub fn as_str(self) -> &'static str {
        match self {
            Market::Winner => "match_winner",
            Market::Score => "score",
            Market::OverUnder => "over_under",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("{market} model failed: {source}")]
    Model {
        market: Market,
        #[source]
        source: anyhow::Error,
    },

    #[error("{market} model returned {got} outputs, expected {expected}")]
    OutputShape {
        market: Market,
        expected: usize,
        got: usize,
    },

    #[error("{market} model returned an unusable value: {value}")]
    OutputValue { market: Market, value: f64 },

    #[error("winner distribution is not a valid probability mass: {0:?}")]
    InvalidDistribution([f64; 3]),

    #[error("pipeline panicked: {0}")]
    Panicked(String),
}

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("failed to read model artifact {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("model artifact {path} is inconsistent: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ArtifactShapeError,
    },
}

/// Ways a linear artifact can disagree with the feature vector or its market.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArtifactShapeError {
    #[error("feature_names {found:?} do not match the model column order")]
    FeatureOrder { found: Vec<String> },

    #[error("expected {expected} coefficient rows and intercepts, got {rows} and {intercepts}")]
    OutputCount {
        expected: usize,
        rows: usize,
        intercepts: usize,
    },

    #[error("row {row} has {got} coefficients, expected {expected}")]
    RowWidth {
        row: usize,
        got: usize,
        expected: usize,
    },
}
