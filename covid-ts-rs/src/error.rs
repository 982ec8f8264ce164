use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for source loading, configuration and simulation.
#[derive(Error, Debug)]
pub enum CovidError {
    /// A source table could not be opened. The data set is expected to be a
    /// local clone of the CSSE repository next to this project's directory.
    #[error(
        "cannot open source table {}: {source}. Make sure the 'COVID-19' directory is in the same root directory as this project",
        path.display()
    )]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed source data: header dates, count cells, row shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Inputs that would violate a structural invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Run-configuration problems.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type CovidResult<T> = Result<T, CovidError>;

impl From<csv::Error> for CovidError {
    fn from(err: csv::Error) -> Self {
        match err.into_kind() {
            csv::ErrorKind::Io(err) => CovidError::Io(err),
            kind => CovidError::Parse(format!("{kind:?}")),
        }
    }
}

impl From<toml::de::Error> for CovidError {
    fn from(err: toml::de::Error) -> Self {
        CovidError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CovidError {
    fn from(err: serde_json::Error) -> Self {
        CovidError::Config(err.to_string())
    }
}
