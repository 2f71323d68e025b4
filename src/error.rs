use std::path::PathBuf;

/// Failures surfaced by loading, editing and saving.
///
/// Lookups that simply find nothing are `Option`s, not errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(String),

    #[error("{path:?} is not valid JSON: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("malformed document: {0}")]
    MalformedInput(String),

    #[error("\"{name}\" holds non-numeric text {text:?}; nothing was saved")]
    NonNumericEntry { name: String, text: String },

    #[error("\"{name}\" level {text} would overflow the cargo total")]
    LevelOutOfRange { name: String, text: String },

    #[error("quality {0} is not known")]
    UnknownQuality(i64),

    #[error("quality {0} cannot be added or removed")]
    NotEditable(i64),

    #[error("quality {0} is already present in the save")]
    AlreadyPresent(i64),

    #[error("quality {0} is not present in the save")]
    NotPresent(i64),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
