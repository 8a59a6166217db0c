use std::path::PathBuf;

use thiserror::Error;

use crate::source::SourceKind;

/// Fatal conditions. Everything else in the pipeline degrades to a default.
#[derive(Debug, Error)]
pub enum Error {
    /// A required per-category document could not be read.
    #[error("missing {kind} source at {}: {source}", path.display())]
    MissingSource {
        kind: SourceKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document exists but is not valid JSON.
    #[error("unreadable {kind} source at {}: {source}", path.display())]
    UnreadableSource {
        kind: SourceKind,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("settings: {0}")]
    Config(#[from] config::ConfigError),

    /// The finished document could not be written.
    #[error("could not store document at {}: {source}", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
