use std::io;
use std::path::PathBuf;

/// Failures of the underlying storage layer. Corrupted slot contents are not
/// an error: they are cleared and reported as absent.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O error on slot '{slot}': {source}")]
    Io {
        slot: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode slot '{slot}': {source}")]
    Encode {
        slot: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("cannot write settings to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no tutorial has been generated yet")]
    NoTutorial,
}
