use std::path::PathBuf;
use thiserror::Error;

/// Failures while persisting or restoring the fitted pipeline state.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Could not determine a data directory for pipeline assets")]
    RootResolution,

    #[error("Failed to create asset directory {0}")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Asset blob missing: {0}")]
    MissingBlob(PathBuf),

    #[error("Failed to read asset blob {0}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to write asset blob {0}")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode asset blob {0}")]
    Decode(PathBuf, #[source] Box<bincode::error::DecodeError>),

    #[error("Failed to encode asset blob {0}")]
    Encode(PathBuf, #[source] Box<bincode::error::EncodeError>),
}
