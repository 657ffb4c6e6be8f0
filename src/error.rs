//! Error types for the xsd-codegen crate.

use std::path::PathBuf;

/// Errors that can occur while generating declarations from a proto tree.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The proto tree is structurally malformed.
    #[error("proto tree error: {0}")]
    Tree(String),

    /// A proto tree entry has a construct kind the engine cannot emit.
    #[error("unsupported construct at proto tree position {position}")]
    UnsupportedConstruct { position: usize },

    /// A chain of simple-type aliases loops back on itself.
    #[error("simple type alias chain through '{name}' is cyclic")]
    AliasCycle { name: String },

    /// A referenced type is neither a builtin nor defined in the tree.
    ///
    /// Only reported in strict mode; otherwise the name passes through.
    #[error("type '{name}' referenced by '{referenced_by}' is not defined in the proto tree")]
    UnresolvedReference { name: String, referenced_by: String },

    /// Failed to write the generated artifact.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read a file from disk.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON parse error with context.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Network error while fetching a serialized proto tree.
    #[cfg(feature = "download")]
    #[error("download failed: {0}")]
    Download(String),
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
