//! Error types produced by the split and merge pipeline.

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::category::Category;
use crate::encoding::Encoding;

/// Boxed source error carried by codec failures.
type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while splitting or rebuilding a flows document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlowSplitError {
    /// The requested file format is neither `json` nor `yaml`.
    #[error("unsupported file format '{0}'; expected 'json' or 'yaml'")]
    UnsupportedFormat(String),

    /// A category name outside `tabs`, `subflows` and `config-nodes`.
    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    /// The flow set lacks one of the required categories.
    #[error("flow set is not a viable split input: missing '{0}'")]
    MissingCategory(Category),

    /// A directory required by a merge does not exist.
    #[error("missing source directory '{0}'")]
    MissingSourceDirectory(Utf8PathBuf),

    /// Serialising a value failed.
    #[error("failed to encode {encoding} content: {source}")]
    Encode {
        /// Encoding that was requested.
        encoding: Encoding,
        /// Underlying serialiser error.
        #[source]
        source: BoxedSource,
    },

    /// Parsing file contents failed.
    #[error("failed to decode {encoding} content: {source}")]
    Decode {
        /// Encoding the content was expected to use.
        encoding: Encoding,
        /// Underlying parser error.
        #[source]
        source: BoxedSource,
    },

    /// A file was read successfully but its contents were rejected.
    #[error("invalid contents in '{path}': {source}")]
    InvalidFile {
        /// File that was rejected.
        path: Utf8PathBuf,
        /// Decoding or validation failure.
        #[source]
        source: Box<Self>,
    },

    /// Filesystem failure tagged with the path it concerns.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result alias used throughout the crate.
pub type FlowSplitResult<T> = Result<T, FlowSplitError>;

impl FlowSplitError {
    /// Construct an [`FlowSplitError::Io`] for `path`.
    pub(crate) fn io(path: &Utf8Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Attach the offending file path to a decoding failure.
    pub(crate) fn in_file(self, path: &Utf8Path) -> Self {
        Self::InvalidFile {
            path: path.to_path_buf(),
            source: Box::new(self),
        }
    }
}
