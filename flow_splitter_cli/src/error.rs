//! Error types for `flow-splitter`.

use flow_splitter::FlowSplitError;
use thiserror::Error;

/// Errors surfaced by the `flow-splitter` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Failure reported by the split or merge pipeline.
    #[error(transparent)]
    FlowSplit(#[from] FlowSplitError),

    /// The global log subscriber could not be installed.
    #[error("failed to install log subscriber: {0}")]
    Logging(String),
}
