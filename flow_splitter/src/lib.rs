//! Core crate for splitting a flow project file into per-record sources.
//!
//! A flows document is an ordered array of node records. [`split`] writes
//! each record of a categorised [`FlowSet`] to its own file under
//! `tabs/`, `subflows/` and `config-nodes/`, encoded as JSON or YAML.
//! [`rebuild_flows`] scans those directories back into a single document and
//! restores the caller's preferred ordering with [`reorder`].
//!
//! ```rust,no_run
//! use camino::Utf8Path;
//! use flow_splitter::{Project, SplitterConfig, rebuild_flows, write_flows_file};
//!
//! # fn run() -> flow_splitter::FlowSplitResult<()> {
//! let project = Project::new(Utf8Path::new("my-project"));
//! let config = SplitterConfig::load_or_default(&project)?;
//! let document = rebuild_flows(&project.path, &config)?;
//! write_flows_file(&document, &project.path, &project.flows_file)?;
//! # Ok(())
//! # }
//! ```

mod category;
mod config;
mod encoding;
mod error;
mod flow_set;
mod fs_helpers;
mod merge;
mod project;
mod reorder;
mod split;
mod yaml;

pub use category::Category;
pub use config::{CONFIG_FILE_NAME, SplitterConfig};
pub use encoding::{Encoding, decode, encode, normalise_line_endings};
pub use error::{FlowSplitError, FlowSplitResult};
pub use flow_set::{FlowSet, Record, SplitRecord};
pub use merge::{merge_all, merge_category, rebuild_flows};
pub use project::{
    DEFAULT_FLOWS_FILE, Project, clear_split_directory, read_flows_file, write_flows_file,
    write_settings,
};
pub use reorder::{capture_order, record_id, reorder};
pub use split::{SkippedRecord, SplitReport, split};

/// Re-export of `serde_json` so callers can build records without a direct
/// dependency.
pub use serde_json;
