//! Project-level persistence: the flows file, settings and split cleanup.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::{error, info};

use crate::fs_helpers::{open_dir, open_optional_dir, parent_and_name, read_optional_file, write_in};
use crate::{Encoding, FlowSplitError, FlowSplitResult, Record, decode, encode};

/// Default name of a project's flows document.
pub const DEFAULT_FLOWS_FILE: &str = "flows.json";

/// A flow project rooted at a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Project root directory.
    pub path: Utf8PathBuf,
    /// Name of the flows document inside [`Project::path`].
    pub flows_file: String,
}

impl Project {
    /// Describe the project rooted at `path` with the default flows file name.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            flows_file: DEFAULT_FLOWS_FILE.to_owned(),
        }
    }

    /// Override the flows file name.
    #[must_use]
    pub fn with_flows_file(mut self, flows_file: impl Into<String>) -> Self {
        self.flows_file = flows_file.into();
        self
    }

    /// Full path of the flows document.
    #[must_use]
    pub fn flows_path(&self) -> Utf8PathBuf {
        self.path.join(&self.flows_file)
    }
}

fn write_json<T>(dir_path: &Utf8Path, name: &str, value: &T) -> FlowSplitResult<Utf8PathBuf>
where
    T: Serialize + ?Sized,
{
    let contents = encode(value, Encoding::Json)?;
    let dir = open_dir(dir_path)?;
    write_in(&dir, dir_path, name, &contents)
}

/// Write `document` as pretty JSON to `project_path/file_name`.
///
/// # Errors
///
/// Returns an I/O error when the project directory is missing or the file
/// cannot be written.
pub fn write_flows_file(
    document: &[Record],
    project_path: &Utf8Path,
    file_name: &str,
) -> FlowSplitResult<Utf8PathBuf> {
    let path = write_json(project_path, file_name, document).inspect_err(|err| {
        error!(error = %err, "error while writing flows file");
    })?;
    info!(path = %path, records = document.len(), "wrote flows file");
    Ok(path)
}

/// Write or replace the settings document `name` at the project root.
///
/// # Errors
///
/// Returns an error when `settings` cannot be serialised or written.
pub fn write_settings<T>(project: &Project, name: &str, settings: &T) -> FlowSplitResult<Utf8PathBuf>
where
    T: Serialize + ?Sized,
{
    write_json(&project.path, name, settings)
}

/// Read the project's flows document, or `None` when it does not exist.
///
/// # Errors
///
/// Returns an error when the file cannot be read or is not a JSON array.
pub fn read_flows_file(project: &Project) -> FlowSplitResult<Option<Vec<Record>>> {
    let path = project.flows_path();
    let Some(bytes) = read_optional_file(&path)? else {
        return Ok(None);
    };
    let value = decode(&bytes, Encoding::Json).map_err(|err| err.in_file(&path))?;
    serde_json::from_value(value).map(Some).map_err(|err| {
        FlowSplitError::Decode {
            encoding: Encoding::Json,
            source: Box::new(err),
        }
        .in_file(&path)
    })
}

/// Recursively delete the split directory at `path`.
///
/// Cleanup is best effort and always completes: a missing directory or a
/// failed deletion is logged and otherwise ignored.
pub fn clear_split_directory(path: &Utf8Path) {
    if let Err(err) = remove_dir_all(path) {
        error!(path = %path, error = %err, "could not remove split directory");
    }
}

fn remove_dir_all(path: &Utf8Path) -> FlowSplitResult<()> {
    let (parent, name) = parent_and_name(path)?;
    let dir = open_optional_dir(parent)?.ok_or_else(|| {
        FlowSplitError::io(
            parent,
            std::io::Error::new(std::io::ErrorKind::NotFound, "parent directory not found"),
        )
    })?;
    dir.remove_dir_all(name)
        .map_err(|err| FlowSplitError::io(path, err))?;
    info!(path = %path, "removed split directory");
    Ok(())
}
