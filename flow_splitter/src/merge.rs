//! Scanning category directories back into a single flows document.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::{Dir, DirEntry};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::fs_helpers::{open_dir, open_optional_dir, read_in};
use crate::{
    Category, Encoding, FlowSplitError, FlowSplitResult, Record, SplitterConfig, decode, reorder,
};

/// Decode every `encoding` file in `category_dir` and concatenate the results.
///
/// A file holding an array contributes each element; any other value is
/// appended as one record. Files are visited in name order. Files with other
/// extensions are ignored, and files that fail to read or decode are logged
/// and skipped.
///
/// # Errors
///
/// Returns an I/O error when the directory itself cannot be opened or listed.
pub fn merge_category(category_dir: &Utf8Path, encoding: Encoding) -> FlowSplitResult<Vec<Record>> {
    let dir = open_dir(category_dir)?;
    scan_dir(&dir, category_dir, encoding)
}

fn scan_dir(dir: &Dir, dir_path: &Utf8Path, encoding: Encoding) -> FlowSplitResult<Vec<Record>> {
    let mut names = Vec::new();
    for entry_result in dir
        .read_dir(".")
        .map_err(|err| FlowSplitError::io(dir_path, err))?
    {
        if let Some(name) = matching_name(entry_result, dir_path, encoding) {
            names.push(name);
        }
    }
    names.sort();

    let mut merged = Vec::new();
    for name in names {
        let decoded = read_in(dir, dir_path, &name).and_then(|bytes| decode(&bytes, encoding));
        match decoded {
            Ok(Value::Array(records)) => merged.extend(records),
            Ok(record) => merged.push(record),
            Err(err) => {
                error!(path = %dir_path.join(&name), error = %err, "could not add file contents");
            }
        }
    }
    Ok(merged)
}

/// Name of a regular `encoding` file, or `None` for anything else.
///
/// Entries that cannot be inspected, including non-UTF-8 names, are logged
/// and skipped.
fn matching_name(
    entry_result: std::io::Result<DirEntry>,
    dir_path: &Utf8Path,
    encoding: Encoding,
) -> Option<String> {
    let inspected = entry_result.and_then(|entry| {
        let name = entry.file_name()?;
        let file_type = entry.file_type()?;
        Ok((name, file_type))
    });
    match inspected {
        Ok((name, file_type))
            if file_type.is_file() && encoding.matches_path(Utf8Path::new(&name)) =>
        {
            Some(name)
        }
        Ok((name, _)) => {
            debug!(path = %dir_path.join(&name), "ignoring entry");
            None
        }
        Err(err) => {
            warn!(dir = %dir_path, error = %err, "skipping unreadable directory entry");
            None
        }
    }
}

/// Merge the split folder named by `config` under `project_root`.
///
/// The destination folder and all three category directories must exist;
/// nothing is read otherwise. Records are concatenated tabs first, then
/// subflows, then config nodes.
///
/// # Errors
///
/// Returns [`FlowSplitError::UnsupportedFormat`] for an unknown
/// `fileFormat`, [`FlowSplitError::MissingSourceDirectory`] for a missing
/// directory, or an I/O error when a directory cannot be listed.
pub fn merge_all(project_root: &Utf8Path, config: &SplitterConfig) -> FlowSplitResult<Vec<Record>> {
    let encoding = config.encoding()?;
    let destination = config.destination(project_root);
    let Some(root) = open_optional_dir(&destination)? else {
        error!(destination = %destination, "missing split folder");
        return Err(FlowSplitError::MissingSourceDirectory(destination));
    };

    let mut sources: Vec<(Dir, Utf8PathBuf)> = Vec::with_capacity(Category::ALL.len());
    for category in Category::ALL {
        let path = destination.join(category.dir_name());
        let dir = match root.open_dir(category.dir_name()) {
            Ok(dir) => dir,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                error!(destination = %destination, %category, "missing source files");
                return Err(FlowSplitError::MissingSourceDirectory(path));
            }
            Err(err) => return Err(FlowSplitError::io(&path, err)),
        };
        sources.push((dir, path));
    }

    let mut merged = Vec::new();
    for (dir, path) in &sources {
        merged.extend(scan_dir(dir, path, encoding)?);
    }
    info!(destination = %destination, records = merged.len(), "merged split sources");
    Ok(merged)
}

/// Merge the split folder and apply the configured `tabsOrder`.
///
/// # Errors
///
/// Propagates every error from [`merge_all`].
pub fn rebuild_flows(project_root: &Utf8Path, config: &SplitterConfig) -> FlowSplitResult<Vec<Record>> {
    let merged = merge_all(project_root, config)?;
    Ok(reorder(merged, &config.tabs_order))
}
