//! Filesystem helpers shared by the split, merge and project modules.
//!
//! All access goes through `cap-std` directory handles so record names are
//! resolved inside their category directory and cannot escape it.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use std::io::{Read, Write};

use crate::{FlowSplitError, FlowSplitResult};

/// Opens a directory if it exists, returning `None` when the path is missing.
pub(crate) fn open_optional_dir(path: &Utf8Path) -> FlowSplitResult<Option<Dir>> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(Some(dir)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(FlowSplitError::io(path, err)),
    }
}

/// Opens an existing directory.
pub(crate) fn open_dir(path: &Utf8Path) -> FlowSplitResult<Dir> {
    Dir::open_ambient_dir(path, ambient_authority()).map_err(|err| FlowSplitError::io(path, err))
}

/// Opens a directory, creating it and its parents first when missing.
pub(crate) fn ensure_dir(path: &Utf8Path) -> FlowSplitResult<Dir> {
    if let Some(dir) = open_optional_dir(path)? {
        return Ok(dir);
    }
    Dir::create_ambient_dir_all(path, ambient_authority())
        .map_err(|err| FlowSplitError::io(path, err))?;
    open_dir(path)
}

/// Opens (creating if needed) the child directory `name` of `dir`.
pub(crate) fn ensure_child_dir(dir: &Dir, dir_path: &Utf8Path, name: &str) -> FlowSplitResult<Dir> {
    let child_path = dir_path.join(name);
    dir.create_dir_all(name)
        .map_err(|err| FlowSplitError::io(&child_path, err))?;
    dir.open_dir(name)
        .map_err(|err| FlowSplitError::io(&child_path, err))
}

/// Writes `contents` to `name` inside `dir`, truncating any existing file.
///
/// Returns the full path of the written file.
pub(crate) fn write_in(
    dir: &Dir,
    dir_path: &Utf8Path,
    name: &str,
    contents: &str,
) -> FlowSplitResult<Utf8PathBuf> {
    let path = dir_path.join(name);
    let mut file = dir
        .open_with(
            name,
            OpenOptions::new().write(true).create(true).truncate(true),
        )
        .map_err(|err| FlowSplitError::io(&path, err))?;
    file.write_all(contents.as_bytes())
        .map_err(|err| FlowSplitError::io(&path, err))?;
    Ok(path)
}

/// Reads the whole of `name` inside `dir`.
pub(crate) fn read_in(dir: &Dir, dir_path: &Utf8Path, name: &str) -> FlowSplitResult<Vec<u8>> {
    let path = dir_path.join(name);
    let mut file = dir.open(name).map_err(|err| FlowSplitError::io(&path, err))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)
        .map_err(|err| FlowSplitError::io(&path, err))?;
    Ok(buffer)
}

/// Reads a file addressed by an ambient path.
pub(crate) fn read_file(path: &Utf8Path) -> FlowSplitResult<Vec<u8>> {
    let (parent, name) = parent_and_name(path)?;
    let dir = open_dir(parent)?;
    read_in(&dir, parent, name)
}

/// Reads a file addressed by an ambient path, returning `None` when it does
/// not exist.
pub(crate) fn read_optional_file(path: &Utf8Path) -> FlowSplitResult<Option<Vec<u8>>> {
    match read_file(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(FlowSplitError::Io { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Splits `path` into its parent directory (`.` for bare names) and file name.
pub(crate) fn parent_and_name(path: &Utf8Path) -> FlowSplitResult<(&Utf8Path, &str)> {
    let name = path.file_name().ok_or_else(|| {
        FlowSplitError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    Ok((parent, name))
}

#[cfg(test)]
mod tests {
    //! Tests for directory and file helpers.

    use super::*;
    use rstest::rstest;

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let tempdir = tempfile::tempdir().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(tempdir.path().to_path_buf())
            .expect("tempdir path is UTF-8");
        (tempdir, root)
    }

    #[rstest]
    fn missing_directory_opens_as_none() {
        let (_guard, root) = temp_root();
        let opened = open_optional_dir(&root.join("absent")).expect("lookup succeeds");
        assert!(opened.is_none());
    }

    #[rstest]
    fn ensure_dir_creates_nested_directories() {
        let (_guard, root) = temp_root();
        let nested = root.join("a").join("b");
        ensure_dir(&nested).expect("create nested");
        assert!(nested.is_dir());
    }

    #[rstest]
    fn written_files_read_back() {
        let (_guard, root) = temp_root();
        let dir = open_dir(&root).expect("open root");
        let path = write_in(&dir, &root, "node.json", "{}").expect("write");
        assert_eq!(path, root.join("node.json"));
        assert_eq!(read_file(&path).expect("read"), b"{}");
    }

    #[rstest]
    fn write_rejects_names_escaping_the_directory() {
        let (_guard, root) = temp_root();
        let inner = ensure_dir(&root.join("inner")).expect("create inner");
        let err = write_in(&inner, &root.join("inner"), "../escape.json", "{}")
            .expect_err("escape rejected");
        assert!(matches!(err, FlowSplitError::Io { .. }));
        assert!(!root.join("escape.json").exists());
    }

    #[rstest]
    fn optional_read_of_missing_file_is_none() {
        let (_guard, root) = temp_root();
        let read = read_optional_file(&root.join("flows.json")).expect("lookup succeeds");
        assert!(read.is_none());
    }

    #[rstest]
    #[case("flows.json", ".", "flows.json")]
    #[case("project/flows.json", "project", "flows.json")]
    fn splits_parent_and_name(#[case] input: &str, #[case] parent: &str, #[case] name: &str) {
        let (got_parent, got_name) = parent_and_name(Utf8Path::new(input)).expect("split path");
        assert_eq!(got_parent, Utf8Path::new(parent));
        assert_eq!(got_name, name);
    }
}
