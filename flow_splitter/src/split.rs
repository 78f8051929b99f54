//! Writing a flow set out as one file per record.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::Dir;
use tracing::{debug, error, info};

use crate::fs_helpers::{ensure_child_dir, ensure_dir, write_in};
use crate::{Category, Encoding, FlowSet, FlowSplitResult, SplitRecord, encode};

/// A record that could not be written during a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Category the record belongs to.
    pub category: Category,
    /// The record's file stem.
    pub normalized_name: String,
    /// Rendered error explaining the failure.
    pub reason: String,
}

/// Outcome of a split batch.
///
/// Per-record failures do not abort the batch; they are logged and collected
/// in [`SplitReport::skipped`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    /// Files written, in write order.
    pub written: Vec<Utf8PathBuf>,
    /// Records that failed to encode or write.
    pub skipped: Vec<SkippedRecord>,
}

/// Write every record of `flow_set` to
/// `destination/<category>/<normalizedName>.<ext>`.
///
/// The flow set is validated before anything is written. Category
/// directories are created as needed. Two records with the same name in one
/// category overwrite each other; the last one wins.
///
/// # Errors
///
/// Returns [`crate::FlowSplitError::MissingCategory`] when the flow set lacks a
/// category, or an I/O error when `destination` cannot be created. Failures
/// for individual records are reported through [`SplitReport::skipped`].
pub fn split(
    flow_set: &FlowSet,
    destination: &Utf8Path,
    encoding: Encoding,
) -> FlowSplitResult<SplitReport> {
    let categorised = flow_set.categorised()?;
    let root = ensure_dir(destination)?;
    let mut report = SplitReport::default();

    for (category, records) in categorised {
        let category_path = destination.join(category.dir_name());
        match ensure_child_dir(&root, destination, category.dir_name()) {
            Ok(dir) => {
                for record in records {
                    write_record(&dir, &category_path, category, record, encoding, &mut report);
                }
            }
            Err(err) => {
                error!(%category, error = %err, "could not prepare category directory");
                report
                    .skipped
                    .extend(records.iter().map(|record| SkippedRecord {
                        category,
                        normalized_name: record.normalized_name.clone(),
                        reason: err.to_string(),
                    }));
            }
        }
    }

    info!(
        destination = %destination,
        written = report.written.len(),
        skipped = report.skipped.len(),
        "split flow set"
    );
    Ok(report)
}

fn write_record(
    dir: &Dir,
    category_path: &Utf8Path,
    category: Category,
    record: &SplitRecord,
    encoding: Encoding,
    report: &mut SplitReport,
) {
    let file_name = format!("{}.{}", record.normalized_name, encoding.extension());
    let written = encode(&record.content, encoding)
        .and_then(|contents| write_in(dir, category_path, &file_name, &contents));
    match written {
        Ok(path) => {
            debug!(path = %path, "wrote record");
            report.written.push(path);
        }
        Err(err) => {
            error!(
                %category,
                name = %record.normalized_name,
                error = %err,
                "could not create source file"
            );
            report.skipped.push(SkippedRecord {
                category,
                normalized_name: record.normalized_name.clone(),
                reason: err.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    //! Split batch behaviour.

    use super::*;
    use crate::FlowSplitError;
    use rstest::rstest;
    use serde_json::json;

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let tempdir = tempfile::tempdir().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(tempdir.path().to_path_buf())
            .expect("tempdir path is UTF-8");
        (tempdir, root)
    }

    fn flow_set() -> FlowSet {
        FlowSet::new()
            .with_category(
                Category::Tabs,
                vec![SplitRecord::new("main", json!({ "id": "t1", "type": "tab" }))],
            )
            .with_category(
                Category::Subflows,
                vec![SplitRecord::new("helper", json!({ "id": "s1", "type": "subflow" }))],
            )
            .with_category(Category::ConfigNodes, Vec::new())
    }

    #[rstest]
    #[case(Encoding::Json)]
    #[case(Encoding::Yaml)]
    fn writes_one_file_per_record(#[case] encoding: Encoding) {
        let (_guard, root) = temp_root();
        let destination = root.join("src");
        let report = split(&flow_set(), &destination, encoding).expect("split");
        let ext = encoding.extension();
        assert_eq!(
            report.written,
            vec![
                destination.join("tabs").join(format!("main.{ext}")),
                destination.join("subflows").join(format!("helper.{ext}")),
            ]
        );
        assert!(report.skipped.is_empty());
        assert!(destination.join("config-nodes").is_dir());
    }

    #[rstest]
    fn invalid_flow_set_writes_nothing() {
        let (_guard, root) = temp_root();
        let destination = root.join("src");
        let incomplete = FlowSet::new()
            .with_category(
                Category::Tabs,
                vec![SplitRecord::new("main", json!({ "id": "t1" }))],
            )
            .with_category(Category::ConfigNodes, Vec::new());
        let err = split(&incomplete, &destination, Encoding::Json).expect_err("invalid set");
        assert!(matches!(
            err,
            FlowSplitError::MissingCategory(Category::Subflows)
        ));
        assert!(!destination.exists());
    }

    #[rstest]
    fn bad_record_name_is_skipped_without_aborting() {
        let (_guard, root) = temp_root();
        let destination = root.join("src");
        let flow_set = FlowSet::new()
            .with_category(
                Category::Tabs,
                vec![
                    SplitRecord::new("../../outside", json!({ "id": "bad" })),
                    SplitRecord::new("good", json!({ "id": "ok" })),
                ],
            )
            .with_category(Category::Subflows, Vec::new())
            .with_category(Category::ConfigNodes, Vec::new());
        let report = split(&flow_set, &destination, Encoding::Json).expect("batch succeeds");
        assert_eq!(report.written, vec![destination.join("tabs").join("good.json")]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].normalized_name, "../../outside");
        assert!(!root.join("outside.json").exists());
    }

    #[rstest]
    fn duplicate_names_overwrite() {
        let (_guard, root) = temp_root();
        let destination = root.join("src");
        let flow_set = FlowSet::new()
            .with_category(
                Category::Tabs,
                vec![
                    SplitRecord::new("same", json!({ "id": "first" })),
                    SplitRecord::new("same", json!({ "id": "second" })),
                ],
            )
            .with_category(Category::Subflows, Vec::new())
            .with_category(Category::ConfigNodes, Vec::new());
        split(&flow_set, &destination, Encoding::Json).expect("split");
        let contents = std::fs::read_to_string(destination.join("tabs").join("same.json"))
            .expect("read file");
        assert!(contents.contains("second"));
    }
}
