//! Categorised split input produced by the upstream classifier.

use std::collections::BTreeMap;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::fs_helpers::read_file;
use crate::{Category, Encoding, FlowSplitError, FlowSplitResult, decode};

/// One node of a flows document.
///
/// Records are schema-free; only the optional string `id` is inspected.
pub type Record = Value;

/// A record paired with the file name it is written under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitRecord {
    /// Filesystem-safe stem for the record's file, without extension.
    pub normalized_name: String,
    /// Payload written to the file.
    pub content: Value,
}

impl SplitRecord {
    /// Pair `content` with the file stem `normalized_name`.
    #[must_use]
    pub fn new(normalized_name: impl Into<String>, content: Value) -> Self {
        Self {
            normalized_name: normalized_name.into(),
            content,
        }
    }
}

/// Records grouped by category name.
///
/// A flow set is only viable for splitting when it holds a collection for
/// every [`Category`]; an empty collection is fine, a missing one is not.
/// Keys are kept as strings so an incomplete artefact can still be loaded
/// and reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowSet {
    groups: BTreeMap<String, Vec<SplitRecord>>,
}

impl FlowSet {
    /// Create an empty flow set with no categories.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`FlowSet::insert`].
    #[must_use]
    pub fn with_category(mut self, category: Category, records: Vec<SplitRecord>) -> Self {
        self.insert(category, records);
        self
    }

    /// Set the records for `category`, replacing any previous collection.
    pub fn insert(&mut self, category: Category, records: Vec<SplitRecord>) {
        self.groups.insert(category.as_str().to_owned(), records);
    }

    /// Records stored for `category`, if the category is present.
    #[must_use]
    pub fn records(&self, category: Category) -> Option<&[SplitRecord]> {
        self.groups.get(category.as_str()).map(Vec::as_slice)
    }

    /// Total number of records across every known category.
    #[must_use]
    pub fn record_count(&self) -> usize {
        Category::ALL
            .into_iter()
            .filter_map(|category| self.records(category))
            .map(<[SplitRecord]>::len)
            .sum()
    }

    /// Check that every category is present.
    ///
    /// # Errors
    ///
    /// Returns [`FlowSplitError::MissingCategory`] naming the first absent
    /// category.
    pub fn validate(&self) -> FlowSplitResult<()> {
        self.categorised().map(|_| ())
    }

    /// Group names that are not a [`Category`].
    ///
    /// Such groups are carried through deserialisation but never written.
    #[must_use]
    pub fn unknown_groups(&self) -> Vec<&str> {
        self.groups
            .keys()
            .filter(|name| name.parse::<Category>().is_err())
            .map(String::as_str)
            .collect()
    }

    /// Validate once and hand back every category with its records, in
    /// [`Category::ALL`] order.
    pub(crate) fn categorised(&self) -> FlowSplitResult<Vec<(Category, &[SplitRecord])>> {
        for name in self.unknown_groups() {
            warn!(group = name, "ignoring flow set group with no matching category");
        }
        Category::ALL
            .into_iter()
            .map(|category| {
                self.records(category)
                    .map(|records| (category, records))
                    .ok_or(FlowSplitError::MissingCategory(category))
            })
            .collect()
    }

    /// Load a flow set artefact stored as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or does not hold a map of
    /// category names to split records.
    pub fn load(path: &Utf8Path) -> FlowSplitResult<Self> {
        let bytes = read_file(path)?;
        let value = decode(&bytes, Encoding::Json).map_err(|err| err.in_file(path))?;
        serde_json::from_value(value).map_err(|err| {
            FlowSplitError::Decode {
                encoding: Encoding::Json,
                source: Box::new(err),
            }
            .in_file(path)
        })
    }
}
