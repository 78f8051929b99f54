//! Record categories and the directories they map to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::FlowSplitError;

/// Kind of record stored in a flows document.
///
/// Each category owns a subdirectory of the split folder with the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Flow tabs (`type: "tab"`).
    Tabs,
    /// Subflow definitions.
    Subflows,
    /// Configuration nodes shared across tabs.
    ConfigNodes,
}

impl Category {
    /// Every category, in the order used for writing and merging.
    pub const ALL: [Self; 3] = [Self::Tabs, Self::Subflows, Self::ConfigNodes];

    /// Returns the canonical key for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tabs => "tabs",
            Self::Subflows => "subflows",
            Self::ConfigNodes => "config-nodes",
        }
    }

    /// Directory name holding this category's files.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = FlowSplitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| FlowSplitError::UnknownCategory(value.to_owned()))
    }
}
