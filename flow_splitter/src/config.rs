//! Splitter settings stored at the project root.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::fs_helpers::read_optional_file;
use crate::{Encoding, FlowSplitError, FlowSplitResult, Project, decode, write_settings};

/// File name of the settings document at the project root.
pub const CONFIG_FILE_NAME: &str = ".config.flow-splitter.json";

fn default_destination_folder() -> String {
    "src".to_owned()
}

fn default_file_format() -> String {
    Encoding::default().as_str().to_owned()
}

/// Settings controlling where and how a project is split.
///
/// `fileFormat` is kept as written and only parsed by
/// [`SplitterConfig::encoding`], so an unsupported value is reported by the
/// operation that needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitterConfig {
    /// Split folder, relative to the project root.
    #[serde(default = "default_destination_folder")]
    pub destination_folder: String,
    /// Encoding of the split files (`json` or `yaml`).
    #[serde(default = "default_file_format")]
    pub file_format: String,
    /// Record identifiers placed first when the flows file is rebuilt.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tabs_order: Vec<String>,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            destination_folder: default_destination_folder(),
            file_format: default_file_format(),
            tabs_order: Vec::new(),
        }
    }
}

impl SplitterConfig {
    /// Parse [`SplitterConfig::file_format`].
    ///
    /// # Errors
    ///
    /// Returns [`FlowSplitError::UnsupportedFormat`] for anything other than
    /// `json` or `yaml`.
    pub fn encoding(&self) -> FlowSplitResult<Encoding> {
        self.file_format.parse()
    }

    /// Absolute location of the split folder for a project rooted at
    /// `project_root`.
    #[must_use]
    pub fn destination(&self, project_root: &camino::Utf8Path) -> Utf8PathBuf {
        project_root.join(&self.destination_folder)
    }

    /// Read the settings document of `project`.
    ///
    /// Returns `Ok(None)` when the project has no settings file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(project: &Project) -> FlowSplitResult<Option<Self>> {
        let path = project.path.join(CONFIG_FILE_NAME);
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

    /// Like [`SplitterConfig::load`], falling back to the defaults when the
    /// project has no settings file.
    ///
    /// # Errors
    ///
    /// Returns an error when an existing settings file is invalid.
    pub fn load_or_default(project: &Project) -> FlowSplitResult<Self> {
        Ok(Self::load(project)?.unwrap_or_else(|| {
            warn!(project = %project.path, "no splitter settings found; using defaults");
            Self::default()
        }))
    }

    /// Write these settings to the project root, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error when the settings file cannot be written.
    pub fn save(&self, project: &Project) -> FlowSplitResult<Utf8PathBuf> {
        write_settings(project, CONFIG_FILE_NAME, self)
    }
}
