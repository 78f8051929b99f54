//! Command-line interface definitions for `flow-splitter`.

use camino::Utf8PathBuf;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use flow_splitter::{DEFAULT_FLOWS_FILE, SplitterConfig};

/// Split-file encodings selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Pretty-printed JSON files.
    Json,
    /// YAML files.
    Yaml,
}

impl FormatArg {
    /// Returns the settings-file spelling of this format.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Parsed CLI arguments for `flow-splitter`.
#[derive(Debug, Parser)]
#[command(name = "flow-splitter")]
#[command(about = "Split a flows file into per-record sources and rebuild it")]
#[command(version)]
pub struct Args {
    /// Project root holding the flows file and splitter settings.
    #[arg(long, short = 'C', value_name = "path", default_value = ".")]
    pub project: Utf8PathBuf,
    /// Name of the flows file inside the project root.
    #[arg(long, value_name = "name", default_value = DEFAULT_FLOWS_FILE)]
    pub flows_file: String,
    /// Settings overrides.
    #[command(flatten)]
    pub overrides: ConfigOverrides,
    /// Log at debug level regardless of `RUST_LOG`.
    #[arg(long = "verbose", short = 'v')]
    pub is_verbose: bool,
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Values that take precedence over the project's settings file.
#[derive(Debug, Clone, ClapArgs)]
pub struct ConfigOverrides {
    /// Split folder, relative to the project root.
    #[arg(long, value_name = "dir", env = "FLOW_SPLITTER_DESTINATION")]
    pub destination: Option<String>,
    /// Encoding of the split files.
    #[arg(long, value_enum, env = "FLOW_SPLITTER_FORMAT")]
    pub format: Option<FormatArg>,
}

impl ConfigOverrides {
    /// Apply every override that was supplied.
    pub fn apply(&self, config: &mut SplitterConfig) {
        if let Some(destination) = &self.destination {
            config.destination_folder.clone_from(destination);
        }
        if let Some(format) = self.format {
            config.file_format = format.as_str().to_owned();
        }
    }
}

/// Operations supported by `flow-splitter`.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write a classified flow set out as one file per record.
    Split {
        /// JSON flow set produced by the classifier.
        #[arg(long, value_name = "path")]
        flow_set: Utf8PathBuf,
    },
    /// Rebuild the flows file from the split folder.
    Merge,
    /// Remove the split folder.
    Clean,
}

#[cfg(test)]
mod tests {
    //! Argument parsing tests.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_apply_without_flags() {
        let args = Args::try_parse_from(["flow-splitter", "merge"]).expect("parse");
        assert_eq!(args.project, Utf8PathBuf::from("."));
        assert_eq!(args.flows_file, DEFAULT_FLOWS_FILE);
        assert!(!args.is_verbose);
        assert!(matches!(args.command, Command::Merge));
    }

    #[rstest]
    fn split_requires_a_flow_set() {
        let err = Args::try_parse_from(["flow-splitter", "split"]).expect_err("missing flag");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[rstest]
    fn overrides_replace_settings() {
        let args = Args::try_parse_from([
            "flow-splitter",
            "--destination",
            "nodes",
            "--format",
            "json",
            "-C",
            "/work/app",
            "split",
            "--flow-set",
            "set.json",
        ])
        .expect("parse");
        let mut config = SplitterConfig::default();
        args.overrides.apply(&mut config);
        assert_eq!(config.destination_folder, "nodes");
        assert_eq!(config.file_format, "json");
        assert_eq!(args.project, Utf8PathBuf::from("/work/app"));
        assert!(
            matches!(args.command, Command::Split { flow_set } if flow_set == Utf8PathBuf::from("set.json"))
        );
    }

    #[rstest]
    fn unknown_format_is_rejected() {
        let err = Args::try_parse_from(["flow-splitter", "--format", "toml", "merge"])
            .expect_err("bad format");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
