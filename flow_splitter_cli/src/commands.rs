//! Command implementations for `flow-splitter`.

use camino::Utf8Path;
use flow_splitter::{
    FlowSet, Project, SplitterConfig, capture_order, clear_split_directory, read_flows_file,
    rebuild_flows, split, write_flows_file,
};
use tracing::{info, warn};

use crate::cli::{Args, Command};
use crate::error::CliError;

/// Run the selected command against the project named by `args`.
pub fn run(args: &Args) -> Result<(), CliError> {
    let project = Project::new(args.project.clone()).with_flows_file(args.flows_file.clone());
    let mut config = SplitterConfig::load_or_default(&project)?;
    args.overrides.apply(&mut config);

    match &args.command {
        Command::Split { flow_set } => split_project(&project, &mut config, flow_set),
        Command::Merge => merge_project(&project, &config),
        Command::Clean => {
            clear_split_directory(&config.destination(&project.path));
            Ok(())
        }
    }
}

fn split_project(
    project: &Project,
    config: &mut SplitterConfig,
    flow_set_path: &Utf8Path,
) -> Result<(), CliError> {
    let encoding = config.encoding()?;
    let flow_set = FlowSet::load(flow_set_path)?;
    info!(
        flow_set = %flow_set_path,
        records = flow_set.record_count(),
        "loaded flow set"
    );
    let report = split(&flow_set, &config.destination(&project.path), encoding)?;
    if !report.skipped.is_empty() {
        warn!(
            skipped = report.skipped.len(),
            "some records were not written; see earlier errors"
        );
    }

    match read_flows_file(project)? {
        Some(document) => config.tabs_order = capture_order(&document),
        None => warn!(
            flows = %project.flows_path(),
            "flows file not found; keeping the existing record order"
        ),
    }
    let settings = config.save(project)?;
    info!(settings = %settings, "updated splitter settings");
    Ok(())
}

fn merge_project(project: &Project, config: &SplitterConfig) -> Result<(), CliError> {
    let document = rebuild_flows(&project.path, config)?;
    write_flows_file(&document, &project.path, &project.flows_file)?;
    Ok(())
}
