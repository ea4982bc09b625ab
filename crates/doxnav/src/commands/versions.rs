//! `doxnav versions` command implementation.

use clap::Args;
use doxnav_config::CliSettings;

use super::{ConfigArgs, open_library};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the versions command.
#[derive(Args)]
pub(crate) struct VersionsArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

impl VersionsArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load(CliSettings::default())?;
        let library = open_library(&config)?;
        let state = library.reload_if_needed();

        output.info(&format!(
            "Documentation root: {}",
            config.docs_resolved.root.display()
        ));

        for version in state.versions() {
            let summary = version.summary();
            output.data_line(&format!(
                "{}\t{} nodes\t{} errors\t{} warnings",
                summary.label, summary.nodes, summary.errors, summary.warnings
            ));
        }
        for failure in state.failures() {
            output.warning(&format!("{}: {}", failure.label, failure.error));
        }

        if state.versions().is_empty() && state.failures().is_empty() {
            output.warning("No navtreedata.js found");
        }
        Ok(())
    }
}
