//! `doxnav diff` command implementation.

use clap::Args;
use doxnav_config::CliSettings;
use doxnav_tree::Change;

use super::{ConfigArgs, open_library};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the diff command.
#[derive(Args)]
pub(crate) struct DiffArgs {
    /// Old version label.
    old: String,

    /// New version label.
    new: String,

    #[command(flatten)]
    config: ConfigArgs,
}

impl DiffArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load(CliSettings::default())?;
        let changes = open_library(&config)?.diff(&self.old, &self.new)?;

        for change in &changes {
            output.data_line(&change.to_string());
        }

        if changes.is_empty() {
            output.success(&format!("{} and {} have the same tree", self.old, self.new));
        } else {
            let (added, removed, relinked) = count(&changes);
            output.info(&format!(
                "{added} added, {removed} removed, {relinked} relinked"
            ));
        }
        Ok(())
    }
}

/// Count added, removed and relinked entries.
fn count(changes: &[Change]) -> (usize, usize, usize) {
    changes
        .iter()
        .fold((0, 0, 0), |(added, removed, relinked), change| match change {
            Change::Added { .. } => (added + 1, removed, relinked),
            Change::Removed { .. } => (added, removed + 1, relinked),
            Change::Relinked { .. } => (added, removed, relinked + 1),
        })
}
