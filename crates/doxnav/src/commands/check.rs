//! `doxnav check` command implementation.

use clap::Args;
use doxnav_config::CliSettings;
use doxnav_site::Version;
use doxnav_tree::Severity;

use super::{ConfigArgs, open_library};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Version to check (default: all).
    version: Option<String>,

    /// Fail on warnings too.
    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    config: ConfigArgs,
}

impl CheckArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let settings = CliSettings {
            warnings_as_errors: self.strict.then_some(true),
            ..CliSettings::default()
        };
        let config = self.config.load(settings)?;
        let strict = config.validate.warnings_as_errors;
        let library = open_library(&config)?;

        let versions = match &self.version {
            Some(label) => vec![library.version(label)?],
            None => library.reload_if_needed().versions().to_vec(),
        };

        let mut failed = 0;
        for version in &versions {
            if !report_version(&output, version, strict) {
                failed += 1;
            }
        }

        if self.version.is_none() {
            for failure in library.state().failures() {
                output.error(&format!("{}: {}", failure.label, failure.error));
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(CliError::Validation(format!(
                "{failed} version(s) failed validation"
            )));
        }
        output.success(&format!("{} version(s) valid", versions.len()));
        Ok(())
    }
}

/// Print the issues of one version. Returns whether it passes.
fn report_version(output: &Output, version: &Version, strict: bool) -> bool {
    output.highlight(&version.label);
    for issue in &version.report.issues {
        let line = format!("  {issue}");
        match issue.severity {
            Severity::Error => output.error(&line),
            Severity::Warning => output.warning(&line),
        }
    }

    if strict {
        version.report.is_clean()
    } else {
        version.report.is_valid()
    }
}
