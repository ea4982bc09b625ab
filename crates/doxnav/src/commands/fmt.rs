//! `doxnav fmt` command implementation.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use doxnav_script::{ScriptError, load, write_navtree};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the fmt command.
#[derive(Args)]
pub(crate) struct FmtArgs {
    /// Path to a navtreedata.js file.
    file: PathBuf,

    /// Only check whether the file is already formatted.
    #[arg(long)]
    check: bool,
}

impl FmtArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let source = fs::read_to_string(&self.file)?;
        let formatted = format_source(&source)?;

        if formatted == source {
            output.success(&format!("{} is formatted", self.file.display()));
            return Ok(());
        }

        if self.check {
            return Err(CliError::Validation(format!(
                "{} is not formatted",
                self.file.display()
            )));
        }

        fs::write(&self.file, formatted)?;
        output.success(&format!("Formatted {}", self.file.display()));
        Ok(())
    }
}

/// Canonical layout of a `navtreedata.js` script.
fn format_source(source: &str) -> Result<String, ScriptError> {
    Ok(write_navtree(&load(source)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MESSY: &str = "var NAVTREE = [ [\"EAR\",\"index.html\",[ [\"FAQs\",\"d8/d8a/md_FAQs.html\",null], ], ] ];\n\
                         var NAVTREEINDEX = [\"d8/d8a/md_FAQs.html\"];";

    fn args(file: PathBuf, check: bool) -> FmtArgs {
        FmtArgs { file, check }
    }

    #[test]
    fn test_format_source_is_idempotent() {
        let once = format_source(MESSY).unwrap();

        assert_eq!(format_source(&once).unwrap(), once);
        assert!(once.contains("  [ \"EAR\", \"index.html\", [\n"));
    }

    #[test]
    fn test_fmt_rewrites_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("navtreedata.js");
        fs::write(&path, MESSY).unwrap();

        args(path.clone(), false).execute().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), format_source(MESSY).unwrap());
    }

    #[test]
    fn test_fmt_check_leaves_file_untouched() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("navtreedata.js");
        fs::write(&path, MESSY).unwrap();

        let err = args(path.clone(), true).execute().unwrap_err();

        assert!(matches!(err, CliError::Validation(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), MESSY);
    }

    #[test]
    fn test_fmt_reports_parse_errors() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("navtreedata.js");
        fs::write(&path, "var NAVTREE = [ \"EAR\"").unwrap();

        let err = args(path, true).execute().unwrap_err();

        assert!(matches!(err, CliError::Script(_)));
    }
}
