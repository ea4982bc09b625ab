//! `doxnav locate` command implementation.

use clap::Args;
use doxnav_config::CliSettings;
use doxnav_script::index_chunk_file_name;
use doxnav_site::Location;

use super::{ConfigArgs, open_library};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the locate command.
#[derive(Args)]
pub(crate) struct LocateArgs {
    /// Version label.
    version: String,

    /// Href to resolve (e.g., "d6/d86/md_User_guide.html#autotoc_md2").
    href: String,

    #[command(flatten)]
    config: ConfigArgs,
}

impl LocateArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load(CliSettings::default())?;
        let location = open_library(&config)?.locate(&self.version, &self.href)?;

        output.data_line(&trail(&location));
        if location.key != location.href {
            output.warning(&format!("Anchor not indexed, matched page {}", location.key));
        }
        output.info(&format!(
            "{} in {}",
            location.position,
            index_chunk_file_name(location.chunk)
        ));
        Ok(())
    }
}

/// Breadcrumb trail ending with the located entry.
fn trail(location: &Location) -> String {
    location
        .breadcrumbs
        .iter()
        .map(|crumb| crumb.title.as_str())
        .chain(std::iter::once(location.title.as_str()))
        .collect::<Vec<_>>()
        .join(" > ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use doxnav_tree::{Breadcrumb, Position};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trail() {
        let location = Location {
            href: "d6/d86/md_User_guide.html#autotoc_md2".to_owned(),
            key: "d6/d86/md_User_guide.html#autotoc_md2".to_owned(),
            chunk: 0,
            position: Position::new(vec![0, 3, 2, 0]),
            title: "MPI applications".to_owned(),
            breadcrumbs: vec![
                Breadcrumb {
                    title: "EAR".to_owned(),
                    href: Some("index.html".to_owned()),
                },
                Breadcrumb {
                    title: "User guide".to_owned(),
                    href: Some("d6/d86/md_User_guide.html".to_owned()),
                },
            ],
        };

        assert_eq!(trail(&location), "EAR > User guide > MPI applications");
    }
}
