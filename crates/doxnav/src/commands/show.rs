//! `doxnav show` command implementation.

use clap::{Args, ValueEnum};
use doxnav_config::CliSettings;
use doxnav_render::{RenderOptions, ViewerTree, render_outline, render_sidebar};
use doxnav_script::write_navtree;

use super::{ConfigArgs, open_library};
use crate::error::CliError;
use crate::output::Output;

/// Output format for the show command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// Indented plain-text outline.
    #[default]
    Outline,
    /// JSON viewer model.
    Json,
    /// HTML sidebar.
    Html,
    /// navtreedata.js script.
    Js,
}

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Version label.
    version: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    format: Format,

    /// Href to mark as the current page (HTML only).
    #[arg(long)]
    active: Option<String>,

    /// Prefix for sidebar links (overrides config, HTML only).
    #[arg(long)]
    base_url: Option<String>,

    #[command(flatten)]
    config: ConfigArgs,
}

impl ShowArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let settings = CliSettings {
            base_url: self.base_url,
            ..CliSettings::default()
        };
        let config = self.config.load(settings)?;
        let version = open_library(&config)?.version(&self.version)?;
        let data = &version.data;

        let text = match self.format {
            Format::Outline => render_outline(&data.tree),
            Format::Json => {
                let mut json = serde_json::to_string_pretty(&ViewerTree::from(data))?;
                json.push('\n');
                json
            }
            Format::Html => render_sidebar(
                &data.tree,
                &RenderOptions {
                    base_url: config.render.base_url.clone(),
                    active: self.active,
                },
            ),
            Format::Js => write_navtree(data),
        };

        output.data(&text);
        Ok(())
    }
}
