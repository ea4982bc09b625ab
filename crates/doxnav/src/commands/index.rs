//! `doxnav index` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use doxnav_config::CliSettings;
use doxnav_script::{index_chunk_file_name, write_index_chunk};
use doxnav_tree::IndexChunks;

use super::{ConfigArgs, open_library};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the index command.
#[derive(Args)]
pub(crate) struct IndexArgs {
    /// Version label.
    version: String,

    /// Directory to write navtreeindexN.js files to.
    #[arg(short, long)]
    out: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,
}

impl IndexArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load(CliSettings::default())?;
        let version = open_library(&config)?.version(&self.version)?;

        let written = write_chunks(&version.chunks, &self.out)?;

        output.success(&format!(
            "Wrote {written} index chunk(s) to {}",
            self.out.display()
        ));
        Ok(())
    }
}

/// Write every chunk to `dir`, creating it if needed.
fn write_chunks(chunks: &IndexChunks, dir: &Path) -> Result<usize, CliError> {
    fs::create_dir_all(dir)?;
    for (number, chunk) in chunks.chunks().iter().enumerate() {
        let path = dir.join(index_chunk_file_name(number));
        fs::write(&path, write_index_chunk(number, chunk))?;
        tracing::debug!(path = %path.display(), entries = chunk.entries().len(), "Wrote index chunk");
    }
    Ok(chunks.chunks().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doxnav_tree::{NavTree, Node};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_chunks() {
        let temp = tempfile::tempdir().unwrap();
        let out = temp.path().join("index");
        let tree = NavTree::new(vec![Node::with_children(
            "EAR",
            Some("index.html"),
            vec![
                Node::leaf("FAQs", Some("d8/d8a/md_FAQs.html")),
                Node::leaf("User guide", Some("d6/d86/md_User_guide.html")),
            ],
        )]);

        let written = write_chunks(&IndexChunks::build(&tree, 2), &out).unwrap();

        assert_eq!(written, 2);
        let first = fs::read_to_string(out.join("navtreeindex0.js")).unwrap();
        assert!(first.starts_with("var NAVTREEINDEX0 =\n{\n"));
        assert!(first.contains("\"d6/d86/md_User_guide.html\":[0,1]"));
        assert!(out.join("navtreeindex1.js").is_file());
        assert!(!out.join("navtreeindex2.js").exists());
    }
}
