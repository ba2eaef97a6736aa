use std::{
    io::Write,
    path::{Path, PathBuf},
};

use lakom_seed_resources::ResourceSet;
use snafu::{ResultExt, Snafu};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to create output directory {path:?}"))]
    CreateOutputDir {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to write manifest to {path:?}"))]
    WriteManifest {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to write manifests to stdout"))]
    WriteStdout { source: std::io::Error },
}

/// Writes every manifest into its own file inside `directory`, named by its key.
///
/// Existing files with the same name are overwritten, other files are left untouched.
pub fn write_to_directory(resources: &ResourceSet, directory: &Path) -> Result<()> {
    std::fs::create_dir_all(directory).context(CreateOutputDirSnafu { path: directory })?;

    for (key, yaml) in resources.iter() {
        let path = directory.join(key.as_str());
        std::fs::write(&path, yaml).context(WriteManifestSnafu { path: &path })?;
        tracing::debug!(path = %path.display(), "wrote manifest");
    }

    tracing::info!(
        directory = %directory.display(),
        manifests = resources.len(),
        "wrote manifests"
    );
    Ok(())
}

/// Writes all manifests as a single multi-document YAML stream.
pub fn write_to<W>(resources: &ResourceSet, writer: W) -> Result<()>
where
    W: Write,
{
    resources
        .write_multi_document(writer)
        .context(WriteStdoutSnafu)
}
