use std::path::{Path, PathBuf};

use crate::layout::sidecar_path_for;

#[derive(Debug, Clone)]
pub struct MediaEntry {
    /// Absolute path under the input root
    pub path: PathBuf,
    /// Path relative to the input root, used for mirroring
    pub relative: PathBuf,
    /// Just the filename
    pub filename: String,
}

impl MediaEntry {
    /// Build an entry for `path`, which must live under `input_root`.
    pub fn new(input_root: &Path, path: PathBuf) -> anyhow::Result<Self> {
        let relative = path
            .strip_prefix(input_root)
            .map_err(|_| {
                anyhow::anyhow!(
                    "{} is not under input root {}",
                    path.display(),
                    input_root.display()
                )
            })?
            .to_path_buf();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            path,
            relative,
            filename,
        })
    }

    pub fn sidecar_path(&self) -> PathBuf {
        sidecar_path_for(&self.path)
    }

    /// Sidecar path relative to the input root.
    pub fn sidecar_relative(&self) -> PathBuf {
        sidecar_path_for(&self.relative)
    }
}
