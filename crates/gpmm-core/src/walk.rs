use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::layout::is_sidecar;
use crate::merge::Merger;
use crate::metadata::MetadataWriter;
use crate::MergeError;

impl<W: MetadataWriter> Merger<'_, W> {
    /// Depth-first, pre-order walk: mirror `dir` under the merged root, recurse
    /// into child directories, then merge every non-sidecar file.
    pub fn walk(&mut self, dir: &Path) -> anyhow::Result<()> {
        if dir.as_os_str().is_empty() {
            return Err(MergeError::InvalidArgument("folder must not be empty".into()).into());
        }
        if !dir.is_dir() {
            return Err(MergeError::InvalidArgument(format!("folder not found '{}'", dir.display())).into());
        }

        let relative = dir.strip_prefix(&self.roots.input).map_err(|_| {
            MergeError::InvalidArgument(format!(
                "{} is not under {}",
                dir.display(),
                self.roots.input.display()
            ))
        })?;
        tracing::debug!(folder = %dir.display(), "traverse folder");

        let mirrored = self.roots.merged_path(relative);
        fs::create_dir_all(&mirrored)
            .with_context(|| format!("Failed to create {}", mirrored.display()))?;

        let (dirs, files) = list_dir(dir)?;

        for child in &dirs {
            self.walk(child)?;
        }

        for file in &files {
            self.merge(file)?;
        }

        Ok(())
    }
}

/// Split a directory listing into child directories and candidate media files.
fn list_dir(dir: &Path) -> anyhow::Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read {}", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        } else if !is_sidecar(&entry.file_name().to_string_lossy()) {
            files.push(path);
        }
    }
    Ok((dirs, files))
}
