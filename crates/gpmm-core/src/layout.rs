use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::MergeError;

/// Suffix that marks a Takeout metadata sidecar.
pub const SIDECAR_SUFFIX: &str = ".json";

/// Suffix appended to the input root for the merged output tree.
pub const MERGED_SUFFIX: &str = "_merged";

/// Suffix appended to the input root for files that could not be tagged.
pub const BAD_SUFFIX: &str = "_bad";

/// Name of the run log written under the merged root.
pub const LOG_FILENAME: &str = "log.txt";

/// `<media>.json` next to the media file.
pub fn sidecar_path_for(media: &Path) -> PathBuf {
    let mut name = OsString::from(media.as_os_str());
    name.push(SIDECAR_SUFFIX);
    PathBuf::from(name)
}

/// Check if a directory entry name is a sidecar (skipped by the walker)
pub fn is_sidecar(name: &str) -> bool {
    name.ends_with(SIDECAR_SUFFIX)
}

/// The three roots of a run. Fixed once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRoots {
    pub input: PathBuf,
    pub merged: PathBuf,
    pub bad: PathBuf,
}

impl OutputRoots {
    /// Derive `<abs input>_merged` and `<abs input>_bad` from the input folder.
    pub fn for_input(folder: &Path) -> Result<Self, MergeError> {
        if folder.as_os_str().is_empty() {
            return Err(MergeError::InvalidArgument("folder must not be empty".into()));
        }
        if !folder.is_dir() {
            return Err(MergeError::InvalidArgument(format!(
                "folder not found '{}'",
                folder.display()
            )));
        }
        let input = std::path::absolute(folder)
            .map_err(|e| MergeError::InvalidArgument(format!("{}: {}", folder.display(), e)))?;
        let input = normalize(&input);

        Ok(Self {
            merged: with_suffix(&input, MERGED_SUFFIX),
            bad: with_suffix(&input, BAD_SUFFIX),
            input,
        })
    }

    /// Mirrored location of `relative` under the merged root.
    pub fn merged_path(&self, relative: &Path) -> PathBuf {
        mirror(&self.merged, relative)
    }

    /// Mirrored location of `relative` under the bad root.
    pub fn bad_path(&self, relative: &Path) -> PathBuf {
        mirror(&self.bad, relative)
    }

    pub fn log_path(&self) -> PathBuf {
        self.merged.join(LOG_FILENAME)
    }
}

fn mirror(root: &Path, relative: &Path) -> PathBuf {
    if relative.as_os_str().is_empty() {
        root.to_path_buf()
    } else {
        root.join(relative)
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Resolve `.` and `..` lexically and drop trailing separators.
/// `absolute` keeps `..`, which would put `X/sub/.._merged` inside the input tree.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // ".." at the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}
