pub mod date;
pub mod layout;
pub mod media;
pub mod merge;
pub mod metadata;
pub mod outcome;
pub mod walk;

#[cfg(test)]
pub(crate) mod testutil;

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};

pub use layout::{sidecar_path_for, OutputRoots};
pub use merge::Merger;
pub use metadata::{ExifWriter, MetadataWriter, TagError};
pub use outcome::Outcome;

fn default_set_file_times() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeOptions {
    /// Root of the Takeout export to process
    pub folder: PathBuf,
    /// Set the mtime of merged files to the capture time
    #[serde(default = "default_set_file_times")]
    pub set_file_times: bool,
}

impl MergeOptions {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            set_file_times: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeResult {
    pub merged: u64,
    pub quarantined: u64,
    pub skipped_no_sidecar: u64,
    pub skipped_already_processed: u64,
    pub skipped_unparseable_timestamp: u64,
    /// Relative paths of files copied to the bad tree this run
    #[serde(default)]
    pub quarantined_files: Vec<PathBuf>,
}

impl MergeResult {
    pub fn count(&mut self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::Merged => &mut self.merged,
            Outcome::Quarantined => &mut self.quarantined,
            Outcome::SkippedNoSidecar => &mut self.skipped_no_sidecar,
            Outcome::SkippedAlreadyProcessed => &mut self.skipped_already_processed,
            Outcome::SkippedUnparseableTimestamp => &mut self.skipped_unparseable_timestamp,
        };
        *counter += 1;
    }

    pub fn total(&self) -> u64 {
        self.merged
            + self.quarantined
            + self.skipped_no_sidecar
            + self.skipped_already_processed
            + self.skipped_unparseable_timestamp
    }

    /// Files written to either output tree.
    pub fn files_written(&self) -> u64 {
        self.merged + self.quarantined
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Type alias for the per-file outcome callback (path is relative to the input root)
pub type OutcomeCallback = dyn Fn(&Path, Outcome) + Send + Sync;

/// Run the merge over `options.folder` with the EXIF writer.
pub fn run(options: &MergeOptions) -> anyhow::Result<MergeResult> {
    run_with_writer(options, ExifWriter::new(), None)
}

/// Run the merge with a given writer and optional outcome callback.
pub fn run_with_writer<W: MetadataWriter>(
    options: &MergeOptions,
    writer: W,
    on_outcome: Option<&OutcomeCallback>,
) -> anyhow::Result<MergeResult> {
    let roots = OutputRoots::for_input(&options.folder)?;
    let started = Instant::now();
    tracing::info!(
        input = %roots.input.display(),
        merged = %roots.merged.display(),
        bad = %roots.bad.display(),
        "begin processing"
    );

    let mut merger = Merger::new(roots, writer).with_file_times(options.set_file_times);
    if let Some(callback) = on_outcome {
        merger = merger.with_callback(callback);
    }
    let input = merger.roots().input.clone();
    merger.walk(&input)?;
    let result = merger.finish();

    tracing::info!(
        merged = result.merged,
        quarantined = result.quarantined,
        skipped_no_sidecar = result.skipped_no_sidecar,
        skipped_already_processed = result.skipped_already_processed,
        skipped_unparseable_timestamp = result.skipped_unparseable_timestamp,
        elapsed_secs = started.elapsed().as_secs_f64(),
        "finished processing"
    );
    Ok(result)
}
