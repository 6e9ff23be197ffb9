use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDateTime;

use crate::date::json::read_capture_time;
use crate::layout::OutputRoots;
use crate::media::MediaEntry;
use crate::metadata::{MetadataWriter, TagError};
use crate::outcome::Outcome;
use crate::{MergeResult, OutcomeCallback};

/// Routes media files into the merged or bad tree.
pub struct Merger<'a, W: MetadataWriter> {
    pub(crate) roots: OutputRoots,
    writer: W,
    set_file_times: bool,
    on_outcome: Option<&'a OutcomeCallback>,
    result: MergeResult,
}

impl<'a, W: MetadataWriter> Merger<'a, W> {
    pub fn new(roots: OutputRoots, writer: W) -> Self {
        Self {
            roots,
            writer,
            set_file_times: true,
            on_outcome: None,
            result: MergeResult::default(),
        }
    }

    /// Set the mtime of merged files to their capture time.
    pub fn with_file_times(mut self, set_file_times: bool) -> Self {
        self.set_file_times = set_file_times;
        self
    }

    pub fn with_callback(mut self, callback: &'a OutcomeCallback) -> Self {
        self.on_outcome = Some(callback);
        self
    }

    pub fn roots(&self) -> &OutputRoots {
        &self.roots
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn result(&self) -> &MergeResult {
        &self.result
    }

    pub fn finish(self) -> MergeResult {
        self.result
    }

    /// Merge a single media file. Only errors outside the recoverable tagging
    /// failures are returned.
    pub fn merge(&mut self, path: &Path) -> anyhow::Result<Outcome> {
        let entry = MediaEntry::new(&self.roots.input, path.to_path_buf())?;

        if !entry.sidecar_path().is_file() {
            return Ok(self.record(&entry, Outcome::SkippedNoSidecar, None));
        }

        let dest = self.roots.merged_path(&entry.relative);
        if dest.exists() {
            return Ok(self.record(&entry, Outcome::SkippedAlreadyProcessed, None));
        }

        let taken = match read_capture_time(&entry.sidecar_path())? {
            Ok(taken) => taken,
            Err(problem) => {
                let reason = problem.to_string();
                return Ok(self.record(&entry, Outcome::SkippedUnparseableTimestamp, Some(&reason)));
            }
        };

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        match self.write_tagged(&entry.path, &dest, taken) {
            Ok(()) => {
                if self.set_file_times {
                    let ft = filetime::FileTime::from_unix_time(taken.and_utc().timestamp(), 0);
                    if let Err(e) = filetime::set_file_mtime(&dest, ft) {
                        tracing::debug!(path = %dest.display(), error = %e, "could not set mtime");
                    }
                }
                Ok(self.record(&entry, Outcome::Merged, None))
            }
            Err(e) if e.is_recoverable() => {
                let reason = e.to_string();
                self.quarantine_entry(&entry, &reason)
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("Failed to write capture time for {}", entry.path.display()))),
        }
    }

    fn write_tagged(&self, source: &Path, dest: &Path, taken: NaiveDateTime) -> Result<(), TagError> {
        let mut file = self.writer.open_for_tagging(source)?;
        self.writer.set_capture_time(&mut file, taken)?;
        self.writer.save(file, dest)
    }

    /// Copy a media file and its sidecar, unmodified, into the bad tree.
    /// The sidecar must exist.
    pub fn quarantine(&mut self, path: &Path) -> anyhow::Result<Outcome> {
        let entry = MediaEntry::new(&self.roots.input, path.to_path_buf())?;
        self.quarantine_entry(&entry, "requested")
    }

    fn quarantine_entry(&mut self, entry: &MediaEntry, reason: &str) -> anyhow::Result<Outcome> {
        let dest = self.roots.bad_path(&entry.relative);
        if dest.exists() {
            return Ok(self.record(entry, Outcome::SkippedAlreadyProcessed, Some("already in bad tree")));
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        // Sidecar first: the media copy is the idempotency key and must imply a pair
        let sidecar_dest = self.roots.bad_path(&entry.sidecar_relative());
        fs::copy(entry.sidecar_path(), &sidecar_dest).with_context(|| {
            format!("Failed to copy sidecar to {}", sidecar_dest.display())
        })?;
        fs::copy(&entry.path, &dest)
            .with_context(|| format!("Failed to copy {} to {}", entry.path.display(), dest.display()))?;

        self.result.quarantined_files.push(entry.relative.clone());
        Ok(self.record(entry, Outcome::Quarantined, Some(reason)))
    }

    /// Emit the single outcome line for a file and count it.
    fn record(&mut self, entry: &MediaEntry, outcome: Outcome, reason: Option<&str>) -> Outcome {
        let path = entry.path.display();
        let reason = reason.unwrap_or("");
        match outcome {
            Outcome::SkippedNoSidecar => {
                tracing::warn!(outcome = %outcome, %path, "cannot find metadata file, skipping merge")
            }
            Outcome::SkippedAlreadyProcessed => {
                tracing::debug!(outcome = %outcome, %path, reason, "already processed, skipping merge")
            }
            Outcome::SkippedUnparseableTimestamp => {
                tracing::info!(outcome = %outcome, %path, reason, "no usable photoTakenTime, skipping merge")
            }
            Outcome::Merged => tracing::info!(outcome = %outcome, %path, "merged"),
            Outcome::Quarantined => {
                tracing::warn!(outcome = %outcome, %path, reason, "copied to bad folder")
            }
        }

        self.result.count(outcome);
        if let Some(callback) = self.on_outcome {
            callback(&entry.relative, outcome);
        }
        outcome
    }
}
