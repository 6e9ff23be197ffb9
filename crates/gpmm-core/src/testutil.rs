//! Deterministic writer and outcome recorder for the merge flow tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;

use crate::metadata::{MetadataWriter, TagError};
use crate::outcome::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Succeed,
    Unsupported,
    InvalidOperation,
    DiskFull,
}

/// Writer whose result depends only on the file extension.
#[derive(Default)]
pub struct FakeWriter {
    by_extension: HashMap<String, Behavior>,
    saved: RefCell<Vec<(PathBuf, NaiveDateTime)>>,
}

pub struct FakeFile {
    source: PathBuf,
    behavior: Behavior,
    taken: Option<NaiveDateTime>,
}

impl FakeWriter {
    pub fn with(mut self, extension: &str, behavior: Behavior) -> Self {
        self.by_extension.insert(extension.to_string(), behavior);
        self
    }

    /// Destinations written by `save`, with the capture time applied.
    pub fn saved(&self) -> Vec<(PathBuf, NaiveDateTime)> {
        self.saved.borrow().clone()
    }
}

impl MetadataWriter for FakeWriter {
    type File = FakeFile;

    fn open_for_tagging(&self, path: &Path) -> Result<FakeFile, TagError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let behavior = self.by_extension.get(&ext).copied().unwrap_or(Behavior::Succeed);
        if behavior == Behavior::Unsupported {
            return Err(TagError::UnsupportedFormat(ext));
        }
        Ok(FakeFile {
            source: path.to_path_buf(),
            behavior,
            taken: None,
        })
    }

    fn set_capture_time(&self, file: &mut FakeFile, taken: NaiveDateTime) -> Result<(), TagError> {
        if file.behavior == Behavior::InvalidOperation {
            return Err(TagError::InvalidOperation("tag is read-only".into()));
        }
        file.taken = Some(taken);
        Ok(())
    }

    fn save(&self, file: FakeFile, dest: &Path) -> Result<(), TagError> {
        if file.behavior == Behavior::DiskFull {
            return Err(TagError::Io(io::Error::other("no space left on device")));
        }
        fs::copy(&file.source, dest)?;
        if let Some(taken) = file.taken {
            self.saved.borrow_mut().push((dest.to_path_buf(), taken));
        }
        Ok(())
    }
}

/// Collects outcomes delivered through the callback.
#[derive(Default, Clone)]
pub struct Recorder {
    events: Arc<Mutex<Vec<(PathBuf, Outcome)>>>,
}

impl Recorder {
    pub fn callback(&self) -> impl Fn(&Path, Outcome) + Send + Sync {
        let events = Arc::clone(&self.events);
        move |path: &Path, outcome: Outcome| {
            events.lock().unwrap().push((path.to_path_buf(), outcome));
        }
    }

    pub fn events(&self) -> Vec<(PathBuf, Outcome)> {
        self.events.lock().unwrap().clone()
    }

    pub fn outcome_of(&self, relative: &str) -> Option<Outcome> {
        self.events()
            .into_iter()
            .find(|(p, _)| p == Path::new(relative))
            .map(|(_, o)| o)
    }
}

pub fn sidecar_json(timestamp: &str) -> String {
    format!(
        r#"{{"title":"x","photoTakenTime":{{"timestamp":"{}","formatted":"ignored"}}}}"#,
        timestamp
    )
}
