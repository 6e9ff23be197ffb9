//! Writing the capture time into media files.
//!
//! The merge flow only talks to [`MetadataWriter`]. [`ExifWriter`] is the real
//! implementation on top of `little_exif`; tests substitute their own writer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;

use crate::date::{exif::read_exif_date, to_exif_string};

/// Failures reported by a [`MetadataWriter`].
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl TagError {
    /// Recoverable errors send the file to the bad tree; the rest abort the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TagError::UnsupportedFormat(_) | TagError::InvalidOperation(_))
    }
}

/// Capability to stamp a capture time onto a copy of a media file.
pub trait MetadataWriter {
    type File;

    fn open_for_tagging(&self, path: &Path) -> Result<Self::File, TagError>;

    fn set_capture_time(&self, file: &mut Self::File, taken: NaiveDateTime) -> Result<(), TagError>;

    /// Persist the tagged file at `dest`. The source file is left untouched and
    /// nothing is left at `dest` on failure.
    fn save(&self, file: Self::File, dest: &Path) -> Result<(), TagError>;
}

/// MIME types little_exif can write an EXIF block into.
const WRITABLE_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/tiff",
    "image/webp",
    "image/heic",
    "image/heif",
    "image/jxl",
];

/// Check whether the file's type (by extension) can carry an EXIF capture time.
pub fn is_writable_format(path: &Path) -> bool {
    mime_guess::from_path(path)
        .iter()
        .any(|mime| WRITABLE_MIME_TYPES.contains(&mime.essence_str()))
}

/// EXIF writer backed by little_exif.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifWriter;

impl ExifWriter {
    pub fn new() -> Self {
        Self
    }
}

pub struct ExifFile {
    source: PathBuf,
    metadata: Metadata,
}

impl MetadataWriter for ExifWriter {
    type File = ExifFile;

    fn open_for_tagging(&self, path: &Path) -> Result<ExifFile, TagError> {
        if !is_writable_format(path) {
            let mime = mime_guess::from_path(path)
                .first()
                .map(|m| m.essence_str().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            return Err(TagError::UnsupportedFormat(mime));
        }
        // Surface missing/unreadable files as I/O before little_exif sees them
        fs::metadata(path)?;

        let metadata = match Metadata::new_from_path(path) {
            Ok(m) => m,
            Err(e) if e.raw_os_error().is_some() => return Err(TagError::Io(e)),
            // No EXIF block yet; start from an empty one
            Err(_) => Metadata::new(),
        };

        if let Some(previous) = read_exif_date(path) {
            tracing::debug!(path = %path.display(), %previous, "existing capture time");
        }

        Ok(ExifFile {
            source: path.to_path_buf(),
            metadata,
        })
    }

    fn set_capture_time(&self, file: &mut ExifFile, taken: NaiveDateTime) -> Result<(), TagError> {
        let value = to_exif_string(&taken);
        file.metadata.set_tag(ExifTag::DateTimeOriginal(value.clone()));
        file.metadata.set_tag(ExifTag::CreateDate(value));
        Ok(())
    }

    fn save(&self, file: ExifFile, dest: &Path) -> Result<(), TagError> {
        let part = part_path(dest);
        fs::copy(&file.source, &part)?;

        if let Err(e) = file.metadata.write_to_file(&part) {
            let _ = fs::remove_file(&part);
            return Err(classify(e));
        }

        if let Err(e) = fs::rename(&part, dest) {
            let _ = fs::remove_file(&part);
            return Err(TagError::Io(e));
        }
        Ok(())
    }
}

/// Staging path next to `dest`. Keeps the extension, little_exif dispatches on it.
pub fn part_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".part-{}", name))
}

// OS errors are environment problems; anything little_exif raises itself
// means it could not handle this container.
fn classify(e: io::Error) -> TagError {
    if e.raw_os_error().is_some() {
        TagError::Io(e)
    } else {
        TagError::InvalidOperation(e.to_string())
    }
}
