pub mod exif;
pub mod json;

use chrono::{DateTime, NaiveDateTime};

/// EXIF datetime layout, as stored in DateTimeOriginal.
pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Convert Takeout epoch seconds to the capture time to embed.
/// The offset is applied to 1970-01-01T00:00:00 with no timezone adjustment.
pub fn capture_time_from_epoch(seconds: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(seconds, 0).map(|utc| utc.naive_utc())
}

/// Format a capture time the way EXIF expects it.
pub fn to_exif_string(date: &NaiveDateTime) -> String {
    date.format(EXIF_DATETIME_FORMAT).to_string()
}
