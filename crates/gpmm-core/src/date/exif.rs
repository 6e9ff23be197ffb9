use chrono::NaiveDateTime;
use exif::{In, Reader, Tag};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read the capture time currently embedded in a media file, if any.
/// EXIF datetimes have no timezone info - they are local time as-is.
pub fn read_exif_date(path: &Path) -> Option<NaiveDateTime> {
    let file = File::open(path).ok()?;
    let reader = Reader::new()
        .read_from_container(&mut BufReader::new(file))
        .ok()?;

    let tags = [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

    for tag in &tags {
        if let Some(field) = reader.get_field(*tag, In::PRIMARY) {
            let val = field.display_value().to_string();
            if let Some(dt) = parse_exif_datetime(&val) {
                return Some(dt);
            }
        }
    }

    None
}

fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    // kamadak-exif displays "2020-01-01 00:00:00"; raw values use colons
    let cleaned = s.replace('-', ":");
    NaiveDateTime::parse_from_str(&cleaned, super::EXIF_DATETIME_FORMAT).ok()
}
