use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDateTime;

use super::capture_time_from_epoch;

/// Capture metadata parsed from a Takeout sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarRecord {
    /// photoTakenTime.timestamp, epoch seconds
    pub taken_timestamp: i64,
}

impl SidecarRecord {
    pub fn capture_time(&self) -> Option<NaiveDateTime> {
        capture_time_from_epoch(self.taken_timestamp)
    }
}

/// Why a sidecar did not yield a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidecarProblem {
    Malformed(String),
    MissingTimestamp,
    NotAnInteger(String),
    OutOfRange(i64),
}

impl std::fmt::Display for SidecarProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SidecarProblem::Malformed(e) => write!(f, "malformed JSON: {}", e),
            SidecarProblem::MissingTimestamp => write!(f, "no photoTakenTime.timestamp string"),
            SidecarProblem::NotAnInteger(v) => write!(f, "timestamp {:?} is not an integer", v),
            SidecarProblem::OutOfRange(v) => write!(f, "timestamp {} is out of range", v),
        }
    }
}

/// Parse Google's JSON metadata and extract photoTakenTime.
/// The timestamp must be a string holding base-10 epoch seconds.
pub fn parse_google_json(json_bytes: &[u8]) -> Result<SidecarRecord, SidecarProblem> {
    let data: serde_json::Value =
        serde_json::from_slice(json_bytes).map_err(|e| SidecarProblem::Malformed(e.to_string()))?;
    let ts_str = data
        .get("photoTakenTime")
        .and_then(|t| t.get("timestamp"))
        .and_then(|t| t.as_str())
        .ok_or(SidecarProblem::MissingTimestamp)?;

    let taken_timestamp = ts_str
        .parse::<i64>()
        .map_err(|_| SidecarProblem::NotAnInteger(ts_str.to_string()))?;

    Ok(SidecarRecord { taken_timestamp })
}

/// Read a sidecar from disk and resolve its capture time.
///
/// Returns `Ok(Err(problem))` when the sidecar is readable but yields no usable
/// timestamp. Only I/O failures are errors.
pub fn read_capture_time(sidecar: &Path) -> anyhow::Result<Result<NaiveDateTime, SidecarProblem>> {
    let bytes = fs::read(sidecar)
        .with_context(|| format!("Failed to read sidecar {}", sidecar.display()))?;
    Ok(parse_google_json(&bytes).and_then(|record| {
        record
            .capture_time()
            .ok_or(SidecarProblem::OutOfRange(record.taken_timestamp))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_timestamp_string() {
        let json = br#"{"title":"photo.jpg","photoTakenTime":{"timestamp":"1577836800","formatted":"Jan 1, 2020"}}"#;
        let record = parse_google_json(json).unwrap();
        assert_eq!(record.taken_timestamp, 1_577_836_800);
        assert_eq!(
            record.capture_time().unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_missing_field() {
        let json = br#"{"creationTime":{"timestamp":"1577836800"}}"#;
        assert_eq!(parse_google_json(json), Err(SidecarProblem::MissingTimestamp));
    }

    #[test]
    fn test_numeric_timestamp_is_not_accepted() {
        let json = br#"{"photoTakenTime":{"timestamp":1577836800}}"#;
        assert_eq!(parse_google_json(json), Err(SidecarProblem::MissingTimestamp));
    }

    #[test]
    fn test_not_an_integer() {
        let json = br#"{"photoTakenTime":{"timestamp":"yesterday"}}"#;
        assert!(matches!(parse_google_json(json), Err(SidecarProblem::NotAnInteger(_))));

        let json = br#"{"photoTakenTime":{"timestamp":"1577836800.5"}}"#;
        assert!(matches!(parse_google_json(json), Err(SidecarProblem::NotAnInteger(_))));
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(parse_google_json(b"{not json"), Err(SidecarProblem::Malformed(_))));
    }

    #[test]
    fn test_read_capture_time() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.jpg.json");
        std::fs::write(&good, r#"{"photoTakenTime":{"timestamp":"0"}}"#).unwrap();
        let date = read_capture_time(&good).unwrap().unwrap();
        assert_eq!(date.to_string(), "1970-01-01 00:00:00");

        let bad = dir.path().join("b.jpg.json");
        std::fs::write(&bad, "{}").unwrap();
        assert!(read_capture_time(&bad).unwrap().is_err());

        assert!(read_capture_time(&dir.path().join("missing.json")).is_err());
    }
}
