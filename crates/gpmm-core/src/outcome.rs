use serde::{Deserialize, Serialize};

/// What happened to one media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    SkippedNoSidecar,
    SkippedAlreadyProcessed,
    SkippedUnparseableTimestamp,
    Merged,
    Quarantined,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::SkippedNoSidecar => "skipped-no-sidecar",
            Outcome::SkippedAlreadyProcessed => "skipped-already-processed",
            Outcome::SkippedUnparseableTimestamp => "skipped-unparseable-timestamp",
            Outcome::Merged => "merged",
            Outcome::Quarantined => "quarantined",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
