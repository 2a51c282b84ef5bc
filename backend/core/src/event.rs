use serde::{Deserialize, Serialize};

/// Why an item was skipped before download. The first matching rule wins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Rejected by the resolution/duration policy.
    Filter,
    /// Fingerprint already present in the duplicate index.
    Duplicate,
    /// Destination name already present at the destination store.
    Exists,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Filter => "filter",
            SkipReason::Duplicate => "duplicate",
            SkipReason::Exists => "exists",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of handing a downloaded file to the uploader.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadOutcome {
    /// Stored; `remote_id` identifies the object at the destination.
    Uploaded { remote_id: String },
    /// The destination declined the file.
    Rejected { reason: String },
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Uploaded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_reason_display() {
        assert_eq!(SkipReason::Filter.to_string(), "filter");
        assert_eq!(SkipReason::Duplicate.to_string(), "duplicate");
        assert_eq!(SkipReason::Exists.to_string(), "exists");
    }

    #[test]
    fn skip_reason_serializes_like_display() {
        let json = serde_json::to_value(SkipReason::Exists).unwrap();
        assert_eq!(json, "exists");
    }

    #[test]
    fn outcome_serialization() {
        let outcome = UploadOutcome::Uploaded { remote_id: "abc".into() };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "uploaded");
        assert!(outcome.is_success());
        assert!(!UploadOutcome::Rejected { reason: "full".into() }.is_success());
    }
}
