//! Policy filter: resolution and duration thresholds.
//!
//! Missing metadata never causes a skip. A zero width, height or duration
//! counts as missing.

use tgup_core::{MediaItem, TransferOptions};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipPolicy {
    /// Minimum of width/height in pixels; 0 disables.
    pub min_resolution: u32,
    /// Minimum duration in seconds; 0 disables.
    pub min_duration: u32,
}

impl SkipPolicy {
    pub fn from_options(options: &TransferOptions) -> Self {
        Self {
            min_resolution: options.min_resolution,
            min_duration: options.min_duration,
        }
    }

    /// Whether the policy rejects `item`.
    pub fn rejects(&self, item: &MediaItem) -> bool {
        if self.min_resolution > 0 {
            let known = |v: Option<u32>| v.filter(|v| *v > 0);
            if let (Some(w), Some(h)) = (known(item.width), known(item.height)) {
                if w.min(h) < self.min_resolution {
                    return true;
                }
            }
        }
        if self.min_duration > 0 {
            if let Some(duration) = item.duration.filter(|d| *d > 0) {
                if duration < self.min_duration {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tgup_core::MediaKind;

    fn video() -> MediaItem {
        MediaItem::new(1, 1, Utc::now(), MediaKind::Video)
    }

    #[test]
    fn disabled_policy_accepts_everything() {
        let policy = SkipPolicy::default();
        assert!(!policy.rejects(&video().with_dimensions(1, 1).with_duration(0)));
    }

    #[test]
    fn resolution_uses_shorter_side() {
        let policy = SkipPolicy { min_resolution: 720, min_duration: 0 };
        assert!(policy.rejects(&video().with_dimensions(1920, 480)));
        assert!(!policy.rejects(&video().with_dimensions(1280, 720)));
        assert!(!policy.rejects(&video().with_dimensions(720, 1280)));
    }

    #[test]
    fn resolution_needs_both_sides() {
        let policy = SkipPolicy { min_resolution: 720, min_duration: 0 };
        let mut item = video();
        item.width = Some(100);
        assert!(!policy.rejects(&item));
        assert!(!policy.rejects(&video()));
    }

    #[test]
    fn duration_threshold() {
        let policy = SkipPolicy { min_resolution: 0, min_duration: 10 };
        assert!(policy.rejects(&video().with_duration(9)));
        assert!(!policy.rejects(&video().with_duration(10)));
        assert!(!policy.rejects(&video()));
    }

    #[test]
    fn zero_metadata_counts_as_unknown() {
        let policy = SkipPolicy { min_resolution: 720, min_duration: 10 };
        assert!(!policy.rejects(&video().with_dimensions(0, 0)));
        assert!(!policy.rejects(&video().with_dimensions(1920, 0)));
        assert!(!policy.rejects(&video().with_duration(0)));
        assert!(policy.rejects(&video().with_dimensions(0, 0).with_duration(3)));
    }

    #[test]
    fn either_rule_rejects() {
        let policy = SkipPolicy { min_resolution: 720, min_duration: 10 };
        assert!(policy.rejects(&video().with_dimensions(1920, 1080).with_duration(3)));
        assert!(policy.rejects(&video().with_dimensions(320, 240).with_duration(60)));
        assert!(!policy.rejects(&video().with_dimensions(1920, 1080).with_duration(60)));
    }
}
