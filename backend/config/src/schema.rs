//! tgup configuration schema.
//!
//! Every field is optional in the file; `defaults::apply_all_defaults`
//! fills the gaps after loading.

use serde::{Deserialize, Serialize};

/// Root of `config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TgupConfig {
    /// What to fetch and where to put it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer: Option<TransferConfig>,

    /// Known-fingerprint snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<DuplicatesConfig>,

    /// Destination store roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<DestinationConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Remote folder that per-channel folders are created under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_root: Option<String>,
    /// Local staging directory for downloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_capacity: Option<usize>,
    /// Minimum of width and height, in pixels. 0 disables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_resolution: Option<u32>,
    /// Seconds. 0 disables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_filter: Option<String>, // "all" | "video" | "photo"
    /// Upload straight into `dest_root` instead of a per-channel folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuplicatesConfig {
    /// JSON snapshot `{"ids": [...]}` of known fingerprints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_ids_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DestinationConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roots: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for the rolling NDJSON log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_file: Option<bool>,
}

impl TgupConfig {
    pub fn transfer(&self) -> TransferConfig {
        self.transfer.clone().unwrap_or_default()
    }

    pub fn logging(&self) -> LoggingConfig {
        self.logging.clone().unwrap_or_default()
    }

    pub fn known_ids_path(&self) -> Option<&str> {
        self.duplicates.as_ref()?.known_ids_path.as_deref()
    }

    pub fn destination_roots(&self) -> &[String] {
        self.destination
            .as_ref()
            .map(|d| d.roots.as_slice())
            .unwrap_or_default()
    }
}
