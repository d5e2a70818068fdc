// Readtrack Engine — Configuration
//
// A single JSON file next to the data directory. Missing or malformed config
// never aborts startup — we log what went wrong and fall back to defaults,
// the same way the roster loader degrades. The file is written back whenever
// the whitelist mutates (see engine/whitelist.rs).

use crate::atoms::error::TrackerResult;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// The acknowledgement keyword members send ("已读", "read", …).
    #[serde(default = "default_keyword")]
    pub read_keyword: String,
    /// Retention horizon in days; records older than this are purged.
    #[serde(default = "default_max_record_days")]
    pub max_record_days: i64,
    /// Cosmetic label for the tracked group shown in reports.
    #[serde(default)]
    pub group_label: String,
    /// Path of the roster JSON file.
    #[serde(default = "default_roster_file")]
    pub roster_file: String,
    /// Group ids we respond in. Empty means "no restriction".
    #[serde(default)]
    pub whitelist: Vec<String>,
    /// When true, attribution only ever credits roster members (precision
    /// variant). Default favors recall: unlisted names are credited too.
    #[serde(default)]
    pub roster_gated: bool,
}

fn default_keyword() -> String {
    "已读".to_string()
}

fn default_max_record_days() -> i64 {
    7
}

fn default_roster_file() -> String {
    "roster.json".to_string()
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            read_keyword: default_keyword(),
            max_record_days: default_max_record_days(),
            group_label: String::new(),
            roster_file: default_roster_file(),
            whitelist: vec![],
            roster_gated: false,
        }
    }
}

impl TrackerConfig {
    /// Load config from `path`, degrading to defaults on any failure.
    pub fn load(path: &Path) -> TrackerConfig {
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<TrackerConfig>(&raw) {
                Ok(mut cfg) => {
                    if cfg.max_record_days < 1 {
                        warn!(
                            "[config] max_record_days={} is below 1, clamping",
                            cfg.max_record_days
                        );
                        cfg.max_record_days = 1;
                    }
                    info!(
                        "[config] Loaded config from {:?}: keyword={:?}, retention={}d, whitelist={} group(s)",
                        path, cfg.read_keyword, cfg.max_record_days, cfg.whitelist.len()
                    );
                    cfg
                }
                Err(e) => {
                    warn!("[config] Malformed config at {:?}: {} — using defaults", path, e);
                    TrackerConfig::default()
                }
            },
            Err(e) => {
                info!("[config] No config at {:?} ({}) — using defaults", path, e);
                TrackerConfig::default()
            }
        }
    }

    /// Write the config back to `path` (pretty JSON, whole-file replace).
    pub fn save(&self, path: &Path) -> TrackerResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("[config] Saved config to {:?} (whitelist: {:?})", path, self.whitelist);
        Ok(())
    }
}

/// Default data directory for the tracker's files (db, config, roster).
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_default().join("readtrack")
}
