//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::catalog::TargetSelector;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Disc and zoom settings
    pub coverage: CoverageSettings,
    /// Point-of-interest file settings
    pub catalog: CatalogSettings,
    /// Which targets to cover
    pub targets: TargetSettings,
    /// Activity download settings
    pub download: DownloadSettings,
    /// Output locations
    pub output: OutputSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Coverage configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageSettings {
    /// Disc radius in metres
    pub radius_m: f64,
    /// Zoom of the coverage set
    pub fine_zoom: u8,
    /// Zoom of the download grouping key
    pub coarse_zoom: u8,
    /// Polygon sides per quarter circle
    pub quadrant_segments: u32,
}

/// Catalogue configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSettings {
    /// Catalogue file; `None` allows point targets only
    pub path: Option<PathBuf>,
    pub delimiter: char,
    /// Keep only this country code (e.g. "US")
    pub country: Option<String>,
    /// Keep only this record type (e.g. "large_airport")
    pub kind: Option<String>,
}

/// Target selection.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSettings {
    pub selectors: Vec<TargetSelector>,
}

/// Download configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadSettings {
    /// Whether `run` downloads after computing coverage
    pub enabled: bool,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub bucket: String,
    pub url_template: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    /// Root of the downloaded file tree
    pub directory: PathBuf,
    /// Fine quadkey list; `None` writes `z<fine>_quadkeys.txt` in `directory`
    pub quadkey_list: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}

impl OutputSettings {
    /// Where the fine quadkey list is written for `fine_zoom`.
    pub fn quadkey_list_path(&self, fine_zoom: u8) -> PathBuf {
        self.quadkey_list.clone().unwrap_or_else(|| {
            self.directory
                .join(format!("z{}_quadkeys.txt", fine_zoom))
        })
    }
}
