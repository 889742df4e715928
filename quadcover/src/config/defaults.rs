//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use std::path::PathBuf;

use chrono::NaiveDate;

use super::file::config_directory;
use super::settings::*;
use crate::catalog::TargetSelector;
use crate::download::{
    DEFAULT_BUCKET, DEFAULT_COARSE_ZOOM, DEFAULT_FINE_ZOOM, DEFAULT_TIMEOUT_SECS,
    DEFAULT_URL_TEMPLATE,
};
use crate::geodesic::DEFAULT_QUADRANT_SEGMENTS;

/// Default disc radius in metres.
pub const DEFAULT_RADIUS_M: f64 = 1_000.0;

/// Default catalogue delimiter.
pub const DEFAULT_DELIMITER: char = ',';

/// Default catalogue country filter.
pub const DEFAULT_COUNTRY: &str = "US";

/// Default catalogue type filter.
pub const DEFAULT_KIND: &str = "large_airport";

/// Default catalogue file name inside the config directory.
pub const DEFAULT_CATALOG_FILE: &str = "airports.csv";

/// Default targets.
pub const DEFAULT_TARGETS: &[&str] = &["SFO", "name:Denver"];

/// Default download window start.
pub const DEFAULT_START_DATE: &str = "2021-07-01";

/// Default download window end.
pub const DEFAULT_END_DATE: &str = "2021-08-31";

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "sample_data";

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE: &str = "quadcover.log";

/// Get the default log file path (~/.quadcover/quadcover.log).
pub fn default_log_file() -> PathBuf {
    config_directory().join(DEFAULT_LOG_FILE)
}

fn default_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

impl Default for CoverageSettings {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_RADIUS_M,
            fine_zoom: DEFAULT_FINE_ZOOM,
            coarse_zoom: DEFAULT_COARSE_ZOOM,
            quadrant_segments: DEFAULT_QUADRANT_SEGMENTS,
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: Some(config_directory().join(DEFAULT_CATALOG_FILE)),
            delimiter: DEFAULT_DELIMITER,
            country: Some(DEFAULT_COUNTRY.to_string()),
            kind: Some(DEFAULT_KIND.to_string()),
        }
    }
}

impl Default for TargetSettings {
    fn default() -> Self {
        Self {
            selectors: DEFAULT_TARGETS
                .iter()
                .filter_map(|s| s.parse::<TargetSelector>().ok())
                .collect(),
        }
    }
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            start: default_date(DEFAULT_START_DATE),
            end: default_date(DEFAULT_END_DATE),
            bucket: DEFAULT_BUCKET.to_string(),
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
            quadkey_list: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            coverage: CoverageSettings::default(),
            catalog: CatalogSettings::default(),
            targets: TargetSettings::default(),
            download: DownloadSettings::default(),
            output: OutputSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}
