//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::catalog::TargetSelector;
use crate::coord::{MAX_ZOOM, MIN_ZOOM};
use crate::download::{parse_date, UrlTemplate};

/// Separator between target selectors in `[targets] select`.
pub const TARGET_SEPARATOR: char = '|';

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_zoom(section: &str, key: &str, v: &str) -> Result<u8, ConfigFileError> {
    let reason = format!("must be an integer from {} to {}", MIN_ZOOM, MAX_ZOOM);
    let zoom: u8 = v
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, v, &reason))?;
    if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
        return Err(invalid(section, key, v, &reason));
    }
    Ok(zoom)
}

fn parse_bool(section: &str, key: &str, v: &str) -> Result<bool, ConfigFileError> {
    match v.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(invalid(section, key, v, "must be true or false")),
    }
}

fn optional_text(v: &str) -> Option<String> {
    let v = v.trim();
    (!v.is_empty()).then(|| v.to_string())
}

/// Parses a delimiter value. Accepts a single character or `tab`.
fn parse_delimiter(v: &str) -> Option<char> {
    match v.trim() {
        "tab" | "\\t" => Some('\t'),
        "pipe" => Some('|'),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        }
    }
}

/// Parse a `|`-separated selector list.
fn parse_selectors(v: &str) -> Result<Vec<TargetSelector>, String> {
    v.split(TARGET_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<TargetSelector>().map_err(|e| e.to_string()))
        .collect()
}

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [coverage] section
    if let Some(section) = ini.section(Some("coverage")) {
        if let Some(v) = section.get("radius_m") {
            let radius: f64 = v.trim().parse().map_err(|_| {
                invalid("coverage", "radius_m", v, "must be a positive number of metres")
            })?;
            if !radius.is_finite() || radius <= 0.0 {
                return Err(invalid(
                    "coverage",
                    "radius_m",
                    v,
                    "must be a positive number of metres",
                ));
            }
            config.coverage.radius_m = radius;
        }
        if let Some(v) = section.get("fine_zoom") {
            config.coverage.fine_zoom = parse_zoom("coverage", "fine_zoom", v)?;
        }
        if let Some(v) = section.get("coarse_zoom") {
            config.coverage.coarse_zoom = parse_zoom("coverage", "coarse_zoom", v)?;
        }
        if let Some(v) = section.get("quadrant_segments") {
            let segments: u32 = v.trim().parse().map_err(|_| {
                invalid("coverage", "quadrant_segments", v, "must be a positive integer")
            })?;
            if segments == 0 {
                return Err(invalid(
                    "coverage",
                    "quadrant_segments",
                    v,
                    "must be a positive integer",
                ));
            }
            config.coverage.quadrant_segments = segments;
        }
    }

    if config.coverage.coarse_zoom > config.coverage.fine_zoom {
        return Err(invalid(
            "coverage",
            "coarse_zoom",
            &config.coverage.coarse_zoom.to_string(),
            &format!(
                "must not exceed fine_zoom ({})",
                config.coverage.fine_zoom
            ),
        ));
    }

    // [catalog] section
    if let Some(section) = ini.section(Some("catalog")) {
        if let Some(v) = section.get("path") {
            config.catalog.path = optional_text(v).map(|p| expand_tilde(&p));
        }
        if let Some(v) = section.get("delimiter") {
            config.catalog.delimiter = parse_delimiter(v).ok_or_else(|| {
                invalid(
                    "catalog",
                    "delimiter",
                    v,
                    "must be a single character, 'tab' or 'pipe'",
                )
            })?;
        }
        if let Some(v) = section.get("country") {
            config.catalog.country = optional_text(v);
        }
        if let Some(v) = section.get("type") {
            config.catalog.kind = optional_text(v);
        }
    }

    // [targets] section
    if let Some(section) = ini.section(Some("targets")) {
        if let Some(v) = section.get("select") {
            config.targets.selectors =
                parse_selectors(v).map_err(|reason| invalid("targets", "select", v, &reason))?;
        }
    }

    // [download] section
    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = section.get("enabled") {
            config.download.enabled = parse_bool("download", "enabled", v)?;
        }
        if let Some(v) = section.get("start") {
            config.download.start = match optional_text(v) {
                Some(text) => Some(parse_date(&text).map_err(|_| {
                    invalid("download", "start", v, "expected a date like 2021-07-01")
                })?),
                None => None,
            };
        }
        if let Some(v) = section.get("end") {
            config.download.end = match optional_text(v) {
                Some(text) => Some(parse_date(&text).map_err(|_| {
                    invalid("download", "end", v, "expected a date like 2021-08-31")
                })?),
                None => None,
            };
        }
        if let Some(v) = section.get("bucket") {
            let v = v.trim();
            if v.is_empty() {
                return Err(invalid("download", "bucket", v, "must not be empty"));
            }
            config.download.bucket = v.to_string();
        }
        if let Some(v) = section.get("url_template") {
            let template = UrlTemplate::new(v.trim())
                .map_err(|e| invalid("download", "url_template", v, &e.to_string()))?;
            config.download.url_template = template.as_str().to_string();
        }
        if let Some(v) = section.get("timeout") {
            let timeout: u64 = v.trim().parse().map_err(|_| {
                invalid("download", "timeout", v, "must be a positive integer (seconds)")
            })?;
            if timeout == 0 {
                return Err(invalid(
                    "download",
                    "timeout",
                    v,
                    "must be a positive integer (seconds)",
                ));
            }
            config.download.timeout_secs = timeout;
        }
    }

    if let (Some(start), Some(end)) = (config.download.start, config.download.end) {
        if start > end {
            return Err(invalid(
                "download",
                "end",
                &end.to_string(),
                &format!("must not be before start ({})", start),
            ));
        }
    }

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.output.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("quadkey_list") {
            config.output.quadkey_list = optional_text(v).map(|p| expand_tilde(&p));
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// Expand `~` to home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
