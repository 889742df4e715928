//! Remote file URL templates.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use super::DownloadError;

/// Bucket hosting the daily activity files.
pub const DEFAULT_BUCKET: &str = "mapbox-movement-uni-toronto-shared";

/// Layout of the daily activity files, one per coarse quadkey per day.
pub const DEFAULT_URL_TEMPLATE: &str = "https://{bucket}.s3.amazonaws.com/v0.2/daily-24h/v0.1.2/US/quadkey/total/{year}/{month}/{day}/data/{quadkey}.csv";

const PLACEHOLDERS: &[&str] = &["bucket", "year", "month", "day", "date", "quadkey"];

/// A URL pattern with `{name}` placeholders.
///
/// Recognised names are `bucket`, `year`, `month` and `day` (zero-padded),
/// `date` (`YYYY-MM-DD`) and `quadkey`, which is mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    template: String,
}

impl UrlTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self, DownloadError> {
        let template = template.into();
        let invalid = |reason: String| DownloadError::InvalidTemplate {
            template: template.clone(),
            reason,
        };

        let mut rest = template.as_str();
        let mut has_quadkey = false;
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| invalid("unclosed '{'".to_string()))?;
            let name = &after[..close];
            if !PLACEHOLDERS.contains(&name) {
                return Err(invalid(format!("unknown placeholder '{{{}}}'", name)));
            }
            has_quadkey |= name == "quadkey";
            rest = &after[close + 1..];
        }

        if !has_quadkey {
            return Err(invalid("missing '{quadkey}'".to_string()));
        }

        Ok(Self { template })
    }

    /// Builds the URL for one file.
    pub fn render(&self, bucket: &str, date: NaiveDate, quadkey: &str) -> String {
        self.template
            .replace("{bucket}", bucket)
            .replace("{year}", &format!("{:04}", date.year()))
            .replace("{month}", &format!("{:02}", date.month()))
            .replace("{day}", &format!("{:02}", date.day()))
            .replace("{date}", &date.format("%Y-%m-%d").to_string())
            .replace("{quadkey}", quadkey)
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl Default for UrlTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_URL_TEMPLATE.to_string(),
        }
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}
