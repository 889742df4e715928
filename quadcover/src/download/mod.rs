//! Activity data download.
//!
//! For each coarse quadkey and each day in a date range, fetches the
//! remote daily activity file, adds padded quadkey columns and writes it
//! under a local root. Downloads run one at a time; any failure ends the
//! batch.
//!
//! The network sits behind [`HttpClient`], so tests substitute a canned
//! client for [`ReqwestClient`].

mod dates;
mod downloader;
mod http;
mod records;
mod sink;
mod url;

pub use dates::{parse_date, DateRange, DATE_FORMAT};
pub use downloader::{
    ActivityDownloader, DownloadReport, DEFAULT_COARSE_ZOOM, DEFAULT_FINE_ZOOM,
};
pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use records::{ActivityTable, ACTIVITY_COLUMN, DAY_COLUMN, GEOGRAPHY_COLUMN};
pub use sink::{write_quadkey_list, FileSink, COMBINED_FILE_NAME};
pub use url::{UrlTemplate, DEFAULT_BUCKET, DEFAULT_URL_TEMPLATE};

#[cfg(test)]
pub(crate) use http::tests::MockHttpClient;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors from fetching, parsing or storing activity files.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Transport failure or client construction error
    #[error("HTTP error: {0}")]
    Http(String),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Invalid URL template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("Invalid date {0}")]
    InvalidDate(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Coarse zoom {coarse} must be between 1 and fine zoom {fine}")]
    ZoomOrder { fine: u8, coarse: u8 },

    #[error("Activity file has no '{0}' column")]
    MissingColumn(String),

    /// Activity files in one batch disagree on their header
    #[error("Activity file columns '{found}' do not match '{expected}'")]
    ColumnMismatch { expected: String, found: String },

    #[error("Invalid activity record at line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
