//! Sequential activity file download.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::dates::DateRange;
use super::http::HttpClient;
use super::records::ActivityTable;
use super::sink::FileSink;
use super::url::{UrlTemplate, DEFAULT_BUCKET};
use super::DownloadError;
use crate::coverage::CoverageSet;

/// Default zoom of the `z{fine}_quadkey` column.
pub const DEFAULT_FINE_ZOOM: u8 = 18;

/// Default zoom of the download grouping key.
pub const DEFAULT_COARSE_ZOOM: u8 = 7;

/// Totals for a finished download batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DownloadReport {
    pub files_written: usize,
    pub rows: usize,
    pub bytes: u64,
    pub paths: Vec<PathBuf>,
    /// Every downloaded row, sorted by day then fine quadkey
    pub combined: Option<ActivityTable>,
    /// Where `combined` was written
    pub combined_path: Option<PathBuf>,
}

/// Fetches one activity file per (coarse quadkey, day) and writes each
/// to a [`FileSink`], then writes all rows merged into one table.
///
/// Requests are issued one at a time. The first failure ends the batch;
/// files written before it stay on disk.
pub struct ActivityDownloader<C: HttpClient> {
    client: C,
    sink: FileSink,
    template: UrlTemplate,
    bucket: String,
    fine_zoom: u8,
    coarse_zoom: u8,
}

impl<C: HttpClient> ActivityDownloader<C> {
    pub fn new(client: C, sink: FileSink) -> Self {
        Self {
            client,
            sink,
            template: UrlTemplate::default(),
            bucket: DEFAULT_BUCKET.to_string(),
            fine_zoom: DEFAULT_FINE_ZOOM,
            coarse_zoom: DEFAULT_COARSE_ZOOM,
        }
    }

    pub fn with_template(mut self, template: UrlTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Sets the zooms of the derived quadkey columns.
    pub fn with_zooms(mut self, fine: u8, coarse: u8) -> Result<Self, DownloadError> {
        if coarse == 0 || coarse > fine {
            return Err(DownloadError::ZoomOrder { fine, coarse });
        }
        self.fine_zoom = fine;
        self.coarse_zoom = coarse;
        Ok(self)
    }

    pub fn sink(&self) -> &FileSink {
        &self.sink
    }

    /// Downloads every quadkey for every day in `dates`.
    pub fn download_all(
        &self,
        dates: &DateRange,
        quadkeys: &CoverageSet,
    ) -> Result<DownloadReport, DownloadError> {
        self.download_all_with_progress(dates, quadkeys, |_, _| {})
    }

    /// Same as [`download_all`](Self::download_all), calling `progress`
    /// with (completed, total) after each file is written.
    pub fn download_all_with_progress<F>(
        &self,
        dates: &DateRange,
        quadkeys: &CoverageSet,
        mut progress: F,
    ) -> Result<DownloadReport, DownloadError>
    where
        F: FnMut(usize, usize),
    {
        let total = quadkeys.len() * dates.len();
        let mut report = DownloadReport::default();
        let mut combined: Option<ActivityTable> = None;

        info!(
            quadkeys = quadkeys.len(),
            days = dates.len(),
            total,
            start = %dates.start(),
            end = %dates.end(),
            "Starting download"
        );

        for quadkey in quadkeys {
            for date in dates.days() {
                let url = self.template.render(&self.bucket, date, quadkey.as_str());
                debug!(quadkey = %quadkey, %date, url = %url, "Fetching activity file");

                let body = self.client.get(&url).map_err(|e| {
                    warn!(quadkey = %quadkey, %date, error = %e, "Download failed");
                    e
                })?;
                let table = ActivityTable::parse(&body, self.fine_zoom, self.coarse_zoom)?;
                let (path, bytes) = self.sink.write_table(date, quadkey.as_str(), &table)?;

                report.files_written += 1;
                report.rows += table.len();
                report.bytes += bytes;
                report.paths.push(path);

                combined = Some(match combined.take() {
                    Some(mut merged) => {
                        merged.append(table)?;
                        merged
                    }
                    None => table,
                });

                progress(report.files_written, total);
            }
        }

        if let Some(mut merged) = combined {
            merged.sort_by_day_and_quadkey();
            let (path, bytes) = self.sink.write_combined(&merged)?;
            info!(
                rows = merged.len(),
                bytes,
                path = %path.display(),
                "Wrote combined activity table"
            );
            report.combined = Some(merged);
            report.combined_path = Some(path);
        }

        info!(
            files = report.files_written,
            rows = report.rows,
            bytes = report.bytes,
            "Download complete"
        );

        Ok(report)
    }
}
