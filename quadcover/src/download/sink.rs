//! Filesystem output.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

use super::records::ActivityTable;
use super::DownloadError;
use crate::coverage::CoverageSet;

/// File name of the merged table, directly under the sink root.
pub const COMBINED_FILE_NAME: &str = "activity.csv";

/// Writes downloaded tables under a root directory.
///
/// Layout: `<root>/<YYYY>/<MM>/<DD>/<quadkey>.csv`, plus the merged
/// `<root>/activity.csv`.
#[derive(Debug, Clone)]
pub struct FileSink {
    root: PathBuf,
}

impl FileSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a table for `date` and `quadkey` is written to.
    pub fn path_for(&self, date: NaiveDate, quadkey: &str) -> PathBuf {
        self.root
            .join(format!("{:04}", date.year()))
            .join(format!("{:02}", date.month()))
            .join(format!("{:02}", date.day()))
            .join(format!("{}.csv", quadkey))
    }

    /// Writes `table` as CSV, creating parent directories.
    ///
    /// Returns the path written and its size in bytes.
    pub fn write_table(
        &self,
        date: NaiveDate,
        quadkey: &str,
        table: &ActivityTable,
    ) -> Result<(PathBuf, u64), DownloadError> {
        write_csv(self.path_for(date, quadkey), table)
    }

    /// Writes the merged table of a batch to `<root>/activity.csv`.
    pub fn write_combined(&self, table: &ActivityTable) -> Result<(PathBuf, u64), DownloadError> {
        write_csv(self.root.join(COMBINED_FILE_NAME), table)
    }
}

fn write_csv(path: PathBuf, table: &ActivityTable) -> Result<(PathBuf, u64), DownloadError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let csv = table.to_csv();
    fs::write(&path, csv.as_bytes())?;
    Ok((path, csv.len() as u64))
}

/// Writes one quadkey per line, in set order.
pub fn write_quadkey_list(path: &Path, quadkeys: &CoverageSet) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(fs::File::create(path)?);
    for quadkey in quadkeys {
        writeln!(writer, "{}", quadkey)?;
    }
    writer.flush()
}
