//! Integration tests for the coverage and download pipeline.
//!
//! These tests drive the public API end to end:
//! - config.ini → RunRequest → coverage plan → quadkey list
//! - catalogue lookup with the country/type filter
//! - sequential download into the dated file tree, aborting on failure
//!
//! Run with: `cargo test --test pipeline_integration`

use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDate;
use tempfile::TempDir;

use quadcover::config::ConfigFile;
use quadcover::download::{DownloadError, HttpClient};
use quadcover::pipeline::{self, PipelineError, RunRequest};

// ============================================================================
// Helper Functions
// ============================================================================

const AIRPORTS: &str = "\
\"id\",\"ident\",\"type\",\"name\",\"latitude_deg\",\"longitude_deg\",\"iso_country\",\"iso_region\",\"iata_code\"
3384,\"KSFO\",\"large_airport\",\"San Francisco International Airport\",37.618999,-122.375,\"US\",\"US-CA\",\"SFO\"
3486,\"KDEN\",\"large_airport\",\"Denver International Airport\",39.861698,-104.672997,\"US\",\"US-CO\",\"DEN\"
3632,\"KLAX\",\"large_airport\",\"Los Angeles International Airport\",33.942501,-118.407997,\"US\",\"US-CA\",\"LAX\"
20891,\"KDVT\",\"small_airport\",\"Phoenix Deer Valley Airport\",33.6883,-112.083,\"US\",\"US-AZ\",\"DVT\"
";

/// Serves a one-row activity file for every coarse quadkey, optionally
/// failing once a request budget is spent.
struct StubClient {
    fine_zoom: usize,
    fail_after: Option<usize>,
    requests: Mutex<Vec<String>>,
}

impl StubClient {
    fn new(fine_zoom: u8) -> Self {
        Self {
            fine_zoom: fine_zoom as usize,
            fail_after: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn failing_after(fine_zoom: u8, successes: usize) -> Self {
        Self {
            fail_after: Some(successes),
            ..Self::new(fine_zoom)
        }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for StubClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let mut requests = self.requests.lock().unwrap();
        if self.fail_after.is_some_and(|limit| requests.len() >= limit) {
            requests.push(url.to_string());
            return Err(DownloadError::Status {
                status: 503,
                url: url.to_string(),
            });
        }
        requests.push(url.to_string());

        let coarse = url
            .rsplit('/')
            .next()
            .and_then(|name| name.strip_suffix(".csv"))
            .unwrap_or_default();
        let fine = format!("{:0<width$}", coarse, width = self.fine_zoom);
        let geography = fine.trim_start_matches('0');
        Ok(format!(
            "agg_day_period|activity_index_total|geography\n2021-07-01|0.25|{}\n",
            geography
        )
        .into_bytes())
    }
}

/// Writes a config whose catalogue and outputs live in `dir`, then loads
/// it back through the INI parser.
fn write_config(dir: &Path, edit: impl FnOnce(&mut ConfigFile)) -> ConfigFile {
    let catalog_path = dir.join("airports.csv");
    std::fs::write(&catalog_path, AIRPORTS).unwrap();

    let mut config = ConfigFile::default();
    config.catalog.path = Some(catalog_path);
    config.output.directory = dir.join("sample_data");
    config.logging.file = dir.join("quadcover.log");
    config.download.start = NaiveDate::from_ymd_opt(2021, 7, 1);
    config.download.end = NaiveDate::from_ymd_opt(2021, 7, 2);
    edit(&mut config);

    let config_path = dir.join("config.ini");
    config.save_to(&config_path).unwrap();
    ConfigFile::load_from(&config_path).unwrap()
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Coverage
// ============================================================================

#[test]
fn test_default_targets_write_fine_quadkey_list() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), |c| c.download.enabled = false);
    let request = RunRequest::from_config(&config).unwrap();

    let plan = pipeline::plan(&request).unwrap();

    let labels: Vec<&str> = plan.targets.iter().map(|t| t.target.label.as_str()).collect();
    assert_eq!(labels, vec!["SFO", "DEN"]);

    let list = read_lines(&temp.path().join("sample_data").join("z18_quadkeys.txt"));
    assert_eq!(list.len(), plan.fine.len());
    assert!(list.iter().all(|qk| qk.len() == 18));
    assert!(list.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_small_airports_are_filtered_out() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), |c| {
        c.download.enabled = false;
        c.targets.selectors = vec!["DVT".parse().unwrap()];
    });
    let request = RunRequest::from_config(&config).unwrap();

    assert!(matches!(
        pipeline::plan(&request),
        Err(PipelineError::Catalog(_))
    ));
}

#[test]
fn test_coarse_keys_are_prefixes_of_fine_keys() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), |c| {
        c.download.enabled = false;
        c.coverage.radius_m = 20_000.0;
        c.coverage.fine_zoom = 12;
        c.targets.selectors = vec!["LAX".parse().unwrap()];
    });
    let request = RunRequest::from_config(&config).unwrap();

    let plan = pipeline::plan(&request).unwrap();

    let prefixes: std::collections::BTreeSet<&str> =
        plan.fine.iter().map(|qk| &qk.as_str()[..7]).collect();
    let coarse: std::collections::BTreeSet<&str> =
        plan.coarse.iter().map(|qk| qk.as_str()).collect();
    assert_eq!(prefixes, coarse);
}

// ============================================================================
// Download
// ============================================================================

#[test]
fn test_run_downloads_every_coarse_key_for_every_day() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), |c| {
        c.targets.selectors = vec!["SFO".parse().unwrap()];
    });
    let request = RunRequest::from_config(&config).unwrap();
    let client = StubClient::new(18);

    let report = pipeline::run(&request, &client).unwrap();
    let download = report.download.unwrap();

    let coarse = &report.plan.coarse;
    assert_eq!(download.files_written, coarse.len() * 2);
    assert_eq!(client.requests().len(), coarse.len() * 2);

    let first = coarse.iter().next().unwrap();
    for day in ["01", "02"] {
        let path = temp
            .path()
            .join("sample_data/2021/07")
            .join(day)
            .join(format!("{}.csv", first));
        let lines = read_lines(&path);
        assert_eq!(
            lines[0],
            "agg_day_period,activity_index_total,geography,z18_quadkey,z7_quadkey"
        );
        let fields: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(fields[3].len(), 18);
        assert_eq!(fields[4], first.as_str());
    }

    let combined = download.combined.unwrap();
    assert_eq!(combined.len(), coarse.len() * 2);
    let merged = read_lines(&temp.path().join("sample_data").join("activity.csv"));
    assert_eq!(merged.len(), combined.len() + 1);
    assert_eq!(download.combined_path, Some(temp.path().join("sample_data/activity.csv")));
}

#[test]
fn test_download_stops_at_first_failure() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), |c| {
        c.targets.selectors = vec!["home=37.7749,-122.4194".parse().unwrap()];
    });
    let request = RunRequest::from_config(&config).unwrap();
    let client = StubClient::failing_after(18, 1);

    let result = pipeline::run(&request, &client);

    assert!(matches!(
        result,
        Err(PipelineError::Download(DownloadError::Status { status: 503, .. }))
    ));
    assert_eq!(client.requests().len(), 2);

    let written: Vec<_> = walk_csv(&temp.path().join("sample_data"));
    assert_eq!(written.len(), 1);
}

fn walk_csv(dir: &Path) -> Vec<std::path::PathBuf> {
    let mut found = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return found;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            found.extend(walk_csv(&path));
        } else if path.extension().is_some_and(|ext| ext == "csv") {
            found.push(path);
        }
    }
    found
}
