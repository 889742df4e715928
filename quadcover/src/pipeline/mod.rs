//! End-to-end run: targets → coverage → download.
//!
//! ```text
//! selectors ──► catalogue lookup ──► targets
//!                                       │ (parallel, one per target)
//!                                       ▼
//!                              fine coverage ──► coarse keys (truncation)
//!                                       │                  │
//!                                       ▼                  ▼
//!                              merged fine list     merged coarse set
//!                              (written to disk)           │
//!                                                          ▼
//!                                         sequential download per key × day
//!                                                          │
//!                                                          ▼
//!                                          merged table, sorted by day and key
//! ```

mod request;

pub use request::{CatalogSource, DownloadPlan, RunRequest};

use std::path::PathBuf;

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogError, Target};
use crate::coverage::{CoverageComputer, CoverageError, CoverageSet};
use crate::download::{
    write_quadkey_list, ActivityDownloader, DownloadError, DownloadReport, FileSink, HttpClient,
};

/// Errors from a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No targets to cover")]
    NoTargets,

    #[error("Invalid run request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Coverage failed for {target}: {source}")]
    Coverage {
        target: String,
        source: CoverageError,
    },

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Coverage of one target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetCoverage {
    pub target: Target,
    pub fine: CoverageSet,
    pub coarse: CoverageSet,
}

/// Result of [`plan`]: per-target coverage and the merged sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoveragePlan {
    pub targets: Vec<TargetCoverage>,
    /// Union of every target's fine set
    pub fine: CoverageSet,
    /// Union of every target's coarse keys; each downloaded once
    pub coarse: CoverageSet,
    /// Where the fine list was written
    pub quadkey_list: PathBuf,
}

/// Result of [`run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub plan: CoveragePlan,
    pub download: Option<DownloadReport>,
}

/// Resolves targets and computes their coverage.
///
/// Each target is computed independently on the rayon pool. The merged
/// fine set is written to `request.quadkey_list`.
pub fn plan(request: &RunRequest) -> Result<CoveragePlan, PipelineError> {
    request.validate()?;

    let catalog = match (&request.catalog, request.needs_catalog()) {
        (Some(source), true) => {
            let catalog = Catalog::from_path(&source.path, source.delimiter)?;
            let filtered = catalog.filter(&source.filter);
            debug!(
                loaded = catalog.len(),
                kept = filtered.len(),
                "Filtered catalogue"
            );
            Some(filtered)
        }
        _ => None,
    };

    let targets = request
        .targets
        .iter()
        .map(|selector| selector.resolve(catalog.as_ref()))
        .collect::<Result<Vec<Target>, CatalogError>>()?;

    let computer = CoverageComputer::new(request.approximation);
    let coverages = targets
        .into_par_iter()
        .map(|target| {
            let to_error = |source| PipelineError::Coverage {
                target: target.label.clone(),
                source,
            };
            let fine = computer
                .compute(target.location, request.radius_m, request.fine_zoom)
                .map_err(to_error)?;
            let coarse = fine.coarsen(request.coarse_zoom).map_err(to_error)?;
            info!(
                target = %target.label,
                fine = fine.len(),
                coarse = coarse.len(),
                "Computed target coverage"
            );
            Ok(TargetCoverage {
                target,
                fine,
                coarse,
            })
        })
        .collect::<Result<Vec<TargetCoverage>, PipelineError>>()?;

    let merge_error = |source| PipelineError::Coverage {
        target: "merged".to_string(),
        source,
    };
    let mut fine = CoverageSet::new(request.fine_zoom).map_err(merge_error)?;
    let mut coarse = CoverageSet::new(request.coarse_zoom).map_err(merge_error)?;
    for coverage in &coverages {
        fine.merge(&coverage.fine).map_err(merge_error)?;
        coarse.merge(&coverage.coarse).map_err(merge_error)?;
    }

    write_quadkey_list(&request.quadkey_list, &fine).map_err(|source| PipelineError::Write {
        path: request.quadkey_list.clone(),
        source,
    })?;

    info!(
        targets = coverages.len(),
        fine = fine.len(),
        coarse = coarse.len(),
        list = %request.quadkey_list.display(),
        "Coverage plan ready"
    );

    Ok(CoveragePlan {
        targets: coverages,
        fine,
        coarse,
        quadkey_list: request.quadkey_list.clone(),
    })
}

/// Downloads every coarse key of `plan` over the request's date range.
///
/// `progress` receives (completed, total) after each file. The report
/// carries every row merged into one table, also written to
/// `<output_dir>/activity.csv`.
pub fn download<C, F>(
    request: &RunRequest,
    plan: &CoveragePlan,
    client: C,
    progress: F,
) -> Result<DownloadReport, PipelineError>
where
    C: HttpClient,
    F: FnMut(usize, usize),
{
    let download = request.download.as_ref().ok_or_else(|| {
        PipelineError::InvalidRequest("no download is configured".to_string())
    })?;

    let downloader = ActivityDownloader::new(client, FileSink::new(&request.output_dir))
        .with_template(download.template.clone())
        .with_bucket(download.bucket.clone())
        .with_zooms(request.fine_zoom, request.coarse_zoom)?;

    Ok(downloader.download_all_with_progress(&download.dates, &plan.coarse, progress)?)
}

/// Plans, then downloads if the request asks for it.
pub fn run<C: HttpClient>(request: &RunRequest, client: C) -> Result<RunReport, PipelineError> {
    let plan = plan(request)?;
    let download = match request.download {
        Some(_) => Some(download(request, &plan, client, |_, _| {})?),
        None => None,
    };
    Ok(RunReport { plan, download })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogFilter, TargetSelector};
    use crate::download::{DateRange, MockHttpClient, UrlTemplate, DEFAULT_BUCKET};
    use crate::geodesic::DiscApproximation;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    const AIRPORTS: &str = "\
ident,type,name,latitude_deg,longitude_deg,iso_country,iso_region,iata_code
KSFO,large_airport,San Francisco International Airport,37.619,-122.375,US,US-CA,SFO
KDEN,large_airport,Denver International Airport,39.8617,-104.673,US,US-CO,DEN
CYYZ,large_airport,Toronto Pearson International Airport,43.6772,-79.6306,CA,CA-ON,YYZ
";

    fn request(temp: &TempDir, targets: &[&str]) -> RunRequest {
        let catalog_path = temp.path().join("airports.csv");
        std::fs::write(&catalog_path, AIRPORTS).unwrap();

        RunRequest {
            targets: targets.iter().map(|t| t.parse().unwrap()).collect(),
            catalog: Some(CatalogSource {
                path: catalog_path,
                delimiter: ',',
                filter: CatalogFilter::new().country("US").kind("large_airport"),
            }),
            radius_m: 1_000.0,
            fine_zoom: 14,
            coarse_zoom: 7,
            approximation: DiscApproximation::default(),
            output_dir: temp.path().join("out"),
            quadkey_list: temp.path().join("out").join("z14.txt"),
            download: None,
        }
    }

    #[test]
    fn test_plan_resolves_and_merges() {
        let temp = TempDir::new().unwrap();
        let request = request(&temp, &["SFO", "name:Denver"]);

        let plan = plan(&request).unwrap();

        assert_eq!(plan.targets.len(), 2);
        assert_eq!(plan.targets[0].target.label, "SFO");
        assert_eq!(plan.targets[1].target.label, "DEN");
        assert_eq!(
            plan.fine.len(),
            plan.targets[0].fine.len() + plan.targets[1].fine.len()
        );
        for coverage in &plan.targets {
            for quadkey in &coverage.fine {
                assert!(plan.coarse.contains(&quadkey.truncate(7).unwrap()));
            }
        }

        let list = std::fs::read_to_string(&plan.quadkey_list).unwrap();
        assert_eq!(list.lines().count(), plan.fine.len());
        assert!(list.lines().all(|l| l.len() == 14));
    }

    #[test]
    fn test_filtered_out_target_not_found() {
        let temp = TempDir::new().unwrap();
        let request = request(&temp, &["YYZ"]);

        assert!(matches!(
            plan(&request),
            Err(PipelineError::Catalog(CatalogError::TargetNotFound(_)))
        ));
    }

    #[test]
    fn test_point_targets_skip_missing_catalog() {
        let temp = TempDir::new().unwrap();
        let mut request = request(&temp, &["home=43.65,-79.38"]);
        request.catalog = Some(CatalogSource {
            path: temp.path().join("missing.csv"),
            delimiter: ',',
            filter: CatalogFilter::new(),
        });

        let plan = plan(&request).unwrap();
        assert_eq!(plan.targets[0].target.label, "home");
    }

    #[test]
    fn test_pole_target_reports_coverage_error() {
        let temp = TempDir::new().unwrap();
        let request = request(&temp, &["pole=90,0"]);

        match plan(&request) {
            Err(PipelineError::Coverage { target, source }) => {
                assert_eq!(target, "pole");
                assert!(matches!(source, CoverageError::ProjectionFailure(_)));
            }
            other => panic!("expected coverage error, got {:?}", other),
        }
    }

    #[test]
    fn test_run_downloads_coarse_keys() {
        let temp = TempDir::new().unwrap();
        let mut request = request(&temp, &["SFO"]);
        let day = NaiveDate::from_ymd_opt(2021, 7, 1).unwrap();
        request.download = Some(DownloadPlan {
            dates: DateRange::new(day, day).unwrap(),
            bucket: DEFAULT_BUCKET.to_string(),
            template: UrlTemplate::default(),
            timeout_secs: 5,
        });

        let coverage = plan(&request).unwrap();
        let mut client = MockHttpClient::new();
        for quadkey in &coverage.coarse {
            let url = UrlTemplate::default().render(DEFAULT_BUCKET, day, quadkey.as_str());
            client = client.with_body(&url, "activity_index_total|geography\n0.5|1\n");
        }

        let report = run(&request, &client).unwrap();
        let download = report.download.unwrap();

        assert_eq!(download.files_written, coverage.coarse.len());
        assert_eq!(
            download.combined_path,
            Some(temp.path().join("out").join("activity.csv"))
        );
        assert_eq!(download.combined.unwrap().len(), coverage.coarse.len());
        assert_eq!(client.requests().len(), coverage.coarse.len());
        let first = coverage.coarse.iter().next().unwrap();
        assert!(temp
            .path()
            .join("out/2021/07/01")
            .join(format!("{}.csv", first))
            .exists());
    }

    #[test]
    fn test_download_without_plan_fails() {
        let temp = TempDir::new().unwrap();
        let request = request(&temp, &["SFO"]);
        let coverage = plan(&request).unwrap();

        let result = download(&request, &coverage, MockHttpClient::new(), |_, _| {});
        assert!(matches!(result, Err(PipelineError::InvalidRequest(_))));
    }

    #[test]
    fn test_run_without_download_makes_no_requests() {
        let temp = TempDir::new().unwrap();
        let request = request(&temp, &["DEN"]);
        let client = MockHttpClient::new();

        let report = run(&request, &client).unwrap();
        assert!(report.download.is_none());
        assert!(client.requests().is_empty());
        assert!(matches!(
            request.targets[0],
            TargetSelector::Iata(ref code) if code == "DEN"
        ));
    }
}
