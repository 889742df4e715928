//! Run parameters.

use std::path::PathBuf;

use crate::catalog::{CatalogFilter, TargetSelector};
use crate::config::ConfigFile;
use crate::coord::{MAX_ZOOM, MIN_ZOOM};
use crate::download::{DateRange, UrlTemplate};
use crate::geodesic::DiscApproximation;

use super::PipelineError;

/// Where targets named by code or name are looked up.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSource {
    pub path: PathBuf,
    pub delimiter: char,
    pub filter: CatalogFilter,
}

/// What to download once coverage is known.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadPlan {
    pub dates: DateRange,
    pub bucket: String,
    pub template: UrlTemplate,
    pub timeout_secs: u64,
}

/// Everything one pipeline run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub targets: Vec<TargetSelector>,
    pub catalog: Option<CatalogSource>,
    pub radius_m: f64,
    pub fine_zoom: u8,
    pub coarse_zoom: u8,
    pub approximation: DiscApproximation,
    /// Root of the downloaded file tree
    pub output_dir: PathBuf,
    /// Where the merged fine quadkey list is written
    pub quadkey_list: PathBuf,
    /// `None` stops after coverage
    pub download: Option<DownloadPlan>,
}

impl RunRequest {
    /// Builds a request from a loaded configuration.
    ///
    /// Download is planned only when enabled and both dates are set.
    pub fn from_config(config: &ConfigFile) -> Result<Self, PipelineError> {
        let catalog = config.catalog.path.as_ref().map(|path| CatalogSource {
            path: path.clone(),
            delimiter: config.catalog.delimiter,
            filter: CatalogFilter {
                country: config.catalog.country.clone(),
                kind: config.catalog.kind.clone(),
            },
        });

        let download = if config.download.enabled {
            let (start, end) = match (config.download.start, config.download.end) {
                (Some(start), Some(end)) => (start, end),
                _ => {
                    return Err(PipelineError::InvalidRequest(
                        "download is enabled but start or end date is missing".to_string(),
                    ))
                }
            };
            Some(DownloadPlan {
                dates: DateRange::new(start, end)?,
                bucket: config.download.bucket.clone(),
                template: UrlTemplate::new(config.download.url_template.clone())?,
                timeout_secs: config.download.timeout_secs,
            })
        } else {
            None
        };

        Ok(Self {
            targets: config.targets.selectors.clone(),
            catalog,
            radius_m: config.coverage.radius_m,
            fine_zoom: config.coverage.fine_zoom,
            coarse_zoom: config.coverage.coarse_zoom,
            approximation: DiscApproximation::new(config.coverage.quadrant_segments),
            output_dir: config.output.directory.clone(),
            quadkey_list: config
                .output
                .quadkey_list_path(config.coverage.fine_zoom),
            download,
        })
    }

    /// Checks the parameters that do not depend on any target.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.targets.is_empty() {
            return Err(PipelineError::NoTargets);
        }
        if !self.radius_m.is_finite() || self.radius_m <= 0.0 {
            return Err(PipelineError::InvalidRequest(format!(
                "radius must be positive, got {}",
                self.radius_m
            )));
        }
        for zoom in [self.fine_zoom, self.coarse_zoom] {
            if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
                return Err(PipelineError::InvalidRequest(format!(
                    "zoom {} outside {}..={}",
                    zoom, MIN_ZOOM, MAX_ZOOM
                )));
            }
        }
        if self.coarse_zoom > self.fine_zoom {
            return Err(PipelineError::InvalidRequest(format!(
                "coarse zoom {} is finer than fine zoom {}",
                self.coarse_zoom, self.fine_zoom
            )));
        }
        Ok(())
    }

    /// Whether any selector needs the catalogue.
    pub fn needs_catalog(&self) -> bool {
        self.targets
            .iter()
            .any(|t| !matches!(t, TargetSelector::Point { .. }))
    }
}
