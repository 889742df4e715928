//! Cover command - quadkeys of one disc.

use quadcover::config::ConfigFile;
use quadcover::coord::GeoPoint;
use quadcover::coverage::{CoverageComputer, CoverageSet};
use quadcover::geodesic::DiscApproximation;
use serde_json::json;

use super::common::OutputFormat;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the cover command.
///
/// Unset values fall back to the `[coverage]` section of the config.
pub struct CoverArgs {
    pub lat: f64,
    pub lon: f64,
    pub radius: Option<f64>,
    pub zoom: Option<u8>,
    pub coarse_zoom: Option<u8>,
    pub segments: Option<u32>,
    pub format: OutputFormat,
    pub debug: bool,
}

/// Coverage of one disc, plus its coarse keys when requested.
struct Coverage {
    center: GeoPoint,
    radius_m: f64,
    fine: CoverageSet,
    coarse: Option<CoverageSet>,
}

/// Run the cover command.
pub fn run(args: CoverArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_config(None, args.debug)?;
    runner.log_startup("cover");

    let coverage = compute(&args, runner.config())?;
    print!("{}", render(&coverage, args.format)?);
    Ok(())
}

fn compute(args: &CoverArgs, config: &ConfigFile) -> Result<Coverage, CliError> {
    let center = GeoPoint::new(args.lat, args.lon)
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    let radius_m = args.radius.unwrap_or(config.coverage.radius_m);
    let zoom = args.zoom.unwrap_or(config.coverage.fine_zoom);
    let segments = args
        .segments
        .unwrap_or(config.coverage.quadrant_segments);

    let computer = CoverageComputer::new(DiscApproximation::new(segments));
    let fine = computer.compute(center, radius_m, zoom)?;
    let coarse = match args.coarse_zoom {
        Some(coarse_zoom) => Some(fine.coarsen(coarse_zoom)?),
        None => None,
    };

    tracing::info!(
        lat = center.lat(),
        lon = center.lon(),
        radius_m,
        zoom,
        quadkeys = fine.len(),
        "Coverage computed"
    );

    Ok(Coverage {
        center,
        radius_m,
        fine,
        coarse,
    })
}

fn render(coverage: &Coverage, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for quadkey in &coverage.fine {
                out.push_str(quadkey.as_str());
                out.push('\n');
            }
            if let Some(coarse) = &coverage.coarse {
                out.push('\n');
                for quadkey in coarse {
                    out.push_str(quadkey.as_str());
                    out.push('\n');
                }
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let value = json!({
                "center": coverage.center,
                "radius_m": coverage.radius_m,
                "fine": coverage.fine,
                "coarse": coverage.coarse,
            });
            let mut out = serde_json::to_string_pretty(&value)?;
            out.push('\n');
            Ok(out)
        }
    }
}
