//! Run command - resolve targets, compute coverage and download activity files.

use std::path::PathBuf;

use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use quadcover::catalog::TargetSelector;
use quadcover::config::ConfigFile;
use quadcover::download::ReqwestClient;
use quadcover::pipeline::{self, RunRequest};
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the run command.
///
/// Anything set here overrides the config file.
pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub iata: Vec<String>,
    pub name: Vec<String>,
    pub point: Vec<TargetSelector>,
    pub radius: Option<f64>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub output: Option<PathBuf>,
    pub no_download: bool,
    pub debug: bool,
}

/// Run the run command.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let mut runner = CliRunner::with_config(args.config.as_deref(), args.debug)?;
    runner.log_startup("run");
    apply_overrides(runner.config_mut(), &args);

    let request = RunRequest::from_config(runner.config())?;

    println!("Computing coverage:");
    for target in &request.targets {
        println!("  {}", target);
    }
    println!(
        "  Radius: {} m, zoom {} (download key zoom {})",
        request.radius_m, request.fine_zoom, request.coarse_zoom
    );
    println!();

    let plan = pipeline::plan(&request)?;
    for coverage in &plan.targets {
        println!(
            "  {:<12} {:>8} quadkeys  {:>3} coarse",
            coverage.target.label,
            coverage.fine.len(),
            coverage.coarse.len()
        );
    }
    println!(
        "Wrote {} quadkeys to {}",
        plan.fine.len(),
        plan.quadkey_list.display()
    );

    let Some(download) = &request.download else {
        info!("Download disabled, stopping after coverage");
        return Ok(());
    };

    let client = ReqwestClient::with_timeout(download.timeout_secs)
        .map_err(|e| CliError::Pipeline(e.into()))?;
    let total = plan.coarse.len() * download.dates.len();
    println!();
    println!(
        "Downloading {} files ({} keys x {} days, {} to {})...",
        total,
        plan.coarse.len(),
        download.dates.len(),
        download.dates.start(),
        download.dates.end()
    );

    let progress = progress_bar(total as u64);
    let result = pipeline::download(&request, &plan, client, |completed, _| {
        progress.set_position(completed as u64);
    });
    progress.finish_and_clear();
    let report = result?;

    println!(
        "Downloaded {} files ({} rows, {} bytes) into {}",
        report.files_written,
        report.rows,
        report.bytes,
        request.output_dir.display()
    );
    if let Some(path) = &report.combined_path {
        println!("Combined table: {}", path.display());
    }
    Ok(())
}

fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    if let Ok(style) =
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} files [{elapsed_precise}]")
    {
        bar.set_style(style);
    }
    bar
}

/// Applies command-line values on top of the loaded config.
///
/// Target flags replace the configured selectors as a whole.
fn apply_overrides(config: &mut ConfigFile, args: &RunArgs) {
    let mut selectors: Vec<TargetSelector> = args
        .iata
        .iter()
        .map(|code| TargetSelector::Iata(code.trim().to_ascii_uppercase()))
        .collect();
    selectors.extend(
        args.name
            .iter()
            .map(|text| TargetSelector::NameContains(text.trim().to_string())),
    );
    selectors.extend(args.point.iter().cloned());
    if !selectors.is_empty() {
        config.targets.selectors = selectors;
    }

    if let Some(radius) = args.radius {
        config.coverage.radius_m = radius;
    }
    if let Some(start) = args.start {
        config.download.start = Some(start);
    }
    if let Some(end) = args.end {
        config.download.end = Some(end);
    }
    if let Some(output) = &args.output {
        config.output.directory = output.clone();
    }
    if args.no_download {
        config.download.enabled = false;
    }
}
