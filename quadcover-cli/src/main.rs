//! QuadCover CLI - Command-line interface
//!
//! Computes quadkey coverage around points of interest and downloads
//! activity files for the covering tiles.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use quadcover::catalog::TargetSelector;

use commands::common::{parse_date_arg, parse_point_arg, parse_radius_arg, OutputFormat};
use error::CliError;

#[derive(Parser)]
#[command(name = "quadcover")]
#[command(version)]
#[command(about = "Quadkey coverage around points of interest", long_about = None)]
struct Cli {
    /// Enable debug-level logging (overrides RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the quadkeys covering a disc around one point
    Cover {
        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Disc radius in metres (default: config)
        #[arg(long, value_parser = parse_radius_arg)]
        radius: Option<f64>,

        /// Zoom of the coverage set (default: config)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=23))]
        zoom: Option<u8>,

        /// Also print the coarse keys at this zoom
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=23))]
        coarse_zoom: Option<u8>,

        /// Polygon sides per quarter circle (default: config)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        segments: Option<u32>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Resolve targets, compute coverage and download activity files
    Run {
        /// Config file (default: ~/.quadcover/config.ini)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Airport by IATA code (repeatable)
        #[arg(long)]
        iata: Vec<String>,

        /// Airport whose name contains this text (repeatable)
        #[arg(long)]
        name: Vec<String>,

        /// Explicit point, `label=lat,lon` or `lat,lon` (repeatable)
        #[arg(long, value_parser = parse_point_arg, allow_hyphen_values = true)]
        point: Vec<TargetSelector>,

        /// Disc radius in metres
        #[arg(long, value_parser = parse_radius_arg)]
        radius: Option<f64>,

        /// First day to download (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        start: Option<NaiveDate>,

        /// Last day to download, inclusive (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        end: Option<NaiveDate>,

        /// Output directory for the quadkey list and downloaded files
        #[arg(long)]
        output: Option<PathBuf>,

        /// Stop after writing the quadkey list
        #[arg(long)]
        no_download: bool,
    },

    /// Write a default configuration file
    Init {
        /// Where to write it (default: ~/.quadcover/config.ini)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let debug = cli.debug;

    let result: Result<(), CliError> = match cli.command {
        Commands::Cover {
            lat,
            lon,
            radius,
            zoom,
            coarse_zoom,
            segments,
            format,
        } => commands::cover::run(commands::cover::CoverArgs {
            lat,
            lon,
            radius,
            zoom,
            coarse_zoom,
            segments,
            format,
            debug,
        }),
        Commands::Run {
            config,
            iata,
            name,
            point,
            radius,
            start,
            end,
            output,
            no_download,
        } => commands::run::run(commands::run::RunArgs {
            config,
            iata,
            name,
            point,
            radius,
            start,
            end,
            output,
            no_download,
            debug,
        }),
        Commands::Init { config, force } => {
            commands::init::run(commands::init::InitArgs { config, force })
        }
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cover_with_negative_longitude() {
        let cli = Cli::try_parse_from([
            "quadcover", "cover", "--lat", "37.6", "--lon", "-122.4", "--coarse-zoom", "7",
        ])
        .unwrap();
        match cli.command {
            Commands::Cover {
                lon, coarse_zoom, ..
            } => {
                assert_eq!(lon, -122.4);
                assert_eq!(coarse_zoom, Some(7));
            }
            _ => panic!("expected cover"),
        }
    }

    #[test]
    fn test_parse_run_overrides() {
        let cli = Cli::try_parse_from([
            "quadcover",
            "--debug",
            "run",
            "--iata",
            "SFO",
            "--point",
            "home=43.65,-79.38",
            "--start",
            "2021-07-01",
            "--no-download",
        ])
        .unwrap();
        assert!(cli.debug);
        match cli.command {
            Commands::Run {
                iata,
                point,
                start,
                no_download,
                ..
            } => {
                assert_eq!(iata, vec!["SFO".to_string()]);
                assert_eq!(point.len(), 1);
                assert_eq!(start, NaiveDate::from_ymd_opt(2021, 7, 1));
                assert!(no_download);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_rejects_bad_zoom_and_date() {
        assert!(Cli::try_parse_from([
            "quadcover", "cover", "--lat", "0", "--lon", "0", "--zoom", "30"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["quadcover", "run", "--start", "July"]).is_err());
    }
}
