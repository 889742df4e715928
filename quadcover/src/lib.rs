//! QuadCover - quadkey coverage of geodesic discs around points of interest
//!
//! This library computes the set of Web-Mercator tiles touched by a disc of
//! a given radius around each target, and downloads per-tile activity data
//! for the coarse parent tiles over a range of days.
//!
//! # Modules
//!
//! - [`coord`] - quadkeys, tile coordinates and bounds
//! - [`geodesic`] - azimuthal equidistant projection and disc polygons
//! - [`coverage`] - tile enumeration and polygon coverage sets
//! - [`catalog`] - airport catalogue loading and target selection
//! - [`download`] - date ranges, URL templates, activity tables and the downloader
//! - [`config`] - `~/.quadcover/config.ini` handling
//! - [`pipeline`] - targets → coverage → download
//! - [`logging`] - file and console tracing setup

pub mod catalog;
pub mod config;
pub mod coord;
pub mod coverage;
pub mod download;
pub mod geodesic;
pub mod logging;
pub mod pipeline;

/// Crate version, as reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_not_empty() {
        assert!(!VERSION.is_empty());
    }
}
