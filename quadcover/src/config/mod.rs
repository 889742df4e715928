//! User configuration.
//!
//! Settings are read from an INI file, by default
//! `~/.quadcover/config.ini`:
//!
//! ```ini
//! [coverage]
//! radius_m = 1000
//! fine_zoom = 18
//! coarse_zoom = 7
//!
//! [targets]
//! select = SFO | name:Denver
//! ```
//!
//! Missing keys keep their defaults. Invalid values fail the load with the
//! section and key that caused it.

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use parser::TARGET_SEPARATOR;
pub use settings::{
    CatalogSettings, ConfigFile, CoverageSettings, DownloadSettings, LoggingSettings,
    OutputSettings, TargetSettings,
};
