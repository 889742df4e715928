//! Init command - write a default configuration file.

use std::path::PathBuf;

use quadcover::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Arguments for the init command.
pub struct InitArgs {
    /// Target path; defaults to `~/.quadcover/config.ini`
    pub config: Option<PathBuf>,
    /// Replace an existing file
    pub force: bool,
}

/// Run the init command.
pub fn run(args: InitArgs) -> Result<(), CliError> {
    let path = args.config.unwrap_or_else(config_file_path);
    ConfigFile::write_default(&path, args.force)?;

    println!("Wrote default configuration to {}", path.display());
    println!();
    println!("Edit [targets] select to choose what to cover, e.g.:");
    println!("  select = SFO | name:Denver | home=43.65,-79.38");
    Ok(())
}
