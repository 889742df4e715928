//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and a single exit code.

use std::fmt;
use std::process;

use quadcover::config::ConfigFileError;
use quadcover::coverage::CoverageError;
use quadcover::pipeline::PipelineError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Bad command-line argument
    InvalidArgument(String),
    /// Coverage computation failed
    Coverage(CoverageError),
    /// Pipeline run failed
    Pipeline(PipelineError),
    /// Failed to render command output
    Output(String),
}

impl CliError {
    /// Exit the process with the error message and status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Config(ConfigFileError::AlreadyExists(_)) = self {
            eprintln!();
            eprintln!("Use --force to overwrite the existing file.");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Coverage(e) => write!(f, "Coverage failed: {}", e),
            CliError::Pipeline(e) => write!(f, "{}", e),
            CliError::Output(msg) => write!(f, "Failed to write output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Coverage(e) => Some(e),
            CliError::Pipeline(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<CoverageError> for CliError {
    fn from(e: CoverageError) -> Self {
        CliError::Coverage(e)
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_messages() {
        let err = CliError::InvalidArgument("radius must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid argument: radius must be positive");

        let err = CliError::from(CoverageError::InvalidZoom(30));
        assert!(err.to_string().starts_with("Coverage failed:"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_pipeline_error_is_shown_as_is() {
        let err = CliError::from(PipelineError::NoTargets);
        assert_eq!(err.to_string(), PipelineError::NoTargets.to_string());
    }
}
