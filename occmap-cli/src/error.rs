//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use occmap::config::ConfigFileError;
use occmap::server::params::ParamError;
use occmap::service::ServiceError;
use occmap::storage::StorageError;
use std::fmt;
use std::path::PathBuf;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be read or written
    Config(ConfigFileError),
    /// Command-line arguments describe an invalid request
    InvalidArgument(ParamError),
    /// Could not set up the storage gateway
    Storage(StorageError),
    /// A tile or capabilities request failed
    Service(ServiceError),
    /// Failed to write output file
    FileWrite { path: PathBuf, error: std::io::Error },
    /// Could not bind or run the HTTP server
    Serve(std::io::Error),
    /// Could not start the async runtime
    Runtime(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Storage(_) | CliError::Service(ServiceError::StorageUnavailable(_)) => {
                eprintln!();
                eprintln!("Check the [storage] url and table in your config file.");
                eprintln!("Run 'occmap config init' to write one with defaults.");
            }
            CliError::Serve(_) => {
                eprintln!();
                eprintln!("Is another process already listening on the bind address?");
            }
            _ => {}
        }

        let code = match self {
            CliError::InvalidArgument(_) => 2,
            _ => 1,
        };
        process::exit(code)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::InvalidArgument(e) => write!(f, "Invalid argument: {}", e),
            CliError::Storage(e) => write!(f, "Failed to connect to storage: {}", e),
            CliError::Service(e) => write!(f, "{}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path.display(), error)
            }
            CliError::Serve(e) => write!(f, "HTTP server error: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::InvalidArgument(e) => Some(e),
            CliError::Storage(e) => Some(e),
            CliError::Service(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::Serve(e) | CliError::Runtime(e) => Some(e),
            CliError::LoggingInit(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<ParamError> for CliError {
    fn from(e: ParamError) -> Self {
        CliError::InvalidArgument(e)
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        CliError::Storage(e)
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Service(e)
    }
}
