//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use giudecca::config::ConfigFileError;
use giudecca::coord::CoordError;
use giudecca::factory::HydrationError;
use giudecca::service::ServiceError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Configuration file could not be loaded or saved
    ConfigFile(ConfigFileError),
    /// No endpoint configured for a layer
    UnknownLayer(String),
    /// Failed to create the HTTP client
    ClientCreation(ServiceError),
    /// Feature service request failed
    Query(ServiceError),
    /// A single factory could not be resolved
    Hydration(HydrationError),
    /// Invalid map bounds on the command line
    Bounds(CoordError),
    /// Failed to serialize output
    Output(serde_json::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::UnknownLayer(_) => {
                eprintln!();
                eprintln!("Add the layer URL to the [endpoints] section of the config file,");
                eprintln!("or pass the full feature layer URL instead of a layer name.");
                eprintln!("Run 'giudecca config path' to locate the config file.");
            }
            CliError::Query(ServiceError::Remote { code: 498 | 499, .. }) => {
                eprintln!();
                eprintln!("The feature service rejected the API token.");
                eprintln!("Check api_token in the [service] section of the config file.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::UnknownLayer(layer) => {
                write!(f, "No endpoint configured for layer '{}'", layer)
            }
            CliError::ClientCreation(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Query(e) => write!(f, "Feature service request failed: {}", e),
            CliError::Hydration(e) => write!(f, "Failed to resolve factory: {}", e),
            CliError::Bounds(e) => write!(f, "Invalid map bounds: {}", e),
            CliError::Output(e) => write!(f, "Failed to format output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::ClientCreation(e) => Some(e),
            CliError::Query(e) => Some(e),
            CliError::Hydration(e) => Some(e),
            CliError::Bounds(e) => Some(e),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Query(e)
    }
}

impl From<HydrationError> for CliError {
    fn from(e: HydrationError) -> Self {
        match e {
            HydrationError::Service(e) => CliError::Query(e),
            other => CliError::Hydration(other),
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Bounds(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_layer_message() {
        let err = CliError::UnknownLayer("timeperiods".to_string());
        assert_eq!(
            err.to_string(),
            "No endpoint configured for layer 'timeperiods'"
        );
    }

    #[test]
    fn test_service_error_converts_to_query() {
        let err: CliError = ServiceError::Status {
            status: 404,
            url: "https://example.com/query".to_string(),
        }
        .into();
        assert!(matches!(err, CliError::Query(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
