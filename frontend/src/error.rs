use shared::ValidationError;
use thiserror::Error;

/// Problems shown to the user as a notice under the inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Please enter both an origin and a destination ({0})")]
    Validation(#[from] ValidationError),
    #[error("Could not calculate a route: {0}")]
    Routing(String),
    #[error("Map unavailable: {0}")]
    Configuration(String),
}
