use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutomationError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Transient unavailability: {0}")]
    TransientUnavailable(String),

    #[error("Element is not enabled: {0}")]
    ElementNotEnabled(String),

    #[error("Element has no clickable point: {0}")]
    NoClickablePoint(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Platform-specific error: {0}")]
    PlatformError(String),
}
