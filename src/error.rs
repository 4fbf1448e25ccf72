//! Error types for the leverage dashboard
//!
//! Uses thiserror for ergonomic error definitions.
//! `Display` carries the technical detail for logs, `user_message` the text
//! shown in the blocking alert.

use thiserror::Error;

/// Custom Result type using our Error
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Dashboard errors
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Session endpoint answered 401
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Session endpoint failed for any other reason
    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Could not fetch accounts: {0}")]
    AccountsFetchFailed(String),

    /// No account with owner authority
    #[error("Primary account not found")]
    NoPrimaryAccount,

    #[error("Could not fetch account balance: {0}")]
    BalanceFetchFailed(String),

    #[error("Could not fetch positions: {0}")]
    PositionsFetchFailed(String),

    #[error("Could not fetch market metrics for futures: {0}")]
    MetricsFetchFailed(String),

    /// Response body could not be decoded or a numeric field was invalid
    #[error("Malformed API response: {0}")]
    MalformedApiResponse(String),

    /// Login form submitted with an empty field
    #[error("Username and password are both required")]
    MissingCredentials,

    /// A login sequence is already running on this controller
    #[error("A login is already in progress")]
    AlreadyInFlight,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level HTTP errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-success status from the brokerage API
    #[error("tastytrade API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Worker runtime errors
    #[error("Worker error: {0}")]
    Worker(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DashboardError {
    /// Text for the blocking alert shown to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredentials => "Invalid username or password.".to_string(),
            Self::LoginFailed(_) => "Login failed.".to_string(),
            Self::AccountsFetchFailed(_) => "Could not fetch accounts.".to_string(),
            Self::NoPrimaryAccount => "Primary account not found.".to_string(),
            Self::BalanceFetchFailed(_) => "Could not fetch account balance.".to_string(),
            Self::PositionsFetchFailed(_) => "Could not fetch positions.".to_string(),
            Self::MetricsFetchFailed(_) => "Could not fetch market metrics for futures.".to_string(),
            Self::MalformedApiResponse(_) => "Unexpected response from the brokerage.".to_string(),
            Self::MissingCredentials => "Please enter both username and password.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<worker::Error> for DashboardError {
    fn from(err: worker::Error) -> Self {
        DashboardError::Worker(err.to_string())
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DashboardError::MalformedApiResponse(err.to_string())
        } else {
            DashboardError::Http(err.to_string())
        }
    }
}

impl From<DashboardError> for worker::Error {
    fn from(err: DashboardError) -> Self {
        worker::Error::RustError(err.to_string())
    }
}
