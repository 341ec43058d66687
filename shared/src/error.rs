//! Error types for WebLaunch Lambda functions.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in WebLaunch Lambda functions.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid request parameters
    #[error("Validation error: {0}")]
    Validation(String),

    /// Requester may not read the record
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP method other than GET or OPTIONS
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// DynamoDB or AWS SDK error
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::Forbidden(_) => 403,
            Error::NotFound(_) => 404,
            Error::MethodNotAllowed => 405,
            _ => 500,
        }
    }

    /// Message placed in the response body, without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            Error::Validation(msg)
            | Error::Forbidden(msg)
            | Error::NotFound(msg)
            | Error::Store(msg)
            | Error::Config(msg) => msg.clone(),
            Error::MethodNotAllowed => "Method not allowed".to_string(),
            Error::Serialization(e) => e.to_string(),
        }
    }

    /// Whether this error is a server-side fault rather than a rejection.
    pub fn is_fault(&self) -> bool {
        self.status_code() >= 500
    }
}

impl<E> From<aws_sdk_dynamodb::error::SdkError<E>> for Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: aws_sdk_dynamodb::error::SdkError<E>) -> Self {
        Error::Store(aws_sdk_dynamodb::error::DisplayErrorContext(err).to_string())
    }
}
