use thiserror::Error;

/// Failure reported by a request executor.
///
/// Display renders only the underlying message so callers can prefix it with
/// the operation that failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HttpError {
    #[error("{message}")]
    Timeout { message: String },
    #[error("{message}")]
    Connect { message: String },
    #[error("{message}")]
    Request { message: String },
    #[error("{message}")]
    Body { message: String },
    #[error("Failed to build HTTP client: {message}")]
    BuildClient { message: String },
}

impl HttpError {
    #[must_use]
    pub fn request(message: impl Into<String>) -> Self {
        HttpError::Request {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn body(message: impl Into<String>) -> Self {
        HttpError::Body {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            HttpError::Timeout { message }
        } else if err.is_connect() {
            HttpError::Connect { message }
        } else if err.is_body() || err.is_decode() {
            HttpError::Body { message }
        } else {
            HttpError::Request { message }
        }
    }
}
