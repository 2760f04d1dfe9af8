use thiserror::Error;

/// Uniform failure shape for every gateway operation. Callers get one
/// human-readable message regardless of where the failure originated.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, refused
    /// connection, dropped socket).
    #[error("connection failed: {0}")]
    Transport(String),

    /// Non-2xx response. Carries the backend's `error` field when the body
    /// had one, otherwise a synthesized `HTTP <status>: <reason>` message.
    #[error("{0}")]
    Status(String),

    /// 2xx response whose body did not match the expected shape.
    #[error("unexpected response from server: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}
