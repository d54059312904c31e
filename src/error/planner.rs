use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlannerError>;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("http middleware failed: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    #[error("server answered with status {0}")]
    Status(StatusCode),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// Error body returned by the identity provider, e.g. `INVALID_PASSWORD`.
    #[error("authentication failed ({code}): {message}")]
    Auth { code: u16, message: String },

    #[error("no user is signed in")]
    NotSignedIn,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("no course with id {0} in the catalog")]
    UnknownCourse(String),
}

impl PlannerError {
    pub fn auth(code: u16, message: impl Into<String>) -> Self {
        PlannerError::Auth {
            code,
            message: message.into(),
        }
    }
}
