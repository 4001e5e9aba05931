use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CsrfError {
    #[error("Invalid CSRF token")]
    InvalidToken,

    #[error("Missing CSRF token. Provide it in the '{header}' header or '{field}' field")]
    MissingToken { header: String, field: String },

    /// No session was attached to the request
    #[error("[{0}] session driver is missing")]
    MissingSession(&'static str),
}

pub type Result<T> = std::result::Result<T, CsrfError>;
