use reqwest::StatusCode;
use thiserror::Error;
use x509_parser::prelude::X509Error;

/// Failure to retrieve CRL bytes from a distribution point
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid CRL URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported CRL URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error {status} when fetching CRL from {url}")]
    Status { url: String, status: StatusCode },
}

/// Failure to decode raw bytes into a CRL
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid PEM encoding: {0}")]
    Pem(String),

    #[error("Unexpected PEM label {0:?}, expected \"X509 CRL\"")]
    Label(String),

    #[error("CRL parsing failed: {0}")]
    Der(#[from] X509Error),

    #[error("{0} trailing bytes after CRL")]
    TrailingData(usize),
}

/// Any reason a single distribution point could not be used
#[derive(Error, Debug)]
pub enum CrlError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Convenient Result type alias
pub type CrlResult<T> = Result<T, CrlError>;
