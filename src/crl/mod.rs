//! Certificate Revocation List (CRL) checking
//!
//! # Features
//! - Fetching CRLs from a certificate's distribution points over HTTP(S)
//! - Parsing DER (or PEM-wrapped) CRLs into revoked serial numbers
//! - Bounded parallel membership test of a serial against a CRL
//! - First-success selection across distribution points

pub mod checker;
mod errors;
pub mod evaluator;
pub mod fetcher;
mod parser;
mod types;

// Re-export public types
pub use checker::RevocationChecker;
pub use errors::{CrlError, CrlResult, FetchError, ParseError};
pub use evaluator::Evaluator;
pub use fetcher::{CrlFetcher, HttpCrlFetcher};
pub use parser::parse_crl;
pub use types::{CheckResult, Crl, RevokedEntry};
