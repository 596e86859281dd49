use std::fmt;

use x509_parser::num_bigint::BigInt;

/// A single revoked certificate listed in a CRL.
///
/// Only the serial number is consulted; revocation date and reason are ignored.
/// Serials are signed: a DER INTEGER `FF FF` is -1, never 65535.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokedEntry {
    pub serial: BigInt,
}

impl RevokedEntry {
    pub fn new(serial: impl Into<BigInt>) -> Self {
        Self {
            serial: serial.into(),
        }
    }
}

/// A decoded Certificate Revocation List
#[derive(Debug, Clone, Default)]
pub struct Crl {
    /// Issuer distinguished name, kept for diagnostics only
    pub issuer: String,
    /// Revoked entries in the order they appear in the list
    pub entries: Vec<RevokedEntry>,
}

impl Crl {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of a revocation check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckResult {
    /// No distribution point produced a usable CRL
    Unknown,
    NotRevoked,
    Revoked,
}

impl CheckResult {
    /// Map the evaluator's answer for a resolved source
    pub fn from_revoked(revoked: bool) -> Self {
        if revoked {
            CheckResult::Revoked
        } else {
            CheckResult::NotRevoked
        }
    }

    /// `None` when the status could not be determined
    pub fn is_revoked(&self) -> Option<bool> {
        match self {
            CheckResult::Unknown => None,
            CheckResult::NotRevoked => Some(false),
            CheckResult::Revoked => Some(true),
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.is_revoked() {
            None => write!(f, "Certificate status: Unknown."),
            Some(revoked) => write!(f, "Certificate revoked: {revoked}"),
        }
    }
}
