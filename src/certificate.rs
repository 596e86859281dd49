use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use x509_parser::extensions::{DistributionPointName, GeneralName, ParsedExtension};
use x509_parser::num_bigint::BigInt;
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::*;

const PEM_CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// Error type for loading the certificate under check
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read certificate file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode certificate data: {0}")]
    Pem(String),

    #[error("PEM block is {0:?}, expected \"CERTIFICATE\"")]
    NotACertificate(String),

    #[error("Failed to parse certificate data: {0}")]
    Certificate(#[from] X509Error),
}

/// The certificate whose revocation status is checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// Signed value of the DER serial INTEGER
    pub serial: BigInt,
    /// CRL distribution point URLs, in certificate order
    pub distribution_points: Vec<String>,
}

impl Certificate {
    /// Read and decode a PEM certificate file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await.map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_pem(&data)
    }

    /// Decode the first PEM block of `data` as an X.509 certificate
    pub fn from_pem(data: &[u8]) -> Result<Self, LoadError> {
        let (_, pem) = parse_x509_pem(data).map_err(|e| LoadError::Pem(e.to_string()))?;
        if pem.label != PEM_CERTIFICATE_LABEL {
            return Err(LoadError::NotACertificate(pem.label));
        }
        Self::from_der(&pem.contents)
    }

    pub fn from_der(der: &[u8]) -> Result<Self, LoadError> {
        let (_, cert) =
            X509Certificate::from_der(der).map_err(|e| LoadError::Certificate(e.into()))?;
        Ok(Self {
            serial: BigInt::from_signed_bytes_be(cert.tbs_certificate.raw_serial()),
            distribution_points: extract_crl_distribution_points(&cert),
        })
    }
}

/// Extract CRL distribution point URIs from a certificate.
///
/// Only `fullName` URIs are returned; relative names and other general name
/// forms cannot be fetched.
pub fn extract_crl_distribution_points(cert: &X509Certificate) -> Vec<String> {
    let mut urls = Vec::new();

    for ext in cert.tbs_certificate.extensions() {
        let ParsedExtension::CRLDistributionPoints(points) = ext.parsed_extension() else {
            continue;
        };
        for point in &points.points {
            let Some(DistributionPointName::FullName(names)) = &point.distribution_point else {
                continue;
            };
            for name in names {
                if let GeneralName::URI(uri) = name {
                    urls.push(uri.to_string());
                }
            }
        }
    }

    debug!("Found {} CRL distribution points", urls.len());
    urls
}
