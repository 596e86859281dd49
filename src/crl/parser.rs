use tracing::debug;
use x509_parser::num_bigint::BigInt;
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::*;

use super::errors::ParseError;
use super::types::{Crl, RevokedEntry};

const PEM_PREFIX: &[u8] = b"-----BEGIN";
const PEM_CRL_LABEL: &str = "X509 CRL";

/// Decode raw bytes into a [`Crl`].
///
/// The body is expected to be DER. A PEM `X509 CRL` block is also accepted
/// provided it starts at the first byte.
pub fn parse_crl(data: &[u8]) -> Result<Crl, ParseError> {
    if data.starts_with(PEM_PREFIX) {
        let (_, pem) = parse_x509_pem(data).map_err(|e| ParseError::Pem(e.to_string()))?;
        if pem.label != PEM_CRL_LABEL {
            return Err(ParseError::Label(pem.label));
        }
        return parse_der(&pem.contents);
    }

    parse_der(data)
}

fn parse_der(der: &[u8]) -> Result<Crl, ParseError> {
    let (rem, crl) =
        CertificateRevocationList::from_der(der).map_err(|e| ParseError::Der(e.into()))?;

    if !rem.is_empty() {
        return Err(ParseError::TrailingData(rem.len()));
    }

    let entries: Vec<RevokedEntry> = crl
        .iter_revoked_certificates()
        .map(|revoked| RevokedEntry {
            serial: BigInt::from_signed_bytes_be(revoked.raw_serial()),
        })
        .collect();

    let issuer = crl.issuer().to_string();
    debug!("Parsed CRL from {} with {} revoked entries", issuer, entries.len());

    Ok(Crl { issuer, entries })
}
