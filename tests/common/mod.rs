#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{Router, http::StatusCode, routing::get};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use crl_check::telemetry;
use rcgen::{
    BasicConstraints, CertificateParams, CertificateRevocationListParams, CrlDistributionPoint,
    DistinguishedName, DnType, IsCa, Issuer, KeyIdMethod, KeyPair, KeyUsagePurpose,
    RevokedCertParams, SerialNumber, date_time_ymd,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Test CA that issues leaf certificates and signs CRLs
pub struct TestCa {
    issuer: Issuer<'static, KeyPair>,
}

impl TestCa {
    pub fn new() -> Self {
        let mut params = CertificateParams::default();
        let key_pair = KeyPair::generate().unwrap();

        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, "Integration Test CA");
        dn.push(DnType::OrganizationName, "Test Organization");
        params.distinguished_name = dn;
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign];

        Self {
            issuer: Issuer::new(params, key_pair),
        }
    }

    /// DER CRL revoking the given serials
    pub fn crl_der(&self, serials: &[u64]) -> Vec<u8> {
        let revoked_certs = serials
            .iter()
            .map(|serial| RevokedCertParams {
                serial_number: serial_number(*serial),
                revocation_time: date_time_ymd(2024, 6, 1),
                reason_code: None,
                invalidity_date: None,
            })
            .collect();

        CertificateRevocationListParams {
            this_update: date_time_ymd(2024, 6, 1),
            next_update: date_time_ymd(2099, 6, 1),
            crl_number: serial_number(42),
            issuing_distribution_point: None,
            revoked_certs,
            key_identifier_method: KeyIdMethod::Sha256,
        }
        .signed_by(&self.issuer)
        .unwrap()
        .der()
        .to_vec()
    }

    /// PEM leaf certificate with a fixed serial and CRL distribution points
    pub fn leaf_pem(&self, serial: u64, crl_urls: &[String]) -> String {
        let mut params = CertificateParams::default();
        let key_pair = KeyPair::generate().unwrap();

        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, "test.example.com");
        params.distinguished_name = dn;
        params.serial_number = Some(serial_number(serial));
        if !crl_urls.is_empty() {
            params.crl_distribution_points = vec![CrlDistributionPoint {
                uris: crl_urls.to_vec(),
            }];
        }

        params.signed_by(&key_pair, &self.issuer).unwrap().pem()
    }
}

/// Local distribution point server
pub struct CrlServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl CrlServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Requests served on `/ca.crl` so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Serve `crl` at `/ca.crl`, a non-CRL body at `/garbage.crl` and a 500 at
/// `/broken.crl`; anything else is a 404.
pub async fn spawn_crl_server(crl: Vec<u8>) -> CrlServer {
    telemetry::init_tracing();

    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    let app = Router::new()
        .route(
            "/ca.crl",
            get(move || {
                let counter = Arc::clone(&counter);
                let crl = crl.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    crl
                }
            }),
        )
        .route("/garbage.crl", get(|| async { "<html>maintenance</html>" }))
        .route(
            "/broken.crl",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );

    // Use a random OS port
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("failed to run server");
    });

    CrlServer {
        base_url: format!("http://{addr}"),
        hits,
    }
}

/// Raw HTTP/1.1 server that keeps every connection open and answers each
/// request on it with `body`
pub struct KeepAliveServer {
    pub base_url: String,
    connections: Arc<AtomicUsize>,
}

impl KeepAliveServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// TCP connections accepted so far
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

pub async fn spawn_keep_alive_server(body: Vec<u8>) -> KeepAliveServer {
    telemetry::init_tracing();

    let connections = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&connections);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            let body = body.clone();

            tokio::spawn(async move {
                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: keep-alive\r\n\r\n",
                    body.len()
                );
                let mut pending = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    let n = match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => n,
                    };
                    pending.extend_from_slice(&buf[..n]);

                    // Requests are bodiless GETs, so a blank line ends each one
                    while let Some(end) = find(&pending, b"\r\n\r\n") {
                        pending.drain(..end + 4);
                        if stream.write_all(head.as_bytes()).await.is_err()
                            || stream.write_all(&body).await.is_err()
                        {
                            return;
                        }
                    }
                }
            });
        }
    });

    KeepAliveServer {
        base_url: format!("http://{addr}"),
        connections,
    }
}

/// Wrap DER bytes in a PEM block with an arbitrary label
pub fn pem_encode(label: &str, der: &[u8]) -> String {
    let body = STANDARD.encode(der);
    let mut pem = format!("-----BEGIN {label}-----\n");
    for line in body.as_bytes().chunks(64) {
        pem.push_str(std::str::from_utf8(line).unwrap());
        pem.push('\n');
    }
    pem.push_str(&format!("-----END {label}-----\n"));
    pem
}

/// Overwrite the first occurrence of `from` with `to` (same length)
pub fn patch_bytes(der: &[u8], from: &[u8], to: &[u8]) -> Vec<u8> {
    assert_eq!(from.len(), to.len());
    let at = find(der, from).expect("pattern not present");
    let mut patched = der.to_vec();
    patched[at..at + to.len()].copy_from_slice(to);
    patched
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Minimal big-endian encoding, so the DER INTEGER carries no leading zero octets
fn serial_number(serial: u64) -> SerialNumber {
    let bytes = serial.to_be_bytes();
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len() - 1);
    SerialNumber::from_slice(&bytes[start..])
}
