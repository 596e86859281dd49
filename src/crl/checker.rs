use tracing::{info, warn};
use x509_parser::num_bigint::BigInt;

use crate::certificate::Certificate;

use super::errors::CrlResult;
use super::evaluator::Evaluator;
use super::fetcher::CrlFetcher;
use super::parser::parse_crl;
use super::types::{CheckResult, Crl};

/// Progress through a certificate's distribution points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceState {
    /// Fetch and parse the URL at this index
    Trying(usize),
    /// A source produced a CRL and it has been evaluated
    Resolved(bool),
    /// Every URL failed
    Exhausted,
}

/// Walks distribution points in order and evaluates the first usable CRL.
///
/// URLs are tried strictly one at a time. Once a CRL has been fetched and
/// parsed the remaining URLs are never contacted, whatever that CRL contains.
#[derive(Debug, Clone)]
pub struct RevocationChecker<F> {
    fetcher: F,
    evaluator: Evaluator,
}

impl<F: CrlFetcher> RevocationChecker<F> {
    pub fn new(fetcher: F, evaluator: Evaluator) -> Self {
        Self { fetcher, evaluator }
    }

    pub async fn check(&self, certificate: &Certificate) -> CheckResult {
        self.check_serial(&certificate.serial, &certificate.distribution_points)
            .await
    }

    pub async fn check_serial(
        &self,
        serial: &BigInt,
        distribution_points: &[String],
    ) -> CheckResult {
        if distribution_points.is_empty() {
            warn!("Unable to check certificate revocation status. No CRL URL defined.");
            return CheckResult::Unknown;
        }

        let mut state = SourceState::Trying(0);
        loop {
            state = match state {
                SourceState::Trying(index) => {
                    let url = &distribution_points[index];
                    match self.load_crl(url).await {
                        Ok(crl) => {
                            info!("Using CRL from {} ({} entries)", url, crl.len());
                            let revoked = self.evaluator.evaluate(serial, crl.entries).await;
                            SourceState::Resolved(revoked)
                        }
                        Err(e) => {
                            warn!("Failed to use CRL from {}: {}. Skipping this URL.", url, e);
                            if index + 1 < distribution_points.len() {
                                SourceState::Trying(index + 1)
                            } else {
                                SourceState::Exhausted
                            }
                        }
                    }
                }
                SourceState::Resolved(revoked) => return CheckResult::from_revoked(revoked),
                SourceState::Exhausted => {
                    warn!(
                        "No usable CRL among {} distribution points",
                        distribution_points.len()
                    );
                    return CheckResult::Unknown;
                }
            };
        }
    }

    async fn load_crl(&self, url: &str) -> CrlResult<Crl> {
        let raw = self.fetcher.fetch(url).await?;
        Ok(parse_crl(&raw)?)
    }
}
