pub mod certificate;
pub mod config;
pub mod crl;
pub mod telemetry;
