use color_eyre::eyre::WrapErr;
use crl_check::{
    certificate::Certificate,
    config::Config,
    crl::{HttpCrlFetcher, RevocationChecker},
    telemetry,
};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let config = Config::load().wrap_err("Failed to load configuration")?;
    tracing::debug!("Loaded configuration: {:?}", config);

    let certificate = Certificate::load(&config.checker.certificate_path)
        .await
        .wrap_err("Failed to load certificate")?;

    let checker = RevocationChecker::new(HttpCrlFetcher::new()?, config.evaluator.build());
    let result = checker.check(&certificate).await;

    println!("{result}");
    Ok(())
}
