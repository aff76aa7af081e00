use std::sync::Arc;

use anyhow::{Error, Result};
use form_mailer::{
    api::run_api_server,
    clients::mailer::SmtpMailer,
    config::{Config, LogFormat},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::load()?;

    init_tracing(config.log_format);

    // lettre's rustls connector needs a process-wide crypto provider.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let mailer = SmtpMailer::new(&config)?;

    run_api_server(config, Arc::new(mailer)).await
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
