use std::{fs::File, path::PathBuf};

use account_store::{
    bin_utils::{ProcessError, Service},
    config::BankConfig,
    conversion::FrankfurterClient,
    currency::Currency,
};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Replays a CSV action script against a fresh account and prints the final state.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Script with `type,amount,currency,purpose,name,national_id` columns
    script: PathBuf,

    /// Exchange-rate service base URL
    #[arg(long)]
    rates_url: Option<String>,

    /// Currency the account is kept in
    #[arg(long)]
    domestic_currency: Option<Currency>,

    /// Leave the loading flag set when a conversion fails
    #[arg(long)]
    keep_loading_on_failure: bool,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::new(format!("account_store={}", cli.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = BankConfig::from_env();
    if let Some(url) = cli.rates_url {
        config.rates_url = url;
    }
    if let Some(currency) = cli.domestic_currency {
        config.domestic_currency = currency;
    }
    if cli.keep_loading_on_failure {
        config.reset_loading_on_failure = false;
    }

    let file = File::open(&cli.script)
        .with_context(|| format!("Failed to open `{}`", cli.script.display()))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        rates: FrankfurterClient::new(config.rates_url.clone()),
        config,
        error_printer: Box::new(|line, err| match err {
            ProcessError::ConversionErr(err) => {
                warn!(line, %err, "deposit not credited")
            }
            err => error!(line, %err, "skipping row"),
        }),
    };
    service.run().await
}
