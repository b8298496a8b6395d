use anyhow::Context;
use clap::Parser;
use std::io::Write;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tradecheck_core::config::Settings;
use tradecheck_core::domain::market::{Credential, Ticker};
use tradecheck_core::domain::trade::TradeParameters;
use tradecheck_core::engine::{self, EvaluationConfig};
use tradecheck_core::ingest::fmp::FmpClient;

mod prompt;
mod report;

#[derive(Debug, Parser)]
#[command(name = "tradecheck")]
struct Args {
    /// Ticker symbol. Prompted for when omitted.
    #[arg(long)]
    ticker: Option<String>,

    /// Target price. Prompted for when omitted.
    #[arg(long)]
    target: Option<String>,

    /// Stop-loss price. Prompted for when omitted.
    #[arg(long)]
    stop_loss: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    if let Err(err) = run(args, &settings).await {
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %err, "trade evaluation aborted");
        return Err(err);
    }
    Ok(())
}

async fn run(args: Args, settings: &Settings) -> anyhow::Result<()> {
    let mut out = std::io::stdout();
    writeln!(out, "=== Trade Analysis ===")?;

    let ticker_input = match args.ticker {
        Some(t) => t,
        None => prompt::ask(
            &mut std::io::stdin().lock(),
            &mut out,
            "Enter the stock ticker symbol: ",
            "ticker",
        )?,
    };
    let ticker = Ticker::parse(&ticker_input)?;

    let credential = Credential::new(settings.require_fmp_api_key()?);
    let client = FmpClient::from_settings(settings)?;
    let config = EvaluationConfig::from_env();

    let data = engine::fetch_market_data(&client, &client, &ticker, &credential)
        .await
        .context("could not retrieve the market data")?;

    writeln!(out, "{}", report::quote_summary(&ticker, &data.quote))?;

    let fundamental = data.fundamental_score();
    writeln!(out, "{}", report::fundamental_line(&ticker, &fundamental))?;

    let target = match args.target {
        Some(v) => v,
        None => prompt::ask(
            &mut std::io::stdin().lock(),
            &mut out,
            &format!("\nEnter your target price for {ticker}: "),
            "target price",
        )?,
    };
    let stop_loss = match args.stop_loss {
        Some(v) => v,
        None => prompt::ask(
            &mut std::io::stdin().lock(),
            &mut out,
            &format!("Enter your stop-loss price for {ticker}: "),
            "stop-loss",
        )?,
    };
    let params = TradeParameters::parse(&target, &stop_loss)?;

    let result = engine::evaluate(&data.quote, fundamental, params, &config);

    writeln!(out, "{}", report::signal_lines(&result.signal_notes))?;
    writeln!(
        out,
        "{}",
        report::trade_analysis(&ticker, &data.quote, &params, &result)
    )?;
    Ok(())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
