use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lqi_valuation::infrastructure::snapshot::AccountSnapshot;
use lqi_valuation::report::{PoolReport, TradeReport};
use lqi_valuation::shared::config::{parse_address, Config};
use lqi_valuation::shared::types::{Denomination, TradeAction};
use lqi_valuation::PoolService;

#[derive(Parser, Debug)]
#[command(version, about = "Value the LQI pool from an account snapshot and estimate deposit/withdraw fees")]
struct Args {
    /// Path to the pool config (TOML)
    #[arg(long, default_value = "pool.toml")]
    config: String,

    /// Path to the account snapshot (JSON, base58 address -> hex data)
    #[arg(long)]
    snapshot: String,

    /// Wallet to report token balances for
    #[arg(long)]
    owner: Option<String>,

    /// Token mint to estimate a fee for
    #[arg(long)]
    mint: Option<String>,

    /// deposit or withdraw
    #[arg(long, default_value = "deposit")]
    action: TradeAction,

    /// Trade amount as typed by a user, e.g. "1.25"
    #[arg(long, default_value = "")]
    amount: String,

    /// Unit of --amount: token, usd or share
    #[arg(long, default_value = "token")]
    denomination: Denomination,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let config = Config::from_file(&args.config)?;
    let mut service = PoolService::from_config(&config)?;

    let snapshot = AccountSnapshot::from_file(&args.snapshot)?;
    let accounts = snapshot.to_account_map()?;

    let owner = args
        .owner
        .as_deref()
        .map(|o| parse_address("--owner", o))
        .transpose()?;

    service
        .refresh(&accounts, owner.as_ref())
        .context("build pool state from snapshot")?;

    let mut report = PoolReport::from_service(&service, snapshot.slot)?;

    if let Some(mint) = args.mint.as_deref() {
        let mint = parse_address("--mint", mint)?;
        let estimate = service.estimate_fee(&mint, args.action, &args.amount, args.denomination)?;
        info!("{} estimate for {}: {:?}", args.action.as_str(), mint, estimate);
        report = report.with_trade(TradeReport::new(
            mint.to_string(),
            args.action,
            args.amount.clone(),
            args.denomination,
            estimate,
        ));
    }

    println!("{}", report.to_json()?);
    Ok(())
}
