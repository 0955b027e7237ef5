//! Hybrid Trade Recorder - Entry Point
//!
//! Records one demonstration trade (seller 1 → buyer 2, 5 kWh at 2 per
//! kWh) in MySQL and on the ledger contract, then exits.
//!
//! Wiring sequence:
//! 1. Load config.toml (path overridable with HYBRID_CONFIG) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Load secrets from env vars (HYBRID_DB_PASSWORD, HYBRID_PRIVATE_KEY)
//! 4. Open the MySQL pool
//! 5. Connect the signing ledger provider and bind the contract
//! 6. Run the hybrid trade workflow
//! 7. Close the pool and report the outcome

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::{error, info};

use hybrid_trade_recorder::adapters::chain::{LedgerProvider, TradeLedgerContract};
use hybrid_trade_recorder::adapters::persistence::MySqlTradeRepository;
use hybrid_trade_recorder::config::{self, Secrets};
use hybrid_trade_recorder::domain::TradeRequest;
use hybrid_trade_recorder::usecases::{HybridTradeRecorder, LedgerScaling, TradeError};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path =
        std::env::var("HYBRID_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.app.log_level)),
        )
        .json()
        .init();

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        chain_id = config.ledger.chain_id,
        "Starting hybrid trade recorder"
    );

    // ── 3. Secrets from env ─────────────────────────────────
    let secrets = Secrets::from_env().context("Failed to load secrets from env")?;

    // ── 4. MySQL pool ───────────────────────────────────────
    let repo = Arc::new(
        MySqlTradeRepository::connect(&config.database, &secrets.db_password)
            .await
            .context("Failed to open database pool")?,
    );

    // ── 5-6. Ledger + workflow, pool closed either way ──
    let result = record_demo_trade(&config, &secrets, Arc::clone(&repo)).await;
    repo.close().await;

    // Workflow failures are already logged with their stage by the recorder.
    if let Some(e) = result
        .as_ref()
        .err()
        .filter(|e| e.downcast_ref::<TradeError>().is_none())
    {
        error!(error = %format!("{e:#}"), "Hybrid trade setup failed");
    }
    result
}

/// Connect the ledger and record the fixed demonstration trade.
async fn record_demo_trade(
    config: &config::AppConfig,
    secrets: &Secrets,
    repo: Arc<MySqlTradeRepository>,
) -> Result<()> {
    let provider = Arc::new(
        LedgerProvider::connect(&config.ledger, &secrets.private_key)
            .await
            .context("Failed to connect ledger provider")?,
    );
    let ledger = Arc::new(
        TradeLedgerContract::new(provider, &config.ledger)
            .await
            .context("Failed to bind trade ledger contract")?,
    );

    let recorder = HybridTradeRecorder::with_scaling(
        repo,
        ledger,
        LedgerScaling {
            energy_decimals: config.ledger.energy_decimals,
            price_decimals: config.ledger.price_decimals,
        },
    );

    let request = TradeRequest::new(1, 2, Decimal::from(5), Decimal::from(2));
    let outcome = recorder.record(&request).await?;

    info!(
        trade_id = outcome.trade.id,
        seller_id = outcome.trade.seller_id,
        buyer_id = outcome.trade.buyer_id,
        energy_amount_kwh = %outcome.trade.energy_amount_kwh,
        price_per_kwh = %outcome.trade.price_per_kwh,
        status = %outcome.trade.status,
        tx_hash = ?outcome.trade.tx_hash,
        "Final trade row"
    );

    Ok(())
}
