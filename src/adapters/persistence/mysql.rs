//! MySQL Trade Repository - sqlx Adapter for the Repository Port
//!
//! Reads users and writes trades in the `energy_trading` schema through
//! a shared `MySqlPool`. Connections are acquired per query and returned
//! automatically. The schema is owned elsewhere; this adapter only
//! issues DML.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tracing::{debug, info, instrument};

use crate::config::DatabaseConfig;
use crate::domain::trade::{Trade, TradeId, TradeStatus, User, UserId};
use crate::ports::repository::TradeRepository;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    eth_address: String,
}

#[derive(Debug, sqlx::FromRow)]
struct TradeRow {
    id: i64,
    seller_id: i64,
    buyer_id: i64,
    energy_amount_kwh: Decimal,
    price_per_kwh: Decimal,
    status: String,
    tx_hash: Option<String>,
}

impl TryFrom<TradeRow> for Trade {
    type Error = anyhow::Error;

    fn try_from(row: TradeRow) -> Result<Self> {
        let status = row
            .status
            .parse::<TradeStatus>()
            .with_context(|| format!("Trade {} has an invalid status column", row.id))?;

        Ok(Self {
            id: row.id,
            seller_id: row.seller_id,
            buyer_id: row.buyer_id,
            energy_amount_kwh: row.energy_amount_kwh,
            price_per_kwh: row.price_per_kwh,
            status,
            tx_hash: row.tx_hash,
        })
    }
}

/// Trade repository backed by a MySQL connection pool.
pub struct MySqlTradeRepository {
    pool: MySqlPool,
}

impl MySqlTradeRepository {
    /// Open the connection pool described by `config`.
    ///
    /// The password is passed separately so it never sits in the
    /// loggable configuration struct.
    #[instrument(skip_all, fields(host = %config.host, database = %config.database))]
    pub async fn connect(config: &DatabaseConfig, password: &str) -> Result<Self> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(password)
            .database(&config.database);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect_with(options)
            .await
            .context("Failed to connect to MySQL")?;

        info!(
            max_connections = config.max_connections,
            "Connected to MySQL"
        );

        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool.
    pub const fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Release every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("MySQL pool closed");
    }
}

#[async_trait]
impl TradeRepository for MySqlTradeRepository {
    #[instrument(skip(self))]
    async fn insert_pending_trade(
        &self,
        seller_id: UserId,
        buyer_id: UserId,
        energy_amount_kwh: Decimal,
        price_per_kwh: Decimal,
    ) -> Result<TradeId> {
        let result = sqlx::query(
            r"
            INSERT INTO trades
                (seller_id, buyer_id, energy_amount_kwh, price_per_kwh, status)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(seller_id)
        .bind(buyer_id)
        .bind(energy_amount_kwh)
        .bind(price_per_kwh)
        .bind(TradeStatus::Pending.as_str())
        .execute(&self.pool)
        .await
        .context("Failed to insert pending trade")?;

        let id = TradeId::try_from(result.last_insert_id())
            .context("Inserted trade id does not fit in i64")?;

        debug!(trade_id = id, "Pending trade inserted");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT id, eth_address FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to look up user {id}"))?;

        Ok(row.map(|r| User {
            id: r.id,
            eth_address: r.eth_address,
        }))
    }

    #[instrument(skip(self))]
    async fn finalize_trade(
        &self,
        trade_id: TradeId,
        tx_hash: &str,
        status: TradeStatus,
    ) -> Result<()> {
        let result = sqlx::query("UPDATE trades SET tx_hash = ?, status = ? WHERE id = ?")
            .bind(tx_hash)
            .bind(status.as_str())
            .bind(trade_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to finalize trade {trade_id}"))?;

        anyhow::ensure!(
            result.rows_affected() > 0,
            "Trade {trade_id} disappeared before it could be finalized"
        );

        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_trade(&self, trade_id: TradeId) -> Result<Trade> {
        let row = sqlx::query_as::<_, TradeRow>(
            r"
            SELECT id, seller_id, buyer_id, energy_amount_kwh, price_per_kwh, status, tx_hash
            FROM trades
            WHERE id = ?
            ",
        )
        .bind(trade_id)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to read trade {trade_id}"))?;

        Trade::try_from(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(status: &str, tx_hash: Option<&str>) -> TradeRow {
        TradeRow {
            id: 42,
            seller_id: 1,
            buyer_id: 2,
            energy_amount_kwh: dec!(5.00),
            price_per_kwh: dec!(2.00),
            status: status.to_string(),
            tx_hash: tx_hash.map(str::to_string),
        }
    }

    #[test]
    fn onchain_row_maps_to_trade() {
        let trade = Trade::try_from(row("ONCHAIN", Some("0xfeed"))).unwrap();
        assert_eq!(trade.id, 42);
        assert_eq!(trade.status, TradeStatus::Onchain);
        assert_eq!(trade.energy_amount_kwh, dec!(5));
        assert_eq!(trade.tx_hash.as_deref(), Some("0xfeed"));
    }

    #[test]
    fn unknown_status_is_an_error() {
        let err = Trade::try_from(row("SETTLED", None)).unwrap_err();
        assert!(format!("{err:#}").contains("invalid status"));
    }
}
