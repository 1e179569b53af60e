//! Request and response models for the REST API.

use crate::auth::Principal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Result of the database smoke test.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(untagged)]
pub enum DbCheckResponse {
    /// The query succeeded.
    Connected {
        /// Always `true`.
        success: bool,
        /// Number of rows in the `users` table.
        count: i64,
    },
    /// The database could not be queried.
    Failed {
        /// Failure description.
        error: String,
    },
}

impl DbCheckResponse {
    /// Message returned when the smoke test fails.
    pub const FAILURE_MESSAGE: &'static str = "Database connection failed";

    /// Successful check reporting `count` users.
    #[must_use]
    pub fn connected(count: i64) -> Self {
        Self::Connected {
            success: true,
            count,
        }
    }

    /// Failed check.
    #[must_use]
    pub fn failed() -> Self {
        Self::Failed {
            error: Self::FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Response of the protected example route.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProtectedResponse {
    /// Fixed greeting.
    pub message: String,
    /// The authenticated caller.
    pub user: Principal,
}

/// Side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    /// Buy.
    Buy,
    /// Sell.
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// One row of the dashboard's recent trades table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TradeRow {
    /// Execution time.
    pub time: DateTime<Utc>,
    /// Traded pair, e.g. `"ETH/USDC"`.
    pub pair: String,
    /// Trade side.
    pub side: TradeSide,
    /// Execution price.
    pub price: f64,
    /// Realised profit and loss.
    pub pnl: f64,
}

/// Summary shown on the trading dashboard.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    /// The authenticated caller.
    pub user: Principal,
    /// Total profit and loss.
    pub total_pnl: f64,
    /// Number of open trades.
    pub active_trades: u32,
    /// Percentage of winning trades.
    pub win_rate: f64,
    /// Most recent trades, newest first. Always empty until trade history
    /// is recorded.
    pub recent_trades: Vec<TradeRow>,
}

impl DashboardSummary {
    /// Summary of an account with no trading activity.
    #[must_use]
    pub fn empty(user: Principal) -> Self {
        Self {
            user,
            total_pnl: 0.0,
            active_trades: 0,
            win_rate: 0.0,
            recent_trades: Vec::new(),
        }
    }
}
