//! Request and response types for the dashboard API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Server version.
    pub version: String,
}

/// Result of the database smoke test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DbCheckResponse {
    /// The query succeeded.
    Connected {
        /// Always `true`.
        success: bool,
        /// Number of users.
        count: i64,
    },
    /// The database could not be queried.
    Failed {
        /// Failure description.
        error: String,
    },
}

/// Authenticated identity echoed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: String,
    /// Email address.
    pub email: String,
}

/// Response of the protected example route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectedResponse {
    /// Fixed greeting.
    pub message: String,
    /// The authenticated caller.
    pub user: User,
}

/// Side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    /// Buy.
    Buy,
    /// Sell.
    Sell,
}

/// One row of the recent trades table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRow {
    /// Execution time.
    pub time: DateTime<Utc>,
    /// Traded pair.
    pub pair: String,
    /// Trade side.
    pub side: TradeSide,
    /// Execution price.
    pub price: f64,
    /// Realised profit and loss.
    pub pnl: f64,
}

/// Dashboard summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// The authenticated caller.
    pub user: User,
    /// Total profit and loss.
    pub total_pnl: f64,
    /// Number of open trades.
    pub active_trades: u32,
    /// Percentage of winning trades.
    pub win_rate: f64,
    /// Most recent trades.
    pub recent_trades: Vec<TradeRow>,
}

/// Error body returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// Error message.
    pub error: String,
    /// Error code, absent on authentication failures.
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_check_connected_deserialization() {
        let parsed: DbCheckResponse =
            serde_json::from_str(r#"{"success":true,"count":7}"#).unwrap();
        assert_eq!(
            parsed,
            DbCheckResponse::Connected {
                success: true,
                count: 7
            }
        );
    }

    #[test]
    fn test_db_check_failed_deserialization() {
        let parsed: DbCheckResponse =
            serde_json::from_str(r#"{"error":"Database connection failed"}"#).unwrap();
        assert_eq!(
            parsed,
            DbCheckResponse::Failed {
                error: "Database connection failed".to_string()
            }
        );
    }

    #[test]
    fn test_protected_response_deserialization() {
        let parsed: ProtectedResponse = serde_json::from_str(
            r#"{"message":"This is a protected route","user":{"id":"42","email":"x@y.com"}}"#,
        )
        .unwrap();
        assert_eq!(parsed.user.id, "42");
        assert_eq!(parsed.user.email, "x@y.com");
    }

    #[test]
    fn test_dashboard_summary_deserialization() {
        let parsed: DashboardSummary = serde_json::from_str(
            r#"{
                "user": {"id": "42", "email": "x@y.com"},
                "total_pnl": 0.0,
                "active_trades": 0,
                "win_rate": 0.0,
                "recent_trades": [
                    {"time": "2024-03-29T16:00:00Z", "pair": "ETH/USDC", "side": "buy", "price": 3500.0, "pnl": 4.5}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.recent_trades.len(), 1);
        assert_eq!(parsed.recent_trades[0].side, TradeSide::Buy);
    }

    #[test]
    fn test_error_body_without_code() {
        let parsed: ErrorBody = serde_json::from_str(r#"{"error":"Invalid token"}"#).unwrap();
        assert_eq!(parsed.error, "Invalid token");
        assert!(parsed.code.is_none());
    }
}
