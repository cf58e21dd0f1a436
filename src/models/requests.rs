//! Request DTOs for the explorer API
//!
//! Defines the query parameters and bodies the proxy accepts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query parameters for the block listing (GET /api/blocks)
#[derive(Debug, Clone, Deserialize)]
pub struct BlocksQuery {
    /// Page number, 1-based
    #[serde(default)]
    pub page: Option<u32>,
    /// Number of blocks per page
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl BlocksQuery {
    /// Page defaulting to 1.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    /// Page size defaulting to 10.
    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(10)
    }
}

/// Query parameters for mining (GET /api/mine)
#[derive(Debug, Clone, Deserialize)]
pub struct MineQuery {
    /// Address credited with the mining reward
    #[serde(default)]
    pub miner: Option<String>,
}

/// Request body for submitting a transaction (POST /api/transactions)
///
/// # Fields
/// - `sender`: address the funds come from
/// - `recipient`: address the funds go to
/// - `amount`: amount transferred, must be positive
/// - `data`: optional opaque payload attached to the transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransactionRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl NewTransactionRequest {
    /// Validates the request data.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.sender.is_empty() {
            return Some("Sender cannot be empty".to_string());
        }
        if self.recipient.is_empty() {
            return Some("Recipient cannot be empty".to_string());
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Some("Amount must be a positive number".to_string());
        }
        None
    }
}
