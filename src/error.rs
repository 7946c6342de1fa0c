//! Error types for startup configuration, persistence and the shop
//!
//! The per-tick simulation never returns errors; everything here happens
//! outside the frame loop.

use crate::shop::ShopItem;

/// Fatal configuration errors (abort initialization)
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error reading a configuration file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed document or missing key
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Key present but its value breaks a simulation invariant
    #[error("Invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Save store errors
#[derive(thiserror::Error, Debug)]
pub enum PersistenceError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Rejected shop purchases
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("Not enough coins: item costs {cost}, have {coins}")]
    InsufficientCoins { cost: u64, coins: u64 },

    #[error("{0:?} already owned")]
    AlreadyOwned(ShopItem),
}
