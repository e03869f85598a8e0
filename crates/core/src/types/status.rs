//! Order status.
//!
//! Status transitions are enforced by the server. The client only carries
//! the value and never checks whether a transition is legal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an unknown order status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid order status: {0} (expected Pending, Confirmed, Shipped, Delivered or Cancelled)")]
pub struct ParseOrderStatusError(pub String);

/// Lifecycle status of an order.
///
/// Serialized with the exact capitalized names the API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseOrderStatusError(s.to_owned()))
    }
}
