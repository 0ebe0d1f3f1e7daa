//! Market data message types

use desim_core::{Price, Trade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-of-book quote
///
/// A zero price on either side means the exchange has no quote yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieveL1Response {
    pub best_bid_price: Price,
    pub best_ask_price: Price,
}

impl RetrieveL1Response {
    pub fn new(best_bid_price: Price, best_ask_price: Price) -> Self {
        Self {
            best_bid_price,
            best_ask_price,
        }
    }

    /// Empty book (both sides at the zero sentinel)
    pub fn empty() -> Self {
        Self::new(Decimal::ZERO, Decimal::ZERO)
    }

    /// Raw midpoint; zero when no quote is available
    pub fn raw_midpoint(&self) -> Price {
        (self.best_bid_price + self.best_ask_price) / Decimal::from(2)
    }

    /// Midpoint, or `None` on the zero sentinel
    pub fn midpoint(&self) -> Option<Price> {
        let mid = self.raw_midpoint();
        if mid.is_zero() { None } else { Some(mid) }
    }
}

/// Trade notification sent to each party of a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTrade {
    pub trade: Trade,
}

impl EventTrade {
    pub fn new(trade: Trade) -> Self {
        Self { trade }
    }
}
