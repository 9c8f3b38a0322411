// ============================================================================
// Market Snapshot
// ============================================================================

use crate::numeric::Price;

use super::order::Quantity;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Timestamped top-of-book bundle.
///
/// All price fields are zero when the corresponding side (or both, for
/// mid/spread) is empty; the last-trade fields are sticky across quiet
/// periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MarketSnapshot {
    /// Nanoseconds since the engine's clock origin.
    pub timestamp_ns: i64,
    pub bid_price: Price,
    pub ask_price: Price,
    /// (bid + ask) / 2, truncating integer division on minor units.
    pub mid_price: Price,
    /// ask - bid.
    pub spread: Price,
    pub last_trade_price: Price,
    pub last_trade_qty: Quantity,
}
