// ============================================================================
// Trade Domain Model
// ============================================================================

use crate::numeric::Price;

use super::order::{OrderId, Quantity};
use super::time::Timestamp;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Engine-assigned trade identifier, strictly increasing per engine instance.
pub type TradeId = u64;

/// A fill between a resting order and an incoming order.
///
/// `buy_order_id` and `sell_order_id` are attributed by side regardless of
/// which order was the aggressor; `price` is the resting (maker) order's
/// price, not the incoming order's limit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trade {
    pub trade_id: TradeId,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub price: Price,
    pub quantity: Quantity,
    pub time: Timestamp,
}
