// ============================================================================
// Order Domain Model
// ============================================================================

use crate::numeric::Price;

use super::time::Timestamp;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects
// ============================================================================

/// Caller-supplied order identifier, unique across live orders.
pub type OrderId = u64;

/// Number of units. Signed so that decrement arithmetic stays safe;
/// every accepted order and resting entry carries a strictly positive value.
pub type Quantity = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side an incoming order matches against.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Wire code for ABI-stable embeddings (BUY=0, SELL=1).
    pub fn as_u8(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrderType {
    /// Has a price, rests on the book if not filled
    Limit,
    /// Takes the best available price, never rests
    Market,
}

impl OrderType {
    /// Wire code (LIMIT=0, MARKET=1).
    pub fn as_u8(self) -> u8 {
        match self {
            OrderType::Limit => 0,
            OrderType::Market => 1,
        }
    }

    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0 => Some(OrderType::Limit),
            1 => Some(OrderType::Market),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimeInForce {
    /// Good Till Cancel - rests until filled or cancelled
    GoodTillCancel,
    /// Immediate Or Cancel - fill what crosses, drop the remainder
    ImmediateOrCancel,
    /// Fill Or Kill - fill the entire order immediately or reject it
    FillOrKill,
}

impl TimeInForce {
    /// Wire code (GTC=0, IOC=1, FOK=2).
    pub fn as_u8(self) -> u8 {
        match self {
            TimeInForce::GoodTillCancel => 0,
            TimeInForce::ImmediateOrCancel => 1,
            TimeInForce::FillOrKill => 2,
        }
    }

    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0 => Some(TimeInForce::GoodTillCancel),
            1 => Some(TimeInForce::ImmediateOrCancel),
            2 => Some(TimeInForce::FillOrKill),
            _ => None,
        }
    }
}

/// Self-trade prevention policy, enforced per incoming order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StpMode {
    /// No self-trade prevention (default)
    Allow,
    /// Kill the incoming order, leave the resting order untouched
    CancelNewest,
    /// Remove the resting order, keep matching the incoming order
    CancelOldest,
    /// Remove the resting order and kill the incoming order
    CancelBoth,
    /// Skip the self-trade pair, keep matching against other orders
    DecrementAndCancel,
}

impl StpMode {
    /// Wire code (ALLOW=0, CANCEL_NEWEST=1, CANCEL_OLDEST=2, CANCEL_BOTH=3,
    /// DECREMENT_AND_CANCEL=4).
    pub fn as_u8(self) -> u8 {
        match self {
            StpMode::Allow => 0,
            StpMode::CancelNewest => 1,
            StpMode::CancelOldest => 2,
            StpMode::CancelBoth => 3,
            StpMode::DecrementAndCancel => 4,
        }
    }

    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0 => Some(StpMode::Allow),
            1 => Some(StpMode::CancelNewest),
            2 => Some(StpMode::CancelOldest),
            3 => Some(StpMode::CancelBoth),
            4 => Some(StpMode::DecrementAndCancel),
            _ => None,
        }
    }
}

// ============================================================================
// Order Entity
// ============================================================================

/// An order as submitted to the engine.
///
/// `timestamp` is stamped by the engine at admission; the value supplied by
/// the caller is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Order {
    pub id: OrderId,
    /// May be empty; used only by self-trade prevention.
    pub trader_id: String,
    pub side: Side,
    pub order_type: OrderType,
    /// Present iff this is a limit order.
    pub price: Option<Price>,
    pub quantity: Quantity,
    pub time_in_force: TimeInForce,
    pub stp_mode: StpMode,
    pub timestamp: Timestamp,
}

impl Order {
    /// Create a limit order. Defaults: no trader id, GTC, STP allow.
    pub fn limit(id: OrderId, price: Price, quantity: Quantity, side: Side) -> Self {
        Self {
            id,
            trader_id: String::new(),
            side,
            order_type: OrderType::Limit,
            price: Some(price),
            quantity,
            time_in_force: TimeInForce::GoodTillCancel,
            stp_mode: StpMode::Allow,
            timestamp: Timestamp::ZERO,
        }
    }

    /// Create a market order. Defaults: no trader id, IOC, STP allow.
    pub fn market(id: OrderId, quantity: Quantity, side: Side) -> Self {
        Self {
            id,
            trader_id: String::new(),
            side,
            order_type: OrderType::Market,
            price: None,
            quantity,
            time_in_force: TimeInForce::ImmediateOrCancel,
            stp_mode: StpMode::Allow,
            timestamp: Timestamp::ZERO,
        }
    }

    /// Attach the trader identity used for self-trade prevention.
    pub fn with_trader(mut self, trader_id: impl Into<String>) -> Self {
        self.trader_id = trader_id.into();
        self
    }

    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }

    pub fn with_stp_mode(mut self, mode: StpMode) -> Self {
        self.stp_mode = mode;
        self
    }

    pub fn is_market_order(&self) -> bool {
        matches!(self.order_type, OrderType::Market)
    }

    pub fn is_limit_order(&self) -> bool {
        matches!(self.order_type, OrderType::Limit)
    }
}
