// ============================================================================
// Per-Call Result Records
// ============================================================================
//
// Rejections are data, not panics: every fallible operation reports its
// outcome through these records and leaves the book untouched on failure.

use thiserror::Error;

use crate::numeric::Price;

use super::order::{OrderId, Quantity};
use super::trade::Trade;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Rejection Taxonomy
// ============================================================================

/// Why an `add` or `modify` call was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RejectReason {
    #[error("Duplicate order id: {id}")]
    DuplicateOrderId { id: OrderId },

    #[error("Invalid quantity: must be positive")]
    InvalidQuantity,

    #[error("Limit order requires price")]
    MissingPrice,

    #[error("Invalid price: must be positive")]
    NonPositivePrice,

    #[error("Market orders cannot be good-till-cancel")]
    IncompatibleTimeInForce,

    #[error("Insufficient liquidity for full fill: available {available}, required {required}")]
    InsufficientLiquidity {
        available: Quantity,
        required: Quantity,
    },

    #[error("No liquidity: opposite side empty")]
    NoLiquidity,

    #[error("Order not found: {id}")]
    NotFound { id: OrderId },

    #[error("Modification would cross the spread")]
    WouldCrossSpread,
}

// ============================================================================
// Self-Trade Prevention Report
// ============================================================================

/// What self-trade prevention did during one `add` call.
///
/// STP actions are normal policy outcomes, not errors: they are reported
/// inside an accepted `OrderResult`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StpReport {
    /// True if any self-trade was detected during matching.
    pub self_trade: bool,
    /// Orders cancelled by the STP policy (may include the incoming id).
    pub cancelled_orders: Vec<OrderId>,
    /// Human-readable description of the action taken.
    pub action: Option<String>,
}

// ============================================================================
// Add Result
// ============================================================================

/// Outcome of `OrderBook::add_order`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderResult {
    pub accepted: bool,
    pub reject_reason: Option<RejectReason>,
    /// Trades in execution order (price priority, then FIFO).
    pub trades: Vec<Trade>,
    /// Quantity left after matching: rested for GTC, dropped otherwise.
    pub remaining_quantity: Quantity,
    pub stp: StpReport,
}

impl OrderResult {
    pub(crate) fn rejected(reason: RejectReason, remaining_quantity: Quantity) -> Self {
        Self {
            accepted: false,
            reject_reason: Some(reason),
            trades: Vec::new(),
            remaining_quantity,
            stp: StpReport::default(),
        }
    }

    /// Total quantity executed by this call.
    pub fn filled_quantity(&self) -> Quantity {
        self.trades.iter().map(|t| t.quantity).sum()
    }
}

// ============================================================================
// Modify Result
// ============================================================================

/// Outcome of `OrderBook::modify_order`.
///
/// For a rejected modify of an unknown id the old/new fields are zeroed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModifyResult {
    pub accepted: bool,
    pub reject_reason: Option<RejectReason>,
    pub old_price: Price,
    pub new_price: Price,
    pub old_quantity: Quantity,
    pub new_quantity: Quantity,
}

impl ModifyResult {
    pub(crate) fn rejected(reason: RejectReason) -> Self {
        Self {
            accepted: false,
            reject_reason: Some(reason),
            old_price: Price::ZERO,
            new_price: Price::ZERO,
            old_quantity: 0,
            new_quantity: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_reason_display() {
        assert_eq!(
            RejectReason::InvalidQuantity.to_string(),
            "Invalid quantity: must be positive"
        );
        assert_eq!(
            RejectReason::DuplicateOrderId { id: 7 }.to_string(),
            "Duplicate order id: 7"
        );
        let fok = RejectReason::InsufficientLiquidity {
            available: 50,
            required: 100,
        };
        assert!(fok.to_string().contains("Insufficient liquidity"));
        assert!(RejectReason::NoLiquidity.to_string().contains("No liquidity"));
    }

    #[test]
    fn test_rejected_result_has_no_trades() {
        let result = OrderResult::rejected(RejectReason::InvalidQuantity, -5);
        assert!(!result.accepted);
        assert!(result.trades.is_empty());
        assert_eq!(result.filled_quantity(), 0);
        assert!(!result.stp.self_trade);
    }

    #[test]
    fn test_rejected_modify_zeroes_fields() {
        let result = ModifyResult::rejected(RejectReason::NotFound { id: 999 });
        assert!(!result.accepted);
        assert_eq!(result.old_price, Price::ZERO);
        assert_eq!(result.old_quantity, 0);
    }
}
