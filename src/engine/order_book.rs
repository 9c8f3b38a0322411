// ============================================================================
// Order Book Engine
// Admission, dispatch, cancellation, modification, market data
// ============================================================================

use std::collections::HashMap;
use std::fmt::Write as _;

use tracing::debug;

use crate::book::{BookSide, OrderLocation};
use crate::domain::{
    EngineClock, MarketSnapshot, ModifyResult, Order, OrderId, OrderResult, OrderType, Quantity,
    RejectReason, Side, StpMode, TimeInForce, TradeId,
};
use crate::numeric::Price;

/// Single-symbol limit order book with strict price-time priority.
///
/// The engine is single-threaded and non-suspending: every operation is a
/// bounded computation over in-memory structures, runs to completion, and
/// observes linearizable semantics in call order. Multi-threaded deployments
/// must serialize calls externally. Instances are fully independent; all
/// book state is released on drop.
#[derive(Debug)]
pub struct OrderBook {
    pub(super) bids: BookSide,
    pub(super) asks: BookSide,
    pub(super) order_index: HashMap<OrderId, OrderLocation>,
    pub(super) last_trade_price: Price,
    pub(super) last_trade_qty: Quantity,
    pub(super) next_trade_id: TradeId,
    pub(super) clock: EngineClock,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            bids: BookSide::new(Side::Buy),
            asks: BookSide::new(Side::Sell),
            order_index: HashMap::new(),
            last_trade_price: Price::ZERO,
            last_trade_qty: 0,
            next_trade_id: 1,
            clock: EngineClock::start(),
        }
    }

    // ========================================================================
    // Admission
    // ========================================================================

    /// Submit an order: validate, match against the opposite side, then rest
    /// or drop the residue according to time-in-force.
    ///
    /// Validation failures report the first failed check and leave the book
    /// untouched; they consume no trade id.
    pub fn add_order(&mut self, mut order: Order) -> OrderResult {
        let submitted_quantity = order.quantity;

        if self.order_index.contains_key(&order.id) {
            return OrderResult::rejected(
                RejectReason::DuplicateOrderId { id: order.id },
                submitted_quantity,
            );
        }
        if order.quantity <= 0 {
            return OrderResult::rejected(RejectReason::InvalidQuantity, submitted_quantity);
        }
        if order.is_limit_order() && order.price.is_none() {
            return OrderResult::rejected(RejectReason::MissingPrice, submitted_quantity);
        }
        if let Some(price) = order.price {
            if !price.is_positive() {
                return OrderResult::rejected(RejectReason::NonPositivePrice, submitted_quantity);
            }
        }
        if order.is_market_order() && order.time_in_force == TimeInForce::GoodTillCancel {
            return OrderResult::rejected(
                RejectReason::IncompatibleTimeInForce,
                submitted_quantity,
            );
        }
        if order.time_in_force == TimeInForce::FillOrKill {
            let available = self.fok_available(&order);
            if available < order.quantity {
                return OrderResult::rejected(
                    RejectReason::InsufficientLiquidity {
                        available,
                        required: order.quantity,
                    },
                    submitted_quantity,
                );
            }
        }

        order.timestamp = self.clock.now();

        match order.order_type {
            OrderType::Market => self.execute_market(order),
            OrderType::Limit => self.execute_limit(order),
        }
    }

    fn execute_market(&mut self, mut order: Order) -> OrderResult {
        let opposite_empty = match order.side {
            Side::Buy => self.asks.is_empty(),
            Side::Sell => self.bids.is_empty(),
        };
        if opposite_empty {
            return OrderResult::rejected(RejectReason::NoLiquidity, order.quantity);
        }

        let (trades, stp) = self.match_incoming(&mut order);
        debug!(
            id = order.id,
            trades = trades.len(),
            residue = order.quantity,
            "market order executed"
        );

        // Market orders never rest; any residue is discarded.
        OrderResult {
            accepted: true,
            reject_reason: None,
            trades,
            remaining_quantity: order.quantity,
            stp,
        }
    }

    fn execute_limit(&mut self, mut order: Order) -> OrderResult {
        let (trades, stp) = self.match_incoming(&mut order);
        let remaining_quantity = order.quantity;

        if remaining_quantity > 0 && order.time_in_force == TimeInForce::GoodTillCancel {
            debug!(id = order.id, quantity = remaining_quantity, "resting residue");
            self.rest_order(order);
        }

        OrderResult {
            accepted: true,
            reject_reason: None,
            trades,
            remaining_quantity,
            stp,
        }
    }

    fn rest_order(&mut self, order: Order) {
        let id = order.id;
        let side = order.side;
        let price = order.price.expect("only limit orders rest on the book");

        let handle = self.side_mut(side).insert(order);
        self.order_index
            .insert(id, OrderLocation { side, price, handle });
    }

    /// Opposite-side quantity matchable by `order`, for the FOK pre-check.
    ///
    /// DECREMENT_AND_CANCEL skips same-trader resting quantity, so it is
    /// excluded from the sum. The other STP modes count all quantity; a
    /// self-trade they would hit surfaces during matching per policy.
    fn fok_available(&self, order: &Order) -> Quantity {
        let opposite = match order.side {
            Side::Buy => &self.asks,
            Side::Sell => &self.bids,
        };

        let skip_own = order.stp_mode == StpMode::DecrementAndCancel && !order.trader_id.is_empty();

        let mut available: Quantity = 0;
        for (price, level) in opposite.levels_best_first() {
            if let Some(limit) = order.price {
                let satisfies = match order.side {
                    Side::Buy => price <= limit,
                    Side::Sell => price >= limit,
                };
                if !satisfies {
                    break;
                }
            }

            available += level.total_quantity();
            if skip_own {
                for (_, resting) in opposite.orders_at(price) {
                    if resting.trader_id == order.trader_id {
                        available -= resting.quantity;
                    }
                }
            }

            if available >= order.quantity {
                break;
            }
        }
        available
    }

    // ========================================================================
    // Cancellation
    // ========================================================================

    /// Remove a resting order. Returns true iff the id was resting.
    pub fn cancel_order(&mut self, id: OrderId) -> bool {
        let Some(location) = self.order_index.remove(&id) else {
            return false;
        };
        self.side_mut(location.side).remove(location.handle);
        debug!(id, "order cancelled");
        true
    }

    // ========================================================================
    // Modification (cancel/replace)
    // ========================================================================

    /// Modify a resting order.
    ///
    /// A same-price quantity decrease is applied in place and keeps the
    /// order's queue position. Anything else is a replace: the order loses
    /// time priority, is re-stamped, and is appended at the tail of its new
    /// level. A replace that would immediately cross the opposite best is
    /// rejected rather than matched.
    pub fn modify_order(
        &mut self,
        id: OrderId,
        new_price: Price,
        new_quantity: Quantity,
    ) -> ModifyResult {
        let Some(location) = self.order_index.get(&id).copied() else {
            return ModifyResult::rejected(RejectReason::NotFound { id });
        };

        let old_price = location.price;
        let old_quantity = self.side(location.side).order(location.handle).quantity;

        let reject = |reason| ModifyResult {
            accepted: false,
            reject_reason: Some(reason),
            old_price,
            new_price,
            old_quantity,
            new_quantity,
        };

        if new_quantity <= 0 {
            return reject(RejectReason::InvalidQuantity);
        }
        if !new_price.is_positive() {
            return reject(RejectReason::NonPositivePrice);
        }

        if new_price == old_price && new_quantity <= old_quantity {
            // Quantity decrease in place; time priority preserved.
            let delta = old_quantity - new_quantity;
            if delta > 0 {
                self.side_mut(location.side)
                    .reduce_quantity(location.handle, delta);
            }
            debug!(id, %old_price, old_quantity, new_quantity, "modify in place");
        } else {
            let would_cross = match location.side {
                Side::Buy => self.asks.best_price().is_some_and(|ask| new_price >= ask),
                Side::Sell => self.bids.best_price().is_some_and(|bid| new_price <= bid),
            };
            if would_cross {
                return reject(RejectReason::WouldCrossSpread);
            }

            let mut order = self.side_mut(location.side).remove(location.handle);
            self.order_index.remove(&id);
            order.price = Some(new_price);
            order.quantity = new_quantity;
            order.timestamp = self.clock.now();
            self.rest_order(order);
            debug!(id, %old_price, %new_price, old_quantity, new_quantity, "modify as replace");
        }

        ModifyResult {
            accepted: true,
            reject_reason: None,
            old_price,
            new_price,
            old_quantity,
            new_quantity,
        }
    }

    // ========================================================================
    // Market Data
    // ========================================================================

    /// Highest resting bid, or zero when the bid side is empty.
    pub fn best_bid(&self) -> Price {
        self.bids.best_price().unwrap_or(Price::ZERO)
    }

    /// Lowest resting ask, or zero when the ask side is empty.
    pub fn best_ask(&self) -> Price {
        self.asks.best_price().unwrap_or(Price::ZERO)
    }

    /// ask - bid, or zero when either side is empty.
    pub fn spread(&self) -> Price {
        match (self.bids.best_price(), self.asks.best_price()) {
            (Some(bid), Some(ask)) => ask - bid,
            _ => Price::ZERO,
        }
    }

    /// (bid + ask) / 2 with truncating integer division, or zero when either
    /// side is empty.
    pub fn mid_price(&self) -> Price {
        match (self.bids.best_price(), self.asks.best_price()) {
            (Some(bid), Some(ask)) => bid.midpoint(ask),
            _ => Price::ZERO,
        }
    }

    /// Price of the most recent trade; sticky across quiet periods.
    pub fn last_trade_price(&self) -> Price {
        self.last_trade_price
    }

    /// Size of the most recent trade; sticky across quiet periods.
    pub fn last_trade_qty(&self) -> Quantity {
        self.last_trade_qty
    }

    /// Timestamped top-of-book bundle.
    pub fn snapshot(&self) -> MarketSnapshot {
        MarketSnapshot {
            timestamp_ns: self.clock.now().as_nanos(),
            bid_price: self.best_bid(),
            ask_price: self.best_ask(),
            mid_price: self.mid_price(),
            spread: self.spread(),
            last_trade_price: self.last_trade_price,
            last_trade_qty: self.last_trade_qty,
        }
    }

    /// Aggregate (price, quantity) for the best `num_levels` levels of one
    /// side, best price first.
    pub fn depth(&self, side: Side, num_levels: usize) -> Vec<(Price, Quantity)> {
        self.side(side).depth(num_levels)
    }

    /// The resting order behind `id`, if it is live on the book.
    pub fn get_order(&self, id: OrderId) -> Option<&Order> {
        self.order_index
            .get(&id)
            .map(|location| self.side(location.side).order(location.handle))
    }

    /// Number of resting orders across both sides.
    pub fn order_count(&self) -> usize {
        self.order_index.len()
    }

    /// ASCII rendering of the book: asks top-down, spread divider, bids.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} ORDER BOOK {}", "=".repeat(10), "=".repeat(10));
        let _ = writeln!(out, "ASKS:");
        let asks = self.asks.depth(usize::MAX);
        for (price, qty) in asks.iter().rev() {
            let _ = writeln!(out, "  ${} | {} shares", price, qty);
        }
        let _ = writeln!(
            out,
            "{} SPREAD: {} {}",
            "-".repeat(10),
            self.spread(),
            "-".repeat(10)
        );
        let _ = writeln!(out, "BIDS:");
        for (price, qty) in self.bids.depth(usize::MAX) {
            let _ = writeln!(out, "  ${} | {} shares", price, qty);
        }
        let _ = write!(out, "{}", "=".repeat(32));
        out
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }
}
