// ============================================================================
// Book Side
// Price-sorted levels plus the slab arena of resting orders
// ============================================================================

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

use slab::Slab;

use crate::domain::{Order, Quantity, Side};
use crate::numeric::Price;

use super::level::PriceLevel;

/// Stable, opaque handle to a resting order inside a side's arena.
///
/// Handles stay valid across unrelated insertions and removals; a handle is
/// invalidated only when its own order is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct OrderHandle(usize);

impl OrderHandle {
    #[cfg(test)]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }
}

/// Arena node: the order record plus its FIFO queue links.
#[derive(Debug, Clone)]
pub(crate) struct RestingOrder {
    pub order: Order,
    prev: Option<OrderHandle>,
    next: Option<OrderHandle>,
}

/// One side of the book: bids or asks.
///
/// Both sides use the same ascending `BTreeMap`; best-price selection is
/// parameterised on the side tag (bids read the last key, asks the first),
/// so the matching loop never duplicates direction logic.
#[derive(Debug)]
pub(crate) struct BookSide {
    side: Side,
    levels: BTreeMap<Price, PriceLevel>,
    arena: Slab<RestingOrder>,
}

impl BookSide {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            arena: Slab::new(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    // ========================================================================
    // Price iteration
    // ========================================================================

    /// The top-of-book price: highest bid or lowest ask.
    pub fn best_price(&self) -> Option<Price> {
        match self.side {
            Side::Buy => self.levels.last_key_value().map(|(p, _)| *p),
            Side::Sell => self.levels.first_key_value().map(|(p, _)| *p),
        }
    }

    /// The next price strictly worse (for the aggressor) than `prev`:
    /// the next lower bid or next higher ask.
    pub fn next_price_after(&self, prev: Price) -> Option<Price> {
        match self.side {
            Side::Buy => self.levels.range(..prev).next_back().map(|(p, _)| *p),
            Side::Sell => self
                .levels
                .range((Excluded(prev), Unbounded))
                .next()
                .map(|(p, _)| *p),
        }
    }

    /// Iterate levels best-price-first.
    pub fn levels_best_first(&self) -> Box<dyn Iterator<Item = (Price, &PriceLevel)> + '_> {
        match self.side {
            Side::Buy => Box::new(self.levels.iter().rev().map(|(p, l)| (*p, l))),
            Side::Sell => Box::new(self.levels.iter().map(|(p, l)| (*p, l))),
        }
    }

    /// Aggregate (price, quantity) for the best `num_levels` levels.
    pub fn depth(&self, num_levels: usize) -> Vec<(Price, Quantity)> {
        self.levels_best_first()
            .take(num_levels)
            .map(|(price, level)| (price, level.total_quantity()))
            .collect()
    }

    pub fn level(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    // ========================================================================
    // Queue access
    // ========================================================================

    #[inline]
    pub fn order(&self, handle: OrderHandle) -> &Order {
        &self.arena[handle.0].order
    }

    /// Successor of `handle` within its FIFO queue.
    #[inline]
    pub fn next_in_level(&self, handle: OrderHandle) -> Option<OrderHandle> {
        self.arena[handle.0].next
    }

    /// Head of the FIFO queue at `price`.
    pub fn level_head(&self, price: Price) -> Option<OrderHandle> {
        self.levels.get(&price).and_then(|level| level.head())
    }

    /// FIFO iterator over the orders resting at `price`.
    pub fn orders_at(&self, price: Price) -> LevelOrders<'_> {
        LevelOrders {
            side: self,
            cur: self.level_head(price),
        }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Append `order` to the FIFO queue at its limit price, creating the
    /// level if missing. Returns the stable handle for the index.
    pub fn insert(&mut self, order: Order) -> OrderHandle {
        let price = order.price.expect("only limit orders rest on the book");
        let quantity = order.quantity;
        debug_assert!(quantity > 0, "resting orders carry positive quantity");

        let handle = OrderHandle(self.arena.insert(RestingOrder {
            order,
            prev: None,
            next: None,
        }));

        let level = self.levels.entry(price).or_default();
        let prev_tail = level.push_back(handle, quantity);

        self.arena[handle.0].prev = prev_tail;
        if let Some(tail) = prev_tail {
            self.arena[tail.0].next = Some(handle);
        }

        handle
    }

    /// Remove the order behind `handle` in O(1) queue work (plus map
    /// maintenance when its level empties). Returns the order record.
    pub fn remove(&mut self, handle: OrderHandle) -> Order {
        let node = self.arena.remove(handle.0);
        let price = node.order.price.expect("resting orders have a price");

        if let Some(prev) = node.prev {
            self.arena[prev.0].next = node.next;
        }
        if let Some(next) = node.next {
            self.arena[next.0].prev = node.prev;
        }

        let level = self
            .levels
            .get_mut(&price)
            .expect("resting order's level exists");
        level.unlink(handle, node.prev, node.next, node.order.quantity);
        if level.is_empty() {
            self.levels.remove(&price);
        }

        node.order
    }

    /// Decrement an order's quantity and its level's aggregate after a fill
    /// or an in-place modify. The caller removes the order if it hits zero.
    pub fn reduce_quantity(&mut self, handle: OrderHandle, delta: Quantity) {
        let node = &mut self.arena[handle.0];
        debug_assert!(delta > 0 && delta <= node.order.quantity);
        node.order.quantity -= delta;

        let price = node.order.price.expect("resting orders have a price");
        self.levels
            .get_mut(&price)
            .expect("resting order's level exists")
            .reduce(delta);
    }
}

/// FIFO iterator over one level's resting orders.
pub(crate) struct LevelOrders<'a> {
    side: &'a BookSide,
    cur: Option<OrderHandle>,
}

impl<'a> Iterator for LevelOrders<'a> {
    type Item = (OrderHandle, &'a Order);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.cur?;
        self.cur = self.side.next_in_level(handle);
        Some((handle, self.side.order(handle)))
    }
}
