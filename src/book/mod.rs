// ============================================================================
// Book Module
// Price-sorted sides, per-price FIFO queues, and the order arena
// ============================================================================
//
// Each resting order is reachable by two paths: its slot in a price level's
// FIFO queue and the engine's by-id index. The queue (via the side's arena)
// owns the order record; the index holds a non-owning `OrderLocation` whose
// handle stays valid until the owning side removes the order.

mod level;
mod side;

pub(crate) use side::{BookSide, OrderHandle};

use crate::domain::Side;
use crate::numeric::Price;

/// Back-pointer from an order id to its exact slot in the book.
///
/// Exists only while the order is live and rested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OrderLocation {
    pub side: Side,
    pub price: Price,
    pub handle: OrderHandle,
}
