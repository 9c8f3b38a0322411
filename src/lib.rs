// ============================================================================
// Matchbook Library
// Single-symbol limit order book with strict price-time priority
// ============================================================================

//! # Matchbook
//!
//! A continuous limit-order-book matching engine for a single symbol.
//!
//! ## Features
//!
//! - **Strict price-time priority**: price levels match best-first, orders
//!   within a level match in FIFO order
//! - **Limit and market orders** with GTC / IOC / FOK time-in-force
//! - **Self-trade prevention** with cancel-newest, cancel-oldest,
//!   cancel-both and decrement-and-cancel policies
//! - **Cancel and cancel/replace** with a priority-preserving fast path for
//!   in-place quantity decreases
//! - **Integer fixed-point prices** (minor units, scale 100); no floating
//!   point ever touches money
//! - **C FFI** for embedding from other languages
//!
//! The engine is single-threaded and non-suspending: operations run to
//! completion in call order, and multi-threaded deployments serialize calls
//! externally. Instances are independent and cheap to create.
//!
//! ## Example
//!
//! ```rust
//! use matchbook::prelude::*;
//!
//! let mut book = OrderBook::new();
//!
//! // Rest a sell, then cross it with a buy
//! book.add_order(Order::limit(1, Price::from_raw(10_050), 50, Side::Sell));
//! let result = book.add_order(Order::limit(2, Price::from_raw(10_050), 30, Side::Buy));
//!
//! assert_eq!(result.trades.len(), 1);
//! assert_eq!(result.trades[0].price, Price::from_raw(10_050));
//! assert_eq!(book.best_ask(), Price::from_raw(10_050));
//! ```

mod book;
pub mod domain;
pub mod engine;
pub mod ffi;
pub mod history;
pub mod numeric;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        MarketSnapshot, ModifyResult, Order, OrderId, OrderResult, OrderType, Quantity,
        RejectReason, Side, StpMode, StpReport, TimeInForce, Timestamp, Trade, TradeId,
    };
    pub use crate::engine::OrderBook;
    pub use crate::history::PriceHistory;
    pub use crate::numeric::Price;
}
