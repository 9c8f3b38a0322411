// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod order;
pub mod result;
pub mod snapshot;
pub mod time;
pub mod trade;

pub use order::{Order, OrderId, OrderType, Quantity, Side, StpMode, TimeInForce};
pub use result::{ModifyResult, OrderResult, RejectReason, StpReport};
pub use snapshot::MarketSnapshot;
pub use time::{EngineClock, Timestamp};
pub use trade::{Trade, TradeId};
