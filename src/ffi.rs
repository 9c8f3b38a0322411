// ============================================================================
// C Foreign Function Interface
// ABI-stable wrapper around the engine for embedding from C
// ============================================================================
//
// Conventions:
// - The book handle is an opaque pointer owned by the caller between
//   `mb_orderbook_create` and `mb_orderbook_destroy`.
// - Result structs are heap-allocated by the library and must be released
//   with the matching `mb_free_*` call, which also frees the embedded
//   arrays and strings.
// - Market data queries return plain structs/scalars by value.
// - Enum fields carry the wire codes: Side BUY=0/SELL=1, OrderType
//   LIMIT=0/MARKET=1, TIF GTC=0/IOC=1/FOK=2, STP ALLOW=0..DECREMENT_AND_CANCEL=4.
//   Unknown codes fall back to the first variant, mirroring lenient C enums.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::domain::{Order, OrderType, Side, StpMode, TimeInForce, Timestamp};
use crate::engine::OrderBook;
use crate::numeric::Price;

// ============================================================================
// Input struct (caller owns)
// ============================================================================

#[repr(C)]
pub struct MbOrder {
    pub trader_id: *const c_char,
    pub id: u64,
    /// Minor units; ignored when `has_price` is false.
    pub price: i64,
    pub quantity: i64,
    pub side: u32,
    pub order_type: u32,
    pub time_in_force: u32,
    pub stp_mode: u32,
    pub has_price: bool,
}

// ============================================================================
// Output structs (library allocates, caller frees via mb_free_*)
// ============================================================================

#[repr(C)]
pub struct MbTrade {
    pub trade_id: u64,
    pub buy_order_id: u64,
    pub sell_order_id: u64,
    pub price: i64,
    pub quantity: i64,
    pub timestamp_ns: i64,
}

#[repr(C)]
pub struct MbStpResult {
    pub self_trade: bool,
    /// Heap-allocated array, may be NULL.
    pub cancelled_orders: *mut u64,
    pub cancelled_orders_len: usize,
    /// Heap-allocated string, may be NULL.
    pub action: *mut c_char,
}

#[repr(C)]
pub struct MbOrderResult {
    pub accepted: bool,
    /// Heap-allocated string, NULL if accepted.
    pub reject_reason: *mut c_char,
    /// Heap-allocated array, may be NULL.
    pub trades: *mut MbTrade,
    pub trades_len: usize,
    pub remaining_quantity: i64,
    pub stp_result: MbStpResult,
}

#[repr(C)]
pub struct MbModifyResult {
    pub accepted: bool,
    pub reject_reason: *mut c_char,
    pub old_price: i64,
    pub new_price: i64,
    pub old_quantity: i64,
    pub new_quantity: i64,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct MbPriceData {
    pub timestamp_ns: i64,
    pub bid_price: i64,
    pub ask_price: i64,
    pub mid_price: i64,
    pub spread: i64,
    pub last_trade_price: i64,
    pub last_trade_qty: i64,
}

// ============================================================================
// Conversion helpers
// ============================================================================

fn string_to_ptr(s: String) -> *mut c_char {
    if s.is_empty() {
        return ptr::null_mut();
    }
    match CString::new(s) {
        Ok(cstring) => cstring.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

fn vec_into_raw<T>(values: Vec<T>) -> (*mut T, usize) {
    if values.is_empty() {
        return (ptr::null_mut(), 0);
    }
    let boxed = values.into_boxed_slice();
    let len = boxed.len();
    (Box::into_raw(boxed) as *mut T, len)
}

unsafe fn free_raw_vec<T>(data: *mut T, len: usize) {
    if !data.is_null() && len > 0 {
        drop(Box::from_raw(std::slice::from_raw_parts_mut(data, len)));
    }
}

unsafe fn free_string_ptr(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

unsafe fn order_from_c(c_order: &MbOrder) -> Order {
    let trader_id = if c_order.trader_id.is_null() {
        String::new()
    } else {
        CStr::from_ptr(c_order.trader_id)
            .to_string_lossy()
            .into_owned()
    };

    Order {
        id: c_order.id,
        trader_id,
        side: Side::from_u8(c_order.side as u8).unwrap_or(Side::Buy),
        order_type: OrderType::from_u8(c_order.order_type as u8).unwrap_or(OrderType::Limit),
        price: c_order.has_price.then(|| Price::from_raw(c_order.price)),
        quantity: c_order.quantity,
        time_in_force: TimeInForce::from_u8(c_order.time_in_force as u8)
            .unwrap_or(TimeInForce::GoodTillCancel),
        stp_mode: StpMode::from_u8(c_order.stp_mode as u8).unwrap_or(StpMode::Allow),
        timestamp: Timestamp::ZERO,
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Create an engine instance. Release with `mb_orderbook_destroy`.
#[no_mangle]
pub extern "C" fn mb_orderbook_create() -> *mut OrderBook {
    Box::into_raw(Box::new(OrderBook::new()))
}

/// Destroy an engine created by `mb_orderbook_create`, releasing all book
/// state. NULL is a no-op.
///
/// # Safety
/// `book` must be a pointer returned by `mb_orderbook_create` that has not
/// already been destroyed.
#[no_mangle]
pub unsafe extern "C" fn mb_orderbook_destroy(book: *mut OrderBook) {
    if !book.is_null() {
        drop(Box::from_raw(book));
    }
}

// ============================================================================
// Order operations
// ============================================================================

/// Submit an order. The returned result must be released with
/// `mb_free_order_result`.
///
/// # Safety
/// `book` must be a live engine pointer; `order` must point to a valid
/// `MbOrder` whose `trader_id` is NULL or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn mb_orderbook_add_order(
    book: *mut OrderBook,
    order: *const MbOrder,
) -> *mut MbOrderResult {
    let book = &mut *book;
    let result = book.add_order(order_from_c(&*order));

    let trades: Vec<MbTrade> = result
        .trades
        .iter()
        .map(|t| MbTrade {
            trade_id: t.trade_id,
            buy_order_id: t.buy_order_id,
            sell_order_id: t.sell_order_id,
            price: t.price.raw_value(),
            quantity: t.quantity,
            timestamp_ns: t.time.as_nanos(),
        })
        .collect();
    let (trades, trades_len) = vec_into_raw(trades);
    let (cancelled_orders, cancelled_orders_len) = vec_into_raw(result.stp.cancelled_orders);

    Box::into_raw(Box::new(MbOrderResult {
        accepted: result.accepted,
        reject_reason: result
            .reject_reason
            .map(|r| string_to_ptr(r.to_string()))
            .unwrap_or(ptr::null_mut()),
        trades,
        trades_len,
        remaining_quantity: result.remaining_quantity,
        stp_result: MbStpResult {
            self_trade: result.stp.self_trade,
            cancelled_orders,
            cancelled_orders_len,
            action: result
                .stp
                .action
                .map(string_to_ptr)
                .unwrap_or(ptr::null_mut()),
        },
    }))
}

/// Cancel a resting order. Returns true iff the id was resting.
///
/// # Safety
/// `book` must be a live engine pointer.
#[no_mangle]
pub unsafe extern "C" fn mb_orderbook_cancel_order(book: *mut OrderBook, id: u64) -> bool {
    (*book).cancel_order(id)
}

/// Modify a resting order. The returned result must be released with
/// `mb_free_modify_result`.
///
/// # Safety
/// `book` must be a live engine pointer.
#[no_mangle]
pub unsafe extern "C" fn mb_orderbook_modify_order(
    book: *mut OrderBook,
    id: u64,
    new_price: i64,
    new_quantity: i64,
) -> *mut MbModifyResult {
    let result = (*book).modify_order(id, Price::from_raw(new_price), new_quantity);

    Box::into_raw(Box::new(MbModifyResult {
        accepted: result.accepted,
        reject_reason: result
            .reject_reason
            .map(|r| string_to_ptr(r.to_string()))
            .unwrap_or(ptr::null_mut()),
        old_price: result.old_price.raw_value(),
        new_price: result.new_price.raw_value(),
        old_quantity: result.old_quantity,
        new_quantity: result.new_quantity,
    }))
}

// ============================================================================
// Market data queries (returned by value, no heap allocation)
// ============================================================================

/// # Safety
/// `book` must be a live engine pointer.
#[no_mangle]
pub unsafe extern "C" fn mb_orderbook_get_snapshot(book: *const OrderBook) -> MbPriceData {
    let snap = (*book).snapshot();
    MbPriceData {
        timestamp_ns: snap.timestamp_ns,
        bid_price: snap.bid_price.raw_value(),
        ask_price: snap.ask_price.raw_value(),
        mid_price: snap.mid_price.raw_value(),
        spread: snap.spread.raw_value(),
        last_trade_price: snap.last_trade_price.raw_value(),
        last_trade_qty: snap.last_trade_qty,
    }
}

/// # Safety
/// `book` must be a live engine pointer.
#[no_mangle]
pub unsafe extern "C" fn mb_orderbook_get_best_bid(book: *const OrderBook) -> i64 {
    (*book).best_bid().raw_value()
}

/// # Safety
/// `book` must be a live engine pointer.
#[no_mangle]
pub unsafe extern "C" fn mb_orderbook_get_best_ask(book: *const OrderBook) -> i64 {
    (*book).best_ask().raw_value()
}

/// # Safety
/// `book` must be a live engine pointer.
#[no_mangle]
pub unsafe extern "C" fn mb_orderbook_get_spread(book: *const OrderBook) -> i64 {
    (*book).spread().raw_value()
}

/// # Safety
/// `book` must be a live engine pointer.
#[no_mangle]
pub unsafe extern "C" fn mb_orderbook_get_mid_price(book: *const OrderBook) -> i64 {
    (*book).mid_price().raw_value()
}

/// # Safety
/// `book` must be a live engine pointer.
#[no_mangle]
pub unsafe extern "C" fn mb_orderbook_get_last_trade_price(book: *const OrderBook) -> i64 {
    (*book).last_trade_price().raw_value()
}

/// # Safety
/// `book` must be a live engine pointer.
#[no_mangle]
pub unsafe extern "C" fn mb_orderbook_get_last_trade_qty(book: *const OrderBook) -> i64 {
    (*book).last_trade_qty()
}

// ============================================================================
// Memory cleanup
// ============================================================================

/// Release a result returned by `mb_orderbook_add_order`, including its
/// trades array and STP strings. NULL is a no-op.
///
/// # Safety
/// `result` must come from `mb_orderbook_add_order` and not have been freed.
#[no_mangle]
pub unsafe extern "C" fn mb_free_order_result(result: *mut MbOrderResult) {
    if result.is_null() {
        return;
    }
    let result = Box::from_raw(result);
    free_string_ptr(result.reject_reason);
    free_raw_vec(result.trades, result.trades_len);
    free_raw_vec(
        result.stp_result.cancelled_orders,
        result.stp_result.cancelled_orders_len,
    );
    free_string_ptr(result.stp_result.action);
}

/// Release a result returned by `mb_orderbook_modify_order`. NULL is a no-op.
///
/// # Safety
/// `result` must come from `mb_orderbook_modify_order` and not have been
/// freed.
#[no_mangle]
pub unsafe extern "C" fn mb_free_modify_result(result: *mut MbModifyResult) {
    if result.is_null() {
        return;
    }
    let result = Box::from_raw(result);
    free_string_ptr(result.reject_reason);
}

// ============================================================================
// Tests
// ============================================================================
