// ============================================================================
// Scripted Demo
// Walks the engine through limit/market orders, STP, cancel and modify
// ============================================================================

use matchbook::prelude::*;

fn print_result(result: &OrderResult) {
    if !result.accepted {
        if let Some(reason) = &result.reject_reason {
            println!("  REJECTED: {reason}");
        }
        return;
    }
    for t in &result.trades {
        println!(
            "  TRADE #{}: {} shares @ ${} (buyer={}, seller={})",
            t.trade_id, t.quantity, t.price, t.buy_order_id, t.sell_order_id
        );
    }
    if result.stp.self_trade {
        if let Some(action) = &result.stp.action {
            println!("  STP: {action} {:?}", result.stp.cancelled_orders);
        }
    }
    if result.remaining_quantity > 0 {
        println!("  Remaining: {} shares", result.remaining_quantity);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut book = OrderBook::new();
    let mut history = PriceHistory::default();

    // Seed the book: bids and asks from different traders
    book.add_order(Order::limit(1, Price::from_raw(10_000), 100, Side::Buy).with_trader("TraderA"));
    book.add_order(Order::limit(2, Price::from_raw(9_950), 200, Side::Buy).with_trader("TraderB"));
    book.add_order(Order::limit(3, Price::from_raw(9_900), 150, Side::Buy).with_trader("TraderC"));
    book.add_order(Order::limit(4, Price::from_raw(10_050), 75, Side::Sell).with_trader("TraderD"));
    book.add_order(Order::limit(5, Price::from_raw(10_100), 300, Side::Sell).with_trader("TraderE"));
    book.add_order(Order::limit(6, Price::from_raw(10_200), 50, Side::Sell).with_trader("TraderF"));

    history.record(book.snapshot());

    println!("=== INITIAL ORDER BOOK ===");
    println!("{}", book.render());
    println!("Mid price: ${}", book.mid_price());

    println!("\n--- Submitting: LIMIT BUY 100 shares @ $101.00 ---");
    let result =
        book.add_order(Order::limit(7, Price::from_raw(10_100), 100, Side::Buy).with_trader("TraderG"));
    print_result(&result);
    history.record(book.snapshot());

    println!("\n--- Submitting: MARKET SELL 120 shares ---");
    let result = book.add_order(Order::market(8, 120, Side::Sell).with_trader("TraderH"));
    print_result(&result);
    history.record(book.snapshot());

    println!("\n--- Self-trade prevention: TraderE buys into own resting ask ---");
    let result = book.add_order(
        Order::limit(9, Price::from_raw(10_100), 40, Side::Buy)
            .with_trader("TraderE")
            .with_stp_mode(StpMode::CancelNewest),
    );
    print_result(&result);

    println!("\n--- Fill-or-kill for more than the book holds ---");
    let result = book.add_order(
        Order::limit(10, Price::from_raw(10_200), 5_000, Side::Buy)
            .with_trader("TraderG")
            .with_time_in_force(TimeInForce::FillOrKill),
    );
    print_result(&result);

    println!("\n--- Modify: shrink order 2 in place, then reprice it ---");
    let modify = book.modify_order(2, Price::from_raw(9_950), 120);
    println!(
        "  modify accepted={} {} -> {} shares",
        modify.accepted, modify.old_quantity, modify.new_quantity
    );
    let modify = book.modify_order(2, Price::from_raw(9_975), 120);
    println!(
        "  modify accepted={} ${} -> ${}",
        modify.accepted, modify.old_price, modify.new_price
    );
    history.record(book.snapshot());

    println!("\n--- Cancel order 3 ---");
    println!("  cancelled: {}", book.cancel_order(3));
    history.record(book.snapshot());

    println!("\n=== FINAL ORDER BOOK ===");
    println!("{}", book.render());
    let snap = book.snapshot();
    println!(
        "Last trade: {} shares @ ${}",
        snap.last_trade_qty, snap.last_trade_price
    );

    let path = "demo_prices.csv";
    match history.export_csv(path) {
        Ok(()) => println!("\nExported {} snapshots to {path}", history.len()),
        Err(err) => eprintln!("\nCSV export failed: {err}"),
    }
}
