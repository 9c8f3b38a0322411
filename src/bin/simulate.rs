// ============================================================================
// Order Flow Simulator
// Random buy/sell flow against one engine with live top-of-book output
// ============================================================================

use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use matchbook::prelude::*;

const SEED_ORDERS: usize = 20;
const STEPS: usize = 500;
const PRINT_EVERY: usize = 10;

fn random_order(rng: &mut StdRng, next_id: &mut OrderId) -> Order {
    let id = *next_id;
    *next_id += 1;

    let side = if rng.gen_range(0..2) == 0 {
        Side::Buy
    } else {
        Side::Sell
    };
    // $98.00 - $102.00
    let price = Price::from_raw(rng.gen_range(9_800..=10_200));
    let qty: Quantity = rng.gen_range(10..=100);

    Order::limit(id, price, qty, side).with_trader(format!("sim{}", id % 7))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Fixed seed so runs are reproducible
    let mut rng = StdRng::seed_from_u64(42);
    let mut book = OrderBook::new();
    let mut history = PriceHistory::default();
    let mut next_id: OrderId = 1;
    let mut trade_count: u64 = 0;

    println!("Seeding order book...");
    for _ in 0..SEED_ORDERS {
        let order = random_order(&mut rng, &mut next_id);
        book.add_order(order);
    }

    println!("\n=== SIMULATION ({STEPS} steps) ===\n");
    println!("{:<10} | {:<10} | {:<10} | {:<8} | Last Trade", "Bid", "Mid", "Ask", "Spread");
    println!("{}", "-".repeat(60));

    for step in 1..=STEPS {
        let order = random_order(&mut rng, &mut next_id);
        let result = book.add_order(order);
        trade_count += result.trades.len() as u64;

        history.record(book.snapshot());

        if step % PRINT_EVERY == 0 {
            let snap = book.snapshot();
            println!(
                "{:<10} | {:<10} | {:<10} | {:<8} | {} @ {}",
                snap.bid_price.to_string(),
                snap.mid_price.to_string(),
                snap.ask_price.to_string(),
                snap.spread.to_string(),
                snap.last_trade_qty,
                snap.last_trade_price,
            );
        }

        thread::sleep(Duration::from_millis(5));
    }

    println!("{}", "-".repeat(60));
    println!(
        "Done: {} orders submitted, {} trades, {} resting",
        next_id - 1,
        trade_count,
        book.order_count()
    );

    let path = "simulation_prices.csv";
    match history.export_csv(path) {
        Ok(()) => println!("Exported {} snapshots to {path}", history.len()),
        Err(err) => eprintln!("CSV export failed: {err}"),
    }
}
