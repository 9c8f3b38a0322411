// ============================================================================
// Property Tests
// Random operation sequences checked against a shadow model
// ============================================================================
//
// Drives the engine with arbitrary add/cancel/modify sequences while
// mirroring every accepted state change into a naive shadow book, then checks
// after each operation that:
// - every shadow order is resting with the same side, price and quantity
// - per-level aggregate quantities equal the sum of their orders
// - depth listings are sorted best-price-first and contain no empty levels
// - the book never crosses at rest
// - trade ids are strictly increasing and fills conserve quantity

use std::collections::BTreeMap;

use proptest::prelude::*;

use matchbook::prelude::*;

#[derive(Debug, Clone)]
enum OpSpec {
    AddLimit {
        buy: bool,
        price_step: i64,
        qty: Quantity,
        trader: u8,
        stp: u8,
        tif: u8,
    },
    AddMarket {
        buy: bool,
        qty: Quantity,
    },
    Cancel {
        pick: usize,
    },
    Modify {
        pick: usize,
        price_step: i64,
        qty: Quantity,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct ShadowOrder {
    side: Side,
    price: i64,
    qty: Quantity,
}

fn op_strategy() -> impl Strategy<Value = OpSpec> {
    prop_oneof![
        5 => (any::<bool>(), 0i64..10, 1i64..50, 0u8..3, 0u8..4, 0u8..3).prop_map(
            |(buy, price_step, qty, trader, stp, tif)| OpSpec::AddLimit {
                buy,
                price_step,
                qty,
                trader,
                stp,
                tif,
            }
        ),
        1 => (any::<bool>(), 1i64..50).prop_map(|(buy, qty)| OpSpec::AddMarket { buy, qty }),
        2 => (0usize..64).prop_map(|pick| OpSpec::Cancel { pick }),
        2 => (0usize..64, 0i64..10, 1i64..50).prop_map(|(pick, price_step, qty)| {
            OpSpec::Modify {
                pick,
                price_step,
                qty,
            }
        }),
    ]
}

fn side_of(buy: bool) -> Side {
    if buy {
        Side::Buy
    } else {
        Side::Sell
    }
}

fn price_of(step: i64) -> Price {
    Price::from_raw(10_000 + step * 10)
}

fn trader_of(idx: u8) -> String {
    // Index 0 submits anonymously, which disables STP entirely
    if idx == 0 {
        String::new()
    } else {
        format!("trader{idx}")
    }
}

fn stp_of(code: u8) -> StpMode {
    match code {
        1 => StpMode::CancelNewest,
        2 => StpMode::CancelOldest,
        3 => StpMode::CancelBoth,
        _ => StpMode::Allow,
    }
}

fn tif_of(code: u8) -> TimeInForce {
    match code {
        1 => TimeInForce::ImmediateOrCancel,
        2 => TimeInForce::FillOrKill,
        _ => TimeInForce::GoodTillCancel,
    }
}

fn pick_id(shadow: &BTreeMap<OrderId, ShadowOrder>, pick: usize) -> OrderId {
    if shadow.is_empty() {
        // Deliberately unknown id: exercises the not-found paths
        u64::MAX
    } else {
        *shadow
            .keys()
            .nth(pick % shadow.len())
            .expect("non-empty shadow")
    }
}

/// Fold one add result into the shadow book.
fn apply_add_result(
    shadow: &mut BTreeMap<OrderId, ShadowOrder>,
    order: &Order,
    result: &OrderResult,
) {
    if !result.accepted {
        assert!(result.trades.is_empty(), "rejections never trade");
        assert!(result.reject_reason.is_some());
        return;
    }

    let mut filled: Quantity = 0;
    for trade in &result.trades {
        let maker_id = match order.side {
            Side::Buy => trade.sell_order_id,
            Side::Sell => trade.buy_order_id,
        };
        assert!(trade.quantity > 0, "trades carry positive quantity");
        filled += trade.quantity;

        let maker = shadow.get_mut(&maker_id).expect("maker was resting");
        assert!(maker.qty >= trade.quantity, "maker cannot overfill");
        assert_eq!(maker.price, trade.price.raw_value(), "maker-price execution");
        maker.qty -= trade.quantity;
        if maker.qty == 0 {
            shadow.remove(&maker_id);
        }
    }

    if result.stp.cancelled_orders.contains(&order.id) {
        // STP killed the incoming order: its residue was zeroed, not filled
        assert_eq!(result.remaining_quantity, 0);
    } else {
        assert_eq!(
            filled + result.remaining_quantity,
            order.quantity,
            "fills plus residue equal the submitted quantity"
        );
    }

    for cancelled in &result.stp.cancelled_orders {
        // The list may also name the incoming (never-rested) order
        shadow.remove(cancelled);
    }

    if order.is_limit_order()
        && order.time_in_force == TimeInForce::GoodTillCancel
        && result.remaining_quantity > 0
    {
        let price = order.price.expect("limit order has a price").raw_value();
        shadow.insert(
            order.id,
            ShadowOrder {
                side: order.side,
                price,
                qty: result.remaining_quantity,
            },
        );
    }
}

fn check_consistency(book: &OrderBook, shadow: &BTreeMap<OrderId, ShadowOrder>) {
    assert_eq!(book.order_count(), shadow.len());

    for (id, expected) in shadow {
        let resting = book.get_order(*id).expect("shadow order is resting");
        assert_eq!(resting.id, *id);
        assert_eq!(resting.side, expected.side);
        assert_eq!(resting.quantity, expected.qty);
        assert!(resting.quantity > 0, "no resting order has quantity <= 0");
        assert_eq!(
            resting.price.map(|p| p.raw_value()),
            Some(expected.price),
            "index resolves to the correct price"
        );
    }

    for side in [Side::Buy, Side::Sell] {
        let mut expected_levels: BTreeMap<i64, Quantity> = BTreeMap::new();
        for order in shadow.values().filter(|o| o.side == side) {
            *expected_levels.entry(order.price).or_default() += order.qty;
        }

        let mut expected: Vec<(i64, Quantity)> = expected_levels.into_iter().collect();
        if side == Side::Buy {
            expected.reverse();
        }

        let depth: Vec<(i64, Quantity)> = book
            .depth(side, usize::MAX)
            .into_iter()
            .map(|(p, q)| (p.raw_value(), q))
            .collect();

        assert_eq!(depth, expected, "level totals match the shadow book");
        assert!(depth.iter().all(|(_, q)| *q > 0), "no empty level retained");
    }

    let bid = book.best_bid().raw_value();
    let ask = book.best_ask().raw_value();
    if bid != 0 && ask != 0 {
        assert!(bid < ask, "book must not cross at rest: {bid} vs {ask}");
    }
}

/// Run an operation sequence, checking invariants after every step.
/// Returns an observable transcript for determinism comparisons.
fn run_sequence(ops: &[OpSpec]) -> Vec<String> {
    let mut book = OrderBook::new();
    let mut shadow: BTreeMap<OrderId, ShadowOrder> = BTreeMap::new();
    let mut transcript = Vec::new();
    let mut next_id: OrderId = 1;
    let mut last_trade_id: TradeId = 0;

    for op in ops {
        match op {
            OpSpec::AddLimit {
                buy,
                price_step,
                qty,
                trader,
                stp,
                tif,
            } => {
                let order = Order::limit(next_id, price_of(*price_step), *qty, side_of(*buy))
                    .with_trader(trader_of(*trader))
                    .with_stp_mode(stp_of(*stp))
                    .with_time_in_force(tif_of(*tif));
                next_id += 1;

                let result = book.add_order(order.clone());
                for trade in &result.trades {
                    assert!(trade.trade_id > last_trade_id, "trade ids strictly increase");
                    last_trade_id = trade.trade_id;
                    transcript.push(format!(
                        "T{} {}->{} {}@{}",
                        trade.trade_id,
                        trade.buy_order_id,
                        trade.sell_order_id,
                        trade.quantity,
                        trade.price
                    ));
                }
                apply_add_result(&mut shadow, &order, &result);
                transcript.push(format!(
                    "A{} acc={} rem={}",
                    order.id, result.accepted, result.remaining_quantity
                ));
            },
            OpSpec::AddMarket { buy, qty } => {
                let order = Order::market(next_id, *qty, side_of(*buy));
                next_id += 1;

                let result = book.add_order(order.clone());
                for trade in &result.trades {
                    assert!(trade.trade_id > last_trade_id);
                    last_trade_id = trade.trade_id;
                }
                apply_add_result(&mut shadow, &order, &result);
                transcript.push(format!(
                    "M{} acc={} rem={}",
                    order.id, result.accepted, result.remaining_quantity
                ));
            },
            OpSpec::Cancel { pick } => {
                let id = pick_id(&shadow, *pick);
                let was_resting = shadow.remove(&id).is_some();
                let cancelled = book.cancel_order(id);
                assert_eq!(cancelled, was_resting, "cancel succeeds iff resting");
                transcript.push(format!("C{id} {cancelled}"));
            },
            OpSpec::Modify {
                pick,
                price_step,
                qty,
            } => {
                let id = pick_id(&shadow, *pick);
                let result = book.modify_order(id, price_of(*price_step), *qty);
                if result.accepted {
                    let entry = shadow.get_mut(&id).expect("accepted modify targets resting id");
                    entry.price = price_of(*price_step).raw_value();
                    entry.qty = *qty;
                } else if !shadow.contains_key(&id) {
                    assert_eq!(result.reject_reason, Some(RejectReason::NotFound { id }));
                }
                transcript.push(format!("X{id} acc={}", result.accepted));
            },
        }

        check_consistency(&book, &shadow);
    }

    transcript
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn invariants_hold_across_random_operations(
        ops in proptest::collection::vec(op_strategy(), 1..100)
    ) {
        run_sequence(&ops);
    }

    #[test]
    fn identical_sequences_are_deterministic(
        ops in proptest::collection::vec(op_strategy(), 1..60)
    ) {
        let first = run_sequence(&ops);
        let second = run_sequence(&ops);
        prop_assert_eq!(first, second);
    }
}
