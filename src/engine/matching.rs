// ============================================================================
// Matching Core
// Price-priority outer walk, FIFO inner walk, STP policy application
// ============================================================================

use tracing::trace;

use crate::domain::{Order, Side, StpMode, StpReport, Trade};
use crate::numeric::Price;

use super::order_book::OrderBook;

impl OrderBook {
    /// Match `incoming` against the opposite side of the book.
    ///
    /// Walks price levels in priority order (highest bid / lowest ask first)
    /// and each touched level's FIFO queue head to tail, emitting trades at
    /// the resting order's price. Self-trades never produce a trade; the
    /// incoming order's STP mode decides what happens instead. On return
    /// `incoming.quantity` holds the unmatched residue.
    pub(super) fn match_incoming(&mut self, incoming: &mut Order) -> (Vec<Trade>, StpReport) {
        let mut trades = Vec::new();
        let mut stp = StpReport::default();

        let Self {
            bids,
            asks,
            order_index,
            last_trade_price,
            last_trade_qty,
            next_trade_id,
            clock,
        } = self;

        let opposite = match incoming.side {
            Side::Buy => asks,
            Side::Sell => bids,
        };

        let mut current_price: Option<Price> = None;
        'price_walk: while incoming.quantity > 0 {
            let best = match current_price {
                None => opposite.best_price(),
                // A level can survive a full pass when STP skipped every
                // remaining order in it; always advance, never revisit.
                Some(prev) => opposite.next_price_after(prev),
            };
            let Some(level_price) = best else { break };

            // Market orders never stop on price.
            if let Some(limit) = incoming.price {
                let crosses = match incoming.side {
                    Side::Buy => level_price <= limit,
                    Side::Sell => level_price >= limit,
                };
                if !crosses {
                    break;
                }
            }

            let mut cursor = opposite.level_head(level_price);
            while let Some(handle) = cursor {
                if incoming.quantity == 0 {
                    break 'price_walk;
                }
                let next = opposite.next_in_level(handle);

                let (resting_id, resting_qty, same_trader) = {
                    let resting = opposite.order(handle);
                    (
                        resting.id,
                        resting.quantity,
                        !incoming.trader_id.is_empty()
                            && incoming.trader_id == resting.trader_id,
                    )
                };

                if same_trader {
                    match incoming.stp_mode {
                        // Self-trades permitted; match normally.
                        StpMode::Allow => {},
                        StpMode::CancelNewest => {
                            stp.self_trade = true;
                            stp.cancelled_orders.push(incoming.id);
                            stp.action =
                                Some("cancel_newest: incoming order cancelled".to_string());
                            incoming.quantity = 0;
                            break 'price_walk;
                        },
                        StpMode::CancelOldest => {
                            stp.self_trade = true;
                            opposite.remove(handle);
                            order_index.remove(&resting_id);
                            stp.cancelled_orders.push(resting_id);
                            stp.action =
                                Some("cancel_oldest: resting order cancelled".to_string());
                            cursor = next;
                            continue;
                        },
                        StpMode::CancelBoth => {
                            stp.self_trade = true;
                            opposite.remove(handle);
                            order_index.remove(&resting_id);
                            stp.cancelled_orders.push(resting_id);
                            stp.cancelled_orders.push(incoming.id);
                            stp.action = Some(
                                "cancel_both: resting and incoming orders cancelled".to_string(),
                            );
                            incoming.quantity = 0;
                            break 'price_walk;
                        },
                        StpMode::DecrementAndCancel => {
                            stp.self_trade = true;
                            stp.action =
                                Some("decrement_and_cancel: self-trade skipped".to_string());
                            cursor = next;
                            continue;
                        },
                    }
                }

                let fill = incoming.quantity.min(resting_qty);
                let (buy_order_id, sell_order_id) = match incoming.side {
                    Side::Buy => (incoming.id, resting_id),
                    Side::Sell => (resting_id, incoming.id),
                };

                let trade = Trade {
                    trade_id: *next_trade_id,
                    buy_order_id,
                    sell_order_id,
                    price: level_price,
                    quantity: fill,
                    time: clock.now(),
                };
                *next_trade_id += 1;
                *last_trade_price = level_price;
                *last_trade_qty = fill;
                incoming.quantity -= fill;

                opposite.reduce_quantity(handle, fill);
                if fill == resting_qty {
                    opposite.remove(handle);
                    order_index.remove(&resting_id);
                }

                trace!(
                    trade_id = trade.trade_id,
                    buy = trade.buy_order_id,
                    sell = trade.sell_order_id,
                    price = %trade.price,
                    quantity = trade.quantity,
                    "trade"
                );
                trades.push(trade);

                cursor = next;
            }

            current_price = Some(level_price);
        }

        (trades, stp)
    }
}
