// ============================================================================
// Price History
// Rolling snapshot window with CSV export
// ============================================================================

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::domain::MarketSnapshot;

/// Rolling window of market snapshots recorded by a collaborator.
///
/// The engine produces the snapshot values; this type only stores and
/// serializes them. Timestamps in the CSV output are rewritten relative to
/// the first recorded snapshot.
#[derive(Debug)]
pub struct PriceHistory {
    history: VecDeque<MarketSnapshot>,
    max_size: usize,
}

impl PriceHistory {
    pub const DEFAULT_MAX_SIZE: usize = 10_000;

    pub fn new(max_size: usize) -> Self {
        Self {
            history: VecDeque::new(),
            max_size,
        }
    }

    pub fn record(&mut self, snapshot: MarketSnapshot) {
        self.history.push_back(snapshot);
        // Rolling window: drop the oldest entry once over the limit
        if self.history.len() > self.max_size {
            self.history.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn latest(&self) -> Option<&MarketSnapshot> {
        self.history.back()
    }

    /// Write the window as CSV to `writer`.
    ///
    /// Header: `timestamp_ns,bid,ask,mid,spread,last_price,last_qty`, one
    /// snapshot per row, prices in minor units, `timestamp_ns` relative to
    /// the first recorded snapshot.
    pub fn write_csv<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "timestamp_ns,bid,ask,mid,spread,last_price,last_qty")?;

        let Some(first) = self.history.front() else {
            return Ok(());
        };
        let start_ns = first.timestamp_ns;

        for snap in &self.history {
            writeln!(
                writer,
                "{},{},{},{},{},{},{}",
                snap.timestamp_ns - start_ns,
                snap.bid_price.raw_value(),
                snap.ask_price.raw_value(),
                snap.mid_price.raw_value(),
                snap.spread.raw_value(),
                snap.last_trade_price.raw_value(),
                snap.last_trade_qty,
            )?;
        }
        Ok(())
    }

    /// Export the window to a CSV file at `path`.
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_csv(&mut writer)?;
        writer.flush()
    }
}

impl Default for PriceHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_SIZE)
    }
}
