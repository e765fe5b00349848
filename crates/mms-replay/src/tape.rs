//! Tape CSV loader.
//!
//! Required columns: `step`, `bid`, `ask`, `buy_volume`, `sell_volume`.
//!
//! Optional columns (empty cell == absent):
//! - `midpoint` (default: `(bid + ask) / 2`)
//! - `long_price`, `long_queue`: place/amend a long order after the step
//! - `short_price`, `short_queue`: same for the short side
//! - `flatten` (`true`/`false`): flatten both sides at this row's bid/ask
//!
//! Column order is free. `#` lines are comments. Steps must increase strictly.

use std::fs;
use std::path::Path;

use mms_engine::{MarketTick, Side};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapeError {
    Empty,
    Io(String),
    /// CSV-level failure (bad header, wrong type, ragged row).
    Csv { record: usize, message: String },
    InvalidRow { step: i64, reason: String },
    NonIncreasingStep { previous: i64, step: i64 },
}

impl std::fmt::Display for TapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TapeError::Empty => write!(f, "tape has no rows"),
            TapeError::Io(e) => write!(f, "io error: {}", e),
            TapeError::Csv { record, message } => {
                write!(f, "tape record {}: {}", record, message)
            }
            TapeError::InvalidRow { step, reason } => {
                write!(f, "invalid tape row at step {}: {}", step, reason)
            }
            TapeError::NonIncreasingStep { previous, step } => write!(
                f,
                "tape steps must strictly increase: {} follows {}",
                step, previous
            ),
        }
    }
}

impl std::error::Error for TapeError {}

impl From<std::io::Error> for TapeError {
    fn from(e: std::io::Error) -> Self {
        TapeError::Io(e.to_string())
    }
}

/// One recorded step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TapeRow {
    pub step: i64,
    pub bid: f64,
    pub ask: f64,
    pub buy_volume: f64,
    pub sell_volume: f64,
    #[serde(default)]
    pub midpoint: Option<f64>,
    #[serde(default)]
    pub long_price: Option<f64>,
    #[serde(default)]
    pub long_queue: Option<f64>,
    #[serde(default)]
    pub short_price: Option<f64>,
    #[serde(default)]
    pub short_queue: Option<f64>,
    #[serde(default)]
    pub flatten: Option<bool>,
}

impl TapeRow {
    pub fn tick(&self) -> MarketTick {
        MarketTick::new(self.step, self.bid, self.ask, self.buy_volume, self.sell_volume)
    }

    pub fn midpoint(&self) -> f64 {
        self.midpoint.unwrap_or((self.bid + self.ask) / 2.0)
    }

    /// `(price, queue_ahead)` for the side, if the row places an order there.
    pub fn order_for(&self, side: Side) -> Option<(f64, f64)> {
        let (price, queue) = match side {
            Side::Long => (self.long_price, self.long_queue),
            Side::Short => (self.short_price, self.short_queue),
        };
        price.map(|p| (p, queue.unwrap_or(0.0)))
    }

    pub fn flattens(&self) -> bool {
        self.flatten.unwrap_or(false)
    }

    fn validate(&self) -> Result<(), TapeError> {
        let bad = |reason: String| TapeError::InvalidRow {
            step: self.step,
            reason,
        };

        for (name, v) in [("bid", self.bid), ("ask", self.ask)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(bad(format!("{name} must be finite and > 0, got {v}")));
            }
        }
        if self.bid > self.ask {
            return Err(bad(format!("crossed book: bid {} > ask {}", self.bid, self.ask)));
        }
        for (name, v) in [
            ("buy_volume", self.buy_volume),
            ("sell_volume", self.sell_volume),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(bad(format!("{name} must be finite and >= 0, got {v}")));
            }
        }
        if let Some(m) = self.midpoint {
            if !m.is_finite() {
                return Err(bad(format!("midpoint must be finite, got {m}")));
            }
        }
        for side in [Side::Long, Side::Short] {
            if let Some((price, queue)) = self.order_for(side) {
                if !price.is_finite() || price <= 0.0 {
                    return Err(bad(format!("{side}_price must be finite and > 0, got {price}")));
                }
                if !queue.is_finite() || queue < 0.0 {
                    return Err(bad(format!("{side}_queue must be finite and >= 0, got {queue}")));
                }
            }
        }
        Ok(())
    }
}

pub fn load_tape_file(path: impl AsRef<Path>) -> Result<Vec<TapeRow>, TapeError> {
    let s = fs::read_to_string(path)?;
    parse_tape(&s)
}

/// Parse and validate a tape (pure, deterministic).
pub fn parse_tape(csv_text: &str) -> Result<Vec<TapeRow>, TapeError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(csv_text.trim_start_matches('\u{feff}').as_bytes());

    let mut rows: Vec<TapeRow> = Vec::new();
    for (i, rec) in rdr.deserialize::<TapeRow>().enumerate() {
        let row = rec.map_err(|e| TapeError::Csv {
            record: i + 1,
            message: e.to_string(),
        })?;
        row.validate()?;
        if let Some(prev) = rows.last() {
            if row.step <= prev.step {
                return Err(TapeError::NonIncreasingStep {
                    previous: prev.step,
                    step: row.step,
                });
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(TapeError::Empty);
    }
    Ok(rows)
}
