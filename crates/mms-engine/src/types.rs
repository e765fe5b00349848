use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which inventory an order belongs to.
///
/// Selected once when an [`Inventory`](crate::Inventory) is built; the step
/// path matches on it instead of comparing side labels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Long => "long",
            Side::Short => "short",
        }
    }

    pub fn opposite(&self) -> Side {
        match self {
            Side::Long => Side::Short,
            Side::Short => Side::Long,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown side label (anything other than `long`/`short`, case-insensitive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSideError {
    pub raw: String,
}

impl fmt::Display for ParseSideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized side '{}': expected long | short", self.raw)
    }
}

impl std::error::Error for ParseSideError {}

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(Side::Long),
            "short" => Ok(Side::Short),
            _ => Err(ParseSideError { raw: s.to_string() }),
        }
    }
}

/// Top-of-book quotes and traded volume for one simulated step.
///
/// `buy_volume` depletes/executes resting long orders, `sell_volume` resting
/// short orders.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MarketTick {
    pub step: i64,
    pub bid: f64,
    pub ask: f64,
    pub buy_volume: f64,
    pub sell_volume: f64,
}

impl MarketTick {
    pub fn new(step: i64, bid: f64, ask: f64, buy_volume: f64, sell_volume: f64) -> Self {
        Self {
            step,
            bid,
            ask,
            buy_volume,
            sell_volume,
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }
}
