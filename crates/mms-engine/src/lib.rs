//! mms-engine
//!
//! Passive order execution and inventory netting for a streaming order-flow
//! simulation.
//! - One resting maker order per side, queued behind `queue_ahead` volume
//! - Partial fills tracked per execution price (amendments keep progress)
//! - Filled orders become positions in a per-side inventory
//! - A fill on one side nets against the opposite side's oldest position
//! - Fee-adjusted realized PnL, reward-scaled for the training loop
//! - Pure deterministic logic (no IO, no time, no randomness)

mod ids;
mod inventory;
mod order;
mod params;
mod types;

pub mod broker;

pub use broker::{Broker, PositionFeatures};
pub use ids::OrderIdAllocator;
pub use inventory::Inventory;
pub use order::{Execution, Order, Position};
pub use params::{
    EngineParams, ParamsError, DEFAULT_FEE, DEFAULT_LOT_SIZE, DEFAULT_MAX_POSITION,
    EMPTY_FLATTEN_PENALTY, QUEUE_FEATURE_EPSILON,
};
pub use types::{MarketTick, ParseSideError, Side};

/// Round to 4 decimal places (average execution price precision).
pub(crate) fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
