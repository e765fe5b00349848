//! mms-replay
//!
//! Deterministic replay of a recorded tick/order tape through the engine.
//!
//! Per row: STEP (execution + netting) -> PLACE (recorded orders) -> FLATTEN?
//!
//! - Same tape + params => identical report
//! - No order selection: every placement comes from the tape
//! - Inventory is flattened at the last row's bid/ask unless disabled

mod runner;
pub mod tape;

pub use runner::{CurvePoint, ReplayReport, ReplayRunner, ReplaySettings};
pub use tape::{load_tape_file, parse_tape, TapeError, TapeRow};
