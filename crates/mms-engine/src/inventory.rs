//! Per-side inventory: one active order slot plus the filled positions held
//! on that side.
//!
//! # Position order
//! Positions are appended on fill. Two removal paths exist:
//! - [`Inventory::pop_position`] takes the newest (LIFO) and books nothing;
//!   the broker uses it to hand a fresh fill to the opposite side.
//! - [`Inventory::remove_position`] takes the oldest (FIFO) and realizes PnL
//!   against a reference price.
//!
//! # Failure reporting
//! Nothing here returns `Result`. Capacity and empty-inventory cases return
//! `false` / `None` / a sentinel, log, and leave state unchanged.

use std::collections::VecDeque;

use tracing::{debug, error, warn};

use crate::{
    EngineParams, MarketTick, Order, Position, Side, EMPTY_FLATTEN_PENALTY,
    QUEUE_FEATURE_EPSILON,
};

#[derive(Clone, Debug)]
pub struct Inventory {
    side: Side,
    max_position_count: usize,
    fee: f64,
    positions: VecDeque<Position>,
    order: Option<Order>,
    /// Sum of each held position's average execution price.
    total_exposure: f64,
    average_price: f64,
    realized_pnl: f64,
    full_inventory: bool,
    total_trade_count: u64,
}

impl Inventory {
    pub fn new(side: Side, params: &EngineParams) -> Self {
        Self {
            side,
            max_position_count: params.max_position,
            fee: params.fee,
            positions: VecDeque::new(),
            order: None,
            total_exposure: 0.0,
            average_price: 0.0,
            realized_pnl: 0.0,
            // Zero capacity is full before anything fills.
            full_inventory: params.max_position == 0,
            total_trade_count: 0,
        }
    }

    /// Back to an empty book. Capacity and fee are kept.
    pub fn reset(&mut self) {
        self.positions.clear();
        self.order = None;
        self.total_exposure = 0.0;
        self.average_price = 0.0;
        self.realized_pnl = 0.0;
        self.full_inventory = self.max_position_count == 0;
        self.total_trade_count = 0;
    }

    // -----------------------------------------------------------------------
    // Read surface
    // -----------------------------------------------------------------------

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn max_position_count(&self) -> usize {
        self.max_position_count
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Held positions, oldest first.
    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter()
    }

    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    pub fn total_exposure(&self) -> f64 {
        self.total_exposure
    }

    pub fn average_price(&self) -> f64 {
        self.average_price
    }

    pub fn realized_pnl(&self) -> f64 {
        self.realized_pnl
    }

    pub fn is_full(&self) -> bool {
        self.full_inventory
    }

    /// One per `remove_position` call.
    pub fn total_trade_count(&self) -> u64 {
        self.total_trade_count
    }

    // -----------------------------------------------------------------------
    // Order slot
    // -----------------------------------------------------------------------

    /// Open `order`, or amend the resting one in place.
    ///
    /// Rejected when the inventory is full, or when the order belongs to the
    /// other side.
    pub fn add_order(&mut self, order: Order) -> bool {
        if order.side() != self.side {
            warn!(side = %self.side, order_side = %order.side(), "order routed to wrong inventory");
            return false;
        }
        if self.full_inventory {
            debug!(
                side = %self.side,
                max_position = self.max_position_count,
                "order rejected: already at max position limit"
            );
            return false;
        }

        match self.order.as_mut() {
            None => {
                debug!(side = %self.side, order = %order, "opened new order");
                self.order = Some(order);
            }
            Some(resting) => {
                debug!(side = %self.side, from = %resting, to = %order, "amending resting order");
                resting.amend(order.price(), order.queue_ahead(), order.id());
            }
        }
        true
    }

    /// Drop the resting order. `false` if there was none.
    pub fn cancel_order(&mut self) -> bool {
        match self.order.take() {
            Some(order) => {
                debug!(side = %self.side, order = %order, "cancelled order");
                true
            }
            None => {
                debug!(side = %self.side, "no open order to cancel");
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Execution
    // -----------------------------------------------------------------------

    /// Apply one step of traded volume to the resting order.
    ///
    /// Returns `true` when the order filled this step and moved into the
    /// position list.
    pub fn step(&mut self, tick: &MarketTick) -> bool {
        let Some(order) = self.order.as_mut() else {
            return false;
        };

        let (marketable, volume) = match self.side {
            Side::Long => (tick.bid <= order.price(), tick.buy_volume),
            Side::Short => (tick.ask >= order.price(), tick.sell_volume),
        };

        if marketable {
            if order.is_first_in_queue() {
                order.process_executions(volume);
            } else {
                order.reduce_queue_ahead(volume);
            }
        }

        if !order.is_filled() {
            return false;
        }

        if let Some(order) = self.order.take() {
            self.record_fill(order, tick.step);
        }
        true
    }

    fn record_fill(&mut self, order: Order, step: i64) {
        let position = order.into_position(step);
        debug!(
            side = %self.side,
            order_id = position.id,
            price = position.price,
            steps_to_fill = position.steps_to_fill(),
            step,
            "order filled"
        );
        self.total_exposure += position.average_execution_price;
        self.positions.push_back(position);
        self.refresh_derived();
    }

    // -----------------------------------------------------------------------
    // Position removal
    // -----------------------------------------------------------------------

    /// Take the most recent position for netting. No PnL is booked here.
    pub fn pop_position(&mut self) -> Option<Position> {
        let Some(position) = self.positions.pop_back() else {
            error!(side = %self.side, "no position to pop for netting");
            return None;
        };

        self.total_exposure -= position.average_execution_price;
        self.refresh_derived();
        debug!(
            side = %self.side,
            position_id = position.id,
            price = position.price,
            "position netted out"
        );
        Some(position)
    }

    /// Close the oldest position at `reference_price` and return its PnL.
    ///
    /// PnL is relative: `(ref - px) / px` long, `(px - ref) / px` short.
    pub fn remove_position(&mut self, reference_price: f64) -> f64 {
        let Some(position) = self.positions.pop_front() else {
            error!(side = %self.side, "no position to remove");
            return 0.0;
        };

        let pnl = match self.side {
            Side::Long => (reference_price - position.price) / position.price,
            Side::Short => (position.price - reference_price) / position.price,
        };
        self.realized_pnl += pnl;
        self.total_exposure -= position.average_execution_price;
        self.refresh_derived();
        // Entry + exit is one round trip; counted once.
        self.total_trade_count += 1;

        debug!(side = %self.side, position_id = position.id, pnl, "closed position");
        pnl
    }

    /// Close everything at `reference_price`, paying the fee per close.
    ///
    /// Returns the net change in realized PnL, or [`EMPTY_FLATTEN_PENALTY`]
    /// without touching state when there is nothing to close.
    pub fn flatten_inventory(&mut self, reference_price: f64) -> f64 {
        debug!(
            side = %self.side,
            positions = self.position_count(),
            "flattening inventory"
        );
        if self.positions.is_empty() {
            return EMPTY_FLATTEN_PENALTY;
        }

        let before = self.realized_pnl;
        while !self.positions.is_empty() {
            self.remove_position(reference_price);
            self.realized_pnl -= self.fee;
        }
        self.realized_pnl - before
    }

    fn refresh_derived(&mut self) {
        let count = self.positions.len();
        if count > 0 {
            self.average_price = self.total_exposure / count as f64;
        } else {
            self.total_exposure = 0.0;
            self.average_price = 0.0;
        }
        self.full_inventory = count >= self.max_position_count;
    }

    // -----------------------------------------------------------------------
    // Features
    // -----------------------------------------------------------------------

    /// Mark-to-midpoint PnL of the held positions, relative to average price.
    pub fn unrealized_pnl(&self, midpoint: f64) -> f64 {
        if self.positions.is_empty() || self.average_price == 0.0 {
            return 0.0;
        }

        let difference = match self.side {
            Side::Long => midpoint - self.average_price,
            Side::Short => self.average_price - midpoint,
        };
        if difference == 0.0 {
            0.0
        } else {
            difference / self.average_price
        }
    }

    /// Signed relative distance from the resting order to the midpoint.
    pub fn distance_to_midpoint(&self, midpoint: f64) -> f64 {
        let Some(order) = self.order.as_ref() else {
            return 0.0;
        };
        let price = order.price();
        if price == 0.0 {
            return 0.0;
        }
        match self.side {
            Side::Long => (midpoint - price) / price,
            Side::Short => (price - midpoint) / price,
        }
    }

    /// Progress-through-queue signal for the resting order (0 if none).
    pub fn queue_ahead_feature(&self) -> f64 {
        match self.order.as_ref() {
            Some(order) => {
                let executions = order.executed().max(QUEUE_FEATURE_EPSILON);
                let queue = order.queue_ahead();
                (executions - queue) / (queue + order.lot_size())
            }
            None => 0.0,
        }
    }
}
