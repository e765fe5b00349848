//! Broker: long and short inventories with cross-side netting.
//!
//! # Step pipeline
//! 1. Step the long inventory. If it filled and the short side holds a
//!    position, pop the new long position (LIFO) and close the oldest short
//!    at the long fill price.
//! 2. Same for the short inventory against the long side.
//! 3. Return the summed netting PnL divided by `reward_scale` (2 × fee).
//!
//! Netting happens on the step of the fill, so a side never keeps a fresh
//! fill while the opposite side still holds inventory.
//!
//! # Ids
//! The broker owns the [`OrderIdAllocator`]; build orders through
//! [`Broker::new_order`] so ids stay unique per broker.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{EngineParams, Inventory, MarketTick, Order, OrderIdAllocator, ParamsError, Side};

/// Inventory block of the agent's observation vector.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionFeatures {
    pub long_inventory: f64,
    pub short_inventory: f64,
    pub total_pnl: f64,
    pub long_unrealized_pnl: f64,
    pub short_unrealized_pnl: f64,
    pub long_distance_to_midpoint: f64,
    pub short_distance_to_midpoint: f64,
    pub long_queue: f64,
    pub short_queue: f64,
}

impl PositionFeatures {
    pub const LEN: usize = 9;

    pub fn as_array(&self) -> [f64; Self::LEN] {
        [
            self.long_inventory,
            self.short_inventory,
            self.total_pnl,
            self.long_unrealized_pnl,
            self.short_unrealized_pnl,
            self.long_distance_to_midpoint,
            self.short_distance_to_midpoint,
            self.long_queue,
            self.short_queue,
        ]
    }
}

#[derive(Clone, Debug)]
pub struct Broker {
    params: EngineParams,
    ids: OrderIdAllocator,
    long_inventory: Inventory,
    short_inventory: Inventory,
}

impl Default for Broker {
    fn default() -> Self {
        Self::new(EngineParams::default())
    }
}

impl Broker {
    /// Trusts `params`; see [`Broker::try_new`] for the validating path.
    pub fn new(params: EngineParams) -> Self {
        Self::with_allocator(params, OrderIdAllocator::new())
    }

    pub fn try_new(params: EngineParams) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self::new(params))
    }

    pub fn with_allocator(params: EngineParams, ids: OrderIdAllocator) -> Self {
        Self {
            long_inventory: Inventory::new(Side::Long, &params),
            short_inventory: Inventory::new(Side::Short, &params),
            params,
            ids,
        }
    }

    /// Empty both inventories. Order ids keep counting.
    pub fn reset(&mut self) {
        self.long_inventory.reset();
        self.short_inventory.reset();
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    pub fn reward_scale(&self) -> f64 {
        self.params.reward_scale()
    }

    pub fn long_inventory(&self) -> &Inventory {
        &self.long_inventory
    }

    pub fn short_inventory(&self) -> &Inventory {
        &self.short_inventory
    }

    pub fn inventory(&self, side: Side) -> &Inventory {
        match side {
            Side::Long => &self.long_inventory,
            Side::Short => &self.short_inventory,
        }
    }

    fn inventory_mut(&mut self, side: Side) -> &mut Inventory {
        match side {
            Side::Long => &mut self.long_inventory,
            Side::Short => &mut self.short_inventory,
        }
    }

    // -----------------------------------------------------------------------
    // Orders
    // -----------------------------------------------------------------------

    /// Build an order with the next id and this broker's lot size.
    pub fn new_order(
        &mut self,
        symbol: impl Into<String>,
        side: Side,
        price: f64,
        step: i64,
        queue_ahead: f64,
    ) -> Order {
        let id = self.ids.next_id();
        Order::new(id, symbol, side, price, step, queue_ahead, self.params.lot_size)
    }

    /// Route `order` to its side's inventory.
    ///
    /// `false` when the inventory is full, or (with a warning) when the
    /// order's price cannot be used as a PnL reference.
    pub fn add(&mut self, order: Order) -> bool {
        let price = order.price();
        if !price.is_finite() || price <= 0.0 {
            warn!(side = %order.side(), price, "broker rejected order with unusable price");
            return false;
        }
        self.inventory_mut(order.side()).add_order(order)
    }

    pub fn cancel(&mut self, side: Side) -> bool {
        self.inventory_mut(side).cancel_order()
    }

    // -----------------------------------------------------------------------
    // Step / flatten
    // -----------------------------------------------------------------------

    /// Advance both inventories by one tick. Returns reward-scaled netting PnL.
    pub fn step(&mut self, tick: &MarketTick) -> f64 {
        let mut pnl = 0.0;

        if self.long_inventory.step(tick) && self.short_inventory.position_count() > 0 {
            if let Some(new_position) = self.long_inventory.pop_position() {
                pnl += self.short_inventory.remove_position(new_position.price);
            }
        }

        if self.short_inventory.step(tick) && self.long_inventory.position_count() > 0 {
            if let Some(new_position) = self.short_inventory.pop_position() {
                pnl += self.long_inventory.remove_position(new_position.price);
            }
        }

        if pnl != 0.0 {
            debug!(step = tick.step, pnl, "netted inventory");
        }
        pnl / self.reward_scale()
    }

    /// Close all longs at `bid` and all shorts at `ask`.
    pub fn flatten_inventory(&mut self, bid: f64, ask: f64) -> f64 {
        let mut total_pnl = self.long_inventory.flatten_inventory(bid);
        total_pnl += self.short_inventory.flatten_inventory(ask);
        if total_pnl != 0.0 {
            total_pnl /= self.reward_scale();
        }
        total_pnl
    }

    // -----------------------------------------------------------------------
    // Read-only aggregates
    // -----------------------------------------------------------------------

    pub fn unrealized_pnl(&self, midpoint: f64) -> f64 {
        self.long_inventory.unrealized_pnl(midpoint) + self.short_inventory.unrealized_pnl(midpoint)
    }

    pub fn realized_pnl(&self) -> f64 {
        self.long_inventory.realized_pnl() + self.short_inventory.realized_pnl()
    }

    pub fn total_pnl(&self, midpoint: f64) -> f64 {
        self.unrealized_pnl(midpoint) + self.realized_pnl()
    }

    pub fn long_inventory_count(&self) -> usize {
        self.long_inventory.position_count()
    }

    pub fn short_inventory_count(&self) -> usize {
        self.short_inventory.position_count()
    }

    pub fn total_trade_count(&self) -> u64 {
        self.long_inventory.total_trade_count() + self.short_inventory.total_trade_count()
    }

    pub fn long_order_distance_to_midpoint(&self, midpoint: f64) -> f64 {
        self.long_inventory.distance_to_midpoint(midpoint) / self.reward_scale()
    }

    pub fn short_order_distance_to_midpoint(&self, midpoint: f64) -> f64 {
        self.short_inventory.distance_to_midpoint(midpoint) / self.reward_scale()
    }

    /// `(long, short)` queue-progress features.
    pub fn queues_ahead_features(&self) -> (f64, f64) {
        (
            self.long_inventory.queue_ahead_feature(),
            self.short_inventory.queue_ahead_feature(),
        )
    }

    pub fn position_features(&self, midpoint: f64) -> PositionFeatures {
        let max_position = self.params.max_position as f64;
        let (long_queue, short_queue) = self.queues_ahead_features();
        PositionFeatures {
            long_inventory: self.long_inventory_count() as f64 / max_position,
            short_inventory: self.short_inventory_count() as f64 / max_position,
            total_pnl: self.total_pnl(midpoint) / self.params.target_pnl,
            long_unrealized_pnl: self.long_inventory.unrealized_pnl(midpoint) / self.reward_scale(),
            short_unrealized_pnl: self.short_inventory.unrealized_pnl(midpoint)
                / self.reward_scale(),
            long_distance_to_midpoint: self.long_order_distance_to_midpoint(midpoint),
            short_distance_to_midpoint: self.short_order_distance_to_midpoint(midpoint),
            long_queue,
            short_queue,
        }
    }
}
