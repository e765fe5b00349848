//! The agent's resting limit order and the position it becomes once filled.
//!
//! An order accumulates `executed` volume until it reaches `lot_size`.
//! Volume only reaches `executed` after `queue_ahead` has been depleted;
//! whatever a depletion step overshoots spills straight into executions.
//!
//! Amending an order (new price, new queue estimate, new id) is a targeted
//! field update: `executed` and the per-price `executions` history are kept,
//! so progress toward a fill survives a re-quote.

use std::fmt;

use crate::{round4, Side};

/// Volume filled at one price over the order's life.
#[derive(Clone, Debug, PartialEq)]
pub struct Execution {
    pub price: f64,
    pub volume: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    id: u64,
    symbol: String,
    side: Side,
    price: f64,
    step: i64,
    lot_size: f64,
    queue_ahead: f64,
    executed: f64,
    /// Insertion-ordered; one entry per distinct price.
    executions: Vec<Execution>,
}

impl Order {
    pub fn new(
        id: u64,
        symbol: impl Into<String>,
        side: Side,
        price: f64,
        step: i64,
        queue_ahead: f64,
        lot_size: f64,
    ) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            side,
            price,
            step,
            lot_size,
            queue_ahead: queue_ahead.max(0.0),
            executed: 0.0,
            executions: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Step index the order was created on.
    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn lot_size(&self) -> f64 {
        self.lot_size
    }

    pub fn queue_ahead(&self) -> f64 {
        self.queue_ahead
    }

    pub fn executed(&self) -> f64 {
        self.executed
    }

    pub fn executions(&self) -> &[Execution] {
        &self.executions
    }

    pub fn is_filled(&self) -> bool {
        self.executed >= self.lot_size
    }

    pub fn is_first_in_queue(&self) -> bool {
        self.queue_ahead <= 0.0
    }

    /// Re-quote in place. Fill history is untouched.
    pub fn amend(&mut self, price: f64, queue_ahead: f64, id: u64) {
        self.price = price;
        self.queue_ahead = queue_ahead.max(0.0);
        self.id = id;
    }

    /// Deplete the queue ahead; any overshoot executes against this order.
    pub fn reduce_queue_ahead(&mut self, volume: f64) {
        self.queue_ahead -= volume;
        if self.queue_ahead < 0.0 {
            let splash = -self.queue_ahead;
            self.queue_ahead = 0.0;
            self.process_executions(splash);
        }
    }

    /// Execute `volume` at the current price, capped so that total recorded
    /// execution never exceeds `lot_size`.
    pub fn process_executions(&mut self, volume: f64) {
        self.executed += volume;
        let mut overflow = 0.0;
        if self.is_filled() {
            overflow = self.executed - self.lot_size;
            self.executed -= overflow;
        }

        let recorded = volume - overflow;
        let price = self.price;
        match self.executions.iter_mut().find(|e| e.price == price) {
            Some(e) => e.volume += recorded,
            None => self.executions.push(Execution {
                price,
                volume: recorded,
            }),
        }
    }

    /// Average fill price, rounded to 4dp.
    ///
    /// Each execution is weighted by `volume / price` (units bought with that
    /// notional), so this is total notional over total units. 0 when nothing
    /// has executed.
    pub fn average_execution_price(&self) -> f64 {
        let total_weight: f64 = self.executions.iter().map(|e| e.volume / e.price).sum();
        if total_weight == 0.0 || !total_weight.is_finite() {
            return 0.0;
        }

        let avg: f64 = self
            .executions
            .iter()
            .map(|e| e.price * ((e.volume / e.price) / total_weight))
            .sum();
        round4(avg)
    }

    /// Convert a filled order into a closed position.
    pub fn into_position(self, filled_step: i64) -> Position {
        let average_execution_price = self.average_execution_price();
        Position {
            id: self.id,
            symbol: self.symbol,
            side: self.side,
            price: self.price,
            step: self.step,
            filled_step,
            average_execution_price,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} | {:.3} | {} | {:.2} | {:.2}",
            self.symbol, self.side, self.price, self.step, self.executed, self.queue_ahead
        )
    }
}

/// A fully executed order held in an inventory.
#[derive(Clone, Debug, PartialEq)]
pub struct Position {
    pub id: u64,
    pub symbol: String,
    pub side: Side,
    /// Resting price at the moment of fill; PnL references this price.
    pub price: f64,
    pub step: i64,
    pub filled_step: i64,
    /// Drives inventory exposure / average price.
    pub average_execution_price: f64,
}

impl Position {
    pub fn steps_to_fill(&self) -> i64 {
        self.filled_step - self.step
    }
}
