use mms_engine::{Broker, EngineParams, ParamsError, PositionFeatures, Side};
use serde::Serialize;
use tracing::{debug, info};

use crate::TapeRow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySettings {
    pub symbol: String,
    /// Close remaining inventory at the last row's bid/ask.
    pub flatten_at_end: bool,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            symbol: "ETH-USD".to_string(),
            flatten_at_end: true,
        }
    }
}

/// Cumulative values after a row was fully processed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub step: i64,
    pub cumulative_reward: f64,
    pub total_pnl: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub steps: usize,
    /// Sum of netting and flatten rewards (already divided by reward scale).
    pub total_reward: f64,
    pub realized_pnl: f64,
    /// Realized + unrealized at the last row's midpoint.
    pub total_pnl: f64,
    pub trade_count: u64,
    pub orders_placed: u64,
    pub rejected_orders: u64,
    /// Orders that left their inventory's slot by filling.
    pub fills: u64,
    pub final_features: PositionFeatures,
    pub reward_curve: Vec<CurvePoint>,
}

pub struct ReplayRunner {
    broker: Broker,
    settings: ReplaySettings,
}

impl ReplayRunner {
    pub fn new(params: EngineParams, settings: ReplaySettings) -> Self {
        Self {
            broker: Broker::new(params),
            settings,
        }
    }

    pub fn try_new(params: EngineParams, settings: ReplaySettings) -> Result<Self, ParamsError> {
        Ok(Self {
            broker: Broker::try_new(params)?,
            settings,
        })
    }

    pub fn broker(&self) -> &Broker {
        &self.broker
    }

    pub fn settings(&self) -> &ReplaySettings {
        &self.settings
    }

    /// Replay `rows` from an empty broker.
    pub fn run(&mut self, rows: &[TapeRow]) -> ReplayReport {
        self.broker.reset();

        let mut total_reward = 0.0;
        let mut orders_placed = 0u64;
        let mut rejected_orders = 0u64;
        let mut fills = 0u64;
        let mut reward_curve = Vec::with_capacity(rows.len());

        for row in rows {
            // Orders on the tape are placed after this tick executes.
            let working_long = self.broker.long_inventory().order().is_some();
            let working_short = self.broker.short_inventory().order().is_some();

            total_reward += self.broker.step(&row.tick());

            if working_long && self.broker.long_inventory().order().is_none() {
                fills += 1;
            }
            if working_short && self.broker.short_inventory().order().is_none() {
                fills += 1;
            }

            for side in [Side::Long, Side::Short] {
                if let Some((price, queue_ahead)) = row.order_for(side) {
                    let order = self.broker.new_order(
                        self.settings.symbol.as_str(),
                        side,
                        price,
                        row.step,
                        queue_ahead,
                    );
                    orders_placed += 1;
                    if !self.broker.add(order) {
                        rejected_orders += 1;
                        debug!(step = row.step, side = %side, price, "tape order rejected");
                    }
                }
            }

            if row.flattens() {
                total_reward += self.broker.flatten_inventory(row.bid, row.ask);
            }

            reward_curve.push(CurvePoint {
                step: row.step,
                cumulative_reward: total_reward,
                total_pnl: self.broker.total_pnl(row.midpoint()),
            });
        }

        let last_midpoint = match rows.last() {
            Some(last) => {
                if self.settings.flatten_at_end {
                    total_reward += self.broker.flatten_inventory(last.bid, last.ask);
                    if let Some(point) = reward_curve.last_mut() {
                        point.cumulative_reward = total_reward;
                        point.total_pnl = self.broker.total_pnl(last.midpoint());
                    }
                }
                last.midpoint()
            }
            None => 0.0,
        };

        let report = ReplayReport {
            steps: rows.len(),
            total_reward,
            realized_pnl: self.broker.realized_pnl(),
            total_pnl: self.broker.total_pnl(last_midpoint),
            trade_count: self.broker.total_trade_count(),
            orders_placed,
            rejected_orders,
            fills,
            final_features: self.broker.position_features(last_midpoint),
            reward_curve,
        };

        info!(
            symbol = %self.settings.symbol,
            steps = report.steps,
            total_reward = report.total_reward,
            realized_pnl = report.realized_pnl,
            trades = report.trade_count,
            "replay complete"
        );
        report
    }
}
