use serde::{Deserialize, Serialize};

/// Notional size of every order.
pub const DEFAULT_LOT_SIZE: f64 = 1000.0;

/// Fee charged per closing trade (fraction of notional).
pub const DEFAULT_FEE: f64 = 0.003;

/// Per-side inventory capacity.
pub const DEFAULT_MAX_POSITION: usize = 1;

/// Returned by `flatten_inventory` when there is nothing to flatten.
pub const EMPTY_FLATTEN_PENALTY: f64 = -0.000_000_000_01;

/// Floor for `executed` in the queue-progress feature.
pub const QUEUE_FEATURE_EPSILON: f64 = 0.0001;

/// Engine constants shared by every order and both inventories.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineParams {
    pub lot_size: f64,
    pub fee: f64,
    pub max_position: usize,
    /// Normaliser for the total-PnL observation feature.
    pub target_pnl: f64,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            lot_size: DEFAULT_LOT_SIZE,
            fee: DEFAULT_FEE,
            max_position: DEFAULT_MAX_POSITION,
            target_pnl: DEFAULT_FEE * 10.0 * 5.0,
        }
    }
}

impl EngineParams {
    /// Divides raw PnL into reward units: two fees (entry + exit).
    pub fn reward_scale(&self) -> f64 {
        self.fee * 2.0
    }

    pub fn with_max_position(mut self, max_position: usize) -> Self {
        self.max_position = max_position;
        self
    }

    pub fn with_fee(mut self, fee: f64) -> Self {
        self.fee = fee;
        self
    }

    /// Check every field is usable as a divisor / capacity.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !self.lot_size.is_finite() || self.lot_size <= 0.0 {
            return Err(ParamsError::NonPositiveLotSize {
                lot_size: self.lot_size,
            });
        }
        if !self.fee.is_finite() || self.fee <= 0.0 {
            return Err(ParamsError::NonPositiveFee { fee: self.fee });
        }
        if self.max_position == 0 {
            return Err(ParamsError::ZeroCapacity);
        }
        if !self.target_pnl.is_finite() || self.target_pnl <= 0.0 {
            return Err(ParamsError::NonPositiveTargetPnl {
                target_pnl: self.target_pnl,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamsError {
    NonPositiveLotSize { lot_size: f64 },
    /// A zero fee makes the reward scale zero.
    NonPositiveFee { fee: f64 },
    ZeroCapacity,
    NonPositiveTargetPnl { target_pnl: f64 },
}

impl std::fmt::Display for ParamsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveLotSize { lot_size } => {
                write!(f, "engine params: lot_size must be > 0, got {lot_size}")
            }
            Self::NonPositiveFee { fee } => {
                write!(f, "engine params: fee must be > 0, got {fee}")
            }
            Self::ZeroCapacity => write!(f, "engine params: max_position must be >= 1"),
            Self::NonPositiveTargetPnl { target_pnl } => {
                write!(f, "engine params: target_pnl must be > 0, got {target_pnl}")
            }
        }
    }
}

impl std::error::Error for ParamsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let p = EngineParams::default();
        assert!(p.validate().is_ok());
        assert!((p.reward_scale() - 0.006).abs() < 1e-12);
        assert!((p.target_pnl - 0.15).abs() < 1e-12);
    }

    #[test]
    fn zero_fee_rejected() {
        let p = EngineParams::default().with_fee(0.0);
        assert_eq!(p.validate(), Err(ParamsError::NonPositiveFee { fee: 0.0 }));
    }

    #[test]
    fn zero_capacity_rejected() {
        let p = EngineParams::default().with_max_position(0);
        assert_eq!(p.validate(), Err(ParamsError::ZeroCapacity));
    }

    #[test]
    fn nan_lot_size_rejected() {
        let p = EngineParams {
            lot_size: f64::NAN,
            ..EngineParams::default()
        };
        assert!(matches!(
            p.validate(),
            Err(ParamsError::NonPositiveLotSize { .. })
        ));
    }
}
