//! Typed config sections.
//!
//! Every field is optional; missing keys fall back to the engine defaults.
//! Unknown keys inside a section are not an error here; the unused-key
//! report is where typos surface.

use anyhow::{Context, Result};
use mms_engine::{EngineParams, DEFAULT_FEE, DEFAULT_LOT_SIZE, DEFAULT_MAX_POSITION};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `/engine`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    pub lot_size: f64,
    pub fee: f64,
    pub max_position: usize,
    /// `None` => `fee * 10 * 5`.
    pub target_pnl: Option<f64>,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            lot_size: DEFAULT_LOT_SIZE,
            fee: DEFAULT_FEE,
            max_position: DEFAULT_MAX_POSITION,
            target_pnl: None,
        }
    }
}

impl EngineSection {
    pub fn to_params(&self) -> EngineParams {
        EngineParams {
            lot_size: self.lot_size,
            fee: self.fee,
            max_position: self.max_position,
            target_pnl: self.target_pnl.unwrap_or(self.fee * 10.0 * 5.0),
        }
    }
}

/// `/replay`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaySection {
    pub symbol: String,
    pub flatten_at_end: bool,
}

impl Default for ReplaySection {
    fn default() -> Self {
        Self {
            symbol: "ETH-USD".to_string(),
            flatten_at_end: true,
        }
    }
}

fn section<T>(config_json: &Value, pointer: &str) -> Result<T>
where
    T: Default + for<'de> Deserialize<'de>,
{
    match config_json.pointer(pointer) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(v) => serde_json::from_value(v.clone())
            .with_context(|| format!("CONFIG_INVALID_SECTION pointer={pointer}")),
    }
}

/// Read `/engine` and validate it as [`EngineParams`].
pub fn engine_params_from_config(config_json: &Value) -> Result<EngineParams> {
    let sec: EngineSection = section(config_json, "/engine")?;
    let params = sec.to_params();
    params
        .validate()
        .context("CONFIG_INVALID_ENGINE: /engine failed validation")?;
    Ok(params)
}

pub fn replay_section_from_config(config_json: &Value) -> Result<ReplaySection> {
    let sec: ReplaySection = section(config_json, "/replay")?;
    if sec.symbol.trim().is_empty() {
        anyhow::bail!("CONFIG_INVALID_REPLAY: /replay/symbol must not be empty");
    }
    Ok(sec)
}
