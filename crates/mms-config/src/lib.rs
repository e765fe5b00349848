//! mms-config
//!
//! Layered YAML configuration for the simulator.
//! - Docs merge in order: earlier docs are base, later docs override
//! - The merged tree is canonicalised to JSON and hashed (SHA-256 hex)
//! - Typed sections are extracted from the merged JSON by pointer
//! - Unused-key guard reports leaves no code reads

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fs;

mod consumption;
mod sections;

pub use consumption::{consumed_pointers, report_unused_keys, UnusedKeyPolicy, UnusedKeyReport};
pub use sections::{
    engine_params_from_config, replay_section_from_config, EngineSection, ReplaySection,
};

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

/// Read each path and layer it over the previous ones.
pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let docs = paths
        .iter()
        .map(|p| fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}")))
        .collect::<Result<Vec<String>>>()?;
    let doc_refs: Vec<&str> = docs.iter().map(String::as_str).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

/// An empty slice yields the empty object (all defaults).
pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = Value::Object(Map::new());
    for (i, raw) in yaml_docs.iter().enumerate() {
        let doc: serde_yaml::Value =
            serde_yaml::from_str(raw).with_context(|| format!("invalid yaml in layer {i}"))?;
        // An empty document parses as null: nothing to override.
        if doc.is_null() {
            continue;
        }
        let layer = serde_json::to_value(doc)
            .with_context(|| format!("yaml layer {i} is not representable as json"))?;
        overlay(&mut merged, layer);
    }

    // serde_json::Map is BTreeMap-backed (no preserve_order), so keys serialize sorted.
    let canonical_json = serde_json::to_string(&merged).context("canonical json serialize failed")?;
    Ok(LoadedConfig {
        config_hash: sha256_hex(canonical_json.as_bytes()),
        canonical_json,
        config_json: merged,
    })
}

/// Objects merge key by key; anything else in `layer` replaces `base`.
fn overlay(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base_map), Value::Object(layer_map)) => {
            for (key, value) in layer_map {
                match base_map.get_mut(&key) {
                    Some(existing) => overlay(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// SHA-256 hex digest. Also used to fingerprint replay tapes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
