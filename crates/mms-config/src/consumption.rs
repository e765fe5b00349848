//! Config consumption map + unused-key guard.
//!
//! The registry lists the JSON pointers the typed sections read. A config leaf
//! under none of them is unused, typically a typo such as
//! `/engine/max_positions`. Keep the registry in step with `sections.rs`.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    /// Consumed JSON-pointer prefixes used for this analysis (sorted, unique)
    pub consumed_prefixes: Vec<String>,
    /// Unused leaf pointers (sorted)
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Reads performed by `engine_params_from_config` and
/// `replay_section_from_config`.
pub fn consumed_pointers() -> &'static [&'static str] {
    &[
        "/engine/lot_size",
        "/engine/fee",
        "/engine/max_position",
        "/engine/target_pnl",
        "/replay/symbol",
        "/replay/flatten_at_end",
    ]
}

/// Walk every leaf of `config_json` and report the ones outside the registry.
/// With [`UnusedKeyPolicy::Fail`], any unused leaf is an error.
pub fn report_unused_keys(config_json: &Value, policy: UnusedKeyPolicy) -> Result<UnusedKeyReport> {
    let registry = consumed_pointers();

    let mut leaves = BTreeSet::new();
    walk_leaves(config_json, String::new(), &mut leaves);

    let unused: Vec<String> = leaves
        .into_iter()
        .filter(|leaf| !registry.iter().any(|reg| covers(reg, leaf)))
        .collect();

    if policy == UnusedKeyPolicy::Fail && !unused.is_empty() {
        let shown: Vec<&str> = unused.iter().take(12).map(String::as_str).collect();
        bail!(
            "CONFIG_UNUSED_KEYS: {} config key(s) are not read by the engine or replay: {}",
            unused.len(),
            shown.join(", ")
        );
    }

    let mut consumed_prefixes: Vec<String> = registry.iter().map(|p| p.to_string()).collect();
    consumed_prefixes.sort();

    Ok(UnusedKeyReport {
        consumed_prefixes,
        unused_leaf_pointers: unused,
    })
}

/// `/engine/fee` covers itself and anything below it, never `/engine/fees`.
fn covers(registered: &str, leaf: &str) -> bool {
    match leaf.strip_prefix(registered) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Objects are descended; scalars and arrays are single leaves (every
/// engine/replay key is a scalar, so a list is one unknown value).
fn walk_leaves(v: &Value, pointer: String, out: &mut BTreeSet<String>) {
    match v {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                // RFC 6901 token escaping.
                let token = key.replace('~', "~0").replace('/', "~1");
                walk_leaves(child, format!("{pointer}/{token}"), out);
            }
        }
        _ if pointer.is_empty() => {}
        _ => {
            out.insert(pointer);
        }
    }
}
