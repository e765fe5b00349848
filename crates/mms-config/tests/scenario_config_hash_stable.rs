//! Config hash stability.
//!
//! GREEN when:
//! - the same docs hash identically across calls
//! - key order inside YAML does not change the hash
//! - a changed value changes the hash
//! - overlays override earlier layers

use mms_config::load_layered_yaml_from_strings;

const BASE_YAML: &str = r#"
engine:
  lot_size: 1000.0
  fee: 0.003
  max_position: 1
replay:
  symbol: "ETH-USD"
  flatten_at_end: true
"#;

const BASE_YAML_REORDERED: &str = r#"
replay:
  flatten_at_end: true
  symbol: "ETH-USD"
engine:
  max_position: 1
  fee: 0.003
  lot_size: 1000.0
"#;

const OVERLAY_YAML: &str = r#"
engine:
  max_position: 5
"#;

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
}

#[test]
fn reordered_keys_produce_same_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML_REORDERED]).unwrap();
    assert_eq!(
        a.config_hash, b.config_hash,
        "reordering keys in YAML must not change the hash"
    );
}

#[test]
fn overlay_changes_value_and_hash() {
    let base = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let layered = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();

    assert_ne!(base.config_hash, layered.config_hash);
    assert_eq!(layered.config_json["engine"]["max_position"], 5);
    // untouched siblings survive the overlay
    assert_eq!(layered.config_json["engine"]["fee"], 0.003);
    assert_eq!(layered.config_json["replay"]["symbol"], "ETH-USD");
}

#[test]
fn hash_is_sha256_hex() {
    let c = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(c.config_hash.len(), 64);
    assert!(c.config_hash.chars().all(|ch| ch.is_ascii_hexdigit()));
}

#[test]
fn invalid_yaml_is_an_error() {
    let err = load_layered_yaml_from_strings(&["engine: [unclosed"]).unwrap_err();
    assert!(format!("{err:#}").contains("invalid yaml"));
}
