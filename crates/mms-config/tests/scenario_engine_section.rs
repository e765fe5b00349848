use mms_config::{
    engine_params_from_config, load_layered_yaml_from_strings, replay_section_from_config,
};
use mms_engine::EngineParams;

#[test]
fn empty_config_yields_engine_defaults() {
    let c = load_layered_yaml_from_strings(&[]).unwrap();
    let params = engine_params_from_config(&c.config_json).unwrap();
    assert_eq!(params, EngineParams::default());

    let replay = replay_section_from_config(&c.config_json).unwrap();
    assert_eq!(replay.symbol, "ETH-USD");
    assert!(replay.flatten_at_end);
}

#[test]
fn partial_engine_section_fills_remaining_defaults() {
    let c = load_layered_yaml_from_strings(&["engine:\n  fee: 0.001\n  max_position: 4\n"]).unwrap();
    let params = engine_params_from_config(&c.config_json).unwrap();

    assert_eq!(params.fee, 0.001);
    assert_eq!(params.max_position, 4);
    assert_eq!(params.lot_size, 1000.0);
    // target follows the configured fee when not given explicitly
    assert!((params.target_pnl - 0.05).abs() < 1e-12);
    assert!((params.reward_scale() - 0.002).abs() < 1e-12);
}

#[test]
fn explicit_target_pnl_is_kept() {
    let c = load_layered_yaml_from_strings(&["engine:\n  target_pnl: 0.5\n"]).unwrap();
    let params = engine_params_from_config(&c.config_json).unwrap();
    assert_eq!(params.target_pnl, 0.5);
}

#[test]
fn zero_fee_fails_validation() {
    let c = load_layered_yaml_from_strings(&["engine:\n  fee: 0.0\n"]).unwrap();
    let err = engine_params_from_config(&c.config_json).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("CONFIG_INVALID_ENGINE"), "{msg}");
    assert!(msg.contains("fee must be > 0"), "{msg}");
}

#[test]
fn wrong_type_is_reported_with_pointer() {
    let c = load_layered_yaml_from_strings(&["engine:\n  max_position: lots\n"]).unwrap();
    let err = engine_params_from_config(&c.config_json).unwrap_err();
    assert!(format!("{err:#}").contains("pointer=/engine"));
}

#[test]
fn empty_symbol_rejected() {
    let c = load_layered_yaml_from_strings(&["replay:\n  symbol: \"  \"\n"]).unwrap();
    assert!(replay_section_from_config(&c.config_json).is_err());
}
