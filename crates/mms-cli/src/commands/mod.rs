//! Command handler modules for mms-cli.
//!
//! Shared utilities used by multiple command paths live here.

pub mod replay;

use anyhow::Result;
use mms_config::LoadedConfig;

/// Load layered config; no paths means every section takes its defaults.
pub fn load_config(config_paths: &[String]) -> Result<LoadedConfig> {
    if config_paths.is_empty() {
        return mms_config::load_layered_yaml_from_strings(&[]);
    }
    let path_refs: Vec<&str> = config_paths.iter().map(|s| s.as_str()).collect();
    mms_config::load_layered_yaml(&path_refs)
}
