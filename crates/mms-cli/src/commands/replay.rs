//! `mms replay`: tape + layered config -> replay report.

use anyhow::{Context, Result};
use mms_config::UnusedKeyPolicy;
use mms_replay::{ReplayReport, ReplayRunner, ReplaySettings};
use serde::Serialize;
use std::fs;
use tracing::{info, warn};
use uuid::Uuid;

use super::load_config;

pub struct ReplayArgs {
    pub tape: String,
    pub config_paths: Vec<String>,
    pub json: bool,
    pub fail_on_unused_keys: bool,
}

#[derive(Serialize)]
struct ReplayOutput<'a> {
    run_id: String,
    config_hash: &'a str,
    tape_sha256: &'a str,
    symbol: &'a str,
    report: &'a ReplayReport,
}

pub fn replay(args: ReplayArgs) -> Result<()> {
    let loaded = load_config(&args.config_paths)?;

    let policy = if args.fail_on_unused_keys {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    let unused = mms_config::report_unused_keys(&loaded.config_json, policy)?;
    for pointer in &unused.unused_leaf_pointers {
        warn!(pointer = %pointer, "config key is not read by anything");
    }

    let params = mms_config::engine_params_from_config(&loaded.config_json)?;
    let section = mms_config::replay_section_from_config(&loaded.config_json)?;

    let tape_bytes =
        fs::read(&args.tape).with_context(|| format!("read tape failed: {}", args.tape))?;
    let tape_sha256 = mms_config::sha256_hex(&tape_bytes);
    let tape_text = String::from_utf8(tape_bytes).context("tape must be UTF-8 text")?;
    let rows = mms_replay::parse_tape(&tape_text)
        .with_context(|| format!("invalid tape: {}", args.tape))?;

    let run_id = derive_replay_run_id(&loaded.config_hash, &tape_sha256);
    info!(%run_id, rows = rows.len(), "starting replay");

    let settings = ReplaySettings {
        symbol: section.symbol,
        flatten_at_end: section.flatten_at_end,
    };
    let mut runner = ReplayRunner::try_new(params, settings)?;
    let report = runner.run(&rows);

    if args.json {
        let out = ReplayOutput {
            run_id: run_id.to_string(),
            config_hash: &loaded.config_hash,
            tape_sha256: &tape_sha256,
            symbol: &runner.settings().symbol,
            report: &report,
        };
        let s = serde_json::to_string_pretty(&out).context("serialize report json failed")?;
        println!("{s}");
        return Ok(());
    }

    println!("run_id={}", run_id);
    println!("config_hash={}", loaded.config_hash);
    println!("tape_sha256={}", tape_sha256);
    println!("symbol={}", runner.settings().symbol);
    println!("steps={}", report.steps);
    println!("total_reward={}", report.total_reward);
    println!("realized_pnl={}", report.realized_pnl);
    println!("total_pnl={}", report.total_pnl);
    println!("trade_count={}", report.trade_count);
    println!("orders_placed={}", report.orders_placed);
    println!("rejected_orders={}", report.rejected_orders);
    println!("fills={}", report.fills);

    Ok(())
}

/// Deterministic run id: UUIDv5 over config hash and tape digest.
///
/// Same config + same tape bytes => same id.
fn derive_replay_run_id(config_hash: &str, tape_sha256: &str) -> Uuid {
    let data = format!("mms-cli.replay.v1|{}|{}", config_hash, tape_sha256);
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, data.as_bytes())
}
