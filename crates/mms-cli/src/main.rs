use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mms")]
#[command(about = "Market-making simulator CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> overrides...)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Replay a recorded tick/order tape through the broker
    Replay {
        /// Tape CSV (step,bid,ask,buy_volume,sell_volume[,orders...])
        #[arg(long)]
        tape: String,

        /// Layered config paths in merge order. Defaults apply when omitted.
        #[arg(long = "config")]
        config_paths: Vec<String>,

        /// Print the full report as pretty JSON instead of key=value lines.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Refuse to run when the config has keys nothing reads.
        #[arg(long, default_value_t = false)]
        fail_on_unused_keys: bool,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = mms_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Replay {
            tape,
            config_paths,
            json,
            fail_on_unused_keys,
        } => {
            commands::replay::replay(commands::replay::ReplayArgs {
                tape,
                config_paths,
                json,
                fail_on_unused_keys,
            })?;
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries command output only.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
