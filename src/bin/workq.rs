//! workq CLI: replay plans against an in-memory engine.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use workq::config::{Config, EngineConfig};
use workq::engine::Engine;
use workq::model::WorkItem;
use workq::plan::Plan;
use workq::telemetry::{TelemetryConfig, init_telemetry};

#[derive(Parser)]
#[command(name = "workq", about = "Bucketed priority work queue")]
struct Cli {
    /// Engine config TOML (overrides WORKQ_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a plan and print what was claimed and what is still pending
    Replay {
        /// Plan TOML file
        plan: PathBuf,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Also print the engine's event stream
        #[arg(long)]
        events: bool,
    },
    /// Validate an engine config and print the resolved policy
    Check,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let env = Config::from_env()?;

    init_telemetry(TelemetryConfig {
        log_level: env.log_level.clone(),
    })?;

    let engine_config = match cli.config {
        Some(path) => EngineConfig::load(&path)?,
        None => env.load_engine_config()?,
    };

    match cli.command {
        Command::Replay { plan, json, events } => cmd_replay(engine_config, plan, json, events),
        Command::Check => cmd_check(&engine_config),
    }
}

fn cmd_replay(config: EngineConfig, plan: PathBuf, json: bool, events: bool) -> anyhow::Result<()> {
    let plan = Plan::load(&plan)?;
    let mut engine = Engine::new(config);
    let claimed = plan.run(&mut engine)?;
    let pending = engine.snapshot();

    if json {
        let mut out = serde_json::json!({
            "claimed": claimed,
            "pending": pending,
        });
        if events {
            out["events"] = serde_json::to_value(engine.get_events_since(0))?;
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_items("Claimed", &claimed);
    print_items("Pending", &pending);

    if events {
        println!("\nEvents:");
        for event in engine.get_events_since(0) {
            println!("{:>4}  {}", event.seq, serde_json::to_string(&event.kind)?);
        }
    }

    Ok(())
}

fn cmd_check(config: &EngineConfig) -> anyhow::Result<()> {
    println!("Default priority:  {}", config.default_priority);
    println!("Dedup to end:      {}", config.dedup_to_end);

    let types = config.work_types();
    if types.is_empty() {
        println!("No work types configured.");
        return Ok(());
    }

    println!("\n{:<20}  {:<12}  DEDUP", "TYPE", "PRIORITY");
    println!("{}", "-".repeat(44));
    for work_type in types {
        println!(
            "{:<20}  {:<12}  {}",
            work_type.name,
            config.priority_for(&work_type.name),
            if config.dedup_to_end_for(&work_type.name) {
                "to-end"
            } else {
                "in-place"
            }
        );
    }
    Ok(())
}

fn print_items(title: &str, items: &[WorkItem]) {
    println!("{title}:");
    if items.is_empty() {
        println!("  (none)");
        return;
    }

    println!(
        "  {:<8}  {:<16}  {:<12}  {:<24}  SOURCE",
        "ID", "TYPE", "PRI", "DEDUP_KEY"
    );
    for item in items {
        let dedup = item.dedup_key.as_deref().unwrap_or("-");
        println!(
            "  {:<8}  {:<16}  {:<12}  {:<24}  {}",
            item.id, item.work_type, item.priority, dedup, item.source
        );
    }
}
