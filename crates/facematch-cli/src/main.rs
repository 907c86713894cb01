use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config;
mod replay;
mod scenario;

use config::Config;
use replay::Replay;
use scenario::Scenario;

#[derive(Parser)]
#[command(name = "facematch", about = "Register and recognize faces from detector output")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario of register / recognize / frame events
    Replay {
        /// Scenario TOML file
        scenario: PathBuf,
        /// Emit one JSON object per event instead of status text
        #[arg(long)]
        json: bool,
    },
    /// Print the landmark descriptor of every detection in a JSON file
    Describe {
        /// JSON array of detections
        detections: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { scenario, json } => {
            let config = Config::from_env();
            let scenario = Scenario::load(&scenario)?;
            tracing::info!(
                events = scenario.events.len(),
                interval = ?config.recognition_interval,
                "replaying scenario"
            );

            let mut replay = Replay::new(&config);
            let outcomes = replay.run(&scenario);
            let names: Vec<&str> = replay.registry().names().collect();

            if json {
                for outcome in &outcomes {
                    println!("{}", serde_json::to_string(outcome)?);
                }
                println!("{}", serde_json::json!({ "registered": names }));
            } else {
                for outcome in &outcomes {
                    println!("{outcome}");
                }
                if names.is_empty() {
                    println!("No faces registered");
                } else {
                    println!("Registered faces: {}", names.join(", "));
                }
            }
        }
        Commands::Describe { detections } => {
            let detections = scenario::load_detections(&detections)?;
            for (index, detection) in detections.iter().enumerate() {
                let line = match detection.descriptor() {
                    Ok(descriptor) => serde_json::json!({ "index": index, "descriptor": descriptor }),
                    Err(err) => serde_json::json!({ "index": index, "error": err.to_string() }),
                };
                println!("{line}");
            }
        }
    }

    Ok(())
}
