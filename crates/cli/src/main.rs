//! Multisig CLI - Main entry point

use clap::{Parser, Subcommand};
use multisig_cli::{AppContext, DeploymentConfig, Step};
use multisig_events::EventReader;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "multisig")]
#[command(about = "Multisig - quorum-gated transfers", long_about = None)]
struct Cli {
    /// Data directory path
    #[arg(short, long, default_value = "./data")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample deployment file
    Config {
        /// Output file path
        #[arg(long, default_value = "deployment.json")]
        output: PathBuf,
    },

    /// Deploy an engine and run an interaction script against it
    Run {
        /// Deployment file (quorum, owner, signers, holdings)
        #[arg(long, default_value = "deployment.json")]
        config: PathBuf,
        /// Script file (JSON array of steps)
        #[arg(long)]
        script: PathBuf,
    },

    /// Print the event journal
    Events {
        /// Fail if journal sequences have gaps
        #[arg(long)]
        verify: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { output } => {
            let deployment = DeploymentConfig::sample()?;
            std::fs::write(&output, serde_json::to_string_pretty(&deployment)?)?;
            println!("✅ Wrote sample deployment to {}", output.display());
        }

        Commands::Run { config, script } => {
            let deployment = DeploymentConfig::from_file(&config)?;
            let steps = Step::load_all(&script)?;

            let ctx = AppContext::new(&cli.data, &deployment).await?;
            println!(
                "🚀 Deployed: quorum {} of {} signers",
                ctx.engine.quorum(),
                ctx.engine.signer_count()
            );

            for (i, step) in steps.iter().enumerate() {
                println!("[{}] {}", i + 1, step);
                match ctx.execute(step) {
                    Ok(output) => println!("   ✅ {}", output),
                    Err(e) => println!("   ❌ {} ({})", e, e.code()),
                }
            }

            let stats = ctx.engine.stats();
            println!();
            println!("Transactions: {}", ctx.engine.tx_count());
            println!(
                "   transfers: {} open, {} completed",
                stats.open_transfers, stats.completed_transfers
            );
            println!(
                "   quorum updates: {} open, {} completed",
                stats.open_quorum_updates, stats.completed_quorum_updates
            );
            println!("Quorum: {}", ctx.engine.quorum());
            if let Some(pending) = ctx.engine.pending_quorum() {
                println!("Pending quorum: {}", pending);
            }

            let journal_path = ctx.journal_path().to_path_buf();
            let journaled = ctx.shutdown().await?;
            println!("📒 Journaled {} events to {}", journaled, journal_path.display());
        }

        Commands::Events { verify } => {
            let reader = EventReader::from_directory(cli.data.join("journal"))?;
            let records = if verify {
                reader.read_verified()?
            } else {
                reader.read_all()?
            };

            for record in &records {
                println!(
                    "{:>6}  {}  {:<24} #{}",
                    record.sequence,
                    record.recorded_at.to_rfc3339(),
                    record.event.name(),
                    record.event.tx_id()
                );
            }
            println!("✅ {} events", records.len());
        }
    }

    Ok(())
}
