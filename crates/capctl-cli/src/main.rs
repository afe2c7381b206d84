mod cmd;
mod prompt;

use clap::{Parser, Subcommand};
use cmd::capability::CapabilitySubcommand;

#[derive(Parser)]
#[command(
    name = "capctl",
    about = "Manage capability schemas against the platform API",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create capabilities and inspect capability namespaces
    Capability {
        #[command(subcommand)]
        subcommand: CapabilitySubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Capability { subcommand } => cmd::capability::run(subcommand),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
