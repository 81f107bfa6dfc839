use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "dayblock", version, about = "Dayblock time-block planner CLI")]
struct Cli {
    /// Directory holding config.toml and blocks.json (default: ~/.config/dayblock)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Block scheduling
    Block {
        #[command(subcommand)]
        action: commands::block::BlockAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print the 12-hour label for a minute of the day
    Label {
        /// Minutes since midnight
        minute: i64,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = commands::Context::new(cli.data_dir).and_then(|ctx| match cli.command {
        Commands::Block { action } => commands::block::run(&ctx, action),
        Commands::Config { action } => commands::config::run(&ctx, action),
        Commands::Label { minute } => {
            println!("{}", dayblock_core::format_label(minute));
            Ok(())
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
