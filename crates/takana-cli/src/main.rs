use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use takana_core::{AppConfig, Viewport};

mod commands;

#[derive(Parser)]
#[command(name = "takana")]
#[command(author, version, about = "Scroll-driven pinned-section engine for the Takana Juo page")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Viewport used by the headless commands
#[derive(clap::Args, Clone, Copy)]
struct ViewportArgs {
    /// Viewport width in px
    #[arg(long, default_value_t = 1440.0)]
    width: f64,
    /// Viewport height in px
    #[arg(long, default_value_t = 900.0)]
    height: f64,
}

impl ViewportArgs {
    fn viewport(self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Preview the page in the terminal
    Run,
    /// Print the pinned ranges the snap rule is built from
    Ranges {
        #[command(flatten)]
        viewport: ViewportArgs,
    },
    /// Show where gesture-end scroll fractions settle
    Snap {
        /// Scroll fractions in [0, 1]
        #[arg(required = true)]
        fractions: Vec<f64>,
        #[command(flatten)]
        viewport: ViewportArgs,
    },
    /// Print every element of a section at a given progress
    Sample {
        /// Section id (hero, brand, story, menu, hours, reviews, order)
        section: String,
        /// Progress through the section in [0, 1]
        progress: f64,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        viewport: ViewportArgs,
    },
    /// Show the effective configuration
    Config {
        /// Write a default config file
        #[arg(long)]
        init: bool,
        /// Overwrite an existing file with --init
        #[arg(long, requires = "init")]
        force: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);
    config.engine.validate()?;

    let tui = matches!(cli.command, None | Some(Commands::Run));
    init_logging(&config, tui)?;

    // Handle commands
    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config).await,
        Some(Commands::Ranges { viewport }) => commands::ranges::run(&config, viewport.viewport()),
        Some(Commands::Snap { fractions, viewport }) => {
            commands::snap::run(&config, viewport.viewport(), &fractions)
        }
        Some(Commands::Sample {
            section,
            progress,
            json,
            viewport,
        }) => commands::sample::run(&config, viewport.viewport(), &section, progress, json),
        Some(Commands::Config { init, force }) => commands::config::run(&config, init, force),
    }
}

/// Log to stderr, or to a file in the data directory while the TUI owns the terminal
fn init_logging(config: &AppConfig, tui: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    if tui {
        std::fs::create_dir_all(config.data_dir())?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.log_path())?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}
