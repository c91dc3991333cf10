//! Entry point for the `pokedex` terminal viewer.

use std::path::PathBuf;

use bubbletea_rs::Program;
use clap::Parser;

use pokedex_tui::app::{set_launch, App, Launch};
use pokedex_tui::config::Config;
use pokedex_tui::{logging, PokedexError, Result};

/// Browse the PokéAPI from the terminal.
#[derive(Debug, Parser)]
#[command(name = "pokedex", version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to $XDG_CONFIG_HOME/pokedex/config.toml).
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// PokéAPI base URL.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Entries fetched per page.
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,
    /// Language for names and descriptions, falling back to English.
    #[arg(long, value_name = "CODE")]
    language: Option<String>,
    /// Write logs to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Log level: trace, debug, info, warn or error.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
    /// Print the resolved configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(url) = &self.base_url {
            config.api.base_url = url.clone();
        }
        if let Some(size) = self.page_size {
            config.list.page_size = size;
        }
        if let Some(language) = &self.language {
            config.search.description_language = language.clone();
        }
        if let Some(path) = &self.log_file {
            config.logging.file = Some(path.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        config.validate()
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config)?;

    if cli.print_config {
        let rendered = toml::to_string_pretty(&config).map_err(|e| PokedexError::Runtime {
            details: format!("could not render configuration: {e}"),
        })?;
        print!("{rendered}");
        return Ok(());
    }

    logging::init(&config.logging)?;
    set_launch(Launch::from_config(config))?;

    let program = Program::<App>::builder()
        .alt_screen(true)
        .signal_handler(true)
        .build()
        .map_err(|e| PokedexError::Runtime {
            details: format!("could not start the terminal program: {e}"),
        })?;
    program.run().await.map_err(|e| PokedexError::Runtime {
        details: format!("terminal program failed: {e}"),
    })?;
    tracing::info!("exited cleanly");
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli).await {
        eprintln!("pokedex: [{}] {e}", e.code());
        std::process::exit(1);
    }
}
