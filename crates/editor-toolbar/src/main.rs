//! Editor toolbar command line.
//!
//! Usage:
//!   editor-toolbar apply --tree admin-menu.json --visible-only
//!   editor-toolbar branding

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use editor_toolbar::{Branding, Config, MenuTree, ToolbarManipulators, YamlSettings};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite a menu tree and print it as JSON.
    Apply {
        /// Menu tree JSON file, or "-" for stdin.
        #[arg(long, default_value = "-")]
        tree: String,

        /// Config export directory (overrides TOOLBAR_CONFIG_DIR).
        #[arg(long)]
        settings_dir: Option<PathBuf>,

        /// Drop forbidden items from the output.
        #[arg(long)]
        visible_only: bool,

        /// Pretty-print the output.
        #[arg(long)]
        pretty: bool,
    },

    /// Print the toolbar logo and deployed version info as JSON.
    Branding,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    match cli.command {
        Command::Apply {
            tree,
            settings_dir,
            visible_only,
            pretty,
        } => {
            let settings_dir = settings_dir.unwrap_or(config.settings_dir);
            let settings = YamlSettings::from_dir(&settings_dir).with_context(|| {
                format!("failed to load settings from {}", settings_dir.display())
            })?;
            let manipulators = ToolbarManipulators::from_source(&settings);

            let mut menu = read_tree(&tree)?;
            let before = menu.len();
            manipulators.apply(&mut menu);
            if visible_only {
                menu = menu.prune_forbidden();
            }
            info!(before, after = menu.len(), "menu tree rewritten");

            print_json(&menu, pretty)?;
        }
        Command::Branding => {
            let info = Branding::from_config(&config)
                .info()
                .context("failed to read branding")?;
            print_json(&info, true)?;
        }
    }

    Ok(())
}

fn read_tree(source: &str) -> Result<MenuTree> {
    let json = if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read menu tree from stdin")?;
        buf
    } else {
        fs::read_to_string(source).with_context(|| format!("failed to read {source}"))?
    };

    MenuTree::from_json(&json).context("failed to parse menu tree")
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries JSON output only
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
