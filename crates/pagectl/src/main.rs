//! pagectl - inspect and edit a pagestore directory from the shell
//!
//! Subcommands:
//! - `pagectl save <namespace> <locator>` - Save a page
//! - `pagectl pick <namespace>` - Print a random saved page
//! - `pagectl remove <namespace> <locator>` - Remove a page
//! - `pagectl exists <namespace> <locator>` - Print whether a page is saved
//! - `pagectl list <namespace>` - Print the content keys in a namespace
//! - `pagectl key <namespace> <locator>` - Print the content key of a page

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pagectl")]
#[command(about = "Inspect and edit a pagestore directory")]
#[command(version)]
struct Cli {
    /// Base directory holding one subdirectory per namespace.
    /// Overrides the config file and PAGESTORE_PATH.
    #[arg(long, global = true)]
    base_path: Option<PathBuf>,

    /// TOML config file with a [store] section
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a page, replacing any identical one
    Save {
        namespace: String,
        locator: String,
    },

    /// Print the locator of a random saved page
    Pick {
        namespace: String,
    },

    /// Remove a saved page
    Remove {
        namespace: String,
        locator: String,

        /// Succeed even if the page was not saved
        #[arg(long)]
        ignore_missing: bool,
    },

    /// Print "true" or "false" depending on whether a page is saved
    Exists {
        namespace: String,
        locator: String,
    },

    /// Print the content keys stored in a namespace
    List {
        namespace: String,
    },

    /// Print the content key a page is stored under
    Key {
        namespace: String,
        locator: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let Cli {
        base_path,
        config,
        command,
    } = cli;
    let open = || commands::open_store(base_path.clone(), config.as_deref());

    match command {
        Commands::Save { namespace, locator } => commands::save(&open()?, &namespace, &locator)?,
        Commands::Pick { namespace } => return commands::pick(&open()?, &namespace),
        Commands::Remove {
            namespace,
            locator,
            ignore_missing,
        } => commands::remove(&open()?, &namespace, &locator, ignore_missing)?,
        Commands::Exists { namespace, locator } => {
            commands::exists(&open()?, &namespace, &locator)?
        }
        Commands::List { namespace } => commands::list(&open()?, &namespace)?,
        Commands::Key { namespace, locator } => commands::key(&namespace, &locator),
    }

    Ok(ExitCode::SUCCESS)
}
