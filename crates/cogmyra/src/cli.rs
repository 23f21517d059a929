//! Command-line interface for the CogMyra memory store.

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use cogmyra_config::CogmyraConfig;
use cogmyra_core::{greet, make_session_id};
use cogmyra_memory::{MemoryEntry, MemoryStore, Metadata, compact};
use log::{debug, info};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Command-line options for the `cogmyra` binary.
#[derive(Debug, Parser)]
#[command(name = "cogmyra", version, about = "CogMyra memory and session tools")]
pub struct Cli {
    /// Optional path to a cogmyra.json5 config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a greeting
    Greet { name: String },
    /// Print a fresh session id for a user
    Session { user: String },
    /// Work with the memory store
    #[command(subcommand)]
    Mem(MemCommand),
}

#[derive(Debug, Subcommand)]
pub enum MemCommand {
    /// Append an entry and save
    Add {
        text: String,
        /// User id; defaults to memory.default_user
        #[arg(long)]
        user: Option<String>,
        /// Metadata as a JSON object
        #[arg(long)]
        meta: Option<String>,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// List the most recent entries, newest first
    Last {
        /// Entry count; defaults to memory.recent_limit
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        n: Option<u64>,
        #[arg(long)]
        user: Option<String>,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Case-insensitive substring search, newest first
    Search {
        query: String,
        #[arg(long)]
        user: Option<String>,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Write every entry to stdout as JSON lines
    Export {
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Append JSON lines read from stdin and save
    Import {
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Rewrite a memory file, dropping unreadable lines
    Compact {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Print entry counts as JSON
    Stats {
        #[command(flatten)]
        store: StoreArgs,
    },
}

/// Backing file selection shared by store commands.
#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Memory file; overrides memory.path
    #[arg(long)]
    pub file: Option<PathBuf>,
}

/// Execute a parsed command, writing results to `out` and reading `input`
/// when a command consumes stdin.
pub fn run(cli: Cli, out: &mut dyn Write, input: &mut dyn Read) -> anyhow::Result<()> {
    match cli.command {
        Command::Greet { name } => writeln!(out, "{}", greet(&name))?,
        Command::Session { user } => writeln!(out, "{}", make_session_id(&user))?,
        Command::Mem(command) => {
            let cwd =
                std::env::current_dir().context("failed to resolve current working directory")?;
            let config = load_config(cli.config.as_deref(), &cwd)?;
            run_mem(command, &config, &cwd, out, input)?;
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>, cwd: &Path) -> anyhow::Result<CogmyraConfig> {
    if let Some(path) = path {
        return CogmyraConfig::load_from_path(path).context("failed to load config");
    }
    let layered = CogmyraConfig::load_layered(cwd).context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    Ok(layered.config)
}

fn run_mem(
    command: MemCommand,
    config: &CogmyraConfig,
    cwd: &Path,
    out: &mut dyn Write,
    input: &mut dyn Read,
) -> anyhow::Result<()> {
    match command {
        MemCommand::Add {
            text,
            user,
            meta,
            store,
        } => {
            let metadata = meta.as_deref().map(parse_metadata).transpose()?;
            let user = user.unwrap_or_else(|| config.memory.default_user.clone());
            let store = open_store(&store, config, cwd)?.scoped();
            let entry = store
                .add(user, text, metadata)
                .context("failed to add memory entry")?;
            store.close().context("failed to save memory store")?;
            writeln!(out, "{:.6}\t{}", entry.timestamp(), entry.user_id())?;
            if config.session.enabled {
                writeln!(out, "session\t{}", make_session_id(entry.user_id()))?;
            }
        }
        MemCommand::Last { n, user, store } => {
            let n = match n {
                Some(n) => usize::try_from(n).context("--n is too large")?,
                None => config.memory.recent_limit,
            };
            let store = open_store(&store, config, cwd)?;
            write_entries(out, &store.get_last(n, user.as_deref()))?;
        }
        MemCommand::Search { query, user, store } => {
            let store = open_store(&store, config, cwd)?;
            write_entries(out, &store.search(&query, user.as_deref()))?;
        }
        MemCommand::Export { store } => {
            let store = open_store(&store, config, cwd)?;
            let written = store.export(out).context("failed to export entries")?;
            debug!("exported {written} entries");
        }
        MemCommand::Import { store } => {
            let store = open_store(&store, config, cwd)?.scoped();
            let imported = store.import(input).context("failed to import entries")?;
            store.close().context("failed to save memory store")?;
            writeln!(out, "Imported {imported} entries")?;
        }
        MemCommand::Compact { input, output } => {
            let report = compact(&input, &output).with_context(|| {
                format!("failed to compact {} into {}", input.display(), output.display())
            })?;
            writeln!(out, "Read {} entries, kept {} entries", report.read, report.kept)?;
        }
        MemCommand::Stats { store } => {
            let store = open_store(&store, config, cwd)?;
            let stats = serde_json::to_string(&store.stats())?;
            writeln!(out, "{stats}")?;
        }
    }
    Ok(())
}

fn open_store(
    args: &StoreArgs,
    config: &CogmyraConfig,
    cwd: &Path,
) -> anyhow::Result<MemoryStore> {
    let path = match args.file.as_ref() {
        Some(path) if path.is_absolute() => path.clone(),
        Some(path) => cwd.join(path),
        None => config.memory.resolve_path(cwd),
    };
    info!(
        "opening memory store (path={}, persist={})",
        path.display(),
        config.memory.persist.as_str()
    );
    MemoryStore::open_with_policy(&path, config.memory.persist)
        .with_context(|| format!("failed to open memory file {}", path.display()))
}

fn parse_metadata(raw: &str) -> anyhow::Result<Metadata> {
    let value: serde_json::Value =
        serde_json::from_str(raw).context("--meta must be valid JSON")?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => bail!("--meta must be a JSON object"),
    }
}

fn write_entries(out: &mut dyn Write, entries: &[MemoryEntry]) -> anyhow::Result<()> {
    for entry in entries {
        writeln!(
            out,
            "{:.6}\t{}\t{}",
            entry.timestamp(),
            entry.user_id(),
            entry.text()
        )?;
    }
    Ok(())
}
