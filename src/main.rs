// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use storefront_search::models::settings::SearchSettings;
use storefront_search::services::logging::init_tracing;
use storefront_search::services::{
    FileStore, MemorySurface, PanelView, PredictiveSearch, SearchOutcome, SearchSurface,
    StorefrontSuggestClient,
};
use storefront_search::VERSION;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "storefront-search", version = VERSION, about = "Predictive search against a storefront")]
struct Cli {
    /// Storefront origin, e.g. https://shop.example.com
    #[arg(long, env = "STOREFRONT_URL")]
    storefront: String,

    /// Directory holding persisted recent searches
    #[arg(long, env = "SEARCH_STATE_DIR", default_value = ".storefront-search")]
    state_dir: PathBuf,

    /// Money template used for prices, e.g. "${{amount}}"
    #[arg(long)]
    money_format: Option<String>,

    /// Debounce delay in milliseconds for interactive input
    #[arg(long)]
    debounce_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch suggestions for one query and print the rendered panel
    Suggest { query: String },
    /// Read input lines from stdin and print each panel update
    ///
    /// Plain lines replace the input value. Commands: `:submit <query>`,
    /// `:esc`, `:click`, `:focus`, `:quit`.
    Interactive,
    /// Print recent searches, most recent first
    History,
    /// Forget recent searches
    ClearHistory,
}

/// Surface that writes every panel update to stdout
struct StdoutSurface;

impl SearchSurface for StdoutSurface {
    fn present(&self, view: PanelView) {
        match view.node() {
            Some(node) => println!("[{}] {}", view.kind(), node.to_html()),
            None => println!("[{}]", view.kind()),
        }
    }
}

fn load_settings(cli: &Cli) -> Result<SearchSettings> {
    let mut settings = SearchSettings::for_storefront(&cli.storefront)?.apply_env()?;
    if let Some(format) = &cli.money_format {
        settings = settings.with_money_format(format.clone());
    }
    if let Some(ms) = cli.debounce_ms {
        settings = settings.with_debounce(Duration::from_millis(ms));
    }
    Ok(settings)
}

fn build<P: SearchSurface + 'static>(
    cli: &Cli,
    surface: P,
) -> Result<PredictiveSearch<StorefrontSuggestClient, FileStore, P>> {
    let settings = load_settings(cli)?;
    let client = StorefrontSuggestClient::new(&settings).context("Failed to build HTTP client")?;
    let store = FileStore::open(&cli.state_dir)
        .with_context(|| format!("Failed to open state directory {}", cli.state_dir.display()))?;
    PredictiveSearch::new(settings, client, store, surface).context("Failed to load search history")
}

async fn run_suggest(cli: &Cli, query: &str) -> Result<()> {
    let surface = Arc::new(MemorySurface::new());
    let search = build(cli, surface.clone())?;

    let outcome = search.handle_search(query).await;
    info!(?outcome, "Search finished");
    if outcome == SearchOutcome::Failed {
        anyhow::bail!("Suggest request failed, see log for details");
    }
    println!("{}", surface.current_html());
    Ok(())
}

/// One line of interactive input
#[derive(Debug, PartialEq, Eq)]
enum InputLine<'a> {
    Quit,
    Escape,
    OutsideClick,
    Focus,
    Submit(&'a str),
    Unknown(&'a str),
    Text(&'a str),
}

fn parse_line(line: &str) -> InputLine<'_> {
    match line.trim_end() {
        ":quit" => InputLine::Quit,
        ":esc" => InputLine::Escape,
        ":click" => InputLine::OutsideClick,
        ":focus" => InputLine::Focus,
        cmd if cmd.starts_with(':') => match cmd.strip_prefix(":submit ") {
            Some(query) => InputLine::Submit(query),
            None => InputLine::Unknown(cmd),
        },
        text => InputLine::Text(text),
    }
}

async fn run_interactive(cli: &Cli) -> Result<()> {
    let search = build(cli, StdoutSurface)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut typed_last = false;

    while let Some(line) = lines.next_line().await? {
        let line = parse_line(&line);
        typed_last = matches!(line, InputLine::Text(_));
        match line {
            InputLine::Quit => break,
            InputLine::Escape => search.on_escape(),
            InputLine::OutsideClick => search.on_outside_click(),
            InputLine::Focus => search.on_focus(),
            InputLine::Submit(query) => {
                if let Some(url) = search.on_submit(query)? {
                    println!("-> {}", url);
                }
            }
            InputLine::Unknown(cmd) => warn!(command = cmd, "Unknown interactive command"),
            InputLine::Text(text) => search.on_input(text),
        }
    }

    if typed_last {
        // Input ended mid-debounce: give the last query time to fire and settle
        let settings = search.settings();
        tokio::time::sleep(settings.debounce + settings.request_timeout).await;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    info!(version = VERSION, storefront = %cli.storefront, "storefront-search starting");

    match &cli.command {
        Command::Suggest { query } => run_suggest(&cli, query).await,
        Command::Interactive => run_interactive(&cli).await,
        Command::History => {
            let search = build(&cli, MemorySurface::new())?;
            for entry in search.recent_searches() {
                println!("{}", entry);
            }
            Ok(())
        }
        Command::ClearHistory => {
            let search = build(&cli, MemorySurface::new())?;
            search.clear_history()?;
            println!("Search history cleared");
            Ok(())
        }
    }
}
