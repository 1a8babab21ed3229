//! # CLI Layer
//!
//! This module is **one possible UI client** for beantown. It is not the
//! application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs the tracing subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Builds `AppContext` with API, store and data source
//! - `handle_*()`: Per-command handlers that call the API and format output
//! - `print_*()`: Output formatting functions (in `print.rs`)
//!
//! ## Data directory
//!
//! `$BEANTOWN_HOME` when set, otherwise the platform data directory
//! (`~/.local/share/beantown` on Linux). It holds `jellybean.json` and
//! `config.json`.

use super::print::{print_bean, print_beans, print_config, print_messages, print_status};
use super::setup::{Cli, Commands};
use beantown::api::{BeanTownApi, BeanTownPaths, ConfigAction};
use beantown::config::BeanTownConfig;
use beantown::error::{BeanError, Result};
use beantown::network::http::HttpJellyBeanSource;
use beantown::store::fs::FileStore;
use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const HOME_ENV: &str = "BEANTOWN_HOME";
const LOG_ENV: &str = "BEANTOWN_LOG";

struct AppContext {
    api: BeanTownApi<HttpJellyBeanSource, FileStore>,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let ctx = init_context()?;

    match cli.command {
        Some(Commands::List { page_size, limit }) => handle_list(&ctx, page_size, limit).await,
        Some(Commands::Show { id }) => handle_show(&ctx, id).await,
        Some(Commands::Refresh { page_size }) => handle_refresh(&ctx, page_size).await,
        Some(Commands::Status) => handle_status(&ctx).await,
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&ctx, None, None).await,
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "atomicrobot", "beantown")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| BeanError::Config("Could not determine data directory".to_string()))
}

fn init_context() -> Result<AppContext> {
    let data_dir = data_dir()?;
    let config = BeanTownConfig::load(&data_dir)?;
    debug!(data_dir = %data_dir.display(), ?config, "starting");

    let source = HttpJellyBeanSource::from_config(&config)?;
    let store = FileStore::open(data_dir.clone())?;
    let api = BeanTownApi::new(
        Arc::new(source),
        Arc::new(store),
        config,
        BeanTownPaths::new(data_dir),
    );
    Ok(AppContext { api })
}

async fn handle_list(ctx: &AppContext, page_size: Option<u32>, limit: Option<usize>) -> Result<()> {
    let result = ctx.api.list_beans(page_size, limit).await?;
    print_beans(&result.listed_beans);
    print_messages(&result.messages);
    Ok(())
}

async fn handle_show(ctx: &AppContext, id: i64) -> Result<()> {
    let result = ctx.api.show_bean(id).await?;
    if let Some(bean) = &result.bean {
        print_bean(bean);
    }
    print_messages(&result.messages);
    Ok(())
}

async fn handle_refresh(ctx: &AppContext, page_size: Option<u32>) -> Result<()> {
    let result = ctx.api.refresh(page_size).await?;
    print_messages(&result.messages);
    if result.has_errors() {
        return Err(BeanError::Api("Refresh did not complete".to_string()));
    }
    Ok(())
}

async fn handle_status(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.status().await?;
    if let Some(status) = &result.status {
        println!(
            "{:<16}{}",
            "Data dir:",
            ctx.api.paths().data_dir.display()
        );
        print_status(status);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action)?;
    if let (Some(config), true) = (&result.config, result.messages.is_empty()) {
        print_config(config);
    }
    print_messages(&result.messages);
    if result.has_errors() {
        return Err(BeanError::Config("Invalid configuration request".to_string()));
    }
    Ok(())
}
