use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::commands::SystemClipboard;
use crate::config::{AppConfig, KeyResolver};
use crate::resource::{Context, InventoryClient, kind_list_screen, resource_list_screen};
use crate::stream::ForwardRegistry;

mod app;
mod cli;
pub mod commands;
mod config;
mod error;
mod resource;
pub mod screen;
mod search;
pub mod stream;
mod theme;
pub mod tui;
mod ui;

pub use theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting cloudnav");

    let args = cli::Args::parse();
    let mut config = config::load(args.config.as_deref())?;
    args.apply(&mut config);

    let client = inventory_client(&config)?;
    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone())));
    let theme = theme::theme_from_name(&config.theme.name);

    let mut app = App::new(resolver.clone(), theme, Arc::new(SystemClipboard::default()));
    let forwards = ForwardRegistry::new();
    let ctx = Context {
        client: Arc::new(client),
        resolver,
        settings: config.table.clone(),
        forwards: forwards.clone(),
        app_tx: app.event_sender(),
    };

    app.push(Box::new(kind_list_screen(&ctx)));
    if let Some(kind) = args.start_kind() {
        app.push(Box::new(resource_list_screen(&ctx, kind)));
    }

    let result = app.run().await;
    forwards.stop_all();
    info!("Exiting cloudnav");
    result
}

fn inventory_client(config: &AppConfig) -> Result<InventoryClient> {
    let client = match &config.inventory.path {
        Some(path) => InventoryClient::load(path)?,
        None => {
            info!("No inventory configured, using the built-in sample");
            InventoryClient::sample()?
        }
    };
    Ok(client.with_latency(Duration::from_millis(config.inventory.latency_ms)))
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("cloudnav").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "cloudnav.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
