mod app;
mod clipboard;
mod config;
mod events;
mod logging;
mod persist;
mod strings;
mod terminal;
mod theme;
mod ui;

use anyhow::Result;
use tracing::{info, warn};

use crate::{app::App, clipboard::AppClipboard, config::Settings, terminal::TerminalGuard};

#[tokio::main]
async fn main() -> Result<()> {
    let (settings, warnings) = Settings::load();
    let _log_guard = match logging::init(&settings) {
        Ok(g) => g,
        Err(e) => {
            // the terminal is still ours to write to at this point
            eprintln!("reso: logging disabled: {:#}", e);
            None
        }
    };
    for w in warnings {
        warn!(target: "tui", "config: {}", w);
    }

    let store = persist::open_store(&settings);
    let clipboard = AppClipboard::from_settings(settings.clipboard);
    let (mut app, mut settled) = App::new(store, clipboard);

    info!(target: "tui", "starting");
    let mut term = TerminalGuard::new()?;
    let res = events::run(&mut term.terminal, &mut app, &mut settled).await;
    drop(term);
    info!(target: "tui", "exiting");
    res
}
