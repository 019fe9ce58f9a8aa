mod input;
mod render;
mod runtime;
mod ui;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use librarian_core::api::ApiClient;
use librarian_core::config::CoreConfig;
use librarian_core::store::{ConversationStore, KeyringTokenStore};
use librarian_core::tracing_setup;

use crate::runtime::run_app;
use crate::ui::App;

/// Terminal client for the librarian book-recommendation service.
#[derive(Parser)]
#[command(name = "librarian-tui", version)]
struct Cli {
    /// Base URL of the backend API (overrides LIBRARIAN_API_BASE)
    #[arg(long)]
    api_base: Option<String>,

    /// Directory for client-local state
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_setup::init_tracing();

    let mut config = CoreConfig::from_env();
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base.trim_end_matches('/').to_string();
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    // Restore the terminal before the panic message prints, or it is lost to
    // the alternate screen.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        );
        eprintln!("\n\n=== PANIC ===");
        eprintln!("{}", panic_info);
        eprintln!("=============\n");
        original_hook(panic_info);
    }));

    let tokens = Arc::new(KeyringTokenStore);
    let api = Arc::new(ApiClient::new(&config.api_base, tokens));
    let conversations = ConversationStore::new(&config.data_dir);

    let (mut app, events_rx) = App::new(api, conversations);
    // The single startup identity check; its outcome arrives as an app event.
    app.refresh_session();

    let mut terminal = ui::init_terminal()?;
    let result = run_app(&mut terminal, &mut app, events_rx).await;
    ui::restore_terminal()?;

    if let Err(err) = result {
        eprintln!("Error: {err}");
    }

    Ok(())
}
