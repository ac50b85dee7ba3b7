//! Palaver TUI entry point.

use std::sync::Arc;

use clap::Parser;
use palaver_app::{App, Session};
use palaver_backend::MemoryBackend;
use palaver_core::ChatService;
use palaver_tui::Runtime;

/// Palaver terminal chat client
#[derive(Parser, Debug)]
#[command(name = "palaver")]
#[command(about = "Terminal chat client over an in-memory chat service")]
#[command(version)]
struct Args {
    /// Username to sign in as
    #[arg(short, long, default_value = "me")]
    user: String,

    /// Display name; defaults to the username
    #[arg(short, long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let args = Args::parse();
    let display_name = args.name.clone().unwrap_or_else(|| args.user.clone());

    let backend = MemoryBackend::new();
    let me = backend.register_user(&args.user, &display_name);

    // Seed a small directory so /new has someone to find
    let ada = backend.register_user("ada", "Ada Lovelace");
    let _ = backend.register_user("ben", "Ben Santos");
    let _ = backend.register_user("carol", "Carol Reyes");

    let seeded = backend.create_direct_conversation(&me.id, &ada.id).await?;
    let _ = backend.create_message(&seeded.id, &ada.id, "Welcome to Palaver!").await?;
    let _ = backend
        .create_message(&seeded.id, &ada.id, "Try /new to start a chat, /details for people.")
        .await?;

    let mut app = App::new(Session::new(me));
    let initial_actions = app.add_conversation(seeded);

    let service: Arc<dyn ChatService> = Arc::new(backend);
    let runtime = Runtime::new(app, service)?;
    Ok(runtime.run(initial_actions).await?)
}

/// Log to `palaver.log` when `PALAVER_LOG` is set; stdout belongs to the
/// terminal UI.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var_os("PALAVER_LOG").is_none() {
        return Ok(());
    }

    let file = std::fs::File::create("palaver.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("PALAVER_LOG"))
        .with_writer(file)
        .with_ansi(false)
        .init();
    Ok(())
}
