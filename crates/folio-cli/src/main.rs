mod repl;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use folio_core::Workspace;
use folio_llm::DocumentChatProvider;
use folio_store::SessionStore;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio", about = "Chat with your papers from the terminal.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive chat (default).
    Chat {
        /// PDF to attach immediately.
        #[arg(long)]
        document: Option<PathBuf>,
        /// Resume a stored session by id.
        #[arg(long)]
        session: Option<String>,
        /// Model id (e.g. `gemini-1.5-flash`); picked automatically if omitted.
        #[arg(long)]
        model: Option<String>,
    },
    /// List stored sessions.
    Sessions,
    /// Delete a stored session permanently.
    Delete { id: String },
    /// List models that support conversational generation.
    Models,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Command::Chat {
        document: None,
        session: None,
        model: None,
    }) {
        Command::Chat {
            document,
            session,
            model,
        } => chat(document, session, model).await,
        Command::Sessions => list_sessions(),
        Command::Delete { id } => delete_session(&id),
        Command::Models => list_models().await,
    }
}

fn open_store() -> Result<SessionStore, Box<dyn std::error::Error>> {
    Ok(SessionStore::open(folio_app::sessions_dir()?)?)
}

fn list_sessions() -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let sessions = store.list()?;
    if sessions.is_empty() {
        println!("No saved sessions.");
        return Ok(());
    }
    for session in sessions {
        let title = if session.title.is_empty() {
            "(untitled)"
        } else {
            &session.title
        };
        println!(
            "{}  {}  {}",
            session.id,
            session.timestamp.format("%Y-%m-%d"),
            title
        );
    }
    Ok(())
}

fn delete_session(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    open_store()?.delete(id)?;
    println!("Deleted session {id}.");
    Ok(())
}

async fn list_models() -> Result<(), Box<dyn std::error::Error>> {
    let provider = build_provider()?;
    let models = folio_core::generation_models(&provider.list_models().await?);
    for model in models {
        let display = model.display_name.as_deref().unwrap_or("");
        println!("{:<40} {display}", model.id());
    }
    Ok(())
}

async fn chat(
    document: Option<PathBuf>,
    session: Option<String>,
    model: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let provider = build_provider()?;
    let model_id = match model {
        Some(model) => Some(model),
        None => pick_default_model(&provider).await,
    };

    let store = open_store()?;
    let mut workspace = Workspace::new(provider, store, model_id);
    println!("Using model {}.", workspace.model_id());

    if let Some(id) = &session {
        workspace.load_session(id)?;
        println!("Resumed session {id} ({} turns).", workspace.turns().len());
        if workspace.local_document().is_some() {
            println!("Re-uploading the session's document...");
            workspace.resume_document().await?;
        } else {
            println!("The session's document is no longer on disk; use /open to attach one.");
        }
    }

    if let Some(path) = &document {
        println!("Uploading document and generating summary...");
        workspace.attach_document(path).await?;
        println!("Document ready.");
    }

    repl::run(&mut workspace).await
}

/// Discover a default model from the provider, falling back to the built-in
/// default when listing fails (e.g. offline).
async fn pick_default_model(provider: &DocumentChatProvider) -> Option<String> {
    match provider.list_models().await {
        Ok(models) => folio_core::default_model(&folio_core::generation_models(&models)),
        Err(err) => {
            warn!(error = %err, "could not list models; using the default");
            None
        }
    }
}

fn build_provider() -> Result<DocumentChatProvider, Box<dyn std::error::Error>> {
    Ok(folio_gemini::provider(folio_gemini::GeminiConfig {
        api_key: resolve_api_key()?,
        ..Default::default()
    }))
}

/// The API key comes from `GEMINI_API_KEY` (environment or `.env`), with an
/// interactive prompt as the fallback.
fn resolve_api_key() -> Result<String, Box<dyn std::error::Error>> {
    if let Ok(key) = std::env::var("GEMINI_API_KEY")
        && !key.trim().is_empty()
    {
        return Ok(key.trim().to_string());
    }

    let key = rpassword::prompt_password("Enter Gemini API key: ")?;
    if key.trim().is_empty() {
        return Err(folio_core::Error::Config("no API key provided".into()).into());
    }
    Ok(key.trim().to_string())
}
