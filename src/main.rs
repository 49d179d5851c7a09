// EduLingua Assistant - conversational query layer for a language school
// Main entry point

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use edulingua::chat::Orchestrator;
use edulingua::config::load_config;
use edulingua::db::SupabaseClient;
use edulingua::providers::{CompletionBackend, OpenAiClient};
use edulingua::server::AppServer;
use edulingua::tools::build_registry;

const DEFAULT_BIND: &str = "0.0.0.0:8000";

#[derive(Parser, Debug)]
#[command(name = "edulingua")]
#[command(about = "Conversational assistant API for the EduLingua language school", version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Parser, Debug)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Bind address
        #[arg(long, default_value = DEFAULT_BIND)]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edulingua=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();

    let bind = match args.command {
        Some(Command::Serve { bind }) => bind,
        None => DEFAULT_BIND.to_string(),
    };

    run_server(&bind).await
}

async fn run_server(bind: &str) -> Result<()> {
    let config = load_config()?;

    let db = SupabaseClient::new(&config.supabase_url, &config.supabase_service_key)?;
    let backend: Arc<dyn CompletionBackend> =
        Arc::new(OpenAiClient::new(config.openai_api_key.clone())?);
    let registry = Arc::new(build_registry(&db));

    let orchestrator = Orchestrator::new(backend, registry, config.openai_model);

    AppServer::new(orchestrator).serve(bind).await
}
