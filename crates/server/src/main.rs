use std::net::SocketAddr;
use std::panic::PanicHookInfo;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use eyre::{WrapErr, bail};
use ktm_gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL, GeminiConfig, GeminiGenerator};
use ktm_transit::prelude::*;
use ktm_transit::prompt::DEFAULT_REGION;
use tracing_subscriber::{
    filter::{FilterFn, LevelFilter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

mod render;
mod routes;
mod view;

#[derive(Parser, Debug)]
#[command(
    name = "ktm-transit",
    author,
    version,
    about = "Look up bus routes by number or name",
    long_about = "Resolves a bus number or route name into a validated route with stops, \
                  schedule, traffic assessment and grounding sources, using a generative \
                  model with map grounding. Serves the result as JSON or prints it."
)]
struct Args {
    /// API key for the model service
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Model name
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Base URL of the model service
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Request timeout for a single model call
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Transit region named in the prompt
    #[arg(long, default_value = DEFAULT_REGION)]
    region: String,

    /// Verbose output (show debug messages)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: SocketAddr,
    },
    /// Resolve one query and print the route
    Query {
        /// Bus number or route name, e.g. "Ratnapark to Bhaktapur"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = FilterFn::new(|meta| meta.module_path().unwrap_or_default().starts_with("ktm"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter)
        .with(level)
        .init();
    std::panic::set_hook(Box::new(panic_hook));
}

fn panic_hook(info: &PanicHookInfo) {
    tracing::error!("{info}")
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = GeminiConfig {
        api_key: args.api_key,
        model: args.model,
        endpoint: args.endpoint,
        timeout: Duration::from_secs(args.timeout_secs),
    };
    tracing::debug!("model config: {config:?}");

    let generator = GeminiGenerator::new(config).wrap_err("Failed to build HTTP client")?;
    let resolver = RouteResolver::with_template(generator, PromptTemplate::new(args.region));

    match args.command {
        Command::Serve { bind } => serve(resolver, bind).await,
        Command::Query { query } => {
            let query = query.join(" ");
            match resolver.resolve(&query).await {
                Ok(report) => {
                    print!("{}", render::ReportText(&report));
                    Ok(())
                }
                Err(e) => {
                    tracing::warn!("query failed ({}): {}", e.kind(), e);
                    bail!("{}", e.user_message())
                }
            }
        }
    }
}

async fn serve(resolver: RouteResolver<GeminiGenerator>, bind: SocketAddr) -> eyre::Result<()> {
    let state = Arc::new(routes::AppState {
        resolver,
        session: QuerySession::new(),
    });
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .wrap_err_with(|| format!("Failed to bind {bind}"))?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
        .wrap_err("Server error")
}
