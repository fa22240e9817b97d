use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

mod analyzer;
mod handlers;
mod logic;
mod state;

use crate::analyzer::{GeminiAnalyzer, GeminiConfig, DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::handlers::{analyze_handler, health_handler};
use crate::state::AppState;

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    api_key: String,
    #[arg(long, env = "SMARTNOTE_MODEL", default_value = DEFAULT_MODEL)]
    model: String,
    #[arg(long, env = "SMARTNOTE_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,
    /// Origins allowed to call the API from a browser.
    #[arg(
        long = "allowed-origin",
        env = "SMARTNOTE_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000"
    )]
    allowed_origins: Vec<String>,
    /// Largest accepted request body in bytes.
    #[arg(long, env = "SMARTNOTE_MAX_BODY_BYTES", default_value_t = 16 * 1024 * 1024)]
    max_body_bytes: usize,
    /// Directory with index.html and the wasm bundle.
    #[arg(long, env = "SMARTNOTE_PUBLIC_DIR")]
    public_dir: Option<PathBuf>,
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(%origin, %error, "ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smartnote_server=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();
    let analyzer = GeminiAnalyzer::new(GeminiConfig {
        api_key: args.api_key,
        model: args.model.clone(),
        api_base: args.api_base,
    });
    let state = AppState {
        analyzer: Arc::new(analyzer),
    };

    let public_dir = args
        .public_dir
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../public"));

    let app = Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/health", get(health_handler))
        .fallback_service(ServeDir::new(&public_dir).append_index_html_on_directories(true))
        .layer(DefaultBodyLimit::max(args.max_body_bytes))
        .layer(cors_layer(&args.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!(
        model = %args.model,
        origins = ?args.allowed_origins,
        public_dir = %public_dir.display(),
        "Smart Note analysis API listening on http://{addr}"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server");
    axum::serve(listener, app).await.expect("Server crashed");
}
