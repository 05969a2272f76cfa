//! Peptide Catalog Web Server
//!
//! Serves the organism and protein listings as server-rendered pages with
//! partial updates, plus the UniProt ingest endpoints and static assets.

mod render;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use peptide_catalog::services::create_ingest_registry;
use peptide_catalog::CatalogConfig;

use crate::render::TemplateRegistry;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "peptide_catalog_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Peptide Catalog Web Server");

    // Load environment variables
    dotenvy::dotenv().ok();
    let config = CatalogConfig::from_env()?;

    // Database connection
    let pool = match sqlx::PgPool::connect(&config.database_url).await {
        Ok(p) => {
            tracing::info!("Database connection established");
            p
        }
        Err(e) => {
            tracing::error!(
                "Failed to connect to database at {}: {}",
                config.database_url,
                e
            );
            tracing::error!(
                "Please check DATABASE_URL environment variable and ensure PostgreSQL is running"
            );
            return Err(format!("Database connection failed: {}", e).into());
        }
    };

    // Compile embedded templates
    let templates = Arc::new(TemplateRegistry::new()?);

    // Shared progress registry for ingest tasks
    let ingest = create_ingest_registry();

    let static_dir = config.static_dir.clone();
    let port = config.server_port;
    let state = AppState::new(pool, templates, ingest, config);

    // CORS for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(routes::organisms::organism_list))
        .route("/organisms", get(routes::organisms::organism_list))
        .route("/proteins", get(routes::proteins::protein_list))
        .route("/proteins/ingest", post(routes::proteins::start_ingest))
        .route("/progress/:task_id", get(routes::proteins::ingest_progress))
        .nest_service("/static", ServeDir::new(&static_dir))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!("Peptide Catalog running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  /                    - Organism listing (cascading filters)");
    tracing::info!("  /organisms           - Organism listing");
    tracing::info!("  /proteins            - Protein listing");
    tracing::info!("  /proteins/ingest     - Start a UniProt ingest (POST)");
    tracing::info!("  /progress/:task_id   - Ingest progress partial");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Port {} is already in use. Try: lsof -ti:{} | xargs kill -9",
                    port,
                    port
                );
            }
            return Err(format!("Failed to bind to {}: {}", addr, e).into());
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        return Err(format!("Server error: {}", e).into());
    }

    Ok(())
}
