//! Daytalk Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use daytalk_engine::infrastructure::{
    json_save::JsonSaveStore, npc_catalog::NpcCatalog, npc_proxy::NpcProxyClient,
    settings::EngineSettings,
};
use daytalk_engine::{api, App};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may be run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daytalk_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Daytalk Engine");

    let settings = EngineSettings::from_env();

    let catalog = match &settings.npc_catalog_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading NPC catalog");
            NpcCatalog::load(path).await?
        }
        None => NpcCatalog::builtin(),
    };

    tracing::info!(
        proxy_url = %settings.proxy_url,
        timeout_secs = settings.proxy_timeout_secs,
        "Dialogue proxy configured"
    );
    let transport = Arc::new(NpcProxyClient::with_timeout(
        &settings.proxy_url,
        settings.proxy_timeout_secs,
    ));
    let save_store = Arc::new(
        JsonSaveStore::new(&settings.save_root, settings.save_slot)
            .with_max_turns(settings.max_turns),
    );
    tracing::info!(slot_dir = %save_store.slot_dir().display(), "Save slot configured");

    let app = Arc::new(App::new(&settings, transport, save_store, catalog));

    // Resume whatever the slot holds; a missing slot is a fresh game
    app.use_cases.session.load_game().await?;

    let mut router = api::routes()
        .with_state(Arc::clone(&app))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer_from_env() {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{}:{}", settings.server_host, settings.server_port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    app.use_cases.session.save_game().await?;
    tracing::info!("Game saved, shutting down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer_from_env() -> Option<CorsLayer> {
    let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        return Some(cors.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(cors.allow_origin(origins))
}
