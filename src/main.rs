use std::sync::Arc;

use craiova_guide::{
    config::Config,
    db::{create_pool, create_redis_client, Cache, MemoryStore, PgStore, Store},
    routes::{create_router, AppState},
    services::{ContactMailer, HttpMailer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "craiova_guide=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => Arc::new(PgStore::new(create_pool(url).await?)),
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let mailer: Arc<dyn ContactMailer> = Arc::new(HttpMailer::new(
        config.mail_relay_url.clone(),
        config.mail_api_key.clone(),
        config.mail_from.clone(),
        config.contact_recipient.clone(),
    ));

    let mut state = AppState::new(store.clone(), mailer)
        .with_suggestion_policy(config.suggestion_policy());

    let mut cache_writer = None;
    if let Some(redis_url) = &config.redis_url {
        let (cache, handle) = Cache::new(create_redis_client(redis_url)?);
        state = state.with_cache(cache, config.place_cache_ttl);
        cache_writer = Some(handle);
    }

    tracing::info!(
        store = store.name(),
        cache = cache_writer.is_some(),
        policy = ?config.suggestion_policy(),
        "Application state ready"
    );

    let app = create_router(Arc::new(state));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
