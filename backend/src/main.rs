//! Registry entry point: loads settings, prepares storage, and serves the
//! JSON API, HTML pages, and health endpoints until interrupted.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};

use registry::domain::ports::PasswordHasher;
use registry::inbound::http::health::{HealthState, StorageCheck};
use registry::inbound::http::pages::PageRenderer;
use registry::inbound::http::state::HttpState;
use registry::logging::init_tracing;
use registry::outbound::hashing::Argon2Hasher;
use registry::outbound::memory::InMemoryStore;
use registry::outbound::persistence::{DbPool, DieselTransactionSource, run_pending_migrations};
use registry::server::{AppDependencies, ServerSettings, build_http_state, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = init_tracing() {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let (http_state, storage) = build_storage(&settings).await?;
    let pages = PageRenderer::new(settings.app_name())
        .map_err(|err| eyre!("failed to compile templates: {err}"))?;

    let health_state = web::Data::new(HealthState::new(storage));
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state: web::Data::new(http_state),
        pages: web::Data::new(pages),
    };
    let (server, port) = create_server(deps, &settings)
        .wrap_err_with(|| format!("failed to bind {}", settings.bind_addr()))?;
    info!(url = %settings.public_url(port), "starting server");

    let handle = server.handle();
    let shutdown = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for shutdown signal");
            return;
        }
        health_state.mark_draining();
        info!("closing server");
        handle.stop(true).await;
    };
    let (served, ()) = futures_util::join!(server, shutdown);
    served.wrap_err("server terminated with an error")
}

/// Use PostgreSQL when a database URL is configured, otherwise keep data in
/// memory for the lifetime of the process. Also returns the storage the
/// readiness endpoint checks.
async fn build_storage(settings: &ServerSettings) -> Result<(HttpState, Arc<dyn StorageCheck>)> {
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::default());
    let Some(pool_config) = settings.pool_config() else {
        warn!("no database configured; data will not survive a restart");
        let store = Arc::new(InMemoryStore::default());
        let http_state =
            build_http_state(Arc::clone(&store), hasher, settings.request_timeout());
        let storage: Arc<dyn StorageCheck> = store;
        return Ok((http_state, storage));
    };

    let applied = run_pending_migrations(pool_config.database_url())
        .await
        .wrap_err("failed to migrate database")?;
    info!(applied, "database schema up to date");

    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to create database pool")?;
    let source = Arc::new(DieselTransactionSource::new(pool, Arc::new(DefaultClock)));
    let http_state = build_http_state(Arc::clone(&source), hasher, settings.request_timeout());
    let storage: Arc<dyn StorageCheck> = source;
    Ok((http_state, storage))
}
