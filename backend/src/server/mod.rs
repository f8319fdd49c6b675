//! Server construction and middleware wiring.

mod config;

pub use config::ServerSettings;

use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use crate::Trace;
use crate::domain::ports::{AdminStore, PasswordHasher, TransactionSource, UserStore};
use crate::domain::{AdminServiceImpl, Error, UserServiceImpl};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::pages::{self, PageRenderer};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{admins, users};

/// Wire both services over one transaction source.
pub fn build_http_state<S>(
    source: Arc<S>,
    hasher: Arc<dyn PasswordHasher>,
    request_timeout: Duration,
) -> HttpState
where
    S: TransactionSource + 'static,
    S::Conn: UserStore + AdminStore,
{
    HttpState::new(
        Arc::new(UserServiceImpl::new(Arc::clone(&source), Arc::clone(&hasher))),
        Arc::new(AdminServiceImpl::new(source, hasher)),
    )
    .with_request_timeout(request_timeout)
}

/// Shared state handed to every worker's `App`.
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub pages: web::Data<PageRenderer>,
}

/// Malformed JSON bodies and query strings surface as `invalid` errors so
/// they share the JSON error envelope.
fn extractor_configs() -> (web::JsonConfig, web::QueryConfig) {
    let json = web::JsonConfig::default()
        .error_handler(|err, _req| Error::invalid(format!("Invalid request body: {err}")).into());
    let query = web::QueryConfig::default()
        .error_handler(|err, _req| Error::invalid(format!("Invalid query: {err}")).into());
    (json, query)
}

pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        pages,
    } = deps;
    let (json_config, query_config) = extractor_configs();

    let api = web::scope("/api/v1")
        .app_data(json_config)
        .app_data(query_config)
        .configure(users::configure)
        .configure(admins::configure);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(pages)
        .wrap(Trace)
        .service(api)
        .configure(pages::configure)
        .service(ready)
        .service(live)
}

/// Bind the listener and start serving. The health state moves to serving
/// once bound.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    deps: AppDependencies,
    settings: &ServerSettings,
) -> std::io::Result<(Server, u16)> {
    let health_state = deps.health_state.clone();
    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(settings.bind_addr())?;
    let port = server
        .addrs()
        .first()
        .map(|addr| addr.port())
        .unwrap_or_default();
    let server = server.run();

    health_state.mark_serving();
    Ok((server, port))
}
