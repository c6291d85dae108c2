//! CentralEGA user-directory service.
//!
//! One protected endpoint: `GET /lega/v1/legas/users/{identifier}`,
//! with an `idType` query parameter and HTTP Basic credentials naming a
//! calling instance, not an end user.

pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;

pub use state::AppState;

use std::net::SocketAddr;

use axum::extract::Request;
use axum::middleware as axum_middleware;
use axum::routing::get;
use axum::Router;
use cega_core::{CegaConfig, CoreError, CoreResult, DirectoryIndex, InstanceRegistry};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span};
use uuid::Uuid;

/// Builds the router: the lookup route behind Basic auth, the liveness
/// probe outside it.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/lega/v1/legas/users/:identifier", get(handlers::user))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::basic_auth,
        ))
        .route("/health/live", get(handlers::liveness))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                info_span!(
                    "http_request",
                    request_id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
}

/// Loads the directory and serves the lookup endpoint.
///
/// Everything that can go wrong here is fatal by design: a directory or
/// credential set that cannot be loaded must stop the process before it
/// answers a single request. Per-request errors never propagate back
/// out of the router.
pub async fn run_server(config: CegaConfig) -> CoreResult<()> {
    if config.instances.is_empty() {
        return Err(CoreError::configuration(
            "no instance credentials configured",
        ));
    }
    let directory = DirectoryIndex::from_dir(&config.directory.source)?;
    info!(
        records = directory.len(),
        source = %config.directory.source.display(),
        "user directory loaded"
    );

    let state = AppState::new(directory, InstanceRegistry::new(config.instances.clone()));
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|err| {
            CoreError::configuration(format!("bad listen address: {err}"))
        })?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "user directory listening");
    axum::serve(listener, app).await?;
    Ok(())
}
