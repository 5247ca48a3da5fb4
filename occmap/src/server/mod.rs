//! HTTP surface.
//!
//! | Route | Response |
//! |---|---|
//! | `GET /occurrence/density/{z}/{x}/{y}.mvt` | encoded tile, `application/x-protobuf` |
//! | `GET /occurrence/density/capabilities.json` | [`Capabilities`](crate::capabilities::Capabilities) as JSON |
//!
//! Every response carries permissive CORS headers. Invalid parameters
//! give 400, an unreachable store 503, anything else an opaque 500.

mod error;
mod handlers;
pub mod params;

pub use error::ApiError;
pub use handlers::{TILE_CONTENT_TYPE, TILE_EXTENSION};

use crate::service::TileService;
use crate::storage::StorageGateway;
use axum::http::Request;
use axum::routing::get;
use axum::Router;
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Builds the router for a service.
pub fn router<G: StorageGateway + 'static>(service: Arc<TileService<G>>) -> Router {
    Router::new()
        .route(
            "/occurrence/density/capabilities.json",
            get(handlers::capabilities::<G>),
        )
        .route("/occurrence/density/:z/:x/:y", get(handlers::tile::<G>))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    uri = %req.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// Serves `router` on `listener` until `shutdown` is cancelled.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: CancellationToken,
) -> io::Result<()> {
    info!(address = ?listener.local_addr()?, "Tile server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}
