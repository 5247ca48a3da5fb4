//! Request handlers.

use super::error::ApiError;
use super::params::{dataset_key, parse_tile_query, QueryParams};
use crate::capabilities::Capabilities;
use crate::service::TileService;
use crate::storage::StorageGateway;
use axum::extract::{Path, RawQuery, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// File extension of tile requests.
pub const TILE_EXTENSION: &str = ".mvt";

/// Media type of encoded tiles.
pub const TILE_CONTENT_TYPE: &str = "application/x-protobuf";

/// `GET /occurrence/density/{z}/{x}/{y}.mvt`
pub async fn tile<G: StorageGateway + 'static>(
    State(service): State<Arc<TileService<G>>>,
    Path((z, x, y)): Path<(String, String, String)>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let Some(y) = y.strip_suffix(TILE_EXTENSION) else {
        return Err(ApiError::NotFound);
    };

    let params = QueryParams::parse(query.as_deref());
    let request = parse_tile_query(
        &z,
        &x,
        y,
        &params,
        service.config().default_hex_per_tile(),
    )?
    .into_request();

    // Cancelled when this future is dropped, i.e. the client went away.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let tile = service.tile(&request, &cancel).await?;
    debug!(
        dataset_key = %request.dataset_key,
        address = %request.compose.address,
        features = tile.feature_count(),
        bytes = tile.bytes().len(),
        "Serving tile"
    );

    Ok(([(header::CONTENT_TYPE, TILE_CONTENT_TYPE)], tile.into_bytes()).into_response())
}

/// `GET /occurrence/density/capabilities.json`
pub async fn capabilities<G: StorageGateway + 'static>(
    State(service): State<Arc<TileService<G>>>,
    RawQuery(query): RawQuery,
) -> Result<Json<Capabilities>, ApiError> {
    let params = QueryParams::parse(query.as_deref());
    let key = dataset_key(&params)?;

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    Ok(Json(service.capabilities(&key, &cancel).await?))
}
