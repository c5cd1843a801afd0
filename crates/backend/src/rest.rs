//! JSON REST surface and the request-context middleware.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use courtside_shared::models::{ShotPrediction, ShotRequest};
use serde::Deserialize;

use crate::error::{ErrorBody, PredictorError};
use crate::players::PlayerPage;
use crate::state::{AnalyticsReport, Health, Services, SERVICE_NAME, VERSION};

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const PROCESS_TIME_HEADER: &str = "x-process-time";

/// Adds `X-Request-ID` / `X-Process-Time` to every response and copies the
/// id into JSON error envelopes.
pub async fn request_context(
    State(services): State<Arc<Services>>,
    req: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let id = uuid::Uuid::new_v4().to_string();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut resp = next.run(req).await;

    if let Some(mut body) = resp.extensions_mut().remove::<ErrorBody>() {
        body.request_id = Some(id.clone());
        let status = resp.status();
        resp = (status, Json(body)).into_response();
    }

    let elapsed = started.elapsed();
    let status = resp.status();
    services.requests.record(status.as_u16() < 400);

    if let Ok(v) = HeaderValue::from_str(&id) {
        resp.headers_mut().insert(REQUEST_ID_HEADER, v);
    }
    if let Ok(v) = HeaderValue::from_str(&format!("{:.4}", elapsed.as_secs_f64())) {
        resp.headers_mut().insert(PROCESS_TIME_HEADER, v);
    }

    tracing::info!(
        request_id = %id,
        %method,
        %path,
        status = status.as_u16(),
        elapsed_ms = elapsed.as_millis() as u64,
        "request"
    );
    resp
}

pub async fn service_info(State(services): State<Arc<Services>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": SERVICE_NAME,
        "version": VERSION,
        "graphql": "/graphql",
        "status": "ready",
        "players": services.players.total(),
    }))
}

pub async fn health(State(services): State<Arc<Services>>) -> Json<Health> {
    Json(services.health())
}

pub async fn predict(
    State(services): State<Arc<Services>>,
    payload: Result<Json<ShotRequest>, JsonRejection>,
) -> Result<Json<ShotPrediction>, PredictorError> {
    let Json(req) = payload.map_err(|e| PredictorError::validation(e.body_text()))?;
    tracing::debug!(
        player = %req.player_name,
        loc_x = req.loc_x,
        loc_y = req.loc_y,
        "prediction request"
    );
    Ok(Json(services.prediction.predict(req).await?))
}

#[derive(Debug, Deserialize)]
pub struct PlayersQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
}

pub async fn players(
    State(services): State<Arc<Services>>,
    query: Result<Query<PlayersQuery>, QueryRejection>,
) -> Result<Json<PlayerPage>, PredictorError> {
    let Query(q) = query.map_err(|e| PredictorError::validation(e.body_text()))?;
    Ok(Json(services.players.list(q.page, q.per_page, q.search.as_deref())?))
}

pub async fn analytics(
    State(services): State<Arc<Services>>,
) -> Result<Json<AnalyticsReport>, PredictorError> {
    Ok(Json(services.analytics()?))
}

pub async fn clear_cache(
    State(services): State<Arc<Services>>,
) -> Result<Json<serde_json::Value>, PredictorError> {
    services.prediction.clear_cache()?;
    Ok(Json(serde_json::json!({ "message": "Cache cleared successfully" })))
}
