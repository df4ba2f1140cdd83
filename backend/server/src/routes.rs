use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::State as AxumState,
    http::{StatusCode, header::CONTENT_TYPE},
    response::{Html, IntoResponse, Response},
};
use tracing::{info, warn};

use crate::{
    error::AppError,
    render::render_tips,
    state::State,
    utils::{get_vote_from_bytes, read_capped_body},
};

pub async fn tips_handler(AxumState(state): AxumState<Arc<State>>) -> Result<Response, AppError> {
    info!("Showing tips");
    let tips = state.service.get_ranked_tips().await?;

    Ok(Html(render_tips(&tips)?).into_response())
}

pub async fn json_tips_handler(
    AxumState(state): AxumState<Arc<State>>,
) -> Result<Response, AppError> {
    info!("Showing JSON tips");
    let tips = state.service.get_ranked_tips().await?;

    let body = serde_json::to_vec(&tips).map_err(|e| AppError::EncodingFailure(e.to_string()))?;

    Ok((StatusCode::OK, [(CONTENT_TYPE, "application/json")], body).into_response())
}

pub async fn vote_handler(
    AxumState(state): AxumState<Arc<State>>,
    body: Body,
) -> Result<Response, AppError> {
    let bytes = read_capped_body(body).await?;
    let (payload, request) = get_vote_from_bytes(&bytes).inspect_err(|e| {
        warn!("Rejected vote: {e}");
    })?;

    state.service.apply_request(request).await?;

    Ok(Json(payload).into_response())
}

pub async fn healthcheck_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
