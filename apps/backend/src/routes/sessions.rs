//! Study session endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::routes::bounded_limit;
use crate::services::sessions;
use crate::AppState;

const MAX_SESSIONS: usize = 100;

/// POST /study/session
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let session = sessions::start(&state, auth.user_id, payload.deck_id, payload.mode).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /study/session/:session_id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<SessionResponse>> {
    Ok(Json(sessions::get(&state, auth.user_id, session_id).await?))
}

/// POST /study/session/:session_id/answer
pub async fn answer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<SessionId>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>> {
    let outcome = sessions::answer(&state, auth.user_id, session_id, payload.response).await?;
    Ok(Json(outcome))
}

/// POST /study/session/:session_id/finish
pub async fn finish(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<SessionResponse>> {
    Ok(Json(sessions::finish(&state, auth.user_id, session_id).await?))
}

/// DELETE /study/session/:session_id
pub async fn cancel(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<SessionId>,
) -> Result<StatusCode> {
    sessions::cancel(&state, auth.user_id, session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /study/sessions
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<SessionListResponse>> {
    let limit = bounded_limit(query.limit, 20, MAX_SESSIONS)?;
    let sessions = sessions::list(&state, auth.user_id, limit).await?;
    Ok(Json(SessionListResponse { sessions }))
}
