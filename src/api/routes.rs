//! API route handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::SharedState;
use crate::auth::{MaybeUser, RequireUser, SessionUser};
use crate::error::ApiError;
use crate::models::{CreateRecordRequest, Record, VoteKind, VoteRequest, VoteResponse};

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// GET /records - public, newest first
pub async fn list_records(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let store = state.store.lock().await;
    Ok(Json(store.list_records()?))
}

/// POST /records - signed-in callers only
pub async fn create_record(
    State(state): State<SharedState>,
    RequireUser(user): RequireUser,
    payload: Result<Json<CreateRecordRequest>, JsonRejection>,
) -> Result<Json<Record>, ApiError> {
    let Json(req) = payload?;
    let new = req.validate(&user.id, user.name.as_deref())?;

    let store = state.store.lock().await;
    let record = store.create_record(&new)?;

    info!(record_id = %record.id, name = %record.name, "Record submitted");
    Ok(Json(record))
}

/// POST /votes - anonymous allowed, voter recorded when signed in
pub async fn cast_vote(
    State(state): State<SharedState>,
    MaybeUser(user): MaybeUser,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<VoteResponse>, ApiError> {
    let Json(req) = payload?;

    let (record_id, raw_kind) = match (req.record_id, req.vote) {
        (Some(id), Some(vote)) if !id.is_empty() && !vote.is_empty() => (id, vote),
        _ => return Err(ApiError::Validation("Missing recordId or vote".into())),
    };
    let kind: VoteKind = raw_kind.parse()?;

    let voter = user.as_ref().map(|u| u.id.as_str());
    let confidence = state.store.lock().await.cast_vote(&record_id, voter, kind)?;

    info!(
        record_id = %record_id,
        vote = %kind,
        anonymous = voter.is_none(),
        confidence,
        "Vote cast"
    );
    Ok(Json(VoteResponse {
        success: true,
        confidence,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: Option<SessionUser>,
}

/// GET /user - who the session token belongs to, if any
pub async fn current_user(MaybeUser(user): MaybeUser) -> Json<UserResponse> {
    Json(UserResponse { user })
}
