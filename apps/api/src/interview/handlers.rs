use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::Value;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::interview::flow;
use crate::interview::models::{
    AnswerRequest, AnswerResponse, FinishRequest, InterviewReport, StartRequest, StartResponse,
};
use crate::state::AppState;

/// POST /api/interview/start
pub async fn handle_start(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<StartRequest>,
) -> Result<Json<StartResponse>, AppError> {
    let started = flow::start(state.store.as_ref(), &user.uid, req, Utc::now()).await?;
    Ok(Json(started))
}

/// POST /api/interview/answer
pub async fn handle_answer(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    let response = flow::answer(
        state.store.as_ref(),
        state.evaluator.as_ref(),
        &user.uid,
        req,
        Utc::now(),
    )
    .await?;
    Ok(Json(response))
}

/// POST /api/interview/finish
pub async fn handle_finish(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<FinishRequest>,
) -> Result<Json<InterviewReport>, AppError> {
    let report = flow::finish(state.store.as_ref(), &user.uid, req).await?;
    Ok(Json(report))
}

/// GET /api/interview/list
pub async fn handle_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Value>>, AppError> {
    Ok(Json(flow::list(state.store.as_ref(), &user.uid).await?))
}

/// GET /api/interview/:id
pub async fn handle_get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(flow::get(state.store.as_ref(), &user.uid, &id).await?))
}
