/*
 * Responsibility
 * - /users handlers: extract -> UserService -> envelope
 * - Identity arrives via extractor (routes decide which handlers sit behind auth)
 * - JSON decode failures become `invalid request body`
 */
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    api::v1::{
        dto::users::{ApiResponse, CreateUserRequest, CreatedUser, UpdateUserRequest, UserResponse},
        extractors::Identity,
    },
    error::AppError,
    state::AppState,
};

type JsonResult<T> = Result<Json<ApiResponse<T>>, AppError>;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(v)| v).map_err(|err| {
        tracing::debug!(error = %err, "request body rejected");
        // streamed bodies hit the size limit here rather than in the layer
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::InvalidBody
        }
    })
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    #[serde(default)]
    pub email: Option<String>,
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedUser>>), AppError> {
    let req = body(payload)?;
    let id = state.users.create(req.into()).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::data(CreatedUser { id }))))
}

pub async fn get_me(State(state): State<AppState>, identity: Identity) -> JsonResult<UserResponse> {
    let user = state.users.get_me(&identity).await?;
    Ok(Json(ApiResponse::data(user.into())))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> JsonResult<UserResponse> {
    let user = state.users.get_by_id(&user_id).await?;
    Ok(Json(ApiResponse::data(user.into())))
}

pub async fn get_user_by_email(
    State(state): State<AppState>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> JsonResult<UserResponse> {
    let Query(query) = query.map_err(|err| {
        tracing::debug!(error = %err, "email query rejected");
        AppError::InvalidEmail
    })?;
    let email = query.email.unwrap_or_default();
    let user = state.users.get_by_email(&email).await?;
    Ok(Json(ApiResponse::data(user.into())))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> JsonResult<()> {
    let req = body(payload)?;
    state.users.update(&user_id, req.into()).await?;
    Ok(Json(ApiResponse::message("user updated successfully")))
}

pub async fn delete_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(user_id): Path<String>,
) -> JsonResult<()> {
    state.users.delete(&user_id).await?;
    tracing::info!(by = identity.subject(), user_id = %user_id, "admin delete");
    Ok(Json(ApiResponse::message("user deleted successfully")))
}
