use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{errors::ApiError, state::AppState};

use super::{
    dto::{
        CreateUserRequest, DeletedResponse, LoginRequest, PatchUserRequest, SearchParams,
        UpdateUserRequest,
    },
    repo_types::User,
    services,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route(
            "/users/:user_id",
            get(get_user).put(update_user).patch(patch_user).delete(delete_user),
        )
        .route("/internal/users/search", get(search_users))
        .route("/internal/users/login", post(login))
}

fn parse_user_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| {
        warn!(user_id = %raw, "non-numeric user id");
        ApiError::bad_request("user id should be a number")
    })
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|e| {
        warn!(error = %e, "invalid json body");
        ApiError::bad_request("invalid json body")
    })
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let req = json_body(payload)?;
    let user = services::create_user(state.users.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let user = services::get_user(state.users.as_ref(), user_id).await?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let req = json_body(payload)?;
    let user = services::update_user(state.users.as_ref(), user_id, req.into()).await?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn patch_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<PatchUserRequest>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let req = json_body(payload)?;
    let user = services::update_user(state.users.as_ref(), user_id, req).await?;
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    services::delete_user(state.users.as_ref(), user_id).await?;
    Ok(Json(DeletedResponse { status: "deleted" }))
}

#[instrument(skip(state, params))]
pub async fn search_users(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<User>>, ApiError> {
    let Query(params) = params.map_err(|e| {
        warn!(error = %e, "invalid search query");
        ApiError::bad_request("status should be one of: active, inactive")
    })?;
    let users = services::search_users(state.users.as_ref(), params.status).await?;
    Ok(Json(users))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let req = json_body(payload)?;
    let user = services::login_user(state.users.as_ref(), req).await?;
    Ok(Json(user))
}
