use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    Json,
};
use std::sync::Arc;
use crate::state::AppState;
use crate::api::dtos::{
    requests::ListUsersQuery,
    responses::{UserCreateResponse, UserEditResponse, UserFilters, UserIndexResponse},
};
use crate::domain::models::context::RequestContext;
use crate::domain::services::user_admin::{StoreUserInput, UpdateUserInput};
use crate::error::AppError;

pub const USERS_INDEX: &str = "/apps/users";

pub async fn index(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let users = state.user_admin.list(&ctx, query.q.as_deref(), query.page).await?;

    Ok(Json(UserIndexResponse {
        users,
        filters: UserFilters { q: query.q },
    }))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Result<impl IntoResponse, AppError> {
    let roles = state.user_admin.create_form(&ctx).await?;
    Ok(Json(UserCreateResponse { roles }))
}

pub async fn store(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Json(payload): Json<StoreUserInput>,
) -> Result<impl IntoResponse, AppError> {
    state.user_admin.store(&ctx, payload).await?;
    Ok(Redirect::to(USERS_INDEX))
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let form = state.user_admin.edit_form(&ctx, &id).await?;
    Ok(Json(UserEditResponse { user: form.user, roles: form.roles }))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserInput>,
) -> Result<impl IntoResponse, AppError> {
    state.user_admin.update(&ctx, &id, payload).await?;
    Ok(Redirect::to(USERS_INDEX))
}

pub async fn destroy(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.user_admin.destroy(&ctx, &id).await?;
    Ok(Redirect::to(USERS_INDEX))
}
