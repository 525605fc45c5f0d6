use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;

use super::{load_cycle, PageQuery, ReasonBody};
use crate::errors::ApiError;
use crate::models::User;
use crate::services::users as service;
use crate::state::AppState;

// GET /api/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<User>>, ApiError> {
    load_cycle(&state, &headers, move |ctx| async move {
        let page_size = query.page_size(&ctx.config);
        service::list_users(&ctx, query.page(), page_size).await
    })
    .await
}

// GET /api/users/:id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    load_cycle(&state, &headers, move |ctx| async move { service::get_user(&ctx, &id).await }).await
}

// POST /api/users/:id/staff-role
pub async fn assign_staff_role(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Option<Json<ReasonBody>>,
) -> Result<Json<User>, ApiError> {
    let ctx = state.context(&headers);
    let body = body.map(|Json(b)| b).unwrap_or_default();
    Ok(Json(service::assign_staff_role(&ctx, &id, body.text()).await?))
}

// DELETE /api/users/:id/staff-role
pub async fn remove_staff_role(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Option<Json<ReasonBody>>,
) -> Result<Json<User>, ApiError> {
    let ctx = state.context(&headers);
    let body = body.map(|Json(b)| b).unwrap_or_default();
    Ok(Json(service::remove_staff_role(&ctx, &id, body.text()).await?))
}
