use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;

use super::{load_cycle, PageQuery, ReasonBody};
use crate::errors::ApiError;
use crate::models::Booking;
use crate::services::bookings::{self as service, ConfirmPayment};
use crate::state::AppState;

// GET /api/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    load_cycle(&state, &headers, move |ctx| async move {
        let page_size = query.page_size(&ctx.config);
        let mut bookings = service::list_bookings(&ctx, query.page(), page_size).await?;
        service::enrich_bookings(&ctx, &mut bookings).await;
        Ok(bookings)
    })
    .await
}

// GET /api/bookings/mine
pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Booking>>, ApiError> {
    load_cycle(&state, &headers, |ctx| async move {
        let mut bookings = service::my_bookings(&ctx).await?;
        service::enrich_bookings(&ctx, &mut bookings).await;
        Ok(bookings)
    })
    .await
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    load_cycle(&state, &headers, move |ctx| async move {
        let mut booking = [service::get_booking(&ctx, &id).await?];
        service::enrich_bookings(&ctx, &mut booking).await;
        let [booking] = booking;
        Ok(booking)
    })
    .await
}

// POST /api/bookings/:id/confirm
pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Option<Json<ConfirmPayment>>,
) -> Result<Json<Booking>, ApiError> {
    let ctx = state.context(&headers);
    let payment = body.map(|Json(p)| p).unwrap_or_default();
    let booking = service::confirm_booking(&ctx, &id, &payment).await?;
    tracing::info!(booking = %id, "booking confirmed");
    Ok(Json(booking))
}

// POST /api/bookings/:id/complete
pub async fn complete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let ctx = state.context(&headers);
    let booking = service::complete_booking(&ctx, &id).await?;
    tracing::info!(booking = %id, "booking completed");
    Ok(Json(booking))
}

// POST /api/bookings/:id/deny
pub async fn deny_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Option<Json<ReasonBody>>,
) -> Result<Json<Booking>, ApiError> {
    let ctx = state.context(&headers);
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let booking = service::deny_booking(&ctx, &id, body.text()).await?;
    tracing::info!(booking = %id, "booking denied");
    Ok(Json(booking))
}

// POST /api/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Option<Json<ReasonBody>>,
) -> Result<Json<Booking>, ApiError> {
    let ctx = state.context(&headers);
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let booking = service::cancel_booking(&ctx, &id, body.text()).await?;
    tracing::info!(booking = %id, "booking cancelled");
    Ok(Json(booking))
}
