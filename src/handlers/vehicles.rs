use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use super::{load_cycle, PageQuery};
use crate::errors::ApiError;
use crate::models::Vehicle;
use crate::services::vehicles::{self as service, NewVehicle};
use crate::services::{stations, ApiContext};
use crate::state::AppState;

// GET /api/vehicles
pub async fn list_vehicles(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Vehicle>>, ApiError> {
    load_cycle(&state, &headers, move |ctx| async move {
        let page_size = query.page_size(&ctx.config);
        let mut fleet = service::list_vehicles(&ctx, query.page(), page_size).await?;
        finish(&ctx, &mut fleet).await;
        Ok(fleet)
    })
    .await
}

// GET /api/vehicles/:id
pub async fn get_vehicle(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Vehicle>, ApiError> {
    load_cycle(&state, &headers, move |ctx| async move {
        let mut fleet = [service::get_vehicle(&ctx, &id).await?];
        attach_names(&ctx, &mut fleet).await;
        let [vehicle] = fleet;
        Ok(vehicle)
    })
    .await
}

/// Telemetry enrichment plus station names, shared by the vehicle list views.
pub(crate) async fn finish(ctx: &ApiContext, fleet: &mut [Vehicle]) {
    service::enrich_vehicles(ctx, fleet).await;
    attach_names(ctx, fleet).await;
}

async fn attach_names(ctx: &ApiContext, fleet: &mut [Vehicle]) {
    if fleet.iter().all(|v| v.station_name.is_some() || v.station_id.is_none()) {
        return;
    }
    match stations::list_stations(ctx).await {
        Ok(list) => service::attach_station_names(fleet, &list),
        Err(e) => tracing::debug!(error = %e, "station names unavailable"),
    }
}

// POST /api/vehicles
pub async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(draft): Json<NewVehicle>,
) -> Result<(StatusCode, Json<Vehicle>), ApiError> {
    let ctx = state.context(&headers);
    let vehicle = service::create_vehicle(&ctx, &draft).await?;
    tracing::info!(vehicle = ?vehicle.id, plate = ?vehicle.license_plate, "vehicle created");
    Ok((StatusCode::CREATED, Json(vehicle)))
}

// DELETE /api/vehicles/:id
pub async fn delete_vehicle(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.context(&headers);
    service::delete_vehicle(&ctx, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/vehicles/:id/restore
pub async fn restore_vehicle(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Vehicle>, ApiError> {
    let ctx = state.context(&headers);
    let vehicle = service::restore_vehicle(&ctx, &id).await?;
    tracing::info!(vehicle = %id, "vehicle restored");
    Ok(Json(vehicle))
}

// PUT /api/vehicles/:id/battery
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryUpdate {
    pub battery_level: u32,
}

pub async fn update_battery(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<BatteryUpdate>,
) -> Result<Json<Vehicle>, ApiError> {
    let ctx = state.context(&headers);
    // Anything that does not fit is out of range and rejected by the service.
    let level = u8::try_from(update.battery_level).unwrap_or(u8::MAX);
    let vehicle = service::update_battery(&ctx, &id, level).await?;
    tracing::info!(vehicle = %id, level, "battery updated");
    Ok(Json(vehicle))
}

// PUT /api/vehicles/:id/status
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Vehicle>, ApiError> {
    let ctx = state.context(&headers);
    let vehicle = service::update_status(&ctx, &id, &update.status).await?;
    tracing::info!(vehicle = %id, status = %update.status, "vehicle status updated");
    Ok(Json(vehicle))
}

// PUT /api/vehicles/:id/description
#[derive(Debug, Deserialize)]
pub struct DescriptionUpdate {
    #[serde(default)]
    pub description: String,
}

pub async fn update_description(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<DescriptionUpdate>,
) -> Result<Json<Vehicle>, ApiError> {
    let ctx = state.context(&headers);
    let vehicle = service::update_description(&ctx, &id, &update.description).await?;
    Ok(Json(vehicle))
}

// POST /api/vehicles/:id/transfer
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub target_station_id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

pub async fn transfer_vehicle(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(transfer): Json<TransferRequest>,
) -> Result<Json<Vehicle>, ApiError> {
    let ctx = state.context(&headers);
    let reason = transfer.reason.as_deref().unwrap_or("");
    let vehicle = service::transfer_vehicle(&ctx, &id, &transfer.target_station_id, reason).await?;
    Ok(Json(vehicle))
}
