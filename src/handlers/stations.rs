use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

use super::load_cycle;
use super::vehicles::finish;
use crate::errors::ApiError;
use crate::models::{Booking, FleetSnapshot, Station, StationWithStaff, User, Vehicle};
use crate::services::{bookings, fleet, stations as service, users, vehicles, ApiContext};
use crate::state::AppState;

/// `mine` stands for the station assigned to the caller's session.
fn resolve_station(ctx: &ApiContext, id: &str) -> Result<String, ApiError> {
    if id.eq_ignore_ascii_case("mine") {
        ctx.session
            .assigned_station()
            .ok_or(ApiError::MissingArgument("stationId"))
    } else {
        Ok(id.to_string())
    }
}

// GET /api/stations
pub async fn list_stations(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Station>>, ApiError> {
    load_cycle(&state, &headers, |ctx| async move { service::list_stations(&ctx).await }).await
}

// GET /api/stations/staff
pub async fn stations_with_staff(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<StationWithStaff>>, ApiError> {
    load_cycle(&state, &headers, |ctx| async move {
        service::stations_with_staff(&ctx).await
    })
    .await
}

// GET /api/stations/:id
pub async fn get_station(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Station>, ApiError> {
    load_cycle(&state, &headers, move |ctx| async move {
        let id = resolve_station(&ctx, &id)?;
        service::get_station(&ctx, &id).await
    })
    .await
}

// GET /api/stations/:id/bookings
pub async fn station_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    load_cycle(&state, &headers, move |ctx| async move {
        let id = resolve_station(&ctx, &id)?;
        let mut list = bookings::bookings_by_station(&ctx, &id).await?;
        bookings::enrich_bookings(&ctx, &mut list).await;
        Ok(list)
    })
    .await
}

// GET /api/stations/:id/fleet
pub async fn station_fleet(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<FleetSnapshot>, ApiError> {
    load_cycle(&state, &headers, move |ctx| async move {
        let id = resolve_station(&ctx, &id)?;
        let mut snapshot = fleet::aggregate(&ctx, &id).await?;
        finish(&ctx, &mut snapshot.cars).await;
        Ok(snapshot)
    })
    .await
}

// GET /api/stations/:id/vehicles
pub async fn station_vehicles(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Vec<Vehicle>>, ApiError> {
    load_cycle(&state, &headers, move |ctx| async move {
        let id = resolve_station(&ctx, &id)?;
        let mut list = vehicles::vehicles_by_station(&ctx, &id).await?;
        finish(&ctx, &mut list).await;
        Ok(list)
    })
    .await
}

// GET /api/stations/:id/vehicles/available
pub async fn available_vehicles(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Vec<Vehicle>>, ApiError> {
    load_cycle(&state, &headers, move |ctx| async move {
        let id = resolve_station(&ctx, &id)?;
        let mut list = vehicles::available_vehicles(&ctx, &id).await?;
        finish(&ctx, &mut list).await;
        Ok(list)
    })
    .await
}

// POST /api/stations/:id/staff/:staff_id
pub async fn assign_staff(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((id, staff_id)): Path<(String, String)>,
) -> Result<Json<User>, ApiError> {
    let ctx = state.context(&headers);
    let id = resolve_station(&ctx, &id)?;
    let user = users::assign_staff_to_station(&ctx, &id, &staff_id).await?;
    Ok(Json(user))
}

// DELETE /api/staff/:staff_id/station
pub async fn unassign_staff(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(staff_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let ctx = state.context(&headers);
    let user = users::unassign_staff(&ctx, &staff_id).await?;
    Ok(Json(user))
}
