use futures::future::join_all;

use crate::errors::ApiError;
use crate::models::{Station, StationWithStaff};
use crate::services::http::{segment, RequestSpec};
use crate::services::normalize::aliases::station as alias;
use crate::services::normalize::normalize_station;
use crate::services::{require, users, ApiContext};

/// Stations, minus the seed rows whose ids are a short repeated pattern.
pub async fn list_stations(ctx: &ApiContext) -> Result<Vec<Station>, ApiError> {
    let candidates = [
        RequestSpec::get("/Stations/Get-All")
            .query("pageNumber", 1)
            .query("pageSize", ctx.config.list_page_size),
        RequestSpec::get("/station"),
    ];
    let raw = ctx.fetch_list("list_stations", &candidates).await?;

    let stations: Vec<Station> = raw
        .iter()
        .map(normalize_station)
        .filter(|s| match s.id.as_deref() {
            Some(id) if is_placeholder_id(id) => {
                tracing::debug!(station = id, name = ?s.name, "skipping placeholder station");
                false
            }
            Some(_) => true,
            None => false,
        })
        .collect();
    Ok(stations)
}

pub async fn get_station(ctx: &ApiContext, station_id: &str) -> Result<Station, ApiError> {
    let station_id = require(station_id, "stationId")?;
    let id = segment(station_id);
    let candidates = [
        RequestSpec::get(format!("/Stations/Get-By-{id}")),
        RequestSpec::get(format!("/Stations/Get-By-Id/{id}")),
        RequestSpec::get(format!("/Stations/{id}")),
        RequestSpec::get(format!("/station/{id}")),
    ];
    ctx.fetch_record("get_station", &candidates, alias::ID, station_id)
        .await?
        .map(|raw| normalize_station(&raw))
        .ok_or_else(|| ApiError::NotFound {
            entity: "station",
            id: station_id.to_string(),
        })
}

/// Every station with its staff. Staff lookups run concurrently; a station
/// whose lookup fails is listed with no staff.
pub async fn stations_with_staff(ctx: &ApiContext) -> Result<Vec<StationWithStaff>, ApiError> {
    let stations = list_stations(ctx).await?;

    let lookups = stations.iter().map(|station| async move {
        let Some(id) = station.id.as_deref() else {
            return Vec::new();
        };
        match users::staff_by_station(ctx, id).await {
            Ok(staff) => staff,
            Err(e) => {
                tracing::debug!(station = id, error = %e, "staff lookup failed");
                Vec::new()
            }
        }
    });
    let staff_lists = join_all(lookups).await;

    Ok(stations
        .into_iter()
        .zip(staff_lists)
        .map(|(station, staff)| StationWithStaff {
            station,
            staff_count: staff.len(),
            staff,
        })
        .collect())
}

/// Seed data ids: with hyphens removed, the id is its first 1-4 characters
/// repeated at least twice.
pub fn is_placeholder_id(id: &str) -> bool {
    let clean: Vec<char> = id.chars().filter(|c| *c != '-').collect();
    if clean.is_empty() {
        return true;
    }
    (1..=4)
        .filter(|len| *len < clean.len() && clean.len() % len == 0)
        .any(|len| clean.chunks(len).all(|chunk| chunk == &clean[..len]))
}
