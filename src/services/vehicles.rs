use serde_json::{json, Value};

use crate::errors::ApiError;
use crate::models::{Station, Vehicle};
use crate::services::enrichment::{enrich, VehicleTelemetry};
use crate::services::http::{segment, RequestSpec};
use crate::services::normalize::aliases::vehicle as alias;
use crate::services::normalize::{normalize_vehicle, unwrap_record, IdKey};
use crate::services::{found, require, written_record, ApiContext};

/// Resource spellings the fleet endpoints have lived under.
const RESOURCES: [&str; 8] = [
    "car", "cars", "Car", "Cars", "vehicle", "vehicles", "Vehicle", "Vehicles",
];

// ── Reads ──

pub async fn list_vehicles(ctx: &ApiContext, page: u32, page_size: u32) -> Result<Vec<Vehicle>, ApiError> {
    let raw = fleet_raw(ctx, page, page_size).await?;
    Ok(normalize_all(&raw))
}

/// Raw records of the whole fleet listing.
pub async fn fleet_raw(ctx: &ApiContext, page: u32, page_size: u32) -> Result<Vec<Value>, ApiError> {
    let candidates = [
        RequestSpec::get("/Cars/Get-All")
            .query("pageNumber", page)
            .query("pageSize", page_size),
        RequestSpec::get("/car")
            .query("page", page)
            .query("pageSize", page_size),
    ];
    ctx.fetch_list("list_vehicles", &candidates).await
}

pub async fn get_vehicle(ctx: &ApiContext, vehicle_id: &str) -> Result<Vehicle, ApiError> {
    let vehicle_id = require(vehicle_id, "carId")?;
    let id = segment(vehicle_id);
    let mut candidates = vec![
        RequestSpec::get(format!("/Cars/Get-By-Id/{id}")),
        RequestSpec::get(format!("/Car/Get-By-Id/{id}")),
        RequestSpec::get("/Cars/Get-By-Id")
            .query("id", vehicle_id)
            .query("carId", vehicle_id),
        RequestSpec::get("/Cars/Get-By")
            .query("id", vehicle_id)
            .query("carId", vehicle_id),
        RequestSpec::get(format!("/Cars/Get-By-{id}")),
    ];
    candidates.extend(
        RESOURCES
            .iter()
            .map(|r| RequestSpec::get(format!("/{r}/{id}"))),
    );

    ctx.fetch_record("get_vehicle", &candidates, alias::ID, vehicle_id)
        .await?
        .map(|raw| normalize_vehicle(&raw))
        .ok_or_else(|| ApiError::NotFound {
            entity: "vehicle",
            id: vehicle_id.to_string(),
        })
}

/// Raw records from the "vehicles assigned to station" endpoints.
pub async fn by_station_raw(ctx: &ApiContext, station_id: &str) -> Result<Vec<Value>, ApiError> {
    let station_id = require(station_id, "stationId")?;
    let id = segment(station_id);
    let candidates = [
        RequestSpec::get(format!("/Cars/Get-By-Station/{id}")),
        RequestSpec::get("/Cars/Get-By-Station").query("stationId", station_id),
        RequestSpec::get("/Cars/Get-By-Station").query("StationId", station_id),
        RequestSpec::get(format!("/Vehicles/Get-By-Station/{id}")),
        RequestSpec::get(format!("/car/station/{id}")),
        RequestSpec::get(format!("/cars/station/{id}")),
        RequestSpec::get(format!("/vehicles/station/{id}")),
        RequestSpec::get(format!("/Stations/{id}/Cars")),
    ];
    ctx.fetch_list("vehicles_by_station", &candidates).await
}

/// Raw records from the "available at station" endpoints. These omit rented
/// and maintenance vehicles.
pub async fn available_by_station_raw(ctx: &ApiContext, station_id: &str) -> Result<Vec<Value>, ApiError> {
    let station_id = require(station_id, "stationId")?;
    let id = segment(station_id);
    let candidates = [
        RequestSpec::get(format!("/Cars/Get-Available-By-Station/{id}")),
        RequestSpec::get("/Cars/Get-Available-By-Station").query("stationId", station_id),
        RequestSpec::get("/car/available").query("stationId", station_id),
    ];
    ctx.fetch_list("available_vehicles_by_station", &candidates).await
}

pub async fn vehicles_by_station(ctx: &ApiContext, station_id: &str) -> Result<Vec<Vehicle>, ApiError> {
    Ok(normalize_all(&by_station_raw(ctx, station_id).await?))
}

pub async fn available_vehicles(ctx: &ApiContext, station_id: &str) -> Result<Vec<Vehicle>, ApiError> {
    Ok(normalize_all(&available_by_station_raw(ctx, station_id).await?))
}

pub async fn enrich_vehicles(ctx: &ApiContext, fleet: &mut [Vehicle]) {
    enrich(fleet, &VehicleTelemetry, |key| async move {
        found(get_vehicle(ctx, key.raw()).await)
    })
    .await;
}

/// Joins station names onto vehicles from an already loaded station list.
pub fn attach_station_names(fleet: &mut [Vehicle], stations: &[Station]) {
    for vehicle in fleet.iter_mut().filter(|v| v.station_name.is_none()) {
        let Some(station_id) = vehicle.station_id.as_deref().map(IdKey::new) else {
            continue;
        };
        vehicle.station_name = stations
            .iter()
            .find(|s| s.id.as_deref().map(IdKey::new).as_ref() == Some(&station_id))
            .and_then(|s| s.name.clone());
    }
}

pub(crate) fn normalize_all(raw: &[Value]) -> Vec<Vehicle> {
    raw.iter()
        .map(normalize_vehicle)
        .filter(|v| v.id.is_some() || v.license_plate.is_some())
        .collect()
}

// ── Writes ──

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub license_plate: Option<String>,
    pub station_id: Option<String>,
    pub battery_capacity: Option<f64>,
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl NewVehicle {
    /// Request body with the station id under every spelling the backends accept.
    fn body(&self) -> Value {
        let mut body = self.extra.clone();
        let mut put = |key: &str, value: Option<Value>| {
            if let Some(v) = value {
                body.insert(key.to_string(), v);
            }
        };
        put("name", self.name.clone().map(Value::from));
        put("brand", self.brand.clone().map(Value::from));
        put("model", self.model.clone().map(Value::from));
        put("licensePlate", self.license_plate.clone().map(Value::from));
        put("batteryCapacity", self.battery_capacity.map(Value::from));
        put("imageUrl", self.image_url.clone().map(Value::from));
        if let Some(station) = &self.station_id {
            for key in ["currentStationId", "stationId", "StationId"] {
                put(key, Some(Value::from(station.clone())));
            }
        }
        if let Some(price) = body.get("rentalPricePerDate").cloned() {
            body.entry("rentalPricePerDay").or_insert(price);
        }
        Value::Object(body)
    }
}

pub async fn create_vehicle(ctx: &ApiContext, draft: &NewVehicle) -> Result<Vehicle, ApiError> {
    let body = draft.body();
    let mut candidates: Vec<RequestSpec> = RESOURCES[..4]
        .iter()
        .map(|r| RequestSpec::post(format!("/{r}")).json(body.clone()))
        .collect();
    for action in ["Create", "Add", "Create-Car"] {
        for r in ["Car", "Cars"] {
            candidates.push(RequestSpec::post(format!("/{r}/{action}")).json(body.clone()));
        }
    }
    for r in &RESOURCES[4..] {
        candidates.push(RequestSpec::post(format!("/{r}")).json(body.clone()));
    }
    for action in ["Create", "Add"] {
        for r in ["Vehicle", "Vehicles"] {
            candidates.push(RequestSpec::post(format!("/{r}/{action}")).json(body.clone()));
        }
    }

    let payload = ctx.invoke("create_vehicle", &candidates).await?;
    match unwrap_record(payload, alias::ID, None) {
        Some(raw) => Ok(normalize_vehicle(&raw)),
        // The create endpoints that answer without the record still accepted it.
        None => Ok(normalize_vehicle(&body)),
    }
}

pub async fn delete_vehicle(ctx: &ApiContext, vehicle_id: &str) -> Result<(), ApiError> {
    let vehicle_id = require(vehicle_id, "carId")?;
    ctx.invoke("delete_vehicle", &delete_candidates(vehicle_id)).await?;
    tracing::info!(vehicle = vehicle_id, "vehicle deleted");
    Ok(())
}

fn delete_candidates(vehicle_id: &str) -> Vec<RequestSpec> {
    let id = segment(vehicle_id);
    let mut candidates: Vec<RequestSpec> = RESOURCES
        .iter()
        .map(|r| RequestSpec::delete(format!("/{r}/{id}")))
        .collect();
    for r in RESOURCES {
        for action in ["Delete", "Remove"] {
            candidates.push(RequestSpec::post(format!("/{r}/{action}/{id}")));
        }
    }
    for r in RESOURCES {
        for action in ["Delete", "Remove"] {
            for key in ["id", "carId", "CarId"] {
                candidates.push(RequestSpec::post(format!("/{r}/{action}")).json(json!({ key: vehicle_id })));
            }
        }
    }
    for r in RESOURCES {
        for label in ["Delete-By-Id", "Remove-By-Id"] {
            candidates.push(RequestSpec::post(format!("/{r}/{label}/{id}")));
            candidates.push(RequestSpec::post(format!("/{r}/{label}")).query("id", vehicle_id));
        }
    }
    for r in RESOURCES {
        for label in ["Delete-By", "Remove-By"] {
            candidates.push(RequestSpec::post(format!("/{r}/{label}-{id}")));
        }
    }
    candidates
}

pub async fn restore_vehicle(ctx: &ApiContext, vehicle_id: &str) -> Result<Vehicle, ApiError> {
    let vehicle_id = require(vehicle_id, "carId")?;
    let id = segment(vehicle_id);
    let candidates = [
        RequestSpec::patch(format!("/Cars/Restore-By/{id}")),
        RequestSpec::patch(format!("/Cars/Restore-By-{id}")),
    ];
    let payload = ctx.invoke("restore_vehicle", &candidates).await?;
    settle(ctx, vehicle_id, payload).await
}

pub async fn update_battery(ctx: &ApiContext, vehicle_id: &str, level: u8) -> Result<Vehicle, ApiError> {
    let vehicle_id = require(vehicle_id, "carId")?;
    if level > 100 {
        return Err(ApiError::Validation {
            status: 400,
            message: Some("Battery level must be between 0 and 100.".to_string()),
        });
    }
    let id = segment(vehicle_id);
    let level_body = json!({ "batteryLevel": level, "currentBatteryLevel": level });
    let id_body = json!({ "id": vehicle_id, "batteryLevel": level, "currentBatteryLevel": level });
    let candidates = [
        RequestSpec::patch(format!("/car/{id}/battery/{level}")),
        RequestSpec::patch(format!("/cars/{id}/battery/{level}")),
        RequestSpec::put(format!("/car/{id}/battery")).json(level_body.clone()),
        RequestSpec::put(format!("/cars/{id}/battery")).json(level_body),
        RequestSpec::post(format!("/car/Update-Battery/{id}/{level}")),
        RequestSpec::post(format!("/cars/Update-Battery/{id}/{level}")),
        RequestSpec::post("/car/Update-Battery").json(id_body.clone()),
        RequestSpec::post("/cars/Update-Battery").json(id_body),
    ];
    let payload = ctx.invoke("update_battery", &candidates).await?;
    settle(ctx, vehicle_id, payload).await
}

pub async fn update_status(ctx: &ApiContext, vehicle_id: &str, status: &str) -> Result<Vehicle, ApiError> {
    let vehicle_id = require(vehicle_id, "carId")?;
    let status = require(status, "status")?;
    let id = segment(vehicle_id);
    let st = segment(status);
    let candidates = [
        RequestSpec::patch(format!("/car/{id}/status/{st}")),
        RequestSpec::patch(format!("/cars/{id}/status/{st}")),
        RequestSpec::put(format!("/car/{id}/status")).json(json!({ "status": status })),
        RequestSpec::put(format!("/cars/{id}/status")).json(json!({ "status": status })),
        RequestSpec::post(format!("/car/Update-Status/{id}/{st}")),
        RequestSpec::post(format!("/cars/Update-Status/{id}/{st}")),
        RequestSpec::post("/car/Update-Status").json(json!({ "id": vehicle_id, "status": status })),
        RequestSpec::post("/cars/Update-Status").json(json!({ "id": vehicle_id, "status": status })),
    ];
    let payload = ctx.invoke("update_status", &candidates).await?;
    settle(ctx, vehicle_id, payload).await
}

pub async fn update_description(ctx: &ApiContext, vehicle_id: &str, description: &str) -> Result<Vehicle, ApiError> {
    let vehicle_id = require(vehicle_id, "carId")?;
    let id = segment(vehicle_id);
    let candidates: Vec<RequestSpec> = RESOURCES
        .iter()
        .map(|r| RequestSpec::put(format!("/{r}/{id}")).json(json!({ "description": description })))
        .collect();
    let payload = ctx.invoke("update_description", &candidates).await?;
    settle(ctx, vehicle_id, payload).await
}

pub async fn transfer_vehicle(
    ctx: &ApiContext,
    vehicle_id: &str,
    target_station_id: &str,
    reason: &str,
) -> Result<Vehicle, ApiError> {
    let vehicle_id = require(vehicle_id, "carId")?;
    let target = require(target_station_id, "targetStationId")?;
    let candidates: Vec<RequestSpec> = ["/Admin/Fleet/Transfer-Car", "/Fleet/Transfer-Car"]
        .iter()
        .map(|path| {
            let spec = RequestSpec::post(*path)
                .query("carId", vehicle_id)
                .query("targetStationId", target);
            if reason.trim().is_empty() {
                spec
            } else {
                spec.query("reason", reason.trim())
            }
        })
        .collect();
    let payload = ctx.invoke("transfer_vehicle", &candidates).await?;
    tracing::info!(vehicle = vehicle_id, station = target, "vehicle transferred");
    settle(ctx, vehicle_id, payload).await
}

async fn settle(ctx: &ApiContext, vehicle_id: &str, payload: Value) -> Result<Vehicle, ApiError> {
    match written_record(payload, alias::ID, vehicle_id) {
        Some(raw) => Ok(normalize_vehicle(&raw)),
        None => get_vehicle(ctx, vehicle_id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{ctx, RouteBackend};
    use serde_json::json;

    #[tokio::test]
    async fn test_get_vehicle_skips_empty_detail() {
        let backend = RouteBackend::default()
            .route("GET /Cars/Get-By-Id/v1", json!({"data": null}))
            .route("GET /Car/Get-By-Id/v1", json!({"id": "v1", "name": "VF8"}));

        let vehicle = get_vehicle(&ctx(backend), "v1").await.unwrap();
        assert_eq!(vehicle.name.as_deref(), Some("VF8"));
    }

    #[tokio::test]
    async fn test_get_vehicle_skips_search_list_without_match() {
        let backend = RouteBackend::default()
            .route("GET /Cars/Get-By-Id?id=v1&carId=v1", json!({"data": [{"id": "v9"}]}))
            .route("GET /Cars/Get-By?id=v1&carId=v1", json!({"data": [{"id": "V1", "name": "VF9"}]}));

        let vehicle = get_vehicle(&ctx(backend), "v1").await.unwrap();
        assert_eq!(vehicle.name.as_deref(), Some("VF9"));
    }

    #[tokio::test]
    async fn test_get_vehicle_not_found_after_every_empty_answer() {
        let backend = RouteBackend::default()
            .route("GET /Cars/Get-By-Id/v1", json!({"data": null}))
            .route("GET /vehicles/v1", json!({"message": "ok"}));

        let err = get_vehicle(&ctx(backend), "v1").await.unwrap_err();
        assert_eq!(err, ApiError::NotFound { entity: "vehicle", id: "v1".into() });
    }

    #[tokio::test]
    async fn test_list_skips_non_list_answer() {
        let backend = RouteBackend::default()
            .route("GET /Cars/Get-Available-By-Station/s1", json!({"data": null}))
            .route("GET /car/available?stationId=s1", json!({"items": [{"id": "v1"}]}));

        let list = available_vehicles(&ctx(backend), "s1").await.unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_attach_station_names_by_normalized_id() {
        let mut fleet = vec![
            Vehicle { id: Some("v1".into()), station_id: Some("{ST-1}".into()), ..Default::default() },
            Vehicle { id: Some("v2".into()), station_id: Some("st-9".into()), ..Default::default() },
            Vehicle {
                id: Some("v3".into()),
                station_id: Some("st-1".into()),
                station_name: Some("Kept".into()),
                ..Default::default()
            },
        ];
        let stations = vec![Station { id: Some("st-1".into()), name: Some("Central".into()), ..Default::default() }];

        attach_station_names(&mut fleet, &stations);

        assert_eq!(fleet[0].station_name.as_deref(), Some("Central"));
        assert_eq!(fleet[1].station_name, None);
        assert_eq!(fleet[2].station_name.as_deref(), Some("Kept"));
    }

    #[test]
    fn test_delete_candidates_order() {
        let specs = delete_candidates("c1");
        assert_eq!(specs[0].to_string(), "DELETE /car/c1");
        assert_eq!(specs[8].to_string(), "POST /car/Delete/c1");
        assert_eq!(specs[24].body, Some(json!({"id": "c1"})));
        assert_eq!(specs.last().unwrap().to_string(), "POST /Vehicles/Remove-By-c1");
    }

    #[test]
    fn test_new_vehicle_body_spreads_station_id() {
        let draft: NewVehicle = serde_json::from_value(json!({
            "brand": "VinFast",
            "stationId": "s1",
            "rentalPricePerDate": 900000,
            "seats": 5
        }))
        .unwrap();
        let body = draft.body();
        assert_eq!(body["currentStationId"], "s1");
        assert_eq!(body["StationId"], "s1");
        assert_eq!(body["rentalPricePerDay"], 900000);
        assert_eq!(body["seats"], 5);
    }
}
