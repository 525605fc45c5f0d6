use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::ApiError;
use crate::models::{Booking, Vehicle};
use crate::services::enrichment::{enrich, BookingCustomer, BookingVehicle, BookingVehicleByDetail};
use crate::services::http::{segment, RequestSpec};
use crate::services::normalize::aliases::booking as alias;
use crate::services::normalize::{lookup, normalize_booking, IdKey};
use crate::services::{found, require, users, vehicles, written_record, ApiContext};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPayment {
    pub payment_method: Option<String>,
    pub payment_transaction_id: Option<String>,
}

// ── Reads ──

pub async fn list_bookings(ctx: &ApiContext, page: u32, page_size: u32) -> Result<Vec<Booking>, ApiError> {
    let candidates = [
        RequestSpec::get("/Bookings/Get-All")
            .query("pageNumber", page)
            .query("pageSize", page_size),
        RequestSpec::get("/booking")
            .query("page", page)
            .query("pageSize", page_size),
    ];
    let raw = ctx.fetch_list("list_bookings", &candidates).await?;
    Ok(normalize_all(&raw))
}

pub async fn my_bookings(ctx: &ApiContext) -> Result<Vec<Booking>, ApiError> {
    let candidates = [
        RequestSpec::get("/bookings/me"),
        RequestSpec::get("/Bookings/me"),
        RequestSpec::get("/booking/me"),
    ];
    let raw = ctx.fetch_list("my_bookings", &candidates).await?;
    Ok(normalize_all(&raw))
}

pub async fn get_booking(ctx: &ApiContext, booking_id: &str) -> Result<Booking, ApiError> {
    let booking_id = require(booking_id, "bookingId")?;
    let id = segment(booking_id);
    let candidates = [
        RequestSpec::get(format!("/bookings/{id}")),
        RequestSpec::get(format!("/Bookings/{id}")),
        RequestSpec::get(format!("/booking/{id}")),
        RequestSpec::get(format!("/Bookings/Get-By-{id}")),
        RequestSpec::get(format!("/Bookings/Get-By-Id/{id}")),
        RequestSpec::get("/Bookings/Get-By-Id")
            .query("id", booking_id)
            .query("bookingId", booking_id),
        RequestSpec::get("/Bookings/Get-By")
            .query("id", booking_id)
            .query("bookingId", booking_id),
        RequestSpec::get("/bookings").query("id", booking_id),
        RequestSpec::get("/Bookings").query("bookingId", booking_id),
    ];
    ctx.fetch_record("get_booking", &candidates, alias::ID, booking_id)
        .await?
        .map(|raw| normalize_booking(&raw))
        .ok_or_else(|| ApiError::NotFound {
            entity: "booking",
            id: booking_id.to_string(),
        })
}

/// Bookings picked up at a station.
///
/// Station endpoints come first; when they fail or return nothing the full
/// listing is filtered instead. Either way the result is re-scoped, since
/// some station endpoints ignore the station and return everything.
pub async fn bookings_by_station(ctx: &ApiContext, station_id: &str) -> Result<Vec<Booking>, ApiError> {
    let station_id = require(station_id, "stationId")?;
    let id = segment(station_id);
    let candidates = [
        RequestSpec::get(format!("/Bookings/Get-By-Station/{id}")),
        RequestSpec::get("/Bookings/Get-By-Station").query("stationId", station_id),
        RequestSpec::get("/Bookings/Get-By-Station").query("StationId", station_id),
        RequestSpec::get("/Bookings/Get-All-By-Station").query("stationId", station_id),
        RequestSpec::get(format!("/Bookings/Get-All-By-Station/{id}")),
        RequestSpec::get(format!("/Stations/{id}/Bookings")),
        RequestSpec::get(format!("/booking/station/{id}")),
        RequestSpec::get("/booking").query("stationId", station_id),
    ];

    let mut raw = match ctx.fetch_list("bookings_by_station", &candidates).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(station = station_id, error = %e, "station bookings unavailable, falling back to full list");
            Vec::new()
        }
    };

    if raw.is_empty() {
        let candidates = [RequestSpec::get("/Bookings/Get-All")
            .query("pageNumber", 1)
            .query("pageSize", ctx.config.list_page_size)];
        raw = ctx.fetch_list("list_bookings", &candidates).await?;
    }

    let station = IdKey::new(station_id);
    let before = raw.len();
    raw.retain(|b| belongs_to_station(b, &station));
    tracing::debug!(station = station_id, kept = raw.len(), dropped = before - raw.len(), "scoped bookings to station");

    Ok(normalize_all(&raw))
}

/// True when any station reference on the raw booking names `station`.
pub fn belongs_to_station(raw: &Value, station: &IdKey) -> bool {
    alias::STATION_REFS.iter().any(|path| match lookup(raw, path) {
        Some(Value::String(s)) => IdKey::new(s.as_str()) == *station,
        Some(Value::Number(n)) => IdKey::new(n.to_string()) == *station,
        _ => false,
    })
}

/// Fills customer and vehicle details the booking payload left out.
pub async fn enrich_bookings(ctx: &ApiContext, bookings: &mut [Booking]) {
    enrich(bookings, &BookingCustomer, |key| async move {
        found(users::get_user(ctx, key.raw()).await)
    })
    .await;
    enrich(bookings, &BookingVehicle, |key| async move {
        found(vehicles::get_vehicle(ctx, key.raw()).await)
    })
    .await;
    enrich(bookings, &BookingVehicleByDetail, |key| async move {
        vehicle_from_detail(ctx, key.raw()).await
    })
    .await;
}

/// The vehicle behind a booking, read through the booking detail: its car
/// when the detail names one that resolves, otherwise the detail's own
/// vehicle fields.
async fn vehicle_from_detail(ctx: &ApiContext, booking_id: &str) -> Result<Option<Vehicle>, ApiError> {
    let Some(detail) = found(get_booking(ctx, booking_id).await)? else {
        return Ok(None);
    };

    if let Some(car_id) = detail.car_id.as_deref() {
        match found(vehicles::get_vehicle(ctx, car_id).await) {
            Ok(Some(car)) if car.display_name().is_some() => return Ok(Some(car)),
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(booking = booking_id, car = car_id, error = %e, "car lookup failed, using booking detail");
            }
        }
    }

    Ok(detail.vehicle_title.map(|title| Vehicle {
        name: Some(title),
        image_url: detail.vehicle_image_url,
        ..Default::default()
    }))
}

fn normalize_all(raw: &[Value]) -> Vec<Booking> {
    let bookings: Vec<Booking> = raw.iter().map(normalize_booking).collect();
    let missing = bookings.iter().filter(|b| b.id.is_none()).count();
    if missing > 0 {
        tracing::debug!(missing, "dropping bookings without an id");
    }
    bookings.into_iter().filter(|b| b.id.is_some()).collect()
}

// ── Writes ──

pub async fn confirm_booking(
    ctx: &ApiContext,
    booking_id: &str,
    payment: &ConfirmPayment,
) -> Result<Booking, ApiError> {
    let booking_id = require(booking_id, "bookingId")?;
    let id = segment(booking_id);
    let body = json!({
        "bookingId": booking_id,
        "paymentMethod": payment.payment_method,
        "paymentTransactionId": payment.payment_transaction_id.clone().unwrap_or_default(),
    });
    let candidates = [
        RequestSpec::post("/Bookings/Confirm").json(body.clone()),
        RequestSpec::post(format!("/bookings/{id}/confirm")).json(body.clone()),
        RequestSpec::post(format!("/Bookings/{id}/Confirm")).json(body),
    ];
    let payload = ctx.invoke("confirm_booking", &candidates).await?;
    settle(ctx, booking_id, payload).await
}

pub async fn complete_booking(ctx: &ApiContext, booking_id: &str) -> Result<Booking, ApiError> {
    let booking_id = require(booking_id, "bookingId")?;
    let id = segment(booking_id);
    let candidates = [
        RequestSpec::post(format!("/Bookings/Complete-By-{id}")),
        RequestSpec::post(format!("/bookings/{id}/complete")),
        RequestSpec::patch(format!("/Bookings/Complete/{id}")),
    ];
    let payload = ctx.invoke("complete_booking", &candidates).await?;
    settle(ctx, booking_id, payload).await
}

pub async fn cancel_booking(ctx: &ApiContext, booking_id: &str, reason: &str) -> Result<Booking, ApiError> {
    let booking_id = require(booking_id, "bookingId")?;
    let candidates = cancel_candidates(booking_id, reason);
    let payload = ctx.invoke("cancel_booking", &candidates).await?;
    settle(ctx, booking_id, payload).await
}

/// Denies a pending booking. Backends without a deny endpoint get a cancel
/// carrying the reason instead.
pub async fn deny_booking(ctx: &ApiContext, booking_id: &str, reason: &str) -> Result<Booking, ApiError> {
    let booking_id = require(booking_id, "bookingId")?;
    let id = segment(booking_id);
    let body = json!({ "bookingId": booking_id, "reason": reason });
    let mut candidates = vec![
        with_reason(RequestSpec::post(format!("/Bookings/Deny-By-{id}")), reason),
        with_reason(RequestSpec::post(format!("/bookings/{id}/deny")), reason),
        RequestSpec::post("/Bookings/Deny").json(body),
    ];
    candidates.extend(cancel_candidates(booking_id, reason));
    let payload = ctx.invoke("deny_booking", &candidates).await?;
    settle(ctx, booking_id, payload).await
}

fn cancel_candidates(booking_id: &str, reason: &str) -> Vec<RequestSpec> {
    let id = segment(booking_id);
    vec![
        with_reason(RequestSpec::patch(format!("/bookings/cancel/{id}")), reason),
        with_reason(RequestSpec::patch(format!("/Bookings/Cancel/{id}")), reason),
        with_reason(RequestSpec::post(format!("/bookings/{id}/cancel")), reason),
        with_reason(RequestSpec::post(format!("/Bookings/{id}/Cancel")), reason),
        RequestSpec::post("/Bookings/Cancel").json(json!({ "id": booking_id, "reason": reason })),
        RequestSpec::post("/Bookings/Cancel").json(json!({ "bookingId": booking_id, "reason": reason })),
    ]
}

fn with_reason(spec: RequestSpec, reason: &str) -> RequestSpec {
    if reason.trim().is_empty() {
        spec
    } else {
        spec.query("reason", reason.trim())
    }
}

/// The updated booking: taken from the write response when it carries one,
/// otherwise read back.
async fn settle(ctx: &ApiContext, booking_id: &str, payload: Value) -> Result<Booking, ApiError> {
    match written_record(payload, alias::ID, booking_id) {
        Some(raw) => Ok(normalize_booking(&raw)),
        None => get_booking(ctx, booking_id).await,
    }
}
