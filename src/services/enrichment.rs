//! Fills gaps in already-normalized records from related entities.
//!
//! One pass: find the records missing something, collect the distinct
//! foreign keys they point at, look every key up concurrently, then copy
//! resolved fields into the records that still lack them. A failed lookup
//! only leaves its own records incomplete.

use std::collections::{HashMap, HashSet};
use std::future::Future;

use futures::future::join_all;

use crate::errors::ApiError;
use crate::models::{Booking, User, Vehicle};
use crate::services::normalize::entities::compose;
use crate::services::normalize::IdKey;

/// A fill-in rule: which key a record needs resolved, and how a resolved
/// value is merged back. `merge` must only write fields that are absent.
pub trait Enrichment<R> {
    type Value;

    fn name(&self) -> &'static str;

    /// The foreign key to resolve, or `None` when the record is complete.
    fn wanted(&self, record: &R) -> Option<IdKey>;

    fn merge(&self, record: &mut R, value: &Self::Value);
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnrichReport {
    pub requested: usize,
    pub resolved: usize,
    pub failed: usize,
}

pub async fn enrich<R, E, F, Fut>(records: &mut [R], enrichment: &E, lookup: F) -> EnrichReport
where
    E: Enrichment<R>,
    F: Fn(IdKey) -> Fut,
    Fut: Future<Output = Result<Option<E::Value>, ApiError>>,
{
    let mut seen = HashSet::new();
    let keys: Vec<IdKey> = records
        .iter()
        .filter_map(|r| enrichment.wanted(r))
        .filter(|k| !k.is_empty() && seen.insert(k.clone()))
        .collect();

    let mut report = EnrichReport {
        requested: keys.len(),
        ..Default::default()
    };
    if keys.is_empty() {
        return report;
    }

    let results = join_all(keys.iter().cloned().map(&lookup)).await;

    let mut resolved: HashMap<IdKey, E::Value> = HashMap::with_capacity(keys.len());
    for (key, result) in keys.into_iter().zip(results) {
        match result {
            Ok(Some(value)) => {
                resolved.insert(key, value);
            }
            Ok(None) => {
                tracing::debug!(enrichment = enrichment.name(), key = %key, "lookup found nothing");
            }
            Err(e) => {
                report.failed += 1;
                tracing::debug!(enrichment = enrichment.name(), key = %key, error = %e, "lookup failed");
            }
        }
    }
    report.resolved = resolved.len();

    for record in records.iter_mut() {
        if let Some(value) = enrichment.wanted(record).and_then(|k| resolved.get(&k)) {
            enrichment.merge(record, value);
        }
    }

    tracing::debug!(
        enrichment = enrichment.name(),
        requested = report.requested,
        resolved = report.resolved,
        failed = report.failed,
        "enrichment pass done"
    );
    report
}

fn fill<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
    if slot.is_none() {
        slot.clone_from(value);
    }
}

/// Customer name and contact details from the user record.
pub struct BookingCustomer;

impl Enrichment<Booking> for BookingCustomer {
    type Value = User;

    fn name(&self) -> &'static str {
        "booking_customer"
    }

    fn wanted(&self, b: &Booking) -> Option<IdKey> {
        let missing = b.first_name.is_none() || b.last_name.is_none() || b.full_name.is_none();
        missing.then(|| b.user_id.clone().map(IdKey::new)).flatten()
    }

    fn merge(&self, b: &mut Booking, u: &User) {
        // A full name composed from the parts follows the parts.
        let composed = b.full_name.is_none()
            || b.full_name == compose(b.first_name.as_deref(), b.last_name.as_deref());
        fill(&mut b.first_name, &u.first_name);
        fill(&mut b.last_name, &u.last_name);
        if composed {
            b.full_name = compose(b.first_name.as_deref(), b.last_name.as_deref())
                .or_else(|| u.full_name.clone());
        }
        fill(&mut b.user_name, &u.user_name);
        fill(&mut b.email, &u.email);
        fill(&mut b.address, &u.address);
        fill(&mut b.phone, &u.phone);
    }
}

/// Vehicle title and image for bookings that only carry a car id.
pub struct BookingVehicle;

impl Enrichment<Booking> for BookingVehicle {
    type Value = Vehicle;

    fn name(&self) -> &'static str {
        "booking_vehicle"
    }

    fn wanted(&self, b: &Booking) -> Option<IdKey> {
        let missing = b.vehicle_title.is_none() || b.vehicle_image_url.is_none();
        missing.then(|| b.car_id.clone().map(IdKey::new)).flatten()
    }

    fn merge(&self, b: &mut Booking, v: &Vehicle) {
        if b.vehicle_title.is_none() {
            b.vehicle_title = v.display_name();
        }
        fill(&mut b.vehicle_image_url, &v.image_url);
    }
}

/// Last resort for titles: the booking detail, keyed by booking id. The
/// lookup resolves it to the car behind the booking, or to what the detail
/// itself says about the vehicle.
pub struct BookingVehicleByDetail;

impl Enrichment<Booking> for BookingVehicleByDetail {
    type Value = Vehicle;

    fn name(&self) -> &'static str {
        "booking_vehicle_by_detail"
    }

    fn wanted(&self, b: &Booking) -> Option<IdKey> {
        b.vehicle_title.is_none().then(|| b.id.clone().map(IdKey::new)).flatten()
    }

    fn merge(&self, b: &mut Booking, v: &Vehicle) {
        BookingVehicle.merge(b, v);
    }
}

/// Battery and capacity from the vehicle detail endpoint; list endpoints often omit them.
pub struct VehicleTelemetry;

impl Enrichment<Vehicle> for VehicleTelemetry {
    type Value = Vehicle;

    fn name(&self) -> &'static str {
        "vehicle_telemetry"
    }

    fn wanted(&self, v: &Vehicle) -> Option<IdKey> {
        let missing = v.battery_percent.is_none() || v.capacity.is_none();
        missing.then(|| v.id.clone().map(IdKey::new)).flatten()
    }

    fn merge(&self, v: &mut Vehicle, detail: &Vehicle) {
        fill(&mut v.battery_percent, &detail.battery_percent);
        fill(&mut v.capacity, &detail.capacity);
        fill(&mut v.image_url, &detail.image_url);
        fill(&mut v.license_plate, &detail.license_plate);
    }
}
