use std::collections::HashMap;

use serde_json::Value;

use crate::errors::ApiError;
use crate::models::FleetSnapshot;
use crate::services::normalize::aliases::vehicle as alias;
use crate::services::normalize::{lookup, merge_absent, pick_string, IdKey};
use crate::services::{require, stations, vehicles, ApiContext};

/// Vehicles currently at a station, with the station's configured capacity.
///
/// Three sources are combined: the by-station listing, the available-at-station
/// listing, and the full fleet filtered on its station reference. The last one
/// is always fetched because the available listing leaves out rented and
/// maintenance vehicles and the by-station listing is missing on some
/// backends. Any single source may fail without failing the snapshot.
pub async fn aggregate(ctx: &ApiContext, station_id: &str) -> Result<FleetSnapshot, ApiError> {
    let station_id = require(station_id, "stationId")?;
    let station = IdKey::new(station_id);

    let (config, assigned, available, fleet) = tokio::join!(
        stations::get_station(ctx, station_id),
        vehicles::by_station_raw(ctx, station_id),
        vehicles::available_by_station_raw(ctx, station_id),
        vehicles::fleet_raw(ctx, 1, ctx.config.fleet_page_size),
    );

    let total_slots = match config {
        Ok(s) => s.total_slots,
        Err(e) => {
            tracing::warn!(station = station_id, error = %e, "station configuration unavailable");
            None
        }
    };

    let mut set = FleetSet::default();
    for (source, result) in [("by_station", assigned), ("available", available)] {
        match result {
            Ok(items) => set.extend(items),
            Err(e) => tracing::warn!(station = station_id, source, error = %e, "fleet source failed"),
        }
    }
    match fleet {
        Ok(items) => set.extend(items.into_iter().filter(|v| at_station(v, &station))),
        Err(e) => tracing::warn!(station = station_id, source = "fleet", error = %e, "fleet source failed"),
    }

    let cars = vehicles::normalize_all(&set.into_records());
    tracing::debug!(station = station_id, cars = cars.len(), ?total_slots, "fleet aggregated");

    Ok(FleetSnapshot {
        station_id: station_id.to_string(),
        total_slots,
        cars_count: cars.len(),
        cars,
    })
}

/// True when any station reference on the raw vehicle names `station`.
pub fn at_station(raw: &Value, station: &IdKey) -> bool {
    alias::STATION_REFS.iter().any(|path| match lookup(raw, path) {
        Some(Value::String(s)) => IdKey::new(s.as_str()) == *station,
        Some(Value::Number(n)) => IdKey::new(n.to_string()) == *station,
        _ => false,
    })
}

/// Raw vehicle records deduplicated by id, else by plate. Duplicates are
/// merged field by field with the first occurrence winning.
#[derive(Default)]
struct FleetSet {
    records: Vec<Value>,
    index: HashMap<IdKey, usize>,
}

impl FleetSet {
    fn extend(&mut self, items: impl IntoIterator<Item = Value>) {
        for item in items {
            self.insert(item);
        }
    }

    fn insert(&mut self, record: Value) {
        let key = pick_string(&record, alias::ID)
            .or_else(|| pick_string(&record, alias::LICENSE_PLATE))
            .map(IdKey::new)
            .filter(|k| !k.is_empty());

        let Some(key) = key else {
            self.records.push(record);
            return;
        };
        match self.index.get(&key) {
            Some(&at) => merge_absent(&mut self.records[at], &record),
            None => {
                self.index.insert(key, self.records.len());
                self.records.push(record);
            }
        }
    }

    fn into_records(self) -> Vec<Value> {
        self.records
    }
}
