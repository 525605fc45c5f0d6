use serde::{Deserialize, Serialize};

use super::{User, Vehicle};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    /// Configured capacity.
    pub total_slots: Option<u32>,
    /// Current occupancy, filled in by the fleet aggregator.
    pub cars_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StationWithStaff {
    #[serde(flatten)]
    pub station: Station,
    pub staff: Vec<User>,
    pub staff_count: usize,
}

/// Per-station slot usage as shown on the fleet view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FleetSnapshot {
    pub station_id: String,
    pub total_slots: Option<u32>,
    pub cars_count: usize,
    pub cars: Vec<Vehicle>,
}
