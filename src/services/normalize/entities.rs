use serde_json::Value;

use super::aliases;
use super::status::normalize_status;
use super::{pick_datetime, pick_f64, pick_string};
use crate::models::{Booking, IdentityDocuments, Station, User, Vehicle};

pub fn normalize_booking(raw: &Value) -> Booking {
    use aliases::booking as a;

    let first_name = pick_string(raw, a::FIRST_NAME);
    let last_name = pick_string(raw, a::LAST_NAME);
    let full_name = compose(first_name.as_deref(), last_name.as_deref())
        .or_else(|| pick_string(raw, a::FULL_NAME));

    let vehicle_title = pick_string(raw, a::VEHICLE_NAME)
        .or_else(|| {
            compose(
                pick_string(raw, a::VEHICLE_BRAND).as_deref(),
                pick_string(raw, a::VEHICLE_MODEL).as_deref(),
            )
        })
        .or_else(|| pick_string(raw, a::CAR_INFO));

    let status = normalize_status(raw);

    Booking {
        id: pick_string(raw, a::ID),
        vehicle_title,
        car_id: pick_string(raw, a::CAR_ID),
        first_name,
        last_name,
        full_name,
        user_name: pick_string(raw, a::USER_NAME),
        user_id: pick_string(raw, a::USER_ID),
        email: pick_string(raw, a::EMAIL),
        address: pick_string(raw, a::ADDRESS),
        phone: pick_string(raw, a::PHONE),
        status_code: status.status.code(),
        status: status.status,
        status_label: status.label,
        ui_stage: status.ui_stage,
        pickup_at: pick_datetime(raw, a::PICKUP_AT),
        return_at: pick_datetime(raw, a::RETURN_AT),
        created_at: pick_datetime(raw, a::CREATED_AT),
        station_id: pick_string(raw, a::STATION_REFS),
        vehicle_image_url: pick_string(raw, a::VEHICLE_IMAGE),
        documents: IdentityDocuments {
            cccd_front_url: pick_string(raw, a::CCCD_FRONT),
            cccd_back_url: pick_string(raw, a::CCCD_BACK),
            gplx_front_url: pick_string(raw, a::GPLX_FRONT),
            gplx_back_url: pick_string(raw, a::GPLX_BACK),
            id_number: pick_string(raw, a::ID_NUMBER),
        },
    }
}

pub fn normalize_vehicle(raw: &Value) -> Vehicle {
    use aliases::vehicle as a;

    let brand = pick_string(raw, a::BRAND);
    let model = pick_string(raw, a::MODEL);
    let name = pick_string(raw, a::NAME).or_else(|| compose(brand.as_deref(), model.as_deref()));

    Vehicle {
        id: pick_string(raw, a::ID),
        name,
        model,
        brand,
        license_plate: pick_string(raw, a::LICENSE_PLATE),
        battery_percent: pick_f64(raw, a::BATTERY).and_then(percent),
        capacity: pick_f64(raw, a::CAPACITY),
        condition: pick_string(raw, a::CONDITION),
        issue_description: pick_string(raw, a::ISSUE),
        station_id: pick_string(raw, a::STATION_REFS),
        station_name: pick_string(raw, a::STATION_NAME),
        image_url: pick_string(raw, a::IMAGE),
    }
}

pub fn normalize_station(raw: &Value) -> Station {
    use aliases::station as a;

    Station {
        id: pick_string(raw, a::ID),
        name: pick_string(raw, a::NAME),
        address: pick_string(raw, a::ADDRESS),
        total_slots: pick_f64(raw, a::TOTAL_SLOTS).and_then(count),
        cars_count: pick_f64(raw, a::CARS_COUNT).and_then(count),
    }
}

pub fn normalize_user(raw: &Value) -> User {
    use aliases::user as a;

    let first_name = pick_string(raw, a::FIRST_NAME);
    let last_name = pick_string(raw, a::LAST_NAME);
    let full_name = pick_string(raw, a::FULL_NAME)
        .or_else(|| compose(first_name.as_deref(), last_name.as_deref()));

    User {
        id: pick_string(raw, a::ID),
        first_name,
        last_name,
        full_name,
        user_name: pick_string(raw, a::USER_NAME),
        email: pick_string(raw, a::EMAIL),
        address: pick_string(raw, a::ADDRESS),
        phone: pick_string(raw, a::PHONE),
        role: pick_string(raw, a::ROLE),
    }
}

/// Joins the present parts with a space; `None` when nothing is left.
pub(crate) fn compose(first: Option<&str>, second: Option<&str>) -> Option<String> {
    let joined = [first, second]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!joined.is_empty()).then_some(joined)
}

/// Percentages outside 0..=100 are treated as garbage, not clamped.
fn percent(value: f64) -> Option<u8> {
    (0.0..=100.0)
        .contains(&value)
        .then(|| value.round() as u8)
}

fn count(value: f64) -> Option<u32> {
    (value >= 0.0 && value <= f64::from(u32::MAX)).then(|| value.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, UiStage};
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_vehicle_battery_is_rounded() {
        let v = normalize_vehicle(&json!({"Id": "v1", "CurrentBatteryLevel": 55.7}));
        assert_eq!(v.id.as_deref(), Some("v1"));
        assert_eq!(v.battery_percent, Some(56));
    }

    #[test]
    fn test_vehicle_battery_out_of_range_is_dropped() {
        assert_eq!(normalize_vehicle(&json!({"battery": 130})).battery_percent, None);
        assert_eq!(normalize_vehicle(&json!({"battery": -1})).battery_percent, None);
        assert_eq!(normalize_vehicle(&json!({"battery": "full"})).battery_percent, None);
        assert_eq!(normalize_vehicle(&json!({"battery": "80"})).battery_percent, Some(80));
    }

    #[test]
    fn test_vehicle_fields_across_casings() {
        let v = normalize_vehicle(&json!({
            "CarId": "{ABC}",
            "Brand": "VinFast",
            "Model": "VF8",
            "LicensePlate": "51A-123.45",
            "BatteryCapacity": 87.7,
            "Status": "Good",
            "station": {"Id": "s1", "Name": "District 1"},
            "thumbnailUrl": "https://img/vf8.png"
        }));
        assert_eq!(v.id.as_deref(), Some("{ABC}"));
        assert_eq!(v.name.as_deref(), Some("VinFast VF8"));
        assert_eq!(v.license_plate.as_deref(), Some("51A-123.45"));
        assert_eq!(v.capacity, Some(87.7));
        assert_eq!(v.condition.as_deref(), Some("Good"));
        assert_eq!(v.station_id.as_deref(), Some("s1"));
        assert_eq!(v.station_name.as_deref(), Some("District 1"));
        assert_eq!(v.image_url.as_deref(), Some("https://img/vf8.png"));
    }

    #[test]
    fn test_booking_title_from_nested_car() {
        let b = normalize_booking(&json!({"bookingId": "b1", "car": {"brand": "Tesla", "model": "3"}}));
        assert_eq!(b.id.as_deref(), Some("b1"));
        assert_eq!(b.vehicle_title.as_deref(), Some("Tesla 3"));
    }

    #[test]
    fn test_booking_title_falls_back_to_car_info() {
        let b = normalize_booking(&json!({"id": "b2", "carInfo": "  VinFast VF e34 "}));
        assert_eq!(b.vehicle_title.as_deref(), Some("VinFast VF e34"));
    }

    #[test]
    fn test_booking_customer_fields() {
        let b = normalize_booking(&json!({
            "Id": "b3",
            "user": {"firstName": "An", "LastName": "Tran", "email": "an@example.com", "phoneNumber": "0909"},
            "UserId": "u7",
            "PickupStationId": "{S1}",
            "startTime": "2025-03-15T14:00:00",
            "StatusCode": 2
        }));
        assert_eq!(b.first_name.as_deref(), Some("An"));
        assert_eq!(b.last_name.as_deref(), Some("Tran"));
        assert_eq!(b.full_name.as_deref(), Some("An Tran"));
        assert_eq!(b.email.as_deref(), Some("an@example.com"));
        assert_eq!(b.phone.as_deref(), Some("0909"));
        assert_eq!(b.user_id.as_deref(), Some("u7"));
        assert_eq!(b.station_id.as_deref(), Some("{S1}"));
        assert_eq!(b.status, BookingStatus::WaitingCheckIn);
        assert_eq!(b.status_label, "Waiting Check-in");
        let expected = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap().and_hms_opt(14, 0, 0).unwrap();
        assert_eq!(b.pickup_at, Some(expected));
    }

    #[test]
    fn test_booking_without_id_keeps_null_id() {
        let b = normalize_booking(&json!({"status": "Completed"}));
        assert_eq!(b.id, None);
        assert_eq!(b.status, BookingStatus::Completed);
    }

    #[test]
    fn test_booking_normalization_is_idempotent() {
        let raw = json!({
            "BookingId": "b9",
            "vehicle": {"Brand": "Kia", "Model": "EV6"},
            "customerName": "Le Minh",
            "status": "Contract signed",
            "startTime": "2025-01-02T08:30:00Z",
            "gplxImageUrl_Front": "https://docs/front.png"
        });
        let once = normalize_booking(&raw);
        assert_eq!(once.status_label, "Contracted");
        let twice = normalize_booking(&serde_json::to_value(&once).unwrap());
        assert_eq!(once, twice);

        let pending = normalize_booking(&json!({"id": "b10", "status": "Waiting for payment"}));
        assert_eq!(pending.ui_stage, Some(UiStage::WaitingPayment));
        let again = normalize_booking(&serde_json::to_value(&pending).unwrap());
        assert_eq!(pending, again);
    }

    #[test]
    fn test_vehicle_normalization_is_idempotent() {
        let once = normalize_vehicle(&json!({
            "carId": "c1", "Model": "VF9", "battery": 12.4, "capacityKWh": 92, "stationID": "s2"
        }));
        let twice = normalize_vehicle(&serde_json::to_value(&once).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_station_slots() {
        let s = normalize_station(&json!({"Id": "s1", "Name": "Central", "TotalSlots": "20"}));
        assert_eq!(s.total_slots, Some(20));
        assert_eq!(s.cars_count, None);
    }

    #[test]
    fn test_user_full_name_composed() {
        let u = normalize_user(&json!({"UserId": "u1", "GivenName": "Bao", "Surname": "Ngo", "RoleName": "Staff"}));
        assert_eq!(u.full_name.as_deref(), Some("Bao Ngo"));
        assert_eq!(u.role.as_deref(), Some("Staff"));
    }
}
