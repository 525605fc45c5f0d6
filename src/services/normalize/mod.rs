//! Raw backend records in, canonical entities out.
//!
//! Every field of every entity is read through an ordered alias list (see
//! [`aliases`]): the first alias holding a non-null, non-blank value wins.
//! Aliases are plain key paths; `car.brand` reaches one level into a nested
//! object. Nothing here fails: a missing field is `None` and a record
//! without an id is the caller's problem to filter.

pub mod aliases;
pub mod entities;
pub mod status;

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

pub use entities::{normalize_booking, normalize_station, normalize_user, normalize_vehicle};
pub use status::{normalize_status, StatusResolution};

/// Keys that mark an object as a single record rather than a wrapper.
const RECORD_HINTS: [&str; 10] = [
    "id",
    "Id",
    "bookingId",
    "BookingId",
    "carId",
    "CarId",
    "userId",
    "UserId",
    "stationId",
    "StationId",
];

/// Where list payloads hide, in the order the backend versions introduced them.
const LIST_PATHS: [&str; 8] = [
    "data",
    "data.data",
    "data.items",
    "items",
    "bookings",
    "data.bookings",
    "Data",
    "Items",
];

pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for key in path.split('.') {
        current = current.as_object()?.get(key)?;
    }
    Some(current)
}

pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

pub fn first_present<'a>(record: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| lookup(record, alias))
        .find(|v| is_present(v))
}

/// First alias holding a string (or a number, rendered as a string).
pub fn pick_string(record: &Value, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|alias| match lookup(record, alias)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First alias holding a finite number (or a numeric string).
pub fn pick_f64(record: &Value, aliases: &[&str]) -> Option<f64> {
    aliases.iter().find_map(|alias| match lookup(record, alias)? {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    })
}

pub fn pick_datetime(record: &Value, aliases: &[&str]) -> Option<NaiveDateTime> {
    aliases
        .iter()
        .filter_map(|alias| lookup(record, alias)?.as_str())
        .find_map(parse_datetime)
}

pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Comparison key for backend ids: braces stripped, trimmed, lowercased.
/// The original spelling is kept for outgoing requests.
#[derive(Debug, Clone)]
pub struct IdKey {
    raw: String,
    norm: String,
}

impl IdKey {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let norm = normalize_id(&raw);
        Self { raw, norm }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn normalized(&self) -> &str {
        &self.norm
    }

    pub fn is_empty(&self) -> bool {
        self.norm.is_empty()
    }
}

impl PartialEq for IdKey {
    fn eq(&self, other: &Self) -> bool {
        self.norm == other.norm
    }
}

impl Eq for IdKey {}

impl Hash for IdKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.norm.hash(state);
    }
}

impl fmt::Display for IdKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

pub fn normalize_id(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != '{' && *c != '}')
        .collect::<String>()
        .trim()
        .to_lowercase()
}

pub fn same_id(a: &str, b: &str) -> bool {
    let a = normalize_id(a);
    !a.is_empty() && a == normalize_id(b)
}

/// Pulls the record list out of any of the list shapes the backend returns.
/// `None` when the payload holds no list at all; an empty array is still a list.
pub fn list_of(payload: Value) -> Option<Vec<Value>> {
    if let Value::Array(items) = payload {
        return Some(items);
    }

    if let Some(Value::Array(items)) = LIST_PATHS
        .iter()
        .find_map(|p| lookup(&payload, p).filter(|v| v.is_array()))
    {
        return Some(items.clone());
    }

    if looks_like_record(&payload, &RECORD_HINTS) {
        return Some(vec![payload]);
    }
    None
}

/// Pulls a single record out of a detail payload, descending through `data`
/// wrappers. When the payload is a list, the entry matching `wanted_id` is
/// taken.
pub fn unwrap_record(payload: Value, id_aliases: &[&str], wanted_id: Option<&str>) -> Option<Value> {
    match payload {
        Value::Array(items) => match wanted_id {
            Some(wanted) => items.into_iter().find(|item| {
                pick_string(item, id_aliases).is_some_and(|id| same_id(&id, wanted))
            }),
            None => items.into_iter().find(|item| looks_like_record(item, id_aliases)),
        },
        record @ Value::Object(_) if looks_like_record(&record, id_aliases) => Some(record),
        Value::Object(mut fields) => {
            let inner = fields.remove("data").or_else(|| fields.remove("Data"))?;
            unwrap_record(inner, id_aliases, wanted_id)
        }
        _ => None,
    }
}

fn looks_like_record(value: &Value, id_aliases: &[&str]) -> bool {
    value.is_object() && first_present(value, id_aliases).is_some()
}

/// Copies into `target` every key of `other` that `target` lacks (or holds
/// as null/blank). Present values in `target` are never touched.
pub fn merge_absent(target: &mut Value, other: &Value) {
    let (Some(target), Some(other)) = (target.as_object_mut(), other.as_object()) else {
        return;
    };
    for (key, value) in other {
        match target.get_mut(key) {
            Some(existing) if is_present(existing) => {
                if existing.is_object() && value.is_object() {
                    merge_absent(existing, value);
                }
            }
            _ if is_present(value) => {
                target.insert(key.clone(), value.clone());
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_present_skips_null_and_blank() {
        let raw = json!({"id": null, "Id": "  ", "carId": "c9"});
        assert_eq!(pick_string(&raw, &["id", "Id", "carId"]), Some("c9".to_string()));
    }

    #[test]
    fn test_nested_alias() {
        let raw = json!({"vehicle": {"Brand": "VinFast"}});
        assert_eq!(
            pick_string(&raw, &["car.brand", "vehicle.Brand"]),
            Some("VinFast".to_string())
        );
    }

    #[test]
    fn test_numeric_ids_become_strings() {
        let raw = json!({"Id": 42});
        assert_eq!(pick_string(&raw, &["id", "Id"]), Some("42".to_string()));
    }

    #[test]
    fn test_id_key_ignores_braces_and_case() {
        let a = IdKey::new("{A1B2-C3}");
        let b = IdKey::new("a1b2-c3");
        assert_eq!(a, b);
        assert_eq!(a.raw(), "{A1B2-C3}");
        assert!(same_id(" {ABC} ", "abc"));
        assert!(!same_id("", ""));
    }

    #[test]
    fn test_list_of_shapes() {
        let len = |v: Value| list_of(v).map(|items| items.len());
        assert_eq!(len(json!([1, 2])), Some(2));
        assert_eq!(len(json!({"data": [1]})), Some(1));
        assert_eq!(len(json!({"data": {"data": [1, 2, 3]}})), Some(3));
        assert_eq!(len(json!({"data": {"items": [1, 2]}})), Some(2));
        assert_eq!(len(json!({"items": [1]})), Some(1));
        assert_eq!(len(json!({"bookingId": "b1"})), Some(1));
    }

    #[test]
    fn test_list_of_tells_empty_list_from_no_list() {
        assert_eq!(list_of(json!({"data": []})), Some(Vec::new()));
        assert_eq!(list_of(json!([])), Some(Vec::new()));
        assert_eq!(list_of(json!({"data": null})), None);
        assert_eq!(list_of(json!({"message": "ok"})), None);
        assert_eq!(list_of(Value::Null), None);
    }

    #[test]
    fn test_unwrap_record_descends_data() {
        let payload = json!({"data": {"data": {"Id": "c1", "brand": "Tesla"}}});
        let record = unwrap_record(payload, &["id", "Id"], None).unwrap();
        assert_eq!(record["brand"], "Tesla");
    }

    #[test]
    fn test_unwrap_record_picks_wanted_from_list() {
        let payload = json!([{"id": "u1"}, {"UserId": "{U2}"}]);
        let record = unwrap_record(payload, &["id", "UserId"], Some("u2")).unwrap();
        assert_eq!(record["UserId"], "{U2}");
    }

    #[test]
    fn test_merge_absent_never_overwrites() {
        let mut target = json!({"id": "v1", "brand": "Tesla", "model": null, "station": {"id": "s1"}});
        let other = json!({"id": "v2", "brand": "BYD", "model": "3", "plate": "51A", "station": {"name": "Central"}});
        merge_absent(&mut target, &other);
        assert_eq!(
            target,
            json!({"id": "v1", "brand": "Tesla", "model": "3", "plate": "51A", "station": {"id": "s1", "name": "Central"}})
        );
    }

    #[test]
    fn test_parse_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap().and_hms_opt(14, 0, 0).unwrap();
        assert_eq!(parse_datetime("2025-03-15T14:00:00"), Some(expected));
        assert_eq!(parse_datetime("2025-03-15T14:00:00Z"), Some(expected));
        assert_eq!(parse_datetime("2025-03-15T21:00:00+07:00"), Some(expected));
        assert_eq!(parse_datetime("2025-03-15 14:00:00"), Some(expected));
        assert_eq!(parse_datetime("not a date"), None);
    }
}
