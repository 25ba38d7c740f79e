//! Schema walk over the generator's JSON payload.
//!
//! Every field is checked explicitly so the first offending field can be
//! named in the error. Nothing is coerced: a value either matches or the
//! whole payload is rejected.

use std::collections::HashSet;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::grounding::SourceUrls;
use crate::identifiers::RouteIdentifier;
use crate::models::types::*;

type Object = Map<String, Value>;

/// Longest single leg accepted, in minutes
const MAX_LEG_MINUTES: u32 = 24 * 60;

pub(crate) fn route_from_object(obj: &Object) -> Result<Route> {
    let route_id = optional_str(obj, "routeId", "routeId")?.map(RouteIdentifier::new);
    let bus_number = required_str(obj, "busNumber", "busNumber")?;
    let route_name = required_str(obj, "routeName", "routeName")?;
    let description = optional_str(obj, "description", "description")?.unwrap_or_default();

    let frequency_minutes = required_u32(obj, "frequencyMinutes", "frequencyMinutes")?;
    if frequency_minutes == 0 {
        return Err(RouteError::invalid("frequencyMinutes", "must be positive"));
    }

    let first_bus_time = required_time(obj, "firstBusTime")?;
    let last_bus_time = required_time(obj, "lastBusTime")?;
    if last_bus_time < first_bus_time {
        return Err(RouteError::invalid(
            "lastBusTime",
            format!("{last_bus_time} is earlier than firstBusTime {first_bus_time}"),
        ));
    }

    let traffic_condition = required_traffic(obj)?;
    let traffic_analysis =
        optional_str(obj, "trafficAnalysis", "trafficAnalysis")?.unwrap_or_default();
    let stops = required_stops(obj)?;

    Ok(Route {
        route_id,
        bus_number,
        route_name,
        description,
        frequency_minutes,
        first_bus_time,
        last_bus_time,
        traffic_condition,
        traffic_analysis,
        stops,
        source_urls: SourceUrls::new(),
    })
}

fn required_stops(obj: &Object) -> Result<Vec<Stop>> {
    let items = match obj.get("stops") {
        None | Some(Value::Null) => return Err(RouteError::invalid("stops", "missing")),
        Some(Value::Array(items)) => items,
        Some(other) => return Err(type_mismatch("stops", "an array", other)),
    };

    if items.is_empty() {
        return Err(RouteError::invalid("stops", "must contain at least one stop"));
    }

    let mut seen_ids = HashSet::new();
    let mut total_minutes = 0u32;
    let mut stops = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let stop = stop_from_value(i, item)?;
        if !seen_ids.insert(stop.id) {
            return Err(RouteError::invalid(
                format!("stops[{i}].id"),
                format!("duplicate stop id {}", stop.id),
            ));
        }
        total_minutes = total_minutes
            .checked_add(stop.typical_travel_time_minutes)
            .ok_or_else(|| {
                RouteError::invalid(
                    format!("stops[{i}].typicalTravelTimeMinutes"),
                    "total trip time overflows",
                )
            })?;
        stops.push(stop);
    }

    Ok(stops)
}

fn stop_from_value(index: usize, value: &Value) -> Result<Stop> {
    let path = |key: &str| format!("stops[{index}].{key}");

    let obj = value
        .as_object()
        .ok_or_else(|| type_mismatch(&format!("stops[{index}]"), "an object", value))?;

    let id = required_integer(obj, "id", &path("id"))?;
    let name = required_str(obj, "name", &path("name"))?;

    let distance_field = path("distanceFromPreviousKm");
    let distance_from_previous_km = match obj.get("distanceFromPreviousKm") {
        None | Some(Value::Null) => return Err(RouteError::invalid(distance_field, "missing")),
        Some(v) => v
            .as_f64()
            .ok_or_else(|| type_mismatch(&distance_field, "a number", v))?,
    };
    if !distance_from_previous_km.is_finite() || distance_from_previous_km < 0.0 {
        return Err(RouteError::invalid(
            distance_field,
            format!("must be a non-negative distance, got {distance_from_previous_km}"),
        ));
    }

    let minutes_field = path("typicalTravelTimeMinutes");
    let typical_travel_time_minutes =
        required_u32(obj, "typicalTravelTimeMinutes", &minutes_field)?;
    if typical_travel_time_minutes > MAX_LEG_MINUTES {
        return Err(RouteError::invalid(
            minutes_field,
            format!("{typical_travel_time_minutes} min exceeds a single day"),
        ));
    }

    let landmark = optional_str(obj, "landmark", &path("landmark"))?
        .filter(|landmark| !landmark.trim().is_empty());

    Ok(Stop {
        id,
        name,
        distance_from_previous_km,
        typical_travel_time_minutes,
        landmark,
    })
}

fn required_traffic(obj: &Object) -> Result<TrafficCondition> {
    let raw = required_str(obj, "trafficCondition", "trafficCondition")?;
    TrafficCondition::from_str(raw.trim()).map_err(|_| {
        RouteError::invalid(
            "trafficCondition",
            format!("expected Light, Moderate or Heavy, got {raw:?}"),
        )
    })
}

fn required_time(obj: &Object, key: &str) -> Result<ServiceTime> {
    let raw = required_str(obj, key, key)?;
    ServiceTime::parse(raw.trim())
        .ok_or_else(|| RouteError::invalid(key, format!("expected HH:MM, got {raw:?}")))
}

/// A non-blank string; the returned value is trimmed.
fn required_str(obj: &Object, key: &str, field: &str) -> Result<String> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(RouteError::invalid(field, "missing")),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(RouteError::invalid(field, "must not be blank"))
        }
        Some(Value::String(s)) => Ok(s.trim().to_owned()),
        Some(other) => Err(type_mismatch(field, "a string", other)),
    }
}

fn optional_str(obj: &Object, key: &str, field: &str) -> Result<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_owned())),
        Some(other) => Err(type_mismatch(field, "a string", other)),
    }
}

fn required_integer(obj: &Object, key: &str, field: &str) -> Result<i64> {
    let value = match obj.get(key) {
        None | Some(Value::Null) => return Err(RouteError::invalid(field, "missing")),
        Some(value) => value,
    };

    if let Some(n) = value.as_i64() {
        return Ok(n);
    }

    // Whole-valued floats such as `12.0` are still integers.
    match value.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => Ok(f as i64),
        Some(f) => Err(RouteError::invalid(field, format!("expected an integer, got {f}"))),
        None => Err(type_mismatch(field, "an integer", value)),
    }
}

fn required_u32(obj: &Object, key: &str, field: &str) -> Result<u32> {
    let n = required_integer(obj, key, field)?;
    u32::try_from(n).map_err(|_| {
        RouteError::invalid(field, format!("must be a non-negative whole number, got {n}"))
    })
}

fn type_mismatch(field: &str, expected: &str, got: &Value) -> RouteError {
    let got = match got {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    RouteError::invalid(field, format!("expected {expected}, got {got}"))
}
