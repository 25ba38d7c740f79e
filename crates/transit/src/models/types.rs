//! Core data types and enums for resolved routes.

use std::fmt;

use chrono::{Duration, NaiveTime, Timelike};
use serde::{Serialize, Serializer};

use crate::grounding::SourceUrls;
use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// Congestion assessment reported alongside a route
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, strum::Display, strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum TrafficCondition {
    Light,
    Moderate,
    Heavy,
}

// ============================================================================
// Data Structures
// ============================================================================

/// Wall-clock time of day in `HH:MM` form, within a single service day
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServiceTime(NaiveTime);

impl ServiceTime {
    /// Parse a strict `HH:MM` string (two digits, colon, two digits).
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return None;
        }

        let two_digits = |pair: &[u8]| -> Option<u32> {
            pair.iter().try_fold(0u32, |acc, b| {
                b.is_ascii_digit().then(|| acc * 10 + u32::from(b - b'0'))
            })
        };

        Self::from_hm(two_digits(&bytes[0..2])?, two_digits(&bytes[3..5])?)
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Shift forward by whole minutes, wrapping past midnight.
    pub fn plus_minutes(&self, minutes: u32) -> Self {
        let (time, _) = self
            .0
            .overflowing_add_signed(Duration::minutes(i64::from(minutes)));
        Self(time)
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for ServiceTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single stop on a route.
///
/// `distance_from_previous_km` and `typical_travel_time_minutes` describe the
/// leg arriving at this stop. For the first stop that is the leg into the
/// origin and is usually zero.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub id: i64,
    pub name: String,
    pub distance_from_previous_km: f64,
    pub typical_travel_time_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
}

/// A validated bus route as resolved for one query.
///
/// Built only by [`crate::parse::parse_route`]; a new query produces a new
/// `Route`, never a modified one.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) route_id: Option<RouteIdentifier>,
    pub(crate) bus_number: String,
    pub(crate) route_name: String,
    pub(crate) description: String,
    pub(crate) frequency_minutes: u32,
    pub(crate) first_bus_time: ServiceTime,
    pub(crate) last_bus_time: ServiceTime,
    pub(crate) traffic_condition: TrafficCondition,
    pub(crate) traffic_analysis: String,
    pub(crate) stops: Vec<Stop>,
    pub(crate) source_urls: SourceUrls,
}

impl Route {
    /// Attach the deduplicated grounding sources, replacing any present.
    pub fn with_sources(self, source_urls: SourceUrls) -> Self {
        Self {
            source_urls,
            ..self
        }
    }

    pub fn route_id(&self) -> Option<&RouteIdentifier> {
        self.route_id.as_ref()
    }

    pub fn bus_number(&self) -> &str {
        &self.bus_number
    }

    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn frequency_minutes(&self) -> u32 {
        self.frequency_minutes
    }

    pub fn first_bus_time(&self) -> ServiceTime {
        self.first_bus_time
    }

    pub fn last_bus_time(&self) -> ServiceTime {
        self.last_bus_time
    }

    pub fn traffic_condition(&self) -> TrafficCondition {
        self.traffic_condition
    }

    pub fn traffic_analysis(&self) -> &str {
        &self.traffic_analysis
    }

    /// Stops in travel order; never empty
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn source_urls(&self) -> &SourceUrls {
        &self.source_urls
    }

    /// Time between the first and last departure of the day
    pub fn service_span(&self) -> Duration {
        self.last_bus_time.as_naive() - self.first_bus_time.as_naive()
    }

    /// Number of departures the published frequency implies over the service span
    pub fn daily_departures(&self) -> u32 {
        let span_minutes = self.service_span().num_minutes().max(0) as u32;
        span_minutes / self.frequency_minutes + 1
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Message shown to the user for every failure kind.
pub const USER_ERROR_MESSAGE: &str =
    "Unable to find route details. Please check the bus number and try again.";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    #[error("Query is empty")]
    EmptyQuery,

    #[error("Generator returned an empty response")]
    EmptyResponse,

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Invalid value for field `{field}`: {reason}")]
    InvalidFieldValue { field: String, reason: String },

    #[error("Transport failure: {0}")]
    TransportFailure(String),
}

impl RouteError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFieldValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Short stable tag for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyQuery => "empty_query",
            Self::EmptyResponse => "empty_response",
            Self::MalformedPayload(_) => "malformed_payload",
            Self::InvalidFieldValue { .. } => "invalid_field_value",
            Self::TransportFailure(_) => "transport_failure",
        }
    }

    /// The single message surfaced past the system boundary
    pub fn user_message(&self) -> &'static str {
        USER_ERROR_MESSAGE
    }
}

pub type Result<T> = std::result::Result<T, RouteError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_service_time_parse() {
        let t = ServiceTime::parse("05:30").unwrap();
        assert_eq!((t.hour(), t.minute()), (5, 30));
        assert_eq!(t.to_string(), "05:30");

        assert!(ServiceTime::parse("23:59").is_some());
        assert!(ServiceTime::parse("24:00").is_none());
        assert!(ServiceTime::parse("12:60").is_none());
        assert!(ServiceTime::parse("5:00").is_none());
        assert!(ServiceTime::parse("05:00:00").is_none());
        assert!(ServiceTime::parse("ab:cd").is_none());
        assert!(ServiceTime::parse("").is_none());
    }

    #[test]
    fn test_service_time_wraps_past_midnight() {
        let late = ServiceTime::from_hm(23, 50).unwrap();
        assert_eq!(late.plus_minutes(20).to_string(), "00:10");
        assert_eq!(late.plus_minutes(0), late);
    }

    #[test]
    fn test_traffic_condition_from_str() {
        assert_eq!(TrafficCondition::from_str("Heavy"), Ok(TrafficCondition::Heavy));
        assert_eq!(TrafficCondition::from_str("moderate"), Ok(TrafficCondition::Moderate));
        assert!(TrafficCondition::from_str("Gridlock").is_err());
        assert_eq!(TrafficCondition::Light.to_string(), "Light");
    }

    #[test]
    fn test_error_kinds_are_distinguishable() {
        let errors = [
            RouteError::EmptyResponse,
            RouteError::MalformedPayload("eof".into()),
            RouteError::invalid("routeName", "missing"),
            RouteError::TransportFailure("timeout".into()),
        ];

        let kinds: std::collections::HashSet<_> = errors.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds.len(), errors.len());
        assert!(errors.iter().all(|e| e.user_message() == USER_ERROR_MESSAGE));
    }
}
