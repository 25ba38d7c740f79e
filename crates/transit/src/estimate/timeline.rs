//! Cumulative travel times along a route's stop sequence.

use serde::Serialize;

use crate::models::types::{ServiceTime, Stop};

/// Where a stop sits in the sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StopPosition {
    Origin,
    Intermediate,
    Terminus,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub stop_id: i64,
    /// Sum of per-leg travel times for every stop up to and including this one
    pub cumulative_minutes: u32,
    /// Length of the leg arriving here; `None` for the origin
    pub leg_distance_km: Option<f64>,
    pub position: StopPosition,
}

/// Derived timeline for one stop sequence. Recompute when the route changes.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    pub fn from_stops(stops: &[Stop]) -> Self {
        let last = stops.len().saturating_sub(1);
        let mut cumulative = 0u32;

        let entries = stops
            .iter()
            .enumerate()
            .map(|(i, stop)| {
                cumulative = cumulative.saturating_add(stop.typical_travel_time_minutes);
                let position = match i {
                    0 => StopPosition::Origin,
                    i if i == last => StopPosition::Terminus,
                    _ => StopPosition::Intermediate,
                };

                TimelineEntry {
                    stop_id: stop.id,
                    cumulative_minutes: cumulative,
                    leg_distance_km: (i > 0).then_some(stop.distance_from_previous_km),
                    position,
                }
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total trip duration; zero for an empty sequence
    pub fn total_minutes(&self) -> u32 {
        self.entries.last().map_or(0, |e| e.cumulative_minutes)
    }

    /// Sum of leg distances, excluding the leg into the origin
    pub fn total_distance_km(&self) -> f64 {
        self.entries.iter().filter_map(|e| e.leg_distance_km).sum()
    }

    /// Clock time at each stop for a bus leaving the origin at `departure`
    pub fn arrivals_from(&self, departure: ServiceTime) -> Vec<ServiceTime> {
        let offset = self
            .entries
            .first()
            .map_or(0, |origin| origin.cumulative_minutes);

        self.entries
            .iter()
            .map(|e| departure.plus_minutes(e.cumulative_minutes - offset))
            .collect()
    }
}
