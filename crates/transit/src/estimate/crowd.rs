//! Synthetic hourly ridership estimate.
//!
//! This is a local, non-authoritative estimate for display only. It is not
//! derived from any measured dataset; the route name is used only for logging.

use rand::Rng;
use serde::{Serialize, Serializer};

pub const FIRST_HOUR: u8 = 6;
pub const LAST_HOUR: u8 = 20;

pub const MIN_LEVEL: u8 = 10;
pub const MAX_LEVEL: u8 = 100;

/// Maximum absolute jitter applied to the base level
pub const JITTER: f64 = 10.0;

/// Estimated load for one hour of the service day
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CrowdSample {
    #[serde(serialize_with = "serialize_hour_label")]
    pub hour: u8,
    pub level: u8,
}

impl CrowdSample {
    /// Chart label, e.g. `"8:00"`
    pub fn label(&self) -> String {
        format!("{}:00", self.hour)
    }
}

fn serialize_hour_label<S: Serializer>(hour: &u8, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{hour}:00"))
}

/// Typical load before jitter
pub fn base_level(hour: u8) -> f64 {
    match hour {
        8..=10 => 90.0,  // morning rush
        16..=18 => 95.0, // evening rush
        12 => 50.0,
        _ => 30.0,
    }
}

/// Apply `jitter` to the base level for `hour`, clamp and round.
pub fn level_for_hour(hour: u8, jitter: f64) -> u8 {
    let level = (base_level(hour) + jitter).clamp(f64::from(MIN_LEVEL), f64::from(MAX_LEVEL));
    level.round() as u8
}

/// Crowd series for `route_name` using the thread-local RNG.
///
/// Levels are intentionally different on every call.
pub fn synthesize_crowd(route_name: &str) -> Vec<CrowdSample> {
    synthesize_crowd_with(route_name, &mut rand::rng())
}

/// Crowd series drawing jitter from the supplied random source.
pub fn synthesize_crowd_with<R: Rng>(route_name: &str, rng: &mut R) -> Vec<CrowdSample> {
    tracing::debug!("synthesizing crowd estimate for {route_name:?}");

    (FIRST_HOUR..=LAST_HOUR)
        .map(|hour| CrowdSample {
            hour,
            level: level_for_hour(hour, rng.random_range(-JITTER..=JITTER)),
        })
        .collect()
}
