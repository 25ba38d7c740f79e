//! # ktm-transit
//!
//! Resolves free-text bus queries into validated route records.
//!
//! ## Features
//!
//! - **Strict validation**: generator output is checked field by field before it becomes a [`Route`]
//! - **Grounding sources**: citation URLs deduplicated for display
//! - **Derived views**: cumulative stop timeline and a synthetic hourly crowd estimate
//! - **Pluggable generation**: implement [`RouteTextGenerator`] for your model backend
//! - **Out-of-order safety**: [`QuerySession`] only publishes the latest query's result
//!
//! ## Example
//!
//! ```
//! use ktm_transit::prelude::*;
//!
//! let raw = r#"{"busNumber": "Ba 1 Ja 1234", "routeName": "Ring Road", "frequencyMinutes": 10,
//!  "firstBusTime": "05:00", "lastBusTime": "20:00", "trafficCondition": "Moderate",
//!  "stops": [
//!    {"id": 1, "name": "Ratnapark", "distanceFromPreviousKm": 0, "typicalTravelTimeMinutes": 0},
//!    {"id": 2, "name": "Baneshwor", "distanceFromPreviousKm": 3, "typicalTravelTimeMinutes": 12}
//!  ]}"#;
//!
//! let route = parse_route(raw).unwrap();
//! let timeline = Timeline::from_stops(route.stops());
//! assert_eq!(timeline.total_minutes(), 12);
//! ```

pub mod estimate;
pub mod grounding;
pub mod identifiers;
pub mod models;
pub mod network;
pub mod parse;
pub mod prompt;
pub mod resolver;
pub mod session;

// Re-exports for convenience
pub mod prelude {
    pub use crate::estimate::{
        CrowdSample, StopPosition, Timeline, TimelineEntry, synthesize_crowd,
        synthesize_crowd_with,
    };
    pub use crate::grounding::{ChunkSource, GroundingChunk, SourceUrls, dedup_sources};
    pub use crate::identifiers::*;
    pub use crate::models::types::*;
    pub use crate::network::traits::*;
    pub use crate::parse::{parse_route, strip_code_fences};
    pub use crate::prompt::{DEFAULT_SUGGESTIONS, PromptTemplate};
    pub use crate::resolver::{RouteReport, RouteResolver};
    pub use crate::session::{DisplayState, QuerySession, QueryTicket};
}

pub use prelude::*;
