//! Values derived from a resolved route for display.

pub mod crowd;
pub mod timeline;

pub use crowd::{CrowdSample, synthesize_crowd, synthesize_crowd_with};
pub use timeline::{StopPosition, Timeline, TimelineEntry};
