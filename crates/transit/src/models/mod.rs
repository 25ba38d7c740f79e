//! Route data models and error types.

pub mod types;

// Re-exports for convenience
pub use types::{
    Result, Route, RouteError, ServiceTime, Stop, TrafficCondition, USER_ERROR_MESSAGE,
};
