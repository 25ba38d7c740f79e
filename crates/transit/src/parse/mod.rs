//! Turning generator output into a validated [`Route`].

mod fence;
mod schema;

pub use fence::strip_code_fences;

use serde_json::Value;

use crate::models::types::*;

/// Parse and validate raw generator text.
///
/// The returned route carries an empty source set; callers attach grounding
/// sources with [`Route::with_sources`]. Failures are returned as-is and never
/// retried here.
pub fn parse_route(raw: &str) -> Result<Route> {
    let text = strip_code_fences(raw);
    if text.is_empty() {
        return Err(RouteError::EmptyResponse);
    }

    let value: Value =
        serde_json::from_str(text).map_err(|e| RouteError::MalformedPayload(e.to_string()))?;

    match value {
        Value::Object(obj) => schema::route_from_object(&obj),
        _ => Err(RouteError::MalformedPayload(
            "top-level value is not an object".into(),
        )),
    }
}
