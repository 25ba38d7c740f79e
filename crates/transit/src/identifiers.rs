//! Type-safe identifier for routes returned by the generator.
//!
//! Backed by `Arc<str>` for cheap cloning; a resolved route is shared between
//! the display slot and any in-flight renderers.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RouteIdentifier(Arc<str>);

impl RouteIdentifier {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(s.as_ref().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for RouteIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl From<String> for RouteIdentifier {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for RouteIdentifier {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
