//! Generator abstraction.

pub mod traits;

pub use traits::{GeneratedText, RouteTextGenerator};
