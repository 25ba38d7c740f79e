//! Pluggable route text generation.
//!
//! External crates implement these to provide the model-backed generator.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::grounding::GroundingChunk;
use crate::models::types::Result;

/// Unstructured generator output
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeneratedText {
    /// Model answer; `None` when the model returned no text at all
    pub text: Option<String>,
    /// Citations from the location-grounding tool, possibly empty
    pub grounding: Vec<GroundingChunk>,
}

/// Turn a fully rendered prompt into route text plus grounding citations.
///
/// No latency or determinism guarantees. Transport problems (network, auth,
/// quota) must be reported as [`crate::RouteError::TransportFailure`].
pub trait RouteTextGenerator: Send + Sync {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<GeneratedText>> + Send + 'a>>;
}

impl<G: RouteTextGenerator + ?Sized> RouteTextGenerator for Arc<G> {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<GeneratedText>> + Send + 'a>> {
        (**self).generate(prompt)
    }
}
