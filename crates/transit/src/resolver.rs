//! Query → validated route pipeline.

use serde::Serialize;

use crate::estimate::{CrowdSample, Timeline, synthesize_crowd};
use crate::grounding::dedup_sources;
use crate::models::types::*;
use crate::network::traits::RouteTextGenerator;
use crate::parse::parse_route;
use crate::prompt::PromptTemplate;

/// A resolved route together with its crowd estimate.
///
/// The two are produced together and are only ever replaced together.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteReport {
    pub route: Route,
    pub crowd: Vec<CrowdSample>,
}

impl RouteReport {
    pub fn timeline(&self) -> Timeline {
        Timeline::from_stops(self.route.stops())
    }
}

pub struct RouteResolver<G> {
    generator: G,
    template: PromptTemplate,
}

impl<G: RouteTextGenerator> RouteResolver<G> {
    pub fn new(generator: G) -> Self {
        Self::with_template(generator, PromptTemplate::default())
    }

    pub fn with_template(generator: G, template: PromptTemplate) -> Self {
        Self {
            generator,
            template,
        }
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Ask the generator about `query` and validate its answer.
    ///
    /// A failure is returned to the caller; nothing is retried.
    pub async fn resolve_route(&self, query: &str) -> Result<Route> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RouteError::EmptyQuery);
        }

        let prompt = self.template.render(query);
        tracing::debug!("requesting route for {query:?} ({} byte prompt)", prompt.len());

        let output = self.generator.generate(&prompt).await?;
        let text = output.text.as_deref().ok_or(RouteError::EmptyResponse)?;

        let route = parse_route(text)?.with_sources(dedup_sources(&output.grounding));
        tracing::info!(
            "resolved {:?} to bus {} ({}) with {} stops and {} sources",
            query,
            route.bus_number(),
            route.route_name(),
            route.stops().len(),
            route.source_urls().len(),
        );

        Ok(route)
    }

    /// Resolve the route, then build its crowd estimate.
    pub async fn resolve(&self, query: &str) -> Result<RouteReport> {
        let route = self.resolve_route(query).await?;
        let crowd = synthesize_crowd(route.route_name());
        Ok(RouteReport { route, crowd })
    }
}
