//! JSON shapes consumed by the presentation layer.

use ktm_transit::prelude::*;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteView<'a> {
    pub route: &'a Route,
    pub crowd: &'a [CrowdSample],
    pub timeline: Vec<TimelineEntry>,
    pub total_minutes: u32,
    pub total_distance_km: f64,
    pub daily_departures: u32,
    pub sources: Vec<LabeledSource<'a>>,
}

#[derive(Debug, Serialize)]
pub struct LabeledSource<'a> {
    pub label: String,
    pub url: &'a str,
}

impl<'a> RouteView<'a> {
    pub fn new(report: &'a RouteReport) -> Self {
        let timeline = report.timeline();

        Self {
            route: &report.route,
            crowd: &report.crowd,
            total_minutes: timeline.total_minutes(),
            total_distance_km: timeline.total_distance_km(),
            timeline: timeline.entries().to_vec(),
            daily_departures: report.route.daily_departures(),
            sources: report
                .route
                .source_urls()
                .labeled()
                .map(|(label, url)| LabeledSource { label, url })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum StateView<'a> {
    Idle,
    Loading,
    Loaded(RouteView<'a>),
    Failed { message: &'static str },
}

impl<'a> StateView<'a> {
    pub fn new(state: &'a DisplayState) -> Self {
        match state {
            DisplayState::Idle => Self::Idle,
            DisplayState::Loading => Self::Loading,
            DisplayState::Loaded { report } => Self::Loaded(RouteView::new(report)),
            DisplayState::Failed { message } => Self::Failed { message: *message },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}
