use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use ktm_transit::prelude::*;
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::view::{ErrorBody, RouteView, StateView};

pub struct AppState<G> {
    pub resolver: RouteResolver<G>,
    pub session: QuerySession,
}

#[derive(Debug, Deserialize)]
pub struct RouteParams {
    #[serde(default)]
    q: String,
}

pub fn create_router<G>(state: Arc<AppState<G>>) -> Router
where
    G: RouteTextGenerator + 'static,
{
    Router::new()
        .route("/api/route", get(resolve_route::<G>))
        .route("/api/current", get(current::<G>))
        .route("/api/suggestions", get(suggestions))
        .route("/health", get(health))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

async fn resolve_route<G: RouteTextGenerator + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Query(params): Query<RouteParams>,
) -> Response {
    if params.q.trim().is_empty() {
        return error(StatusCode::BAD_REQUEST, "Enter a bus number or route name.");
    }

    // Detached so the query still completes after a client disconnect
    let task_state = Arc::clone(&state);
    let outcome = tokio::spawn(async move {
        task_state
            .session
            .run(&task_state.resolver, &params.q)
            .await
    })
    .await;

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("route lookup task failed: {e}");
            return error(StatusCode::INTERNAL_SERVER_ERROR, USER_ERROR_MESSAGE);
        }
    };

    match outcome {
        Some(DisplayState::Loaded { report }) => Json(RouteView::new(&report)).into_response(),
        Some(DisplayState::Failed { message }) => error(StatusCode::BAD_GATEWAY, message),
        Some(DisplayState::Idle | DisplayState::Loading) => {
            error(StatusCode::INTERNAL_SERVER_ERROR, USER_ERROR_MESSAGE)
        }
        None => error(StatusCode::CONFLICT, "Superseded by a newer query."),
    }
}

async fn current<G: RouteTextGenerator + 'static>(
    State(state): State<Arc<AppState<G>>>,
) -> Response {
    let display = state.session.current().await;
    Json(StateView::new(&display)).into_response()
}

async fn suggestions() -> Json<&'static [&'static str]> {
    let suggestions: &'static [&'static str] = &DEFAULT_SUGGESTIONS;
    Json(suggestions)
}

async fn health() -> &'static str {
    "OK"
}

fn error(status: StatusCode, message: &'static str) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use std::future::Future;
    use std::pin::Pin;
    use tokio::sync::Notify;
    use tower::ServiceExt;

    const KALANKI_JSON: &str = r#"{"busNumber":"Ba 2 Kha 5521","routeName":"Kalanki - Thankot","frequencyMinutes":20,"firstBusTime":"06:00","lastBusTime":"19:00","trafficCondition":"Light","trafficAnalysis":"Clear highway","stops":[{"id":1,"name":"Kalanki","distanceFromPreviousKm":0,"typicalTravelTimeMinutes":0},{"id":2,"name":"Naikap","distanceFromPreviousKm":2.5,"typicalTravelTimeMinutes":8,"landmark":"Naikap Chowk"},{"id":3,"name":"Thankot","distanceFromPreviousKm":4,"typicalTravelTimeMinutes":11}]}"#;

    struct Canned(Option<&'static str>);

    impl RouteTextGenerator for Canned {
        fn generate<'a>(
            &'a self,
            _prompt: &'a str,
        ) -> Pin<Box<dyn Future<Output = ktm_transit::Result<GeneratedText>> + Send + 'a>> {
            let text = self.0.map(str::to_owned);
            Box::pin(async move {
                Ok(GeneratedText {
                    text,
                    grounding: vec![GroundingChunk {
                        maps: Some(ChunkSource::new("https://maps.google.com/?cid=42")),
                        web: None,
                    }],
                })
            })
        }
    }

    /// Answers only once the gate is opened
    struct Gated(Arc<Notify>);

    impl RouteTextGenerator for Gated {
        fn generate<'a>(
            &'a self,
            _prompt: &'a str,
        ) -> Pin<Box<dyn Future<Output = ktm_transit::Result<GeneratedText>> + Send + 'a>> {
            Box::pin(async move {
                self.0.notified().await;
                Ok(GeneratedText {
                    text: Some(KALANKI_JSON.to_owned()),
                    grounding: Vec::new(),
                })
            })
        }
    }

    fn app(answer: Option<&'static str>) -> Router {
        create_router(Arc::new(AppState {
            resolver: RouteResolver::new(Canned(answer)),
            session: QuerySession::new(),
        }))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_route_lookup() {
        let (status, body) = get_json(app(Some(KALANKI_JSON)), "/api/route?q=Kalanki").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["route"]["busNumber"], "Ba 2 Kha 5521");
        assert_eq!(body["route"]["trafficCondition"], "Light");
        assert_eq!(body["totalMinutes"], 19);
        assert_eq!(body["timeline"][0]["legDistanceKm"], Value::Null);
        assert_eq!(body["timeline"][2]["position"], "terminus");
        assert_eq!(body["crowd"].as_array().unwrap().len(), 15);
        assert_eq!(body["sources"][0]["label"], "Source 1");
        assert_eq!(body["dailyDepartures"], 40);
    }

    #[tokio::test]
    async fn test_failure_surfaces_single_message() {
        let (status, body) = get_json(app(Some(r#"{"busNumber":"X"}"#)), "/api/route?q=X").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], USER_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_blank_query_rejected() {
        let (status, _) = get_json(app(None), "/api/route?q=%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(app(None), "/api/route").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_current_state() {
        let router = app(Some(KALANKI_JSON));

        let (_, body) = get_json(router.clone(), "/api/current").await;
        assert_eq!(body["state"], "idle");

        get_json(router.clone(), "/api/route?q=Kalanki").await;
        let (_, body) = get_json(router, "/api/current").await;
        assert_eq!(body["state"], "loaded");
        assert_eq!(body["route"]["routeName"], "Kalanki - Thankot");
    }

    #[tokio::test]
    async fn test_suggestions() {
        let (status, body) = get_json(app(None), "/api/suggestions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), DEFAULT_SUGGESTIONS.len());
    }

    #[tokio::test]
    async fn test_abandoned_request_still_completes() {
        let gate = Arc::new(Notify::new());
        let router = create_router(Arc::new(AppState {
            resolver: RouteResolver::new(Gated(Arc::clone(&gate))),
            session: QuerySession::new(),
        }));

        let request = tokio::spawn(
            router
                .clone()
                .oneshot(Request::get("/api/route?q=Kalanki").body(Body::empty()).unwrap()),
        );
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        let (_, body) = get_json(router.clone(), "/api/current").await;
        assert_eq!(body["state"], "loading");

        // Client goes away before the generator answers
        request.abort();
        assert!(request.await.unwrap_err().is_cancelled());
        gate.notify_one();

        let mut state = Value::Null;
        for _ in 0..100 {
            tokio::task::yield_now().await;
            let (_, body) = get_json(router.clone(), "/api/current").await;
            state = body["state"].clone();
            if state != "loading" {
                break;
            }
        }
        assert_eq!(state, "loaded");
    }
}
