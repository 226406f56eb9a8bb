//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::domain::Coordinate;
use crate::planner::PlanError;
use crate::sources::{StationFeed, TransitPlanner, VehicleFeed};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<T, S, V>(state: AppState<T, S, V>) -> Router
where
    T: TransitPlanner + 'static,
    S: StationFeed + 'static,
    V: VehicleFeed + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/modes", get(list_modes))
        .route("/api/routes", post(plan_routes::<T, S, V>))
        .route("/api/escooters/nearby", get(nearby_scooters::<T, S, V>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Modes the planner can combine.
async fn list_modes() -> Json<ModesResponse> {
    Json(ModesResponse {
        modes: ADVERTISED_MODES.to_vec(),
    })
}

/// Plan routes between two points.
async fn plan_routes<T, S, V>(
    State(state): State<AppState<T, S, V>>,
    body: Bytes,
) -> Result<Response, AppError>
where
    T: TransitPlanner,
    S: StationFeed,
    V: VehicleFeed,
{
    // Parse JSON manually so we can log the body on failure
    let req: PlanRoutesRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(body = %String::from_utf8_lossy(&body), "Unparseable route request");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let trip = req.to_trip_request().map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let result = state.planner.plan_routes(&trip).await?;

    Ok(Json(PlanRoutesResponse::from_result(&result)).into_response())
}

/// Scooters around a point.
async fn nearby_scooters<T, S, V>(
    State(state): State<AppState<T, S, V>>,
    query: Result<Query<NearbyScootersQuery>, QueryRejection>,
) -> Result<Json<NearbyScootersResponse>, AppError>
where
    T: TransitPlanner,
    S: StationFeed,
    V: VehicleFeed,
{
    let Query(query) = query.map_err(|e| {
        debug!(error = %e, "Unparseable nearby query");
        AppError::BadRequest {
            message: "Invalid or missing lat/lon parameters".to_string(),
        }
    })?;
    let point = Coordinate::new(query.lat, query.lon).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let found = state
        .planner
        .nearby_vehicles(point, f64::from(query.radius_m()))
        .await?;

    Ok(Json(NearbyScootersResponse::new(&found, &query)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unavailable { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::InvalidRequest(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            PlanError::SourceUnavailable(message) => AppError::Unavailable { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
        };

        warn!(%status, %message, "Request rejected");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{PlannerConfig, RoutePlanner};
    use crate::sources::fixture::FixtureSources;

    type FixtureState = AppState<FixtureSources, FixtureSources, FixtureSources>;

    fn state() -> FixtureState {
        let sources = FixtureSources::load("data/fixtures").unwrap();
        AppState::new(RoutePlanner::new(
            sources.clone(),
            sources.clone(),
            sources,
            PlannerConfig::default(),
        ))
    }

    async fn post(body: &str) -> (StatusCode, serde_json::Value) {
        let response = match plan_routes(State(state()), Bytes::from(body.to_string())).await {
            Ok(r) => r,
            Err(e) => e.into_response(),
        };
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn nearby(uri: &str) -> (StatusCode, serde_json::Value) {
        let uri: axum::http::Uri = uri.parse().unwrap();
        let response = match nearby_scooters(State(state()), Query::try_from_uri(&uri)).await {
            Ok(json) => json.into_response(),
            Err(e) => e.into_response(),
        };
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn modes_in_client_order() {
        let Json(resp) = list_modes().await;
        let json = serde_json::to_value(resp).unwrap();
        assert_eq!(
            json["modes"],
            serde_json::json!(["public_transport", "e_scooter", "publibike"])
        );
    }

    #[tokio::test]
    async fn plans_all_modes_from_fixtures() {
        let (status, json) = post(
            r#"{"from":{"lat":46.9490,"lon":7.4390},"to":{"lat":46.9470,"lon":7.4510},
                "modes":["public_transport","publibike","e_scooter"]}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let routes = json["routes"].as_array().unwrap();
        assert!(routes.iter().any(|r| r["id"] == "pt-1"));
        assert!(routes.iter().any(|r| r["mode"] == "publibike"));
        assert!(routes.iter().any(|r| r["mode"] == "e_scooter"));
        assert_eq!(json["mode_status"]["public_transport"], "present");
    }

    #[tokio::test]
    async fn empty_modes_is_bad_request() {
        let (status, json) = post(
            r#"{"from":{"lat":46.9490,"lon":7.4390},"to":{"lat":46.9470,"lon":7.4510},"modes":[]}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("at least one travel mode"));
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let (status, json) = post(r#"{"from":{"lat":46.9490}}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().starts_with("Invalid JSON"));

        let (status, _) = post(
            r#"{"from":{"lat":95.0,"lon":7.4390},"to":{"lat":46.9470,"lon":7.4510}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn nearby_scooters_from_fixtures() {
        let (status, json) = nearby("/api/escooters/nearby?lat=46.9490&lon=7.4390").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["query"]["radius_m"], 300);
        let scooters = json["scooters"].as_array().unwrap();
        assert!(!scooters.is_empty());
        assert_eq!(json["count"], scooters.len());
        assert!(scooters.iter().all(|s| s["distance_m"].as_u64().unwrap() <= 300));
        assert!(scooters.iter().all(|s| s["provider"] == "Voi"));

        let distances: Vec<_> = scooters.iter().map(|s| s["distance_m"].as_u64()).collect();
        let mut sorted = distances.clone();
        sorted.sort();
        assert_eq!(distances, sorted);
    }

    #[tokio::test]
    async fn nearby_scooters_bad_query() {
        let (status, json) = nearby("/api/escooters/nearby?lat=north&lon=7.4390").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid or missing lat/lon parameters");

        let (status, _) = nearby("/api/escooters/nearby?lon=7.4390").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = nearby("/api/escooters/nearby?lat=95.0&lon=7.4390").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unavailable_source_is_503() {
        let response = AppError::from(PlanError::SourceUnavailable(
            "Voi scooter feed did not respond within 10s".to_string(),
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
