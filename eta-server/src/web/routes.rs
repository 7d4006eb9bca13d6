//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderValue, Method, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::catalog::StationNotFound;
use crate::domain::{Coordinate, LineCode, StationCode};
use crate::schedule::ScheduleError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stations", get(list_stations))
        .route("/api/nearest", get(nearest_station))
        .route("/api/stations/:sta/lines", get(station_lines))
        .route("/api/stations/:sta/arrivals", get(station_arrivals))
        .route("/api/arrivals", get(arrivals))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS for a browser front-end. No origins means any origin is allowed.
pub fn cors_layer(origins: &[HeaderValue]) -> CorsLayer {
    if origins.is_empty() {
        tracing::warn!("CORS: permissive mode (all origins allowed)");
        CorsLayer::permissive()
    } else {
        tracing::info!(origins = ?origins, "CORS: restricting to configured origins");
        CorsLayer::new()
            .allow_origin(origins.to_vec())
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    }
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Every catalog row, for drawing station markers.
async fn list_stations(State(state): State<AppState>) -> Json<StationListResponse> {
    let stations = state
        .transit
        .catalog()
        .records()
        .iter()
        .map(StationResult::from)
        .collect();

    Json(StationListResponse { stations })
}

/// Station nearest the given position.
///
/// Never fails: a missing, malformed or out-of-range position answers with
/// `{"station": null}`.
async fn nearest_station(
    State(state): State<AppState>,
    Query(req): Query<NearestRequest>,
) -> Json<NearestResponse> {
    let nearest = req
        .position()
        .and_then(|(lat, lon)| Coordinate::new(lat, lon).ok())
        .and_then(|point| state.transit.catalog().nearest(&point));

    match nearest {
        Some(found) => Json(NearestResponse::from(found)),
        None => {
            tracing::debug!(lat = ?req.lat, lon = ?req.lon, "no nearest station");
            Json(NearestResponse::none())
        }
    }
}

/// Lines serving a station, with the line to show first.
async fn station_lines(
    State(state): State<AppState>,
    Path(sta): Path<String>,
) -> Result<Json<StationLinesResponse>, AppError> {
    let station = parse_station(&sta)?;
    let transit = &state.transit;
    let catalog = transit.catalog();

    let lines = transit.lines_for_station(&station)?;
    let default_line = transit.default_line(&station)?;

    let lines = lines
        .into_iter()
        .map(|line| LineResult {
            line,
            line_name: catalog.line_name(&line).unwrap_or_default().to_string(),
        })
        .collect::<Vec<_>>();

    Ok(Json(StationLinesResponse {
        station,
        station_name: catalog.station_name(&station).unwrap_or_default().to_string(),
        multi_line: lines.len() > 1,
        lines,
        default_line,
    }))
}

/// Next arrivals for one (line, station) pair.
async fn arrivals(
    State(state): State<AppState>,
    Query(req): Query<ArrivalsRequest>,
) -> Result<Json<ArrivalsResponse>, AppError> {
    let station = parse_station(&req.sta)?;
    let line = LineCode::parse_normalized(&req.line).map_err(|_| AppError::BadRequest {
        message: format!("Invalid line code: {}", req.line),
    })?;

    let catalog = state.transit.catalog();
    if !catalog.contains_station(&station) {
        return Err(StationNotFound(station).into());
    }
    if catalog.get(&line, &station).is_none() {
        return Err(AppError::NotFound {
            message: format!("line {line} does not serve station {station}"),
        });
    }

    let record = state.transit.fetch_arrivals(&line, &station).await?;
    Ok(Json(ArrivalsResponse::from(&record)))
}

/// Next arrivals on every line serving a station.
///
/// Lines whose schedule could not be fetched carry an `error` instead of
/// failing the whole response.
async fn station_arrivals(
    State(state): State<AppState>,
    Path(sta): Path<String>,
) -> Result<Json<StationArrivalsResponse>, AppError> {
    let station = parse_station(&sta)?;
    let catalog = state.transit.catalog();

    let results = state.transit.fetch_arrivals_for_station(&station).await?;

    let lines = results
        .into_iter()
        .map(|entry| {
            let line_name = catalog.line_name(&entry.line).unwrap_or_default().to_string();
            match entry.result {
                Ok(record) => LineArrivalsResult {
                    line: entry.line,
                    line_name,
                    arrivals: Some(ArrivalsResponse::from(&record)),
                    error: None,
                },
                Err(e) => LineArrivalsResult {
                    line: entry.line,
                    line_name,
                    arrivals: None,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect();

    Ok(Json(StationArrivalsResponse {
        station,
        station_name: catalog.station_name(&station).unwrap_or_default().to_string(),
        lines,
    }))
}

fn parse_station(sta: &str) -> Result<StationCode, AppError> {
    StationCode::parse_normalized(sta).map_err(|_| AppError::BadRequest {
        message: format!("Invalid station code: {sta}"),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    /// The schedule API failed or sent something unusable.
    BadGateway { message: String },
}

impl From<StationNotFound> for AppError {
    fn from(e: StationNotFound) -> Self {
        AppError::NotFound {
            message: e.to_string(),
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(e: ScheduleError) -> Self {
        AppError::BadGateway {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
        };

        if status.is_server_error() {
            tracing::warn!(%status, %message, "request failed");
        } else {
            tracing::debug!(%status, %message, "request rejected");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::{Value, json};
    use tempfile::TempDir;

    use crate::catalog::{LinePolicy, StationCatalog};
    use crate::schedule::{MockScheduleClient, ScheduleBackend};

    const CATALOG: &str = r#"[
        {"line": "TWL", "line_name": "Tsuen Wan Line", "sta": "TST", "sta_name": "Tsim Sha Tsui", "latitude": 22.2975, "longitude": 114.1722},
        {"line": "EAL", "line_name": "East Rail Line", "sta": "TST", "sta_name": "Tsim Sha Tsui", "latitude": 22.2975, "longitude": 114.1722},
        {"line": "TWL", "line_name": "Tsuen Wan Line", "sta": "TSW", "sta_name": "Tsuen Wan", "latitude": 22.3736, "longitude": 114.1178},
        {"line": "TWL", "line_name": "Tsuen Wan Line", "sta": "CEN", "sta_name": "Central", "latitude": 22.2820, "longitude": 114.1588},
        {"line": "EAL", "line_name": "East Rail Line", "sta": "ADM", "sta_name": "Admiralty", "latitude": 22.2790, "longitude": 114.1648}
    ]"#;

    const TWL_TST: &str = r#"{
        "status": 1, "message": "successful", "isdelay": "N",
        "curr_time": "2024-01-15 08:30:00", "sys_time": "2024-01-15 08:30:00",
        "data": {"TWL-TST": {
            "curr_time": "2024-01-15 08:30:00", "sys_time": "2024-01-15 08:30:00",
            "UP": [{"seq": "1", "dest": "TSW", "plat": "2", "time": "2024-01-15 08:32:00", "ttnt": "2", "valid": "Y", "source": "-"}],
            "DOWN": [{"seq": "1", "dest": "CEN", "plat": "1", "time": "2024-01-15 08:35:30", "ttnt": "5", "valid": "Y", "source": "-"}]
        }}
    }"#;

    const EAL_ADM_BROKEN: &str = r#"{"status": 0, "message": "The service is temporarily unavailable"}"#;

    /// Serve the router on an ephemeral port. The tempdir must outlive the test.
    async fn serve() -> (String, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("TWL-TST.json"), TWL_TST).unwrap();
        std::fs::write(dir.path().join("EAL-ADM.json"), EAL_ADM_BROKEN).unwrap();

        let catalog = StationCatalog::from_json_str(CATALOG).unwrap();
        let backend = ScheduleBackend::Mock(MockScheduleClient::new(dir.path()).unwrap());
        let state = AppState::new(catalog, backend, LinePolicy::default());
        let router = create_router(state, cors_layer(&[]));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        (format!("http://{addr}"), dir)
    }

    async fn get_json(url: String) -> (StatusCode, Value) {
        let response = reqwest::get(url).await.unwrap();
        let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
        (status, response.json().await.unwrap())
    }

    #[tokio::test]
    async fn health_check() {
        let (base, _dir) = serve().await;
        let body = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn lists_every_catalog_row() {
        let (base, _dir) = serve().await;
        let (status, body) = get_json(format!("{base}/api/stations")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stations"].as_array().unwrap().len(), 5);
        assert_eq!(body["stations"][0]["station"], "TST");
    }

    #[tokio::test]
    async fn nearest_station_found() {
        let (base, _dir) = serve().await;
        let (status, body) = get_json(format!("{base}/api/nearest?lat=22.2822&lon=114.1590")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["station"], "CEN");
        assert_eq!(body["station_name"], "Central");
        assert!(body["distance_km"].as_f64().unwrap() < 0.1);
    }

    #[tokio::test]
    async fn nearest_station_with_bad_position_is_null() {
        let (base, _dir) = serve().await;
        for query in ["lat=91&lon=114", "lat=abc&lon=114", "lon=114", ""] {
            let (status, body) = get_json(format!("{base}/api/nearest?{query}")).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({ "station": null }), "query {query:?}");
        }
    }

    #[tokio::test]
    async fn multi_line_station_lines() {
        let (base, _dir) = serve().await;
        let (status, body) = get_json(format!("{base}/api/stations/tst/lines")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "station": "TST",
                "station_name": "Tsim Sha Tsui",
                "lines": [
                    {"line": "TWL", "line_name": "Tsuen Wan Line"},
                    {"line": "EAL", "line_name": "East Rail Line"}
                ],
                "multi_line": true,
                "default_line": "TWL"
            })
        );
    }

    #[tokio::test]
    async fn station_lines_errors() {
        let (base, _dir) = serve().await;

        let (status, body) = get_json(format!("{base}/api/stations/XYZ/lines")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "station XYZ not found in catalog");

        let (status, _) = get_json(format!("{base}/api/stations/TSTX/lines")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn arrivals_for_line_and_station() {
        let (base, _dir) = serve().await;
        let (status, body) = get_json(format!("{base}/api/arrivals?line=TWL&sta=TST")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "station": "TST",
                "up_destination": "Tsuen Wan",
                "up_eta_minutes": 2,
                "down_destination": "Central",
                "down_eta_minutes": 6
            })
        );
    }

    #[tokio::test]
    async fn arrivals_for_line_not_serving_station() {
        let (base, _dir) = serve().await;
        let (status, body) = get_json(format!("{base}/api/arrivals?line=EAL&sta=TSW")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "line EAL does not serve station TSW");
    }

    #[tokio::test]
    async fn arrivals_for_unknown_station() {
        let (base, _dir) = serve().await;
        let (status, body) = get_json(format!("{base}/api/arrivals?line=TWL&sta=XYZ")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "station XYZ not found in catalog");
    }

    #[tokio::test]
    async fn unusable_schedule_is_bad_gateway() {
        let (base, _dir) = serve().await;

        // No mock data for this pair
        let (status, body) = get_json(format!("{base}/api/arrivals?line=EAL&sta=TST")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("unavailable"));

        // Response without data
        let (status, body) = get_json(format!("{base}/api/arrivals?line=EAL&sta=ADM")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("temporarily unavailable"));
    }

    #[tokio::test]
    async fn all_lines_of_a_station() {
        let (base, _dir) = serve().await;
        let (status, body) = get_json(format!("{base}/api/stations/TST/arrivals")).await;
        assert_eq!(status, StatusCode::OK);

        let lines = body["lines"].as_array().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["line"], "TWL");
        assert_eq!(lines[0]["arrivals"]["up_eta_minutes"], 2);
        assert_eq!(lines[1]["line"], "EAL");
        assert!(lines[1]["error"].is_string());
        assert!(lines[1].get("arrivals").is_none());
    }
}
