use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::OptimizeError;
use crate::holidays::{Country, HolidayCache, HolidayProvider, NagerClient};
use crate::optimizer::{optimize_vacation, OptimizeRequest, OptimizeResponse, VacationOption};
use crate::output::ics::{generate_ics, generate_multi_ics};

#[derive(Clone)]
pub struct ApiState {
    config: Arc<Config>,
    provider: HolidayProvider,
}

impl ApiState {
    pub fn new(config: Config, provider: HolidayProvider) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }

    pub fn from_config(config: Config) -> Self {
        let source = Arc::new(NagerClient::new(config.holidays.base_url.clone()));
        let cache = Arc::new(HolidayCache::with_ttl_secs(config.holidays.cache_ttl_secs));
        Self::new(config, HolidayProvider::new(source, cache))
    }
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn upstream(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: error.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast_ref::<OptimizeError>() {
            Some(invalid) => Self::bad_request(invalid.to_string()),
            None => {
                warn!("holiday lookup failed: {error:#}");
                Self::upstream(format!("{error:#}"))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IcsRequest {
    pub options: Vec<VacationOption>,
    #[serde(default)]
    pub index: Option<usize>,
}

pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/countries", get(countries))
        .route("/api/optimize", post(optimize))
        .route("/api/ics", post(ics))
        .route("/api/config", get(show_config))
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let app = build_router(ApiState::from_config(config));
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config.as_ref().clone())
}

async fn countries(State(state): State<ApiState>) -> ApiResult<Vec<Country>> {
    let countries = state.provider.countries().await?;
    Ok(ok(countries))
}

async fn optimize(
    State(state): State<ApiState>,
    Json(request): Json<OptimizeRequest>,
) -> ApiResult<OptimizeResponse> {
    if request.country.trim().is_empty() {
        return Err(ApiError::bad_request("country is required"));
    }
    let response = optimize_vacation(&state.provider, &request, &state.config.optimizer).await?;
    info!(
        country = %response.country,
        options = response.options.len(),
        "served optimization"
    );
    Ok(ok(response))
}

async fn ics(Json(request): Json<IcsRequest>) -> std::result::Result<Response, ApiError> {
    let (filename, body) = render_ics_attachment(&request)?;
    let headers = [
        (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={filename}"),
        ),
    ];
    Ok((StatusCode::OK, headers, body).into_response())
}

fn render_ics_attachment(request: &IcsRequest) -> std::result::Result<(String, String), ApiError> {
    let now = Utc::now();
    match request.index {
        Some(index) => {
            let option = request
                .options
                .get(index)
                .ok_or_else(|| ApiError::not_found(format!("no vacation option at index {index}")))?;
            Ok((
                format!("vacation-option-{}.ics", index + 1),
                generate_ics(option, now),
            ))
        }
        None => {
            if request.options.is_empty() {
                return Err(ApiError::bad_request("no vacation options to export"));
            }
            Ok((
                "vacation-options-all.ics".to_string(),
                generate_multi_ics(&request.options, now),
            ))
        }
    }
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::Json;
    use chrono::NaiveDate;

    use super::{optimize, render_ics_attachment, ApiError, ApiState, IcsRequest};
    use crate::config::Config;
    use crate::error::OptimizeError;
    use crate::holidays::{Country, Holiday, HolidayCache, HolidayProvider, HolidaySource};
    use crate::optimizer::{OptimizeRequest, VacationOption};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    struct StaticSource;

    #[async_trait]
    impl HolidaySource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        async fn countries(&self) -> Result<Vec<Country>> {
            Err(anyhow!("upstream unavailable"))
        }

        async fn holidays(&self, country_code: &str, year: i32) -> Result<Vec<Holiday>> {
            Ok(vec![
                Holiday::new(day(year, 1, 1), "New Year's Day", country_code)
                    .with_types(&["Public"]),
            ])
        }
    }

    fn state() -> ApiState {
        let provider =
            HolidayProvider::new(Arc::new(StaticSource), Arc::new(HolidayCache::default()));
        ApiState::new(Config::default(), provider)
    }

    fn request(pto_days: i32, start: NaiveDate, end: NaiveDate) -> OptimizeRequest {
        OptimizeRequest {
            country: "us".to_string(),
            subdivision: None,
            pto_days,
            work_days: vec![0, 1, 2, 3, 4],
            start_date: start,
            end_date: end,
            max_results: Some(3),
        }
    }

    #[tokio::test]
    async fn optimize_handler_returns_ranked_options() {
        let Json(response) = optimize(
            State(state()),
            Json(request(1, day(2025, 12, 29), day(2026, 1, 4))),
        )
        .await
        .expect("optimize");
        assert!(response.ok);
        assert_eq!(response.data.country, "US");
        assert_eq!(response.data.options[0].pto_dates, vec![day(2026, 1, 2)]);
        assert!(response.data.options.len() <= 3);
    }

    #[tokio::test]
    async fn optimize_handler_maps_validation_errors_to_bad_request() {
        let err = optimize(
            State(state()),
            Json(request(1, day(2026, 1, 4), day(2025, 12, 29))),
        )
        .await
        .expect_err("inverted range");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = optimize(
            State(state()),
            Json(request(0, day(2025, 12, 29), day(2026, 1, 4))),
        )
        .await
        .expect_err("zero budget");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn negative_work_day_is_a_bad_request_not_a_rejected_body() {
        let request: OptimizeRequest = serde_json::from_str(
            r#"{"country":"US","pto_days":1,"work_days":[-1],"start_date":"2025-12-29","end_date":"2026-01-04"}"#,
        )
        .expect("body deserializes");
        let err = optimize(State(state()), Json(request))
            .await
            .expect_err("invalid work day");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.message.contains("work day -1"));
    }

    #[test]
    fn upstream_failures_map_to_bad_gateway() {
        let err: ApiError = anyhow!("GET https://example.test returned 500").into();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        let err: ApiError = anyhow::Error::from(OptimizeError::invalid_parameter("x")).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    fn option() -> VacationOption {
        VacationOption {
            pto_dates: vec![day(2026, 2, 6)],
            pto_days_used: 1,
            total_days_off: 3,
            efficiency_ratio: 3.0,
            start_date: day(2026, 2, 6),
            end_date: day(2026, 2, 8),
            holidays_included: Vec::new(),
        }
    }

    #[test]
    fn ics_attachment_selects_single_or_all() {
        let single = IcsRequest {
            options: vec![option(), option()],
            index: Some(1),
        };
        let (filename, body) = render_ics_attachment(&single).expect("single");
        assert_eq!(filename, "vacation-option-2.ics");
        assert!(body.contains("SUMMARY:Vacation Time Off"));

        let all = IcsRequest {
            options: vec![option()],
            index: None,
        };
        let (filename, body) = render_ics_attachment(&all).expect("all");
        assert_eq!(filename, "vacation-options-all.ics");
        assert!(body.contains("Vacation Option 1"));
    }

    #[test]
    fn ics_attachment_rejects_missing_index() {
        let request = IcsRequest {
            options: vec![option()],
            index: Some(4),
        };
        let err = render_ics_attachment(&request).expect_err("out of range");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
