use crate::infra::{deserialize_date, deserialize_optional_moment, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use prohibition_review::error::AppError;
use prohibition_review::review::{
    localize_date, review_now, PresentationType, ProhibitionPolicy, ReviewError,
};
use prohibition_review::vips::{
    available_review_slots, to_friendly_slots, FriendlyTimeSlot, ScheduleSlot, VipsClient,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewWindowRequest {
    pub(crate) prohibition_type: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub(crate) service_date: NaiveDate,
    #[serde(default, deserialize_with = "deserialize_optional_moment")]
    pub(crate) today: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReviewWindowResponse {
    pub(crate) prohibition_type: String,
    pub(crate) minimum_date: DateTime<Tz>,
    pub(crate) maximum_date: DateTime<Tz>,
    pub(crate) review_days: Vec<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AmountDueRequest {
    pub(crate) prohibition_type: String,
    pub(crate) presentation_type: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AmountDueResponse {
    pub(crate) amount_due: u32,
    pub(crate) fee_applicable: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FriendlyTimesRequest {
    pub(crate) presentation_type: String,
    #[serde(default)]
    pub(crate) time_slots: Vec<ScheduleSlot>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewSlotsRequest {
    pub(crate) prohibition_type: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub(crate) service_date: NaiveDate,
    pub(crate) presentation_type: String,
    #[serde(default, deserialize_with = "deserialize_optional_moment")]
    pub(crate) today: Option<NaiveDateTime>,
    #[serde(default)]
    pub(crate) correlation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TimeSlotsResponse {
    pub(crate) time_slots: Vec<FriendlyTimeSlot>,
}

pub(crate) fn review_routes(vips: Arc<VipsClient>) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/prohibitions/review-window",
            post(review_window_endpoint),
        )
        .route("/api/v1/prohibitions/amount-due", post(amount_due_endpoint))
        .route(
            "/api/v1/prohibitions/review-slots",
            post(review_slots_endpoint),
        )
        .route("/api/v1/schedule/friendly-times", post(friendly_times_endpoint))
        .layer(Extension(vips))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn review_window_endpoint(
    Json(payload): Json<ReviewWindowRequest>,
) -> Result<Json<ReviewWindowResponse>, AppError> {
    let ReviewWindowRequest {
        prohibition_type,
        service_date,
        today,
    } = payload;

    let policy = ProhibitionPolicy::try_resolve(&prohibition_type)?;
    let today = today.unwrap_or_else(review_now);
    let window = policy.review_window(&localize_date(service_date)?, today)?;

    Ok(Json(ReviewWindowResponse {
        prohibition_type,
        review_days: window.review_days().collect(),
        minimum_date: window.minimum_date,
        maximum_date: window.maximum_date,
    }))
}

pub(crate) async fn amount_due_endpoint(
    Json(payload): Json<AmountDueRequest>,
) -> Result<Json<AmountDueResponse>, AppError> {
    let policy = ProhibitionPolicy::try_resolve(&payload.prohibition_type)?;
    let amount_due = policy.amount_due(&payload.presentation_type);

    Ok(Json(AmountDueResponse {
        amount_due: amount_due.unwrap_or(0),
        fee_applicable: amount_due.is_some(),
    }))
}

pub(crate) async fn friendly_times_endpoint(
    Json(payload): Json<FriendlyTimesRequest>,
) -> Result<Json<TimeSlotsResponse>, AppError> {
    let presentation = presentation_from_code(&payload.presentation_type)?;
    // Caller-supplied slots: a malformed timestamp is a client error.
    let time_slots = to_friendly_slots(&payload.time_slots, presentation)
        .map_err(|err| ReviewError::InvalidInput(err.to_string()))?;

    Ok(Json(TimeSlotsResponse { time_slots }))
}

pub(crate) async fn review_slots_endpoint(
    Extension(vips): Extension<Arc<VipsClient>>,
    Json(payload): Json<ReviewSlotsRequest>,
) -> Result<Json<TimeSlotsResponse>, AppError> {
    let ReviewSlotsRequest {
        prohibition_type,
        service_date,
        presentation_type,
        today,
        correlation_id,
    } = payload;

    let policy = ProhibitionPolicy::try_resolve(&prohibition_type)?;
    let presentation = presentation_from_code(&presentation_type)?;
    if !policy.offered_presentations().contains(&presentation) {
        return Err(ReviewError::InvalidInput(format!(
            "{} is not offered for {}",
            presentation.label(),
            policy.kind.label()
        ))
        .into());
    }

    let notice_type = policy
        .kind
        .code()
        .ok_or_else(|| ReviewError::UnknownPolicyType(prohibition_type.clone()))?;

    let today = today.unwrap_or_else(review_now);
    let correlation_id = correlation_id.unwrap_or_else(generate_correlation_id);
    let window = policy.review_window(&localize_date(service_date)?, today)?;

    let time_slots =
        available_review_slots(&vips, notice_type, presentation, &window, &correlation_id)
            .await?;
    info!(
        notice_type,
        offered = time_slots.len(),
        %correlation_id,
        "review slots served"
    );

    Ok(Json(TimeSlotsResponse { time_slots }))
}

fn generate_correlation_id() -> String {
    Utc::now().format("%Y%m%d%H%M%S%6f").to_string()
}

fn presentation_from_code(code: &str) -> Result<PresentationType, ReviewError> {
    PresentationType::from_code(code)
        .ok_or_else(|| ReviewError::InvalidInput(format!("unknown presentation type '{code}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use prohibition_review::config::VipsConfig;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;
    use tower::ServiceExt;

    fn vips_client(root: String) -> Arc<VipsClient> {
        let client = VipsClient::new(VipsConfig {
            api_root_url: root,
            username: "username".to_string(),
            password: "password".to_string(),
            timeout: Duration::from_secs(5),
        })
        .expect("client builds");
        Arc::new(client)
    }

    fn app_state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        }
    }

    fn morning(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn review_window_endpoint_returns_bounds_and_days() {
        let request = ReviewWindowRequest {
            prohibition_type: "IRP".to_string(),
            service_date: NaiveDate::from_ymd_opt(2020, 9, 1).unwrap(),
            today: Some(morning(2020, 9, 1)),
        };

        let Json(body) = review_window_endpoint(Json(request))
            .await
            .expect("window computed");

        assert_eq!(
            body.minimum_date.date_naive(),
            NaiveDate::from_ymd_opt(2020, 9, 7).unwrap()
        );
        assert_eq!(
            body.maximum_date.date_naive(),
            NaiveDate::from_ymd_opt(2020, 9, 17).unwrap()
        );
        assert_eq!(body.review_days.len(), 9);
    }

    #[tokio::test]
    async fn amount_due_reports_missing_fee() {
        let written = amount_due_endpoint(Json(AmountDueRequest {
            prohibition_type: "UL".to_string(),
            presentation_type: "ORAL".to_string(),
        }))
        .await
        .expect("fee computed");
        assert_eq!(written.0.amount_due, 50);
        assert!(written.0.fee_applicable);

        let unmatched = amount_due_endpoint(Json(AmountDueRequest {
            prohibition_type: "ADP".to_string(),
            presentation_type: "VIDEO".to_string(),
        }))
        .await
        .expect("fee computed");
        assert_eq!(unmatched.0.amount_due, 0);
        assert!(!unmatched.0.fee_applicable);
    }

    #[tokio::test]
    async fn unknown_prohibition_type_is_bad_request() {
        let app = review_routes(vips_client("http://localhost".to_string()));
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/prohibitions/amount-due")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"prohibition_type": "XX", "presentation_type": "WRIT"}"#,
            ))
            .expect("request builds");

        let response = app.oneshot(request).await.expect("router responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("body readable");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert!(body["error"].as_str().unwrap_or_default().contains("XX"));
    }

    #[tokio::test]
    async fn friendly_times_filter_by_presentation() {
        let request = FriendlyTimesRequest {
            presentation_type: "WRIT".to_string(),
            time_slots: vec![
                ScheduleSlot {
                    review_start_dtm: "2020-09-04 09:00:00 -07:00".to_string(),
                    review_end_dtm: "2020-09-04 09:30:00 -07:00".to_string(),
                    available: true,
                    presentation_type: Some(PresentationType::Oral),
                },
                ScheduleSlot {
                    review_start_dtm: "2020-09-04 10:00:00 -07:00".to_string(),
                    review_end_dtm: "2020-09-04 10:30:00 -07:00".to_string(),
                    available: true,
                    presentation_type: None,
                },
            ],
        };

        let Json(body) = friendly_times_endpoint(Json(request))
            .await
            .expect("slots formatted");

        assert_eq!(body.time_slots.len(), 1);
        assert_eq!(
            body.time_slots[0].label,
            "Fri, Sep 4, 2020 - 10:00AM to 10:30AM"
        );
    }

    #[tokio::test]
    async fn malformed_caller_slots_are_bad_request() {
        let request = FriendlyTimesRequest {
            presentation_type: "ORAL".to_string(),
            time_slots: vec![ScheduleSlot {
                review_start_dtm: "Friday morning".to_string(),
                review_end_dtm: "2020-09-04 09:30:00 -07:00".to_string(),
                available: true,
                presentation_type: None,
            }],
        };

        let error = friendly_times_endpoint(Json(request))
            .await
            .expect_err("bad timestamp rejected");

        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oral_review_is_refused_for_unlicenced_drivers() {
        let request = ReviewSlotsRequest {
            prohibition_type: "UL".to_string(),
            service_date: NaiveDate::from_ymd_opt(2020, 9, 1).unwrap(),
            presentation_type: "ORAL".to_string(),
            today: Some(morning(2020, 9, 1)),
            correlation_id: None,
        };

        let error = review_slots_endpoint(
            Extension(vips_client("http://localhost".to_string())),
            Json(request),
        )
        .await
        .expect_err("oral UL review rejected");

        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn review_slots_endpoint_collects_vips_availability() {
        let mut server = mockito::Server::new_async().await;
        let empty_days = server
            .mock(
                "GET",
                mockito::Matcher::Regex(
                    r"^/ADP/WRIT/2020-09-(0[7-9]|1[0-7])/review/availableTimeSlot/req-1$"
                        .to_string(),
                ),
            )
            .with_status(200)
            .with_body(r#"{"resp": "success", "data": {"timeSlots": []}}"#)
            .expect(9)
            .create_async()
            .await;

        let request = ReviewSlotsRequest {
            prohibition_type: "ADP".to_string(),
            service_date: NaiveDate::from_ymd_opt(2020, 9, 1).unwrap(),
            presentation_type: "WRIT".to_string(),
            today: Some(morning(2020, 9, 1)),
            correlation_id: Some("req-1".to_string()),
        };

        let Json(body) = review_slots_endpoint(Extension(vips_client(server.url())), Json(request))
            .await
            .expect("slots gathered");

        empty_days.assert_async().await;
        assert!(body.time_slots.is_empty());
    }

    #[test]
    fn generated_correlation_ids_follow_the_clock() {
        let first = generate_correlation_id();
        std::thread::sleep(Duration::from_millis(2));
        let second = generate_correlation_id();

        assert_eq!(first.len(), 20);
        assert!(first.bytes().all(|b| b.is_ascii_digit()));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let starting = readiness_endpoint(Extension(app_state(false)))
            .await
            .into_response();
        assert_eq!(starting.status(), StatusCode::SERVICE_UNAVAILABLE);

        let ready = readiness_endpoint(Extension(app_state(true)))
            .await
            .into_response();
        assert_eq!(ready.status(), StatusCode::OK);
    }
}
