//! Dashboard Web Server
//!
//! Server-rendered HTML dashboard built with Axum.
//!
//! # Endpoints
//!
//! ## Page
//! - `GET /` - The dashboard
//! - `POST /navigate` - Previous / next day
//! - `POST /entries` - Add a row
//! - `POST /rows/:id/edit` - Edit a row
//! - `POST /rows/:id/save` - Save the edited row
//! - `POST /rows/:id/cancel` - Cancel editing
//! - `GET /rows/:id/delete` - Delete confirmation
//! - `POST /rows/:id/delete` - Delete a row
//! - `POST /language` - Switch language
//!
//! ## API
//! - `GET /api/v1/records?date=YYYY-MM-DD` - Rows of a day as JSON
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use daily_metrics::backend::InMemoryBackend;
//! use daily_metrics::config::Config;
//! use daily_metrics::web::{serve, AppState};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let state = AppState::new(
//!         Arc::new(InMemoryBackend::new()),
//!         config.dashboard.options(None)?,
//!         config.dashboard.language_preference()?,
//!     );
//!     serve(state, &config.server).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;

pub use error::{WebError, WebResult};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route("/", get(routes::dashboard::index))
        .route("/navigate", post(routes::dashboard::navigate))
        .route("/entries", post(routes::dashboard::submit_entry))
        .route("/rows/:id/edit", post(routes::dashboard::edit_row))
        .route("/rows/:id/save", post(routes::dashboard::save_row))
        .route("/rows/:id/cancel", post(routes::dashboard::cancel_row))
        .route(
            "/rows/:id/delete",
            get(routes::dashboard::confirm_delete).post(routes::dashboard::delete_row),
        )
        .route("/language", post(routes::dashboard::set_language));

    let api_routes = Router::new().route("/records", get(routes::records::list_records));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    page_routes
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

/// Start the dashboard server
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<(), WebError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Daily metrics dashboard listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| WebError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Dashboard shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{InMemoryBackend, MetricsBackend, Operation};
    use crate::dashboard::{Dashboard, DashboardOptions};
    use crate::i18n::LanguagePreference;
    use crate::records::{MetricRecord, NewMetricRecord};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tower::util::ServiceExt;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn create_test_app(preference: LanguagePreference) -> (Router, Arc<InMemoryBackend>) {
        let backend = Arc::new(InMemoryBackend::new());
        let dyn_backend: Arc<dyn MetricsBackend> = backend.clone();
        let dashboard = Dashboard::new(dyn_backend, DashboardOptions::default())
            .with_clock(Arc::new(today));
        let state = AppState::with_dashboard(dashboard, preference);
        (build_router(state), backend)
    }

    async fn seed(backend: &InMemoryBackend, visits: u64) -> MetricRecord {
        backend
            .insert(NewMetricRecord {
                website_visits: visits,
                ..NewMetricRecord::zeroed(today())
            })
            .await
            .unwrap()
    }

    async fn get(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_form(app: &Router, uri: &str, body: &str) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn assert_document(html: &str, lang: &str, dir: &str) {
        let start = html.find("<html").unwrap();
        let end = start + html[start..].find('>').unwrap();
        let root = &html[start..end];
        assert!(root.contains(&format!("lang=\"{}\"", lang)));
        assert!(root.contains(&format!("dir=\"{}\"", dir)));
    }

    fn assert_redirect(response: &Response) {
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let (app, backend) = create_test_app(LanguagePreference::default());

        assert_eq!(get(&app, "/health/live").await.status(), StatusCode::OK);
        assert_eq!(get(&app, "/health/ready").await.status(), StatusCode::OK);
        assert_eq!(get(&app, "/health").await.status(), StatusCode::OK);

        backend.fail_next(Operation::Fetch).await;
        assert_eq!(
            get(&app, "/health/ready").await.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_index_renders_arabic_by_default() {
        let (app, _backend) = create_test_app(LanguagePreference::default());

        let response = get(&app, "/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert_document(&html, "ar", "rtl");
        assert!(html.contains("2024-01-01"));
    }

    #[tokio::test]
    async fn test_auto_language_follows_accept_language() {
        let (app, _backend) = create_test_app(LanguagePreference::Auto);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let html = body_text(response).await;
        assert_document(&html, "en", "ltr");
    }

    #[tokio::test]
    async fn test_submit_entry_and_render_row() {
        let (app, backend) = create_test_app(LanguagePreference::default());

        let response = post_form(
            &app,
            "/entries",
            "metric_date=2024-01-01&website_visits=10&app_downloads=5&finished_operations=3&liquidity=12.50",
        )
        .await;
        assert_redirect(&response);

        let rows = backend.fetch_by_date(today()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].liquidity, Decimal::from_str("12.50").unwrap());

        let html = body_text(get(&app, "/").await).await;
        assert!(html.contains(&format!("action=\"/rows/{}/edit\"", rows[0].id)));
        assert!(html.contains("12.50"));
    }

    #[tokio::test]
    async fn test_submit_entry_with_invalid_number_returns_to_page() {
        let (app, backend) = create_test_app(LanguagePreference::default());

        let response = post_form(
            &app,
            "/entries",
            "metric_date=2024-01-01&website_visits=ten&app_downloads=5&finished_operations=3&liquidity=1",
        )
        .await;
        assert_redirect(&response);
        assert!(backend.is_empty().await);

        let response = get(&app, "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("name=\"website_visits\""));
    }

    #[tokio::test]
    async fn test_navigate_changes_viewed_date() {
        let (app, _backend) = create_test_app(LanguagePreference::default());

        assert_redirect(&post_form(&app, "/navigate", "days=-1").await);

        let html = body_text(get(&app, "/").await).await;
        assert!(html.contains("2023-12-31"));
    }

    #[tokio::test]
    async fn test_edit_and_save_row() {
        let (app, backend) = create_test_app(LanguagePreference::default());
        let row = seed(&backend, 10).await;
        get(&app, "/").await;

        let edit = format!("/rows/{}/edit", row.id);
        assert_redirect(&post_form(&app, &edit, "").await);

        let html = body_text(get(&app, "/").await).await;
        assert!(html.contains(&format!("action=\"/rows/{}/save\"", row.id)));

        let save = format!("/rows/{}/save", row.id);
        let response = post_form(
            &app,
            &save,
            "website_visits=15&app_downloads=0&finished_operations=0&liquidity=0",
        )
        .await;
        assert_redirect(&response);

        let rows = backend.fetch_by_date(today()).await.unwrap();
        assert_eq!(rows[0].website_visits, 15);

        let html = body_text(get(&app, "/").await).await;
        assert!(!html.contains(&format!("action=\"/rows/{}/save\"", row.id)));
    }

    #[tokio::test]
    async fn test_save_without_edit_is_conflict() {
        let (app, backend) = create_test_app(LanguagePreference::default());
        let row = seed(&backend, 10).await;
        get(&app, "/").await;

        let save = format!("/rows/{}/save", row.id);
        let response = post_form(
            &app,
            &save,
            "website_visits=15&app_downloads=0&finished_operations=0&liquidity=0",
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_edit_unknown_row_is_not_found() {
        let (app, _backend) = create_test_app(LanguagePreference::default());

        let response = post_form(&app, "/rows/missing/edit", "").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let (app, backend) = create_test_app(LanguagePreference::default());
        let row = seed(&backend, 10).await;
        get(&app, "/").await;

        let uri = format!("/rows/{}/delete", row.id);
        let page = get(&app, &uri).await;
        assert_eq!(page.status(), StatusCode::OK);

        assert_redirect(&post_form(&app, &uri, "confirmed=false").await);
        assert_eq!(backend.len().await, 1);

        assert_redirect(&post_form(&app, &uri, "confirmed=true").await);
        assert!(backend.is_empty().await);
    }

    #[tokio::test]
    async fn test_language_switch() {
        let (app, _backend) = create_test_app(LanguagePreference::Auto);

        assert_redirect(&post_form(&app, "/language", "lang=en").await);

        // An explicit choice beats the browser's header
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ACCEPT_LANGUAGE, "ar")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let html = body_text(response).await;
        assert_document(&html, "en", "ltr");

        let response = post_form(&app, "/language", "lang=fr").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_records_api() {
        let (app, backend) = create_test_app(LanguagePreference::default());
        seed(&backend, 1).await;
        seed(&backend, 2).await;

        let response = get(&app, "/api/v1/records?date=2024-01-01").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["records"][0]["website_visits"], 2);

        let response = get(&app, "/api/v1/records?date=yesterday").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        backend.fail_next(Operation::Fetch).await;
        let response = get(&app, "/api/v1/records?date=2024-01-01").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
