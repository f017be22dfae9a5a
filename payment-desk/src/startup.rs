//! Router assembly and server lifecycle.

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::handlers::{
    app::{health_check, readiness_check},
    lookup::lookup_booking,
    metrics::metrics,
    payment_link::create_payment_link,
    sessions::{create_session, delete_session, get_session, reset_session},
};
use crate::services::{BookingClient, PaymentDesk, PaymentLinkClient};
use crate::session::SessionStore;
use crate::AppState;

pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics))
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session).delete(delete_session))
        .route("/sessions/:id/reset", post(reset_session))
        .route("/sessions/:id/lookup", post(lookup_booking))
        .route("/sessions/:id/payment-link", post(create_payment_link))
        .route_layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Wraps the trace layer so spans and handlers see the request id.
        .layer(from_fn(request_id_middleware))
        .with_state(state);

    if allowed_origins.is_empty() {
        return router;
    }

    let origins = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<HeaderValue>>();

    router.layer(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                header::HeaderName::from_static(REQUEST_ID_HEADER),
            ])
            .expose_headers([header::HeaderName::from_static(REQUEST_ID_HEADER)]),
    )
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Wire clients and the session store, then bind the listener (port 0 picks a free
    /// port).
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        let bookings = BookingClient::new(settings.booking_api.clone());
        let payment_links = PaymentLinkClient::new(settings.payment_link_api.clone());
        let sessions = SessionStore::new(chrono::Duration::minutes(i64::from(
            settings.session.idle_timeout_minutes,
        )));

        tracing::info!(
            booking_api = %bookings.base_url(),
            payment_link_api = %settings.payment_link_api.base_url,
            "Upstream APIs configured"
        );

        let desk = Arc::new(PaymentDesk::new(bookings, payment_links, sessions));
        let router = build_router(AppState::new(desk), &settings.server.allowed_origins);

        let address = format!("{}:{}", settings.server.host, settings.server.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Payment desk listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }
}
