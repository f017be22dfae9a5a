//! Failure taxonomy for booking lookups and payment-link creation.

use service_core::error::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DeskError {
    /// User input rejected before any network call.
    #[error("{0}")]
    Validation(String),

    /// The booking API answered but carried no transaction data.
    #[error("{0}")]
    NotFound(String),

    /// The booking API answered with a non-success status or an unreadable body.
    #[error("{0}")]
    LookupFailed(String),

    /// The payment-link API answered with a non-success status or no invoice URL.
    #[error("{0}")]
    PaymentLinkFailed(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Session {0} not found")]
    SessionNotFound(Uuid),

    #[error("A {action} request is already in flight for this session")]
    Busy { action: &'static str },
}

impl DeskError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DeskError::Validation(_) => "validation",
            DeskError::NotFound(_) => "not_found",
            DeskError::LookupFailed(_) => "lookup_failed",
            DeskError::PaymentLinkFailed(_) => "payment_link_failed",
            DeskError::Network(_) => "network",
            DeskError::SessionNotFound(_) => "session_not_found",
            DeskError::Busy { .. } => "busy",
        }
    }
}

impl From<DeskError> for AppError {
    fn from(err: DeskError) -> Self {
        let message = err.to_string();
        match err {
            DeskError::Validation(_) => AppError::BadRequest(anyhow::anyhow!(message)),
            DeskError::NotFound(_) | DeskError::SessionNotFound(_) => {
                AppError::NotFound(anyhow::anyhow!(message))
            }
            DeskError::Busy { .. } => AppError::Conflict(anyhow::anyhow!(message)),
            DeskError::LookupFailed(msg) | DeskError::PaymentLinkFailed(msg) => {
                AppError::BadGateway(msg)
            }
            DeskError::Network(e) => AppError::BadGateway(format!("upstream unreachable: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn maps_to_http_statuses() {
        let cases = [
            (DeskError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DeskError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (DeskError::SessionNotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (DeskError::Busy { action: "lookup" }, StatusCode::CONFLICT),
            (DeskError::LookupFailed("x".into()), StatusCode::BAD_GATEWAY),
            (DeskError::PaymentLinkFailed("x".into()), StatusCode::BAD_GATEWAY),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[test]
    fn transport_failure_is_a_bad_gateway() {
        let transport = reqwest::Client::new()
            .post("not a url")
            .build()
            .unwrap_err();
        let err = DeskError::from(transport);

        assert_eq!(err.kind(), "network");
        assert_eq!(AppError::from(err).status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn busy_message_names_the_action() {
        let err = DeskError::Busy {
            action: "payment link",
        };
        assert_eq!(
            err.to_string(),
            "A payment link request is already in flight for this session"
        );
    }
}
