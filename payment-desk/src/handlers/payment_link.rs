use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use service_core::error::AppError;
use service_core::middleware::tracing::RequestId;
use uuid::Uuid;

use crate::models::PaymentLink;
use crate::services::PaymentLinkForm;
use crate::AppState;

/// Create a hosted payment link. Fields left out of the body are taken from the
/// session's last successful lookup.
pub async fn create_payment_link(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Extension(request_id): Extension<RequestId>,
    Json(form): Json<PaymentLinkForm>,
) -> Result<(StatusCode, Json<PaymentLink>), AppError> {
    let link = state
        .desk
        .create_payment_link(session_id, form, Some(request_id.as_str()))
        .await?;

    tracing::info!(
        session_id = %session_id,
        external_id = %link.external_id,
        "Payment link created"
    );
    Ok((StatusCode::CREATED, Json(link)))
}
