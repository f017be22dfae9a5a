use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use service_core::error::AppError;
use service_core::middleware::tracing::RequestId;
use uuid::Uuid;

use crate::session::Lookup;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    #[serde(default, alias = "bookingId")]
    pub booking_id: String,
}

/// Fetch the booking and return its billing summary with the payment-link defaults.
pub async fn lookup_booking(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Extension(request_id): Extension<RequestId>,
    Json(payload): Json<LookupRequest>,
) -> Result<Json<Lookup>, AppError> {
    let lookup = state
        .desk
        .lookup(session_id, &payload.booking_id, Some(request_id.as_str()))
        .await?;
    Ok(Json(lookup))
}
