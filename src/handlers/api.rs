use axum::{
    extract::{Json as ExtractJson, Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::booking::BookingContext;
use crate::models::common::{SessionSnapshot, SubmitResponse, UpdateFieldRequest};
use crate::models::form::{FieldDescriptor, FieldErrors, FieldName};
use crate::services::session::SessionStore;
use crate::services::submission::{SubmissionController, SubmitOutcome};

pub const INVALID_FORM_NOTICE: &str = "Please fix the errors in the form";
pub const CONFIRMED_NOTICE: &str = "Booking confirmed!";
pub const IN_FLIGHT_NOTICE: &str = "A booking is already being processed";
pub const INVALID_DATES_NOTICE: &str = "Check-out date must be after check-in date";

// AppState struct containing shared resources
pub struct AppState {
    pub sessions: SessionStore,
    pub controller: SubmissionController,
    pub confirmation_path_prefix: String,
}

// Field descriptors for rendering the form
pub async fn list_form_fields() -> Json<Vec<FieldDescriptor>> {
    Json(FieldName::ALL.into_iter().map(FieldDescriptor::from).collect())
}

// Open a new form session
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<SessionSnapshot>), StatusCode> {
    let session = state.sessions.create().map_err(|e| {
        warn!("Could not open a form session: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    Ok((StatusCode::CREATED, Json(session.snapshot())))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSnapshot>, StatusCode> {
    let session = state.sessions.get(&session_id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(session.snapshot()))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> StatusCode {
    if state.sessions.remove(&session_id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

// Apply one keystroke update to a field
pub async fn update_field(
    State(state): State<Arc<AppState>>,
    Path((session_id, field)): Path<(String, String)>,
    ExtractJson(update): ExtractJson<UpdateFieldRequest>,
) -> Result<Json<SessionSnapshot>, StatusCode> {
    let session = state.sessions.get(&session_id).ok_or(StatusCode::NOT_FOUND)?;

    let name = field.parse::<FieldName>().map_err(|e| {
        warn!("Rejected field update for session {}: {}", session_id, e);
        StatusCode::BAD_REQUEST
    })?;

    session.update_field(name, &update.value);
    Ok(Json(session.snapshot()))
}

// Validate and submit the booking
pub async fn submit_booking(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    ExtractJson(context): ExtractJson<BookingContext>,
) -> Result<(StatusCode, Json<SubmitResponse>), StatusCode> {
    let session = state.sessions.get(&session_id).ok_or(StatusCode::NOT_FOUND)?;

    info!(
        "Received submit for session {} (property {})",
        session_id, context.property_id
    );

    if context.check_out_date <= context.check_in_date {
        warn!(
            "Rejected submit for session {}: check-out {} is not after check-in {}",
            session_id, context.check_out_date, context.check_in_date
        );
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(SubmitResponse {
                success: false,
                message: INVALID_DATES_NOTICE.to_string(),
                booking_id: None,
                redirect_to: None,
                errors: FieldErrors::new(),
                status: session.status(),
            }),
        ));
    }

    let outcome = state.controller.submit(&session, context).await;
    let status = session.status();

    let (code, response) = match outcome {
        SubmitOutcome::Invalid(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            SubmitResponse {
                success: false,
                message: INVALID_FORM_NOTICE.to_string(),
                booking_id: None,
                redirect_to: None,
                errors,
                status,
            },
        ),
        SubmitOutcome::InFlight => (
            StatusCode::CONFLICT,
            SubmitResponse {
                success: false,
                message: IN_FLIGHT_NOTICE.to_string(),
                booking_id: None,
                redirect_to: None,
                errors: FieldErrors::new(),
                status,
            },
        ),
        SubmitOutcome::Succeeded { booking_id } => (
            StatusCode::OK,
            SubmitResponse {
                success: true,
                message: CONFIRMED_NOTICE.to_string(),
                redirect_to: Some(format!(
                    "{}/{}",
                    state.confirmation_path_prefix, booking_id
                )),
                booking_id: Some(booking_id),
                errors: FieldErrors::new(),
                status,
            },
        ),
        SubmitOutcome::Failed { message } => (
            StatusCode::BAD_GATEWAY,
            SubmitResponse {
                success: false,
                message,
                booking_id: None,
                redirect_to: None,
                errors: FieldErrors::new(),
                status,
            },
        ),
    };

    Ok((code, Json(response)))
}
