use serde::{Deserialize, Serialize};

use crate::models::booking::SubmissionStatus;
use crate::models::form::{FieldErrors, FieldValues};

// Body of a field update
#[derive(Debug, Deserialize)]
pub struct UpdateFieldRequest {
    #[serde(default)]
    pub value: String,
}

// Everything the UI needs to render a form session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub values: FieldValues,
    pub errors: FieldErrors,
    pub status: SubmissionStatus,
    pub action_label: String,
}

// Response structure for the submit endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
    pub errors: FieldErrors,
    pub status: SubmissionStatus,
}
