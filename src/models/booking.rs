use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::form::FieldValues;

/// Fallback shown when a failed submission carries no usable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to process booking. Please try again.";

// Context supplied by the caller on submit; not part of the form itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingContext {
    pub property_id: String,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
}

// Payload sent to the bookings API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(flatten)]
    pub values: FieldValues,
    pub property_id: String,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
}

impl BookingRequest {
    pub fn new(values: &FieldValues, context: BookingContext) -> Self {
        Self {
            values: values.clone(),
            property_id: context.property_id,
            check_in_date: context.check_in_date,
            check_out_date: context.check_out_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub booking_id: String,
}

/// Lifecycle of a form submission.
///
/// `Idle` until the first validated submit, `Submitting` while the booking
/// collaborator is awaited, then one of the two terminal states. A new submit
/// from a terminal state goes back to `Submitting`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    #[serde(rename_all = "camelCase")]
    Succeeded { booking_id: String },
    Failed { message: String },
}

impl SubmissionStatus {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionStatus::Submitting)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionStatus::Succeeded { .. } | SubmissionStatus::Failed { .. }
        )
    }

    /// Text for the submit button.
    pub fn action_label(&self) -> &'static str {
        if self.is_submitting() {
            "Processing..."
        } else {
            "Confirm & Pay"
        }
    }
}
