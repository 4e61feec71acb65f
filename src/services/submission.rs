use std::sync::Arc;
use tracing::{error, info, warn};

use crate::client::BookingClient;
use crate::models::booking::{BookingContext, SubmissionStatus, GENERIC_FAILURE_MESSAGE};
use crate::models::form::FieldErrors;
use crate::services::session::{FormSession, SubmitGate};

/// What a call to [`SubmissionController::submit`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The form did not validate; nothing was sent.
    Invalid(FieldErrors),
    /// Another submission for the same session is still running; ignored.
    InFlight,
    Succeeded { booking_id: String },
    Failed { message: String },
}

/// Drives the submit lifecycle of form sessions against a booking collaborator.
#[derive(Clone)]
pub struct SubmissionController {
    client: Arc<dyn BookingClient>,
}

impl SubmissionController {
    pub fn new(client: Arc<dyn BookingClient>) -> Self {
        Self { client }
    }

    /// Validate the session and, if valid, submit it once.
    ///
    /// An invalid form or an in-flight submission returns without contacting
    /// the collaborator. Otherwise the session is `Submitting` until the
    /// collaborator answers, then `Succeeded` or `Failed`. Failures are not
    /// retried.
    ///
    /// The dispatched call runs on its own task, so dropping the returned
    /// future (a request timeout or a client disconnect) does not stop the
    /// session from reaching a terminal status.
    pub async fn submit(
        &self,
        session: &Arc<FormSession>,
        context: BookingContext,
    ) -> SubmitOutcome {
        let request = match session.begin_submission(context) {
            SubmitGate::InFlight => {
                warn!(
                    "Ignoring submit for session {}: submission already in flight",
                    session.id()
                );
                return SubmitOutcome::InFlight;
            }
            SubmitGate::Invalid(errors) => {
                info!(
                    "Submit for session {} rejected: {} invalid fields",
                    session.id(),
                    errors.len()
                );
                return SubmitOutcome::Invalid(errors);
            }
            SubmitGate::Dispatch(request) => request,
        };

        info!(
            "Submitting booking for session {} (property {})",
            session.id(),
            request.property_id
        );

        let client = Arc::clone(&self.client);
        let task_session = Arc::clone(session);
        let task = tokio::spawn(async move {
            let session = task_session;
            let (status, outcome) = match client.create_booking(&request).await {
                Ok(confirmation) => {
                    info!(
                        "Booking {} confirmed for session {}",
                        confirmation.booking_id,
                        session.id()
                    );
                    (
                        SubmissionStatus::Succeeded {
                            booking_id: confirmation.booking_id.clone(),
                        },
                        SubmitOutcome::Succeeded {
                            booking_id: confirmation.booking_id,
                        },
                    )
                }
                Err(err) => {
                    error!("Booking failed for session {}: {}", session.id(), err);
                    let message = err.user_message();
                    (
                        SubmissionStatus::Failed {
                            message: message.clone(),
                        },
                        SubmitOutcome::Failed { message },
                    )
                }
            };

            session.finish_submission(status);
            outcome
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                // The booking task panicked before recording an outcome
                error!("Booking task for session {} failed: {}", session.id(), e);
                let message = GENERIC_FAILURE_MESSAGE.to_string();
                session.finish_submission(SubmissionStatus::Failed {
                    message: message.clone(),
                });
                SubmitOutcome::Failed { message }
            }
        }
    }
}

#[cfg(test)]
#[path = "submission_test.rs"]
mod submission_test;
