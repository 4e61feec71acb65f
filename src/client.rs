use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::models::booking::{BookingConfirmation, BookingRequest, GENERIC_FAILURE_MESSAGE};

/// Why the bookings API did not confirm a booking.
#[derive(Debug, Error)]
pub enum BookingError {
    /// The API answered but refused the booking (`success: false`).
    #[error("booking declined: {}", .message.as_deref().unwrap_or("no reason given"))]
    Declined { message: Option<String> },

    /// The API answered with a non-success HTTP status.
    #[error("bookings API returned status {status}")]
    Rejected { status: u16, message: Option<String> },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl BookingError {
    /// Message suitable for showing to the person filling in the form.
    pub fn user_message(&self) -> String {
        let carried = match self {
            BookingError::Declined { message } | BookingError::Rejected { message, .. } => {
                message.as_deref()
            }
            BookingError::Transport(_) => None,
        };

        carried
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .unwrap_or(GENERIC_FAILURE_MESSAGE)
            .to_string()
    }
}

/// The service that persists a booking and returns its identifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingClient: Send + Sync {
    async fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, BookingError>;
}

// Body returned by POST /api/bookings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBookingResponse {
    #[serde(default)]
    success: bool,
    booking_id: Option<String>,
    message: Option<String>,
}

/// Client for the remote bookings API
pub struct BookingApiClient {
    client: Client,
    endpoint: String,
}

impl BookingApiClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.booking_api_endpoint.clone(), config.booking_api_timeout)
    }

    fn bookings_url(&self) -> String {
        format!("{}/api/bookings", self.endpoint)
    }
}

#[async_trait]
impl BookingClient for BookingApiClient {
    async fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, BookingError> {
        let url = self.bookings_url();

        info!("Creating booking for property {}", request.property_id);
        debug!("API URL: {}", url);

        let res = self.client.post(&url).json(request).send().await?;
        let status = res.status();
        info!("Response received with status: {}", status);

        if !status.is_success() {
            // The error body may still carry a message worth showing
            let message = res
                .json::<CreateBookingResponse>()
                .await
                .ok()
                .and_then(|body| body.message);
            warn!("Bookings API rejected request with status {}", status);
            return Err(BookingError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body = res.json::<CreateBookingResponse>().await?;

        match (body.success, body.booking_id) {
            (true, Some(booking_id)) => Ok(BookingConfirmation { booking_id }),
            (true, None) => {
                warn!("Bookings API reported success without a booking id");
                Err(BookingError::Declined { message: None })
            }
            (false, _) => Err(BookingError::Declined {
                message: body.message,
            }),
        }
    }
}


#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;
