use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

use crate::client::{BookingClient, BookingError, MockBookingClient};
use crate::models::booking::{BookingConfirmation, BookingRequest};

/// Booking client that parks every call until released, so tests can act
/// while a submission is in flight.
pub struct GatedBookingClient {
    booking_id: String,
    calls: AtomicUsize,
    requests: Mutex<Vec<BookingRequest>>,
    started: Notify,
    release: Notify,
}

impl GatedBookingClient {
    pub fn new(booking_id: &str) -> Self {
        Self {
            booking_id: booking_id.to_string(),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            started: Notify::new(),
            release: Notify::new(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<BookingRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Wait until a call has reached the client.
    pub async fn wait_for_call(&self) {
        self.started.notified().await;
    }

    /// Let the parked call complete.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl BookingClient for GatedBookingClient {
    async fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, BookingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.started.notify_one();
        self.release.notified().await;

        Ok(BookingConfirmation {
            booking_id: self.booking_id.clone(),
        })
    }
}

// Mock client that confirms every booking with the given id
pub fn setup_mock_client(booking_id: &str) -> MockBookingClient {
    let booking_id = booking_id.to_string();
    let mut mock_client = MockBookingClient::new();

    mock_client
        .expect_create_booking()
        .returning(move |_request| {
            Ok(BookingConfirmation {
                booking_id: booking_id.clone(),
            })
        });

    mock_client
}

// Mock client that declines every booking with the given message
pub fn setup_declining_client(message: Option<&str>) -> MockBookingClient {
    let message = message.map(str::to_string);
    let mut mock_client = MockBookingClient::new();

    mock_client
        .expect_create_booking()
        .returning(move |_request| {
            Err(BookingError::Declined {
                message: message.clone(),
            })
        });

    mock_client
}

/// A real `reqwest::Error`, produced without touching the network.
pub async fn transport_error() -> reqwest::Error {
    reqwest::Client::new()
        .get("not a url")
        .send()
        .await
        .unwrap_err()
}
