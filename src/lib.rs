//! Booking Form Service
//!
//! This library implements the checkout form of a property booking flow:
//! keystroke formatting of payment and contact fields, validation of the
//! complete form, and the submission lifecycle against a remote bookings API.
//! It also ships an axum router that exposes form sessions over HTTP.
//!
//! # Modules
//!
//! - `services::formatter`: per-field canonical formatting
//! - `services::validator`: form validation into field errors
//! - `services::session`: form session state and the session store
//! - `services::submission`: `SubmissionController`, the submit state machine
//! - `client`: `BookingClient` trait and the `reqwest` implementation
//! - `config`: environment configuration
//!
//! # Submission
//!
//! A session is `Idle` until a valid form is submitted, `Submitting` while the
//! bookings API is awaited, then `Succeeded` or `Failed`. Invalid forms and
//! repeated submits during an in-flight request never reach the API.

pub mod client;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
mod client_mock;

// Re-export the main API types for ease of use
pub use client::{BookingApiClient, BookingClient, BookingError};
pub use config::{AppConfig, ConfigError};
pub use handlers::api::AppState;
pub use models::booking::{BookingContext, BookingRequest, SubmissionStatus};
pub use models::form::{FieldErrors, FieldName, FieldValues};
pub use routes::create_router;
pub use services::session::{FormSession, SessionStore};
pub use services::submission::{SubmissionController, SubmitOutcome};
