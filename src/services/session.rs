use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::booking::{BookingContext, BookingRequest, SubmissionStatus};
use crate::models::common::SessionSnapshot;
use crate::models::form::{FieldErrors, FieldName, FieldValues};
use crate::services::formatter::format_field;
use crate::services::validator::validate_form;

pub const DEFAULT_MAX_SESSIONS: usize = 10_000;
pub const DEFAULT_SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Debug)]
struct FormState {
    values: FieldValues,
    errors: FieldErrors,
    status: SubmissionStatus,
    last_active: DateTime<Utc>,
}

/// Result of trying to start a submission.
#[derive(Debug)]
pub(crate) enum SubmitGate {
    /// A submission is already in flight.
    InFlight,
    /// Validation failed; the errors have been stored on the session.
    Invalid(FieldErrors),
    /// The session moved to `Submitting`; the request must be dispatched.
    Dispatch(BookingRequest),
}

/// State of one booking form: field values, last validation result and
/// submission status.
///
/// The lock is only held for in-memory updates, never across the booking
/// call, so edits and reads stay available while a submission is in flight.
#[derive(Debug)]
pub struct FormSession {
    id: String,
    state: Mutex<FormState>,
}

impl FormSession {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: Mutex::new(FormState {
                values: FieldValues::default(),
                errors: FieldErrors::new(),
                status: SubmissionStatus::Idle,
                last_active: Utc::now(),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        // Every update leaves the state consistent, so a poisoned lock is still usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Format `raw` for `name`, store it and return the stored value.
    pub fn update_field(&self, name: FieldName, raw: &str) -> String {
        let formatted = format_field(name, raw);
        let mut state = self.lock();
        state.values.set(name, formatted.clone());
        state.last_active = Utc::now();
        formatted
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.lock().last_active
    }

    pub(crate) fn touch(&self) {
        self.lock().last_active = Utc::now();
    }

    // Idle sessions expire, but never while a booking is in flight
    fn is_expired(&self, now: DateTime<Utc>, idle_timeout: Duration) -> bool {
        let state = self.lock();
        if state.status.is_submitting() {
            return false;
        }
        now.signed_duration_since(state.last_active)
            .to_std()
            .map_or(false, |idle| idle > idle_timeout)
    }

    pub fn values(&self) -> FieldValues {
        self.lock().values.clone()
    }

    pub fn errors(&self) -> FieldErrors {
        self.lock().errors.clone()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.lock().status.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        SessionSnapshot {
            session_id: self.id.clone(),
            values: state.values.clone(),
            errors: state.errors.clone(),
            status: state.status.clone(),
            action_label: state.status.action_label().to_string(),
        }
    }

    /// Validate and, if the form is valid, move to `Submitting`.
    ///
    /// The in-flight check, validation and transition happen under one lock so
    /// two concurrent callers can never both get `Dispatch`.
    pub(crate) fn begin_submission(&self, context: BookingContext) -> SubmitGate {
        let mut state = self.lock();

        if state.status.is_submitting() {
            debug!("Session {} already has a submission in flight", self.id);
            return SubmitGate::InFlight;
        }

        let errors = validate_form(&state.values);
        state.errors = errors.clone();

        if !errors.is_empty() {
            debug!(
                "Session {} failed validation with {} errors",
                self.id,
                errors.len()
            );
            return SubmitGate::Invalid(errors);
        }

        state.status = SubmissionStatus::Submitting;
        state.last_active = Utc::now();
        SubmitGate::Dispatch(BookingRequest::new(&state.values, context))
    }

    /// Record the outcome of the dispatched submission.
    pub(crate) fn finish_submission(&self, status: SubmissionStatus) {
        let mut state = self.lock();
        debug_assert!(state.status.is_submitting());
        debug_assert!(status.is_terminal());
        state.status = status;
        state.last_active = Utc::now();
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionStoreError {
    #[error("session limit of {limit} reached")]
    Full { limit: usize },
}

/// In-memory registry of open form sessions.
///
/// Sessions idle for longer than `idle_timeout` are swept whenever a new one
/// is opened, and at most `max_sessions` are held at once.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Arc<FormSession>>>,
    max_sessions: usize,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(max_sessions: usize, idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_sessions,
            idle_timeout,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<FormSession>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a new, empty session under a fresh random id.
    pub fn create(&self) -> Result<Arc<FormSession>, SessionStoreError> {
        let mut sessions = self.lock();
        self.sweep_locked(&mut sessions, Utc::now());

        if sessions.len() >= self.max_sessions {
            warn!(
                "Refusing to open a session: {} sessions already open",
                sessions.len()
            );
            return Err(SessionStoreError::Full {
                limit: self.max_sessions,
            });
        }

        let id = loop {
            let candidate = generate_session_id();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };

        let session = Arc::new(FormSession::new(id.clone()));
        sessions.insert(id.clone(), Arc::clone(&session));
        info!("Opened booking form session {}", id);

        Ok(session)
    }

    /// Look up a session and mark it active.
    pub fn get(&self, id: &str) -> Option<Arc<FormSession>> {
        let session = self.lock().get(id).cloned()?;
        session.touch();
        Some(session)
    }

    pub fn remove(&self, id: &str) -> bool {
        let removed = self.lock().remove(id).is_some();
        if removed {
            info!("Closed booking form session {}", id);
        }
        removed
    }

    /// Drop every session that has been idle for longer than the idle
    /// timeout as of `now`. Returns how many were dropped.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.lock();
        self.sweep_locked(&mut sessions, now)
    }

    fn sweep_locked(
        &self,
        sessions: &mut HashMap<String, Arc<FormSession>>,
        now: DateTime<Utc>,
    ) -> usize {
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, self.idle_timeout));
        let expired = before - sessions.len();
        if expired > 0 {
            info!("Expired {} idle booking form sessions", expired);
        }
        expired
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

fn generate_session_id() -> String {
    format!("{:016x}", rand::random::<u64>())
}
