use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handlers::api::{
    create_session, delete_session, get_session, list_form_fields, submit_booking, update_field,
    AppState,
};
use crate::handlers::health::health_check;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let health_route = Router::new().route("/health", get(health_check));

    let form_routes = Router::new()
        .route("/form/fields", get(list_form_fields))
        .route("/sessions", post(create_session))
        .route("/sessions/:session_id", get(get_session).delete(delete_session))
        .route("/sessions/:session_id/fields/:field", put(update_field))
        .route("/sessions/:session_id/submit", post(submit_booking));

    Router::new()
        .merge(health_route)
        .merge(form_routes)
        .with_state(app_state)
}
