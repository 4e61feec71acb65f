use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::client::MockBookingClient;
use crate::client_mock::{setup_declining_client, setup_mock_client};
use crate::models::booking::SubmissionStatus;
use crate::models::common::{SessionSnapshot, SubmitResponse};
use crate::models::form::FieldName;
use crate::tests::common::fixtures::{submit_body, RAW_VALID_INPUT};
use crate::services::session::{SessionStore, DEFAULT_SESSION_IDLE_TIMEOUT};
use crate::tests::common::test_utils::{create_test_server, create_test_server_with_sessions};

async fn open_session(server: &axum_test::TestServer) -> SessionSnapshot {
    let response = server.post("/sessions").await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<SessionSnapshot>()
}

async fn fill_over_http(server: &axum_test::TestServer, session_id: &str) {
    for (name, raw) in RAW_VALID_INPUT {
        let response = server
            .put(&format!("/sessions/{}/fields/{}", session_id, name))
            .json(&json!({ "value": raw }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_health_check() {
    let (server, _) = create_test_server(Arc::new(MockBookingClient::new()));

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_list_form_fields() {
    let (server, _) = create_test_server(Arc::new(MockBookingClient::new()));

    let fields = server.get("/form/fields").await.json::<Vec<Value>>();

    assert_eq!(fields.len(), 12);
    assert_eq!(fields[0]["name"], "firstName");
    assert_eq!(fields[0]["section"], "Contact Information");
    assert_eq!(fields[4]["name"], "cardNumber");
    assert_eq!(fields[4]["placeholder"], "1234 5678 9012 3456");
    assert_eq!(fields[6]["inputType"], "password");
}

#[tokio::test]
async fn test_create_session_returns_idle_snapshot() {
    let (server, state) = create_test_server(Arc::new(MockBookingClient::new()));

    let snapshot = open_session(&server).await;

    assert_eq!(snapshot.status, SubmissionStatus::Idle);
    assert_eq!(snapshot.action_label, "Confirm & Pay");
    assert!(snapshot.errors.is_empty());
    assert_eq!(snapshot.values.card_number, "");
    assert!(state.sessions.get(&snapshot.session_id).is_some());

    let fetched = server
        .get(&format!("/sessions/{}", snapshot.session_id))
        .await
        .json::<SessionSnapshot>();
    assert_eq!(fetched, snapshot);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let (server, _) = create_test_server(Arc::new(MockBookingClient::new()));

    assert_eq!(
        server.get("/sessions/missing").await.status_code(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        server
            .put("/sessions/missing/fields/cvv")
            .json(&json!({ "value": "123" }))
            .await
            .status_code(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        server
            .post("/sessions/missing/submit")
            .json(&submit_body("prop-1"))
            .await
            .status_code(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        server.delete("/sessions/missing").await.status_code(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_update_field_formats_value() {
    let (server, _) = create_test_server(Arc::new(MockBookingClient::new()));
    let session_id = open_session(&server).await.session_id;

    let snapshot = server
        .put(&format!("/sessions/{}/fields/cardNumber", session_id))
        .json(&json!({ "value": "4242424242424242" }))
        .await
        .json::<SessionSnapshot>();
    assert_eq!(snapshot.values.card_number, "4242 4242 4242 4242");

    let snapshot = server
        .put(&format!("/sessions/{}/fields/cvv", session_id))
        .json(&json!({ "value": "12a3b4c5" }))
        .await
        .json::<SessionSnapshot>();
    assert_eq!(snapshot.values.cvv, "1234");
    assert_eq!(snapshot.values.card_number, "4242 4242 4242 4242");
}

#[tokio::test]
async fn test_update_unknown_field_is_bad_request() {
    let (server, _) = create_test_server(Arc::new(MockBookingClient::new()));
    let session_id = open_session(&server).await.session_id;

    let response = server
        .put(&format!("/sessions/{}/fields/creditCard", session_id))
        .json(&json!({ "value": "4242" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_invalid_form() {
    let mut mock_client = MockBookingClient::new();
    mock_client.expect_create_booking().never();
    let (server, _) = create_test_server(Arc::new(mock_client));
    let session_id = open_session(&server).await.session_id;

    let response = server
        .post(&format!("/sessions/{}/submit", session_id))
        .json(&submit_body("prop-1"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response.json::<SubmitResponse>();
    assert!(!body.success);
    assert_eq!(body.message, "Please fix the errors in the form");
    assert_eq!(body.errors.len(), 12);
    assert_eq!(body.errors.get(FieldName::Cvv), Some("CVV is required"));
    assert_eq!(body.status, SubmissionStatus::Idle);

    // Errors are visible on the session afterwards
    let snapshot = server
        .get(&format!("/sessions/{}", session_id))
        .await
        .json::<SessionSnapshot>();
    assert_eq!(snapshot.errors.len(), 12);
}

#[tokio::test]
async fn test_submit_success() {
    let (server, _) = create_test_server(Arc::new(setup_mock_client("bk_42")));
    let session_id = open_session(&server).await.session_id;
    fill_over_http(&server, &session_id).await;

    let response = server
        .post(&format!("/sessions/{}/submit", session_id))
        .json(&submit_body("prop-1"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body = response.json::<SubmitResponse>();
    assert!(body.success);
    assert_eq!(body.message, "Booking confirmed!");
    assert_eq!(body.booking_id.as_deref(), Some("bk_42"));
    assert_eq!(body.redirect_to.as_deref(), Some("/booking/confirmation/bk_42"));
    assert_eq!(
        body.status,
        SubmissionStatus::Succeeded {
            booking_id: "bk_42".to_string()
        }
    );
}

#[tokio::test]
async fn test_submit_declined() {
    let (server, _) = create_test_server(Arc::new(setup_declining_client(Some(
        "Your card was declined",
    ))));
    let session_id = open_session(&server).await.session_id;
    fill_over_http(&server, &session_id).await;

    let response = server
        .post(&format!("/sessions/{}/submit", session_id))
        .json(&submit_body("prop-1"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);

    let body = response.json::<SubmitResponse>();
    assert!(!body.success);
    assert_eq!(body.message, "Your card was declined");
    assert!(body.booking_id.is_none());
}

#[tokio::test]
async fn test_submit_rejects_inverted_dates() {
    let mut mock_client = MockBookingClient::new();
    mock_client.expect_create_booking().never();
    let (server, _) = create_test_server(Arc::new(mock_client));
    let session_id = open_session(&server).await.session_id;
    fill_over_http(&server, &session_id).await;

    let response = server
        .post(&format!("/sessions/{}/submit", session_id))
        .json(&json!({
            "propertyId": "prop-1",
            "checkInDate": "2035-04-02T15:00:00Z",
            "checkOutDate": "2035-03-30T15:00:00Z",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body = response.json::<SubmitResponse>();
    assert!(!body.success);
    assert_eq!(body.message, "Check-out date must be after check-in date");
    assert!(body.errors.is_empty());
    assert_eq!(body.status, SubmissionStatus::Idle);
}

#[tokio::test]
async fn test_create_session_when_store_is_full() {
    let store = SessionStore::with_limits(1, DEFAULT_SESSION_IDLE_TIMEOUT);
    let (server, state) =
        create_test_server_with_sessions(Arc::new(MockBookingClient::new()), store);
    let session_id = open_session(&server).await.session_id;

    let response = server.post("/sessions").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(state.sessions.len(), 1);

    server.delete(&format!("/sessions/{}", session_id)).await;
    let response = server.post("/sessions").await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_delete_session() {
    let (server, state) = create_test_server(Arc::new(MockBookingClient::new()));
    let session_id = open_session(&server).await.session_id;

    let response = server.delete(&format!("/sessions/{}", session_id)).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    assert!(state.sessions.is_empty());
}
