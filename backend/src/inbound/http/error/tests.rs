//! Tests for HTTP error mapping.

use super::*;
use crate::domain::{ALL_ERROR_KINDS, Error};
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::rstest;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[rstest]
#[case(ErrorKind::Conflict, StatusCode::CONFLICT)]
#[case(ErrorKind::Forbidden, StatusCode::FORBIDDEN)]
#[case(ErrorKind::Invalid, StatusCode::BAD_REQUEST)]
#[case(ErrorKind::NotFound, StatusCode::NOT_FOUND)]
#[case(ErrorKind::NotImplemented, StatusCode::NOT_IMPLEMENTED)]
#[case(ErrorKind::Unauthorized, StatusCode::UNAUTHORIZED)]
#[case(ErrorKind::NotAuthenticated, StatusCode::UNAUTHORIZED)]
#[case(ErrorKind::ShouldLogout, StatusCode::UNAUTHORIZED)]
#[case(ErrorKind::Internal, StatusCode::INTERNAL_SERVER_ERROR)]
#[case(ErrorKind::Unavailable, StatusCode::SERVICE_UNAVAILABLE)]
#[case(ErrorKind::Canceled, StatusCode::INTERNAL_SERVER_ERROR)]
#[case(ErrorKind::Exists, StatusCode::INTERNAL_SERVER_ERROR)]
#[case(ErrorKind::EmailAlreadyInUse, StatusCode::INTERNAL_SERVER_ERROR)]
#[case(ErrorKind::InternalInvalid, StatusCode::INTERNAL_SERVER_ERROR)]
fn status_table(#[case] kind: ErrorKind, #[case] status: StatusCode) {
    assert_eq!(status_for(kind), status);
}

#[test]
fn every_kind_maps_to_an_error_status() {
    for kind in ALL_ERROR_KINDS {
        let status = status_for(kind);
        assert!(status.is_client_error() || status.is_server_error(), "{kind}");
    }
}

#[rstest]
#[case(Error::internal("pq: relation users does not exist"), GENERIC_MESSAGE)]
#[case(Error::new(ErrorKind::Unknown, "mystery"), GENERIC_MESSAGE)]
#[case(Error::not_found(""), GENERIC_MESSAGE)]
#[case(Error::not_found("User not found"), "User not found")]
#[case(Error::conflict("Email already in use"), "Email already in use")]
fn external_message_hides_internal_detail(#[case] err: Error, #[case] expected: &str) {
    assert_eq!(external_message(&err), expected);
}

async fn envelope_of(err: &Error) -> (StatusCode, Option<String>, ErrorEnvelope) {
    let response = ResponseError::error_response(err);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let envelope = serde_json::from_slice(&bytes).expect("envelope JSON");
    (status, header, envelope)
}

#[actix_web::test]
async fn not_found_envelope() {
    let (status, header, envelope) =
        envelope_of(&Error::not_found("User not found").with_trace_id(TRACE_ID)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(envelope.code, ErrorKind::NotFound);
    assert_eq!(envelope.message, "User not found");
    assert_eq!(envelope.details, json!({ "traceId": TRACE_ID }));
}

#[actix_web::test]
async fn internal_envelope_is_redacted() {
    let err = Error::internal("Error querying users: password authentication failed");
    let (status, header, envelope) = envelope_of(&err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(header.is_none());
    assert_eq!(envelope.code, ErrorKind::Internal);
    assert_eq!(envelope.message, GENERIC_MESSAGE);
    assert_eq!(envelope.details, Value::Null);
}

#[actix_web::test]
async fn conflict_envelope_uses_wire_code() {
    let response = ResponseError::error_response(&Error::conflict("Email already in use"));
    let bytes = to_bytes(response.into_body()).await.expect("body");
    let value: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(value["code"], "conflict");
    assert_eq!(value["message"], "Email already in use");
}

#[tokio::test]
async fn expired_deadline_is_canceled() {
    let err = with_deadline(Duration::from_millis(5), async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok::<_, Error>(())
    })
    .await
    .expect_err("deadline expires");
    assert_eq!(err.kind(), ErrorKind::Canceled);
}

#[tokio::test]
async fn deadline_passes_through_results() {
    let value = with_deadline(Duration::from_secs(1), async { Ok::<_, Error>(3) })
        .await
        .expect("in time");
    assert_eq!(value, 3);
}
