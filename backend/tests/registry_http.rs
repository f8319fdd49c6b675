//! End-to-end behaviour of the assembled application over the in-memory
//! store: JSON API, error envelopes, HTML pages, and health endpoints.

use std::sync::Arc;
use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web};
use argon2::Params;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use registry::domain::TRACE_ID_HEADER;
use registry::inbound::http::error::GENERIC_MESSAGE;
use registry::inbound::http::health::HealthState;
use registry::inbound::http::pages::{ERR_LOADING_PAGE, PageRenderer};
use registry::outbound::hashing::Argon2Hasher;
use registry::outbound::memory::InMemoryStore;
use registry::server::{AppDependencies, build_app, build_http_state};

struct Harness {
    store: InMemoryStore,
    deps: AppDependencies,
}

#[fixture]
fn harness() -> Harness {
    let store = InMemoryStore::default();
    let hasher =
        Argon2Hasher::with_costs(Params::MIN_M_COST, 1, 1).expect("cheap argon2 params are valid");
    let http_state = build_http_state(
        Arc::new(store.clone()),
        Arc::new(hasher),
        Duration::from_secs(5),
    );
    let health_state = web::Data::new(HealthState::new(Arc::new(store.clone())));
    health_state.mark_serving();
    let deps = AppDependencies {
        health_state,
        http_state: web::Data::new(http_state),
        pages: web::Data::new(PageRenderer::new("registry").expect("templates compile")),
    };
    Harness { store, deps }
}

/// Status, trace-id header, and JSON body (`null` when empty) of `res`.
async fn inspect<B: MessageBody>(res: ServiceResponse<B>) -> (StatusCode, Option<String>, Value) {
    let status = res.status();
    let trace = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body = actix_test::read_body(res).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, trace, json)
}

fn mario() -> Value {
    json!({
        "name": "Mario",
        "surname": "Rossi",
        "email": "mario@example.it",
        "password": "segreto",
        "phone": 3_331_234_567_i64,
    })
}

#[rstest]
#[actix_web::test]
async fn user_lifecycle_over_the_api(harness: Harness) {
    let app = actix_test::init_service(build_app(harness.deps)).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(mario())
        .to_request();
    let (status, _, created) = inspect(actix_test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created.get("password").is_none());
    let id = created["id"].as_i64().expect("numeric id");

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/users?page=1&limit=10")
        .to_request();
    let (status, _, list) = inspect(actix_test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total_results"], 1);
    assert_eq!(list["data"][0]["email"], "mario@example.it");

    let req = actix_test::TestRequest::patch()
        .uri(&format!("/api/v1/users/{id}"))
        .set_json(json!({ "surname": "Bianchi" }))
        .to_request();
    let (status, _, updated) = inspect(actix_test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["surname"], "Bianchi");
    assert_eq!(updated["name"], "Mario");

    let req = actix_test::TestRequest::delete()
        .uri(&format!("/api/v1/users/{id}"))
        .to_request();
    let (status, _, _) = inspect(actix_test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/users/{id}"))
        .to_request();
    let (status, trace, body) = inspect(actix_test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["message"], "User not found");
    let trace = trace.expect("trace id header on errors");
    assert_eq!(body["details"]["traceId"], trace.as_str());
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_is_a_conflict(harness: Harness) {
    let app = actix_test::init_service(build_app(harness.deps)).await;
    let create = || {
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(mario())
    };

    let req = create().to_request();
    let (status, _, _) = inspect(actix_test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::CREATED);
    let req = create().to_request();
    let (status, _, body) = inspect(actix_test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
    assert_eq!(body["message"], "Email already in use");
    assert_eq!(harness.store.users().len(), 1);
}

#[rstest]
#[case(json!({ "name": "", "surname": "Rossi", "email": "m@example.it", "password": "x", "phone": 1 }), "Name is required")]
#[case(json!({ "name": "Mario", "surname": "Rossi", "email": "not-an-email", "password": "x", "phone": 1 }), "Email is invalid")]
#[case(json!({ "name": "Mario", "surname": "Rossi", "email": "m@example.it", "password": "x", "phone": 0 }), "Phone is required")]
#[actix_web::test]
async fn invalid_input_is_rejected_with_the_first_failure(
    harness: Harness,
    #[case] payload: Value,
    #[case] message: &str,
) {
    let app = actix_test::init_service(build_app(harness.deps)).await;
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(payload)
        .to_request();
    let (status, _, body) = inspect(actix_test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid");
    assert_eq!(body["message"], message);
    assert!(harness.store.users().is_empty());
}

#[rstest]
#[actix_web::test]
async fn malformed_json_uses_the_error_envelope(harness: Harness) {
    let app = actix_test::init_service(build_app(harness.deps)).await;
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let (status, _, body) = inspect(actix_test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid");
}

#[rstest]
#[actix_web::test]
async fn storage_failures_hide_operator_detail(harness: Harness) {
    let app = actix_test::init_service(build_app(harness.deps)).await;
    harness.store.fail_next_begin("connection refused");

    let req = actix_test::TestRequest::get().uri("/api/v1/users").to_request();
    let (status, _, body) = inspect(actix_test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "internal");
    assert_eq!(body["message"], GENERIC_MESSAGE);
}

#[rstest]
#[actix_web::test]
async fn admins_start_active_and_can_be_deactivated(harness: Harness) {
    let app = actix_test::init_service(build_app(harness.deps)).await;
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/admins")
        .set_json(json!({
            "name": "Anna",
            "surname": "Verdi",
            "email": "anna@example.it",
            "password": "segreto",
        }))
        .to_request();
    let (status, _, created) = inspect(actix_test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["active"], true);
    let id = created["id"].as_i64().expect("numeric id");

    let req = actix_test::TestRequest::patch()
        .uri(&format!("/api/v1/admins/{id}"))
        .set_json(json!({ "active": false }))
        .to_request();
    let (status, _, updated) = inspect(actix_test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["active"], false);
    assert!(!harness.store.admins()[0].active);
}

#[rstest]
#[actix_web::test]
async fn registration_form_lists_registered_users(harness: Harness) {
    let app = actix_test::init_service(build_app(harness.deps)).await;
    let form = [
        ("name", "Mario"),
        ("surname", "Rossi"),
        ("email", "mario@example.it"),
        ("password", "segreto"),
        ("phone", "3331234567"),
    ];

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/lista")
            .set_form(form)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let page = String::from_utf8(actix_test::read_body(res).await.to_vec()).expect("utf8");
    assert!(page.contains("mario@example.it"));

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/lista")
            .set_form(form)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let page = actix_test::read_body(res).await;
    assert_eq!(page.as_ref(), ERR_LOADING_PAGE.as_bytes());
}

#[rstest]
#[actix_web::test]
async fn health_endpoints_are_served_alongside_the_api(harness: Harness) {
    let app = actix_test::init_service(build_app(harness.deps)).await;
    let req = actix_test::TestRequest::get().uri("/health/ready").to_request();
    let (status, _, _) = inspect(actix_test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    let req = actix_test::TestRequest::get().uri("/health/live").to_request();
    let (status, _, _) = inspect(actix_test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
}
