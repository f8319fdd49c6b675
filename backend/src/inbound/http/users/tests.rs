//! Handler tests for the users API, driven through a mocked service port.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockAdminService, MockUserService};
use crate::domain::{Error, Page, PasswordHash, User};

fn stored_user(id: i64) -> User {
    User {
        id,
        name: "Mario".into(),
        surname: "Rossi".into(),
        email: format!("mario{id}@example.it"),
        password: PasswordHash::new("$argon2id$stub"),
        phone: 3_331_234_567,
    }
}

async fn call(
    users: MockUserService,
    req: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let state = HttpState::new(Arc::new(users), Arc::new(MockAdminService::new()));
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/v1").configure(configure)),
    )
    .await;
    let res = actix_test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let body = actix_test::read_body(res).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

#[actix_web::test]
async fn create_returns_created_without_password() {
    let mut users = MockUserService::new();
    users
        .expect_create()
        .withf(|input| input.email == "mario1@example.it" && input.password.expose() == "pw")
        .times(1)
        .returning(|_| Ok(stored_user(1)));
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(json!({
            "name": "Mario",
            "surname": "Rossi",
            "email": "mario1@example.it",
            "password": "pw",
            "phone": 3_331_234_567_i64,
        }));
    let (status, body) = call(users, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert!(body.get("password").is_none());
}

#[rstest]
#[case(Error::not_found("User not found"), StatusCode::NOT_FOUND, "not_found", "User not found")]
#[case(
    Error::internal("Error querying user: connection refused"),
    StatusCode::INTERNAL_SERVER_ERROR,
    "internal",
    "An error occurred"
)]
#[case(
    Error::internal("Error querying user: canceling statement due to user request"),
    StatusCode::INTERNAL_SERVER_ERROR,
    "canceled",
    "Error querying user: canceling statement due to user request"
)]
#[actix_web::test]
async fn get_maps_service_errors(
    #[case] err: Error,
    #[case] status: StatusCode,
    #[case] code: &str,
    #[case] message: &str,
) {
    let mut users = MockUserService::new();
    users
        .expect_find_by_id()
        .with(eq(42))
        .times(1)
        .return_once(move |_| Err(err));
    let req = actix_test::TestRequest::get().uri("/api/v1/users/42");
    let (actual, body) = call(users, req).await;
    assert_eq!(actual, status);
    assert_eq!(body["code"], code);
    assert_eq!(body["message"], message);
}

#[actix_web::test]
async fn list_wraps_page_in_pagination_envelope() {
    let mut users = MockUserService::new();
    users
        .expect_find_many()
        .withf(|filter| filter.page == 1 && filter.limit == 2 && filter.email.is_none())
        .times(1)
        .returning(|_| Ok(Page::new(vec![stored_user(9), stored_user(8)], 9)));
    let req = actix_test::TestRequest::get().uri("/api/v1/users?page=1&limit=2");
    let (status, body) = call(users, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_results"], 9);
    assert_eq!(body["current_page"], 1);
    assert_eq!(body["items_per_page"], 2);
    assert_eq!(body["data"][0]["id"], 9);
}

#[actix_web::test]
async fn patch_forwards_only_present_fields() {
    let mut users = MockUserService::new();
    users
        .expect_update()
        .withf(|id, update| {
            *id == 3
                && update.surname.value().map(String::as_str) == Some("Bianchi")
                && !update.name.is_set()
                && !update.email.is_set()
                && !update.phone.is_set()
        })
        .times(1)
        .returning(|id, _| {
            Ok(User {
                surname: "Bianchi".into(),
                ..stored_user(id)
            })
        });
    let req = actix_test::TestRequest::patch()
        .uri("/api/v1/users/3")
        .set_json(json!({ "surname": "Bianchi" }));
    let (status, body) = call(users, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["surname"], "Bianchi");
    assert_eq!(body["name"], "Mario");
}

#[actix_web::test]
async fn delete_returns_no_content() {
    let mut users = MockUserService::new();
    users.expect_delete().with(eq(5)).times(1).returning(|_| Ok(()));
    let req = actix_test::TestRequest::delete().uri("/api/v1/users/5");
    let (status, body) = call(users, req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[actix_web::test]
async fn conflict_is_409() {
    let mut users = MockUserService::new();
    users
        .expect_create()
        .returning(|_| Err(Error::conflict("Email already in use")));
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(json!({ "email": "dup@example.it" }));
    let (status, body) = call(users, req).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
}
