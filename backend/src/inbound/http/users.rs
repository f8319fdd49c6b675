//! Users API handlers.
//!
//! ```text
//! POST   /api/v1/users        {"name":"Mario","surname":"Rossi",...}
//! GET    /api/v1/users?email=mario@example.it&page=1&limit=10
//! GET    /api/v1/users/{id}
//! PATCH  /api/v1/users/{id}   {"surname":"Bianchi"}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};

use super::error::{ApiResult, with_deadline};
use super::listing::PaginateResponse;
use super::state::HttpState;
use crate::domain::{User, UserCreate, UserFilter, UserUpdate};

/// Register a user. Responds `201 Created` with the stored user.
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserCreate>,
) -> ApiResult<HttpResponse> {
    let user = with_deadline(
        state.request_timeout,
        state.users.create(payload.into_inner()),
    )
    .await?;
    Ok(HttpResponse::Created().json(user))
}

/// List users matching the query-string filter.
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<UserFilter>,
) -> ApiResult<web::Json<PaginateResponse<User>>> {
    let filter = query.into_inner();
    let (page, limit) = (filter.page, filter.limit);
    let users = with_deadline(state.request_timeout, state.users.find_many(filter)).await?;
    Ok(web::Json(PaginateResponse::new(users, page, limit)))
}

#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<User>> {
    let id = path.into_inner();
    let user = with_deadline(state.request_timeout, state.users.find_by_id(id)).await?;
    Ok(web::Json(user))
}

/// Apply a partial update. Absent fields are left unchanged.
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UserUpdate>,
) -> ApiResult<web::Json<User>> {
    let id = path.into_inner();
    let user = with_deadline(
        state.request_timeout,
        state.users.update(id, payload.into_inner()),
    )
    .await?;
    Ok(web::Json(user))
}

#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    with_deadline(state.request_timeout, state.users.delete(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register the user routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_user)
        .service(list_users)
        .service(get_user)
        .service(update_user)
        .service(delete_user);
}

#[cfg(test)]
mod tests;
