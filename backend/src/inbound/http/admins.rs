//! Admins API handlers.
//!
//! ```text
//! POST   /api/v1/admins        {"name":"Grace","surname":"Hopper",...}
//! GET    /api/v1/admins?email=grace@example.com&page=1&limit=10
//! GET    /api/v1/admins/{id}
//! PATCH  /api/v1/admins/{id}   {"active":false}
//! DELETE /api/v1/admins/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};

use super::error::{ApiResult, with_deadline};
use super::listing::PaginateResponse;
use super::state::HttpState;
use crate::domain::{Admin, AdminCreate, AdminFilter, AdminUpdate};

/// Register an admin. Responds `201 Created` with the stored admin.
#[post("/admins")]
pub async fn create_admin(
    state: web::Data<HttpState>,
    payload: web::Json<AdminCreate>,
) -> ApiResult<HttpResponse> {
    let admin = with_deadline(
        state.request_timeout,
        state.admins.create(payload.into_inner()),
    )
    .await?;
    Ok(HttpResponse::Created().json(admin))
}

/// List admins matching the query-string filter.
#[get("/admins")]
pub async fn list_admins(
    state: web::Data<HttpState>,
    query: web::Query<AdminFilter>,
) -> ApiResult<web::Json<PaginateResponse<Admin>>> {
    let filter = query.into_inner();
    let (page, limit) = (filter.page, filter.limit);
    let admins = with_deadline(state.request_timeout, state.admins.find_many(filter)).await?;
    Ok(web::Json(PaginateResponse::new(admins, page, limit)))
}

#[get("/admins/{id}")]
pub async fn get_admin(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Admin>> {
    let id = path.into_inner();
    let admin = with_deadline(state.request_timeout, state.admins.find_by_id(id)).await?;
    Ok(web::Json(admin))
}

/// Apply a partial update. Absent fields are left unchanged.
#[patch("/admins/{id}")]
pub async fn update_admin(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<AdminUpdate>,
) -> ApiResult<web::Json<Admin>> {
    let id = path.into_inner();
    let admin = with_deadline(
        state.request_timeout,
        state.admins.update(id, payload.into_inner()),
    )
    .await?;
    Ok(web::Json(admin))
}

#[delete("/admins/{id}")]
pub async fn delete_admin(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    with_deadline(state.request_timeout, state.admins.delete(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register the admin routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_admin)
        .service(list_admins)
        .service(get_admin)
        .service(update_admin)
        .service(delete_admin);
}
