//! HTTP inbound adapter: JSON endpoints under `/api/v1`, server-rendered
//! pages, and health endpoints.

pub mod admins;
pub mod error;
pub mod health;
pub mod listing;
pub mod pages;
pub mod state;
pub mod users;

pub use error::ApiResult;
