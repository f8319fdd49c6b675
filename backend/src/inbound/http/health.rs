//! Liveness and readiness endpoints.
//!
//! Liveness follows the server lifecycle only. Readiness additionally opens
//! and releases a storage transaction, so a lost database or an exhausted
//! pool takes the instance out of rotation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use actix_web::{HttpResponse, HttpResponseBuilder, get, http::header, web};
use async_trait::async_trait;
use serde::Serialize;

use crate::domain::ports::TransactionSource;
use crate::domain::{Error, begin_transaction};
use crate::logging::log_error;

const STORAGE_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Whether storage can open a transaction right now.
#[async_trait]
pub trait StorageCheck: Send + Sync {
    async fn check(&self) -> Result<(), Error>;
}

#[async_trait]
impl<S: TransactionSource> StorageCheck for S {
    async fn check(&self) -> Result<(), Error> {
        let tx = begin_transaction(self, None).await?;
        tx.release(Ok(())).await
    }
}

/// Where the server is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    Starting = 0,
    Serving = 1,
    Draining = 2,
}

impl Phase {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Starting,
            1 => Self::Serving,
            _ => Self::Draining,
        }
    }
}

/// Lifecycle phase plus the storage the readiness check exercises.
pub struct HealthState {
    phase: AtomicU8,
    storage: Arc<dyn StorageCheck>,
}

impl HealthState {
    pub fn new(storage: Arc<dyn StorageCheck>) -> Self {
        Self {
            phase: AtomicU8::new(Phase::Starting as u8),
            storage,
        }
    }

    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// The listener is bound; start accepting traffic.
    pub fn mark_serving(&self) {
        self.phase.store(Phase::Serving as u8, Ordering::Release);
    }

    /// Shutdown has begun. Both endpoints fail from here on.
    pub fn mark_draining(&self) {
        self.phase.store(Phase::Draining as u8, Ordering::Release);
    }

    async fn storage_reachable(&self) -> bool {
        match tokio::time::timeout(STORAGE_CHECK_TIMEOUT, self.storage.check()).await {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                log_error(&err);
                false
            }
            Err(_) => {
                log_error(&Error::unavailable("Storage check timed out"));
                false
            }
        }
    }
}

#[derive(Serialize)]
struct StatusBody {
    status: &'static str,
}

fn report(mut builder: HttpResponseBuilder, status: &'static str) -> HttpResponse {
    builder
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(StatusBody { status })
}

/// 200 `ready` while serving with reachable storage; 503 with the reason
/// otherwise.
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    match state.phase() {
        Phase::Starting => report(HttpResponse::ServiceUnavailable(), "starting"),
        Phase::Draining => report(HttpResponse::ServiceUnavailable(), "draining"),
        Phase::Serving => {
            if state.storage_reachable().await {
                report(HttpResponse::Ok(), "ready")
            } else {
                report(HttpResponse::ServiceUnavailable(), "storage_unavailable")
            }
        }
    }
}

/// 200 `alive` until shutdown begins.
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    match state.phase() {
        Phase::Draining => report(HttpResponse::ServiceUnavailable(), "draining"),
        Phase::Starting | Phase::Serving => report(HttpResponse::Ok(), "alive"),
    }
}
