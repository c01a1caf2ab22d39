//! Liveness and readiness checks.
//!
//! Readiness means the listener is bound, the process is not draining and
//! the store answers a ping. Liveness only tracks draining, so a slow
//! database never gets the process restarted.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use tracing::warn;

use crate::domain::ports::StorageHealth;

/// Health state shared by every worker.
pub struct HealthState {
    serving: AtomicBool,
    draining: AtomicBool,
    storage: Arc<dyn StorageHealth>,
}

impl HealthState {
    /// Not yet serving; readiness additionally pings `storage`.
    pub fn new(storage: Arc<dyn StorageHealth>) -> Self {
        Self {
            serving: AtomicBool::new(false),
            draining: AtomicBool::new(false),
            storage,
        }
    }

    /// The listener is bound and accepting connections.
    pub fn mark_serving(&self) {
        self.serving.store(true, Ordering::Release);
    }

    /// Shutdown has begun; both checks fail from now on.
    pub fn mark_draining(&self) {
        self.draining.store(true, Ordering::Release);
    }

    pub fn is_alive(&self) -> bool {
        !self.draining.load(Ordering::Acquire)
    }

    /// Serving, not draining and the store answered.
    pub async fn is_ready(&self) -> bool {
        if !self.serving.load(Ordering::Acquire) || !self.is_alive() {
            return false;
        }
        match self.storage.ping().await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "readiness check failed storage ping");
                false
            }
        }
    }
}

fn check_response(passed: bool) -> HttpResponse {
    let mut response = if passed {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// Readiness check: 200 when requests can be served end to end.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Listener bound and storage reachable"),
        (status = 503, description = "Starting, draining or storage unreachable")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    check_response(state.is_ready().await)
}

/// Liveness check: 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Process is running"),
        (status = 503, description = "Process is draining")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    check_response(state.is_alive())
}
