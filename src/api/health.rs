use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::error;

use crate::store::PerformanceStore;

/// `GET /health`
pub async fn health(store: web::Data<dyn PerformanceStore>) -> HttpResponse {
    match store.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "database": "reachable"
        })),
        Err(e) => {
            error!(error = %e, "Health check failed");
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "degraded",
                "database": e.to_string()
            }))
        }
    }
}
