use actix_web::{get, web, HttpResponse, Responder};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::service::ForecastService;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub timestamp: String,
}

/// Health check `/health`, 503 while the database is unreachable.
#[get("/health")]
pub async fn health_check(service: web::Data<ForecastService>) -> impl Responder {
    let database_up = match service.ping().await {
        Ok(()) => true,
        Err(err) => {
            error!("Health check failed: {}", err);
            false
        }
    };

    let body = HealthStatus {
        status: if database_up { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database: if database_up { "up" } else { "down" },
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    };

    if database_up {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
