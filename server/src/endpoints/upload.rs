use actix_web::{post, web, HttpResponse};
use api::DataEnvelope;

use crate::service::{ForecastService, ServiceError};

/// Replace the loaded series file `/uploadFile`
#[post("/uploadFile")]
pub async fn upload_file(body: String, service: web::Data<ForecastService>) -> Result<HttpResponse, ServiceError> {
    let groups = service.submit_series_file(&body).await?;

    Ok(HttpResponse::Ok().json(DataEnvelope::new(groups)))
}
