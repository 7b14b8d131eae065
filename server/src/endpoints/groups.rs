use actix_web::{get, web, HttpResponse};
use api::{DataEnvelope, GroupId, IdQuery};

use crate::service::{ForecastService, ServiceError};

/// `/group/{id}`, `{"data": null}` when the group does not exist.
#[get("/group/{id}")]
pub async fn get_group(
    id: web::Path<GroupId>,
    service: web::Data<ForecastService>,
) -> Result<HttpResponse, ServiceError> {
    let group = service.get_group(id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(DataEnvelope::new(group)))
}

#[get("/loadGroupData")]
pub async fn load_group_data(
    params: web::Query<IdQuery>,
    service: web::Data<ForecastService>,
) -> Result<HttpResponse, ServiceError> {
    let data = service.list_group_data(params.id).await?;

    Ok(HttpResponse::Ok().json(DataEnvelope::new(data)))
}
