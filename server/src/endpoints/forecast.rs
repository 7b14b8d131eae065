use actix_web::{get, web, HttpResponse};
use api::{DataEnvelope, ForecastRequest, IdQuery};

use crate::service::{ForecastService, ServiceError};

/// Fit the smoothing parameters of a group `/trainModel`.
/// Answers only after the parameter search has finished.
#[get("/trainModel")]
pub async fn train_model(
    params: web::Query<IdQuery>,
    service: web::Data<ForecastService>,
) -> Result<HttpResponse, ServiceError> {
    let series = service.train_model(params.id).await?;

    Ok(HttpResponse::Ok().json(DataEnvelope::new(series)))
}

#[get("/loadForecast")]
pub async fn load_forecast(
    params: web::Query<IdQuery>,
    service: web::Data<ForecastService>,
) -> Result<HttpResponse, ServiceError> {
    let points = service.list_forecast(params.id).await?;

    Ok(HttpResponse::Ok().json(DataEnvelope::new(points)))
}

#[get("/forecast")]
pub async fn forecast(
    params: web::Query<ForecastRequest>,
    service: web::Data<ForecastService>,
) -> Result<HttpResponse, ServiceError> {
    let points = service.run_forecast(&params).await?;

    Ok(HttpResponse::Ok().json(DataEnvelope::new(points)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use api::{ForecastPoint, TrainedTimeSeries};

    use super::*;
    use crate::endpoints::query_error;
    use crate::service::tests::test_settings;
    use crate::storage::mock::MockGateway;
    use crate::storage::ForecastRow;

    macro_rules! app {
        ($gateway:expr) => {{
            let dir = tempfile::tempdir().unwrap();
            let service = ForecastService::new($gateway, &test_settings(dir.path()));
            test::init_service(
                App::new()
                    .app_data(web::Data::new(service))
                    .app_data(web::QueryConfig::default().error_handler(query_error))
                    .service(train_model)
                    .service(load_forecast)
                    .service(forecast),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_train_model() {
        let gateway = Arc::new(MockGateway::new());
        let app = app!(gateway.clone());

        let req = test::TestRequest::get().uri("/trainModel?id=4").to_request();
        let body: DataEnvelope<Vec<TrainedTimeSeries>> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.data.len(), 10);
        assert!(body.data.iter().all(|s| s.group_data_id == 4));
        assert_eq!(gateway.calls()[0], "param_test 4 2017");
    }

    #[actix_web::test]
    async fn test_load_forecast() {
        let rows = vec![
            ForecastRow { year: 2019, month: 1, real_value: Some(90.0), smooth_value: None, predict_value: None },
            ForecastRow { year: 2020, month: 1, real_value: Some(95.0), smooth_value: Some(94.0), predict_value: Some(96.0) },
        ];
        let app = app!(Arc::new(MockGateway::new().with_forecast(12, rows)));

        let req = test::TestRequest::get().uri("/loadForecast?id=12").to_request();
        let body: DataEnvelope<Vec<ForecastPoint>> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.data.len(), 2);
        assert_eq!(body.data[1].prev_real_value.as_deref(), Some("90.000"));
    }

    #[actix_web::test]
    async fn test_forecast() {
        let gateway = Arc::new(MockGateway::new());
        let app = app!(gateway.clone());

        let req = test::TestRequest::get()
            .uri("/forecast?id=12&yearInit=2021&monthInit=12&monthsToForecast=2")
            .to_request();
        let body: DataEnvelope<Vec<ForecastPoint>> = test::call_and_read_body_json(&app, req).await;

        let months: Vec<(i32, u32)> = body.data.iter().map(|p| (p.year, p.month)).collect();
        assert_eq!(months, vec![(2021, 12), (2022, 1)]);
        assert_eq!(
            gateway.calls(),
            vec!["predict 12 2021 12 2".to_string(), "select_forecast 12".to_string()]
        );
    }

    #[actix_web::test]
    async fn test_forecast_out_of_range() {
        let gateway = Arc::new(MockGateway::new());
        let app = app!(gateway.clone());

        let req = test::TestRequest::get()
            .uri("/forecast?id=12&yearInit=2021&monthInit=0&monthsToForecast=2")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/forecast?id=12&yearInit=2021&monthInit=3&monthsToForecast=0")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        assert!(gateway.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_forecast_missing_parameter() {
        let app = app!(Arc::new(MockGateway::new()));

        let req = test::TestRequest::get()
            .uri("/forecast?id=12&yearInit=2021")
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
