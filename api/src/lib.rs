#[macro_use]
extern crate log;

pub mod dashboard;
pub mod models;
pub mod routes;
pub mod session;
pub mod views;

use http::{header::CONTENT_TYPE, StatusCode};
use serde::de::DeserializeOwned;
pub use models::*;

const DEFAULT_API_URL: &str = r#"http://localhost:3003"#;

pub fn get_api_url() -> String {
    dotenv::var("FRC_API_URL").unwrap_or(DEFAULT_API_URL.to_string())
}

/// Client for the forecasting REST API.
///
/// Requests carry no timeout: training and prediction block until the
/// database procedures return.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl Default for ApiClient {
    fn default() -> Self {
        ApiClient::new(&get_api_url())
    }
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        ApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /uploadFile` with the raw CSV content.
    pub async fn upload_file(&self, content: &str) -> Result<Vec<Group>, anyhow::Error> {
        let res = self
            .client
            .post(format!("{}/uploadFile", self.base_url))
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(content.to_string())
            .send()
            .await?;

        read_data(res).await
    }

    pub async fn get_group(&self, id: GroupId) -> Result<Option<Group>, anyhow::Error> {
        let res = self
            .client
            .get(format!("{}/group/{}", self.base_url, id))
            .send()
            .await?;

        read_data(res).await
    }

    pub async fn load_group_data(&self, id: GroupId) -> Result<Vec<GroupDataPoint>, anyhow::Error> {
        let res = self
            .client
            .get(format!("{}/loadGroupData", self.base_url))
            .query(&IdQuery { id })
            .send()
            .await?;

        read_data(res).await
    }

    pub async fn train_model(&self, id: GroupId) -> Result<Vec<TrainedTimeSeries>, anyhow::Error> {
        info!("Training model for group {}", id);

        let res = self
            .client
            .get(format!("{}/trainModel", self.base_url))
            .query(&IdQuery { id })
            .send()
            .await?;

        read_data(res).await
    }

    pub async fn load_forecast(&self, id: TimeSeriesId) -> Result<Vec<ForecastPoint>, anyhow::Error> {
        let res = self
            .client
            .get(format!("{}/loadForecast", self.base_url))
            .query(&IdQuery { id })
            .send()
            .await?;

        read_data(res).await
    }

    pub async fn forecast(&self, request: &ForecastRequest) -> Result<Vec<ForecastPoint>, anyhow::Error> {
        info!(
            "Forecasting time series {} from {}-{:02} for {} months",
            request.id, request.year_init, request.month_init, request.months_to_forecast
        );

        let res = self
            .client
            .get(format!("{}/forecast", self.base_url))
            .query(request)
            .send()
            .await?;

        read_data(res).await
    }
}

async fn read_data<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, anyhow::Error> {
    let status = res.status();

    let data_str = res.text().await?;
    debug!("{}", data_str);

    if status != StatusCode::OK {
        let message = serde_json::from_str::<ErrorBody>(&data_str)
            .map(|body| body.error)
            .unwrap_or(data_str);
        return Err(anyhow::anyhow!("{} {}", status, message));
    }

    let data: DataEnvelope<T> = serde_json::from_str(&data_str)?;

    Ok(data.data)
}
