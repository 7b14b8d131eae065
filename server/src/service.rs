use std::sync::Arc;

use api::{ForecastPoint, ForecastRequest, Group, GroupDataPoint, GroupId, TimeSeriesId, TrainedTimeSeries};
use thiserror::Error;

use crate::settings::config_model::{SettingsConfig, TrainingConfig, UploadConfig};
use crate::shaping::{self, FORECAST_LIMIT, GROUP_DATA_LIMIT, GROUP_LIMIT, TRAINED_LIMIT};
use crate::storage::{ForecastGateway, StorageError};
use crate::upload;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database request failed: {0}")]
    Storage(#[from] StorageError),
    #[error("Failed to store the uploaded file: {0}")]
    Upload(#[from] std::io::Error),
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// The REST operations, each a few gateway round trips plus row shaping.
pub struct ForecastService {
    gateway: Arc<dyn ForecastGateway>,
    upload: UploadConfig,
    training: TrainingConfig,
}

impl ForecastService {
    pub fn new(gateway: Arc<dyn ForecastGateway>, settings: &SettingsConfig) -> Self {
        ForecastService {
            gateway,
            upload: settings.upload.clone(),
            training: settings.training.clone(),
        }
    }

    pub async fn ping(&self) -> Result<(), ServiceError> {
        Ok(self.gateway.ping().await?)
    }

    /// Stores the upload as the load file, redefines the load table over it
    /// and lists the groups.
    ///
    /// The listing runs even when the table definition fails: the table reads
    /// the file live, so an existing definition already sees the new content.
    pub async fn submit_series_file(&self, content: &str) -> Result<Vec<Group>, ServiceError> {
        let records = upload::count_records(content)
            .map_err(|err| ServiceError::InvalidUpload(err.to_string()))?;
        if records == 0 {
            return Err(ServiceError::InvalidUpload("no data rows".to_string()));
        }

        let load_file = self.upload.load_file();
        upload::write_load_file(&load_file, content).await?;
        info!("Saved {} rows to {}", records, load_file.display());

        if let Err(err) = self.gateway.reload_load_table().await {
            warn!("Redefining the load table failed, listing groups anyway: {}", err);
        }

        self.list_groups().await
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>, ServiceError> {
        let rows = self.gateway.select_groups(GROUP_LIMIT as i64).await?;

        Ok(shaping::groups(rows))
    }

    pub async fn get_group(&self, id: GroupId) -> Result<Option<Group>, ServiceError> {
        let row = self.gateway.select_group(id).await?;

        Ok(row.map(shaping::group))
    }

    pub async fn list_group_data(&self, id: GroupId) -> Result<Vec<GroupDataPoint>, ServiceError> {
        let rows = self
            .gateway
            .select_group_data(id, GROUP_DATA_LIMIT as i64)
            .await?;

        Ok(shaping::group_data(rows))
    }

    /// Runs the parameter search for a group, then returns its best fits.
    /// Takes as long as the search does.
    pub async fn train_model(&self, id: GroupId) -> Result<Vec<TrainedTimeSeries>, ServiceError> {
        info!(
            "Running parameter search for group {} from year {}",
            id, self.training.year_init
        );
        self.gateway.param_test(id, self.training.year_init).await?;

        let rows = self
            .gateway
            .select_time_series(id, TRAINED_LIMIT as i64)
            .await?;

        Ok(shaping::trained_series(rows))
    }

    pub async fn list_forecast(&self, time_series_id: TimeSeriesId) -> Result<Vec<ForecastPoint>, ServiceError> {
        let rows = self
            .gateway
            .select_forecast(time_series_id, FORECAST_LIMIT as i64)
            .await?;

        Ok(shaping::forecast(rows))
    }

    pub async fn run_forecast(&self, request: &ForecastRequest) -> Result<Vec<ForecastPoint>, ServiceError> {
        if !(1..=12).contains(&request.month_init) {
            return Err(ServiceError::InvalidRequest(format!(
                "monthInit {} is not between 1 and 12",
                request.month_init
            )));
        }

        if request.months_to_forecast == 0 || request.months_to_forecast as usize > FORECAST_LIMIT {
            return Err(ServiceError::InvalidRequest(format!(
                "monthsToForecast {} is not between 1 and {}",
                request.months_to_forecast, FORECAST_LIMIT
            )));
        }

        info!(
            "Predicting {} months of time series {} from {}-{:02}",
            request.months_to_forecast, request.id, request.year_init, request.month_init
        );
        self.gateway
            .predict(
                request.id,
                request.year_init,
                request.month_init,
                request.months_to_forecast,
            )
            .await?;

        self.list_forecast(request.id).await
    }
}
