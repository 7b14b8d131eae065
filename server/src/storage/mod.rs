use api::{GroupId, TimeSeriesId};
use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
pub mod mock;
pub mod postgres;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to get a database connection: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
    #[error("Database statement failed: {0}")]
    Statement(#[from] tokio_postgres::Error),
    #[error("Unexpected row: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    pub id: GroupId,
    pub branch_office: String,
    pub price_category: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupDataRow {
    pub id: GroupId,
    pub volume: f64,
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSerieRow {
    pub time_serie_id: TimeSeriesId,
    pub group_data_id: GroupId,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub mse: f64,
    pub mape: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub year: i32,
    pub month: u32,
    pub real_value: Option<f64>,
    pub smooth_value: Option<f64>,
    pub predict_value: Option<f64>,
}

/// Calls against the forecasting database.
///
/// Every method is one round trip on one pooled connection. The smoothing
/// and prediction themselves run inside the `pk_frc` procedures.
#[async_trait]
pub trait ForecastGateway: Send + Sync {
    async fn ping(&self) -> Result<(), StorageError>;

    /// Redefines the load table over the uploaded file.
    async fn reload_load_table(&self) -> Result<(), StorageError>;

    async fn select_groups(&self, limit: i64) -> Result<Vec<GroupRow>, StorageError>;

    async fn select_group(&self, id: GroupId) -> Result<Option<GroupRow>, StorageError>;

    async fn select_group_data(&self, id: GroupId, limit: i64) -> Result<Vec<GroupDataRow>, StorageError>;

    /// `pk_frc.param_test`, blocks until the parameter search finishes.
    async fn param_test(&self, group_data_id: GroupId, year_init: i32) -> Result<(), StorageError>;

    async fn select_time_series(
        &self,
        group_data_id: GroupId,
        limit: i64,
    ) -> Result<Vec<TimeSerieRow>, StorageError>;

    /// `pk_frc.predict`
    async fn predict(
        &self,
        serie_id: TimeSeriesId,
        year_init: i32,
        month_init: u32,
        predict_num: u32,
    ) -> Result<(), StorageError>;

    async fn select_forecast(&self, serie_id: TimeSeriesId, limit: i64) -> Result<Vec<ForecastRow>, StorageError>;
}
