use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use api::{GroupId, TimeSeriesId};
use async_trait::async_trait;

use super::{ForecastGateway, ForecastRow, GroupDataRow, GroupRow, StorageError, TimeSerieRow};

/// Parameter sets produced by one mocked `param_test` run.
pub const MOCK_PARAM_SETS: i64 = 15;

#[derive(Default)]
pub struct MockState {
    pub groups: Vec<GroupRow>,
    pub group_data: Vec<GroupDataRow>,
    pub time_series: Vec<TimeSerieRow>,
    pub forecast: HashMap<TimeSeriesId, Vec<ForecastRow>>,
    pub calls: Vec<String>,
    pub failing: bool,
    pub reload_failing: bool,
}

/// In-memory stand-in for the forecasting database, answering like the SQL would.
#[derive(Default)]
pub struct MockGateway {
    pub state: Mutex<MockState>,
    load_file: Option<PathBuf>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads groups from the uploaded file on reload: `Number` is the group id.
    pub fn loading_from(load_file: PathBuf) -> Self {
        MockGateway {
            state: Mutex::new(MockState::default()),
            load_file: Some(load_file),
        }
    }

    pub fn with_groups(self, groups: Vec<GroupRow>) -> Self {
        self.state.lock().unwrap().groups = groups;
        self
    }

    pub fn with_group_data(self, group_data: Vec<GroupDataRow>) -> Self {
        self.state.lock().unwrap().group_data = group_data;
        self
    }

    pub fn with_forecast(self, serie_id: TimeSeriesId, rows: Vec<ForecastRow>) -> Self {
        self.state.lock().unwrap().forecast.insert(serie_id, rows);
        self
    }

    pub fn failing(self) -> Self {
        self.state.lock().unwrap().failing = true;
        self
    }

    pub fn reload_failing(self) -> Self {
        self.state.lock().unwrap().reload_failing = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: String) -> Result<std::sync::MutexGuard<'_, MockState>, StorageError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.failing {
            return Err(StorageError::Decode("mock database is down".to_string()));
        }
        Ok(state)
    }
}

pub fn group(id: GroupId) -> GroupRow {
    GroupRow {
        id,
        branch_office: format!("Отделение {}", id),
        price_category: format!("ПК{}", id % 6 + 1),
    }
}

#[async_trait]
impl ForecastGateway for MockGateway {
    async fn ping(&self) -> Result<(), StorageError> {
        self.record("ping".to_string()).map(|_| ())
    }

    async fn reload_load_table(&self) -> Result<(), StorageError> {
        let mut state = self.record("reload_load_table".to_string())?;
        if state.reload_failing {
            return Err(StorageError::Decode("load table definition failed".to_string()));
        }

        if let Some(load_file) = &self.load_file {
            let content = std::fs::read_to_string(load_file).unwrap();
            for line in content.lines().skip(1).filter(|line| !line.trim().is_empty()) {
                let id: GroupId = line.split(';').next().unwrap().trim().parse().unwrap();
                if !state.groups.iter().any(|g| g.id == id) {
                    state.groups.push(group(id));
                }
            }
        }

        Ok(())
    }

    async fn select_groups(&self, limit: i64) -> Result<Vec<GroupRow>, StorageError> {
        let state = self.record("select_groups".to_string())?;

        let mut groups = state.groups.clone();
        groups.sort_by_key(|g| g.id);
        groups.truncate(limit as usize);

        Ok(groups)
    }

    async fn select_group(&self, id: GroupId) -> Result<Option<GroupRow>, StorageError> {
        let state = self.record(format!("select_group {}", id))?;

        Ok(state.groups.iter().find(|g| g.id == id).cloned())
    }

    async fn select_group_data(&self, id: GroupId, limit: i64) -> Result<Vec<GroupDataRow>, StorageError> {
        let state = self.record(format!("select_group_data {}", id))?;

        let mut rows: Vec<GroupDataRow> = state
            .group_data
            .iter()
            .filter(|row| row.id == id)
            .cloned()
            .collect();
        rows.sort_by_key(|row| (row.year, row.month));
        rows.truncate(limit as usize);

        Ok(rows)
    }

    async fn param_test(&self, group_data_id: GroupId, year_init: i32) -> Result<(), StorageError> {
        let mut state = self.record(format!("param_test {} {}", group_data_id, year_init))?;

        state.time_series.retain(|ts| ts.group_data_id != group_data_id);
        for n in 0..MOCK_PARAM_SETS {
            let step = (n % 9 + 1) as f64 / 10.0;
            state.time_series.push(TimeSerieRow {
                time_serie_id: group_data_id * 1000 + n,
                group_data_id,
                alpha: step,
                beta: 1.0 - step,
                gamma: step,
                mse: 1000.0 + (n * 37 % 11) as f64,
                mape: 1.0 + (n * 7 % 13) as f64 / 4.0,
            });
        }

        Ok(())
    }

    async fn select_time_series(
        &self,
        group_data_id: GroupId,
        limit: i64,
    ) -> Result<Vec<TimeSerieRow>, StorageError> {
        let state = self.record(format!("select_time_series {}", group_data_id))?;

        let mut rows: Vec<TimeSerieRow> = state
            .time_series
            .iter()
            .filter(|ts| ts.group_data_id == group_data_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.mape.total_cmp(&b.mape));
        rows.truncate(limit as usize);

        Ok(rows)
    }

    async fn predict(
        &self,
        serie_id: TimeSeriesId,
        year_init: i32,
        month_init: u32,
        predict_num: u32,
    ) -> Result<(), StorageError> {
        let mut state = self.record(format!(
            "predict {} {} {} {}",
            serie_id, year_init, month_init, predict_num
        ))?;

        let rows = state.forecast.entry(serie_id).or_default();
        let (mut year, mut month) = (year_init, month_init);
        for n in 0..predict_num {
            rows.retain(|row| (row.year, row.month) != (year, month));
            rows.push(ForecastRow {
                year,
                month,
                real_value: None,
                smooth_value: None,
                predict_value: Some(100.0 + n as f64),
            });

            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }

        Ok(())
    }

    async fn select_forecast(&self, serie_id: TimeSeriesId, limit: i64) -> Result<Vec<ForecastRow>, StorageError> {
        let state = self.record(format!("select_forecast {}", serie_id))?;

        let mut rows = state.forecast.get(&serie_id).cloned().unwrap_or_default();
        rows.sort_by_key(|row| (row.year, row.month));
        rows.truncate(limit as usize);

        Ok(rows)
    }
}
