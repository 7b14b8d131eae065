//! Turns gateway rows into the JSON records of the REST API.
//!
//! Ordering and row caps are applied here as well as in SQL, so the
//! response invariants hold whatever the database returns.

use std::collections::HashMap;

use api::{ForecastPoint, Group, GroupDataPoint, TrainedTimeSeries};

use crate::storage::{ForecastRow, GroupDataRow, GroupRow, TimeSerieRow};

pub const GROUP_LIMIT: usize = 100;
pub const GROUP_DATA_LIMIT: usize = 100;
pub const TRAINED_LIMIT: usize = 10;
pub const FORECAST_LIMIT: usize = 1000;

pub fn groups(mut rows: Vec<GroupRow>) -> Vec<Group> {
    rows.sort_by_key(|row| row.id);
    rows.dedup_by_key(|row| row.id);
    rows.truncate(GROUP_LIMIT);

    rows.into_iter().map(group).collect()
}

pub fn group(row: GroupRow) -> Group {
    Group {
        id: row.id,
        branch_office: row.branch_office,
        price_category: row.price_category,
    }
}

pub fn group_data(mut rows: Vec<GroupDataRow>) -> Vec<GroupDataPoint> {
    rows.sort_by_key(|row| (row.year, row.month));
    rows.truncate(GROUP_DATA_LIMIT);

    rows.into_iter()
        .map(|row| GroupDataPoint::new(row.id, row.year, row.month, row.volume))
        .collect()
}

pub fn trained_series(mut rows: Vec<TimeSerieRow>) -> Vec<TrainedTimeSeries> {
    rows.sort_by(|a, b| a.mape.total_cmp(&b.mape));
    rows.truncate(TRAINED_LIMIT);

    rows.into_iter()
        .map(|row| {
            TrainedTimeSeries::new(
                row.time_serie_id,
                row.group_data_id,
                (row.alpha, row.beta, row.gamma),
                row.mse,
                row.mape,
            )
        })
        .collect()
}

/// Orders one series' rows by month and pairs every real value with the
/// real value of the same month a year earlier.
pub fn forecast(mut rows: Vec<ForecastRow>) -> Vec<ForecastPoint> {
    rows.sort_by_key(|row| (row.year, row.month));

    let real_values: HashMap<(i32, u32), f64> = rows
        .iter()
        .filter_map(|row| row.real_value.map(|value| ((row.year, row.month), value)))
        .collect();

    rows.truncate(FORECAST_LIMIT);

    rows.into_iter()
        .map(|row| {
            let prev_real_value = real_values.get(&(row.year - 1, row.month)).copied();

            ForecastPoint::new(
                row.year,
                row.month,
                row.real_value,
                row.smooth_value,
                row.predict_value,
                prev_real_value,
            )
        })
        .collect()
}
