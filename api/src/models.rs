use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;

pub type GroupId = i64;
pub type TimeSeriesId = i64;

/// Every successful response is wrapped as `{ "data": ... }`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        DataEnvelope { data }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub id: GroupId,
    pub branch_office: String,
    pub price_category: String,
}

impl Group {
    /// `<branch office>, <price category>`, as shown in page headers.
    pub fn title(&self) -> String {
        format!("{}, {}", self.branch_office, self.price_category)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GroupDataPoint {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub id: GroupId,
    pub year: i32,
    pub month: u32,
    pub volume: String,
}

impl GroupDataPoint {
    pub fn new(id: GroupId, year: i32, month: u32, volume: f64) -> Self {
        GroupDataPoint {
            id,
            year,
            month,
            volume: fixed(volume, 3),
        }
    }
}

/// One fitted parameter set of a group, ranked by `mape`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TrainedTimeSeries {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub time_serie_id: TimeSeriesId,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub group_data_id: GroupId,
    pub alpha: String,
    pub beta: String,
    pub gamma: String,
    pub mse: String,
    pub mape: String,
}

impl TrainedTimeSeries {
    pub fn new(
        time_serie_id: TimeSeriesId,
        group_data_id: GroupId,
        (alpha, beta, gamma): (f64, f64, f64),
        mse: f64,
        mape: f64,
    ) -> Self {
        TrainedTimeSeries {
            time_serie_id,
            group_data_id,
            alpha: fixed(alpha, 1),
            beta: fixed(beta, 1),
            gamma: fixed(gamma, 1),
            mse: fixed(mse, 3),
            mape: fixed(mape, 3),
        }
    }

    pub fn mape_value(&self) -> Option<f64> {
        self.mape.parse().ok()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastPoint {
    pub year: i32,
    pub month: u32,
    pub real_value: Option<String>,
    pub smooth_value: Option<String>,
    pub predict_value: Option<String>,
    /// Real value of the same month one year earlier.
    pub prev_real_value: Option<String>,
}

impl ForecastPoint {
    pub fn new(
        year: i32,
        month: u32,
        real_value: Option<f64>,
        smooth_value: Option<f64>,
        predict_value: Option<f64>,
        prev_real_value: Option<f64>,
    ) -> Self {
        ForecastPoint {
            year,
            month,
            real_value: real_value.map(|v| fixed(v, 3)),
            smooth_value: smooth_value.map(|v| fixed(v, 3)),
            predict_value: predict_value.map(|v| fixed(v, 3)),
            prev_real_value: prev_real_value.map(|v| fixed(v, 3)),
        }
    }

    /// Whether this point is at or after `year`/`month`.
    pub fn is_from(&self, year: i32, month: u32) -> bool {
        self.year > year || (self.year == year && self.month >= month)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IdQuery {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub id: i64,
}

/// Query of `GET /forecast`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub id: TimeSeriesId,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub year_init: i32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub month_init: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub months_to_forecast: u32,
}

fn fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}
