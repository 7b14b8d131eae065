//! Client-side shaping of already fetched data: filters, forecast form
//! validation and CSV export. Nothing here talks to the network.

use std::fmt;

use crate::models::{ForecastPoint, ForecastRequest, Group, TimeSeriesId, TrainedTimeSeries};

/// Year held out of training and compared against on the evaluation page.
pub const DEFAULT_EVALUATION_YEAR: i32 = 2019;
/// Start years offered by the forecast form.
pub const FORECAST_YEARS: [i32; 3] = [2019, 2020, 2021];
pub const MAX_MONTHS_TO_FORECAST: u32 = 5;

const CSV_HEADINGS: &str = "Год;  Месяц; Прогнозируемое значение\n";

#[derive(Debug, Clone, PartialEq)]
pub enum FormError {
    Year(i32),
    Month(u32),
    Horizon(u32),
    NoTrainedSeries,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FormError::Year(year) => write!(f, "Unsupported start year {}", year),
            FormError::Month(month) => write!(f, "Month {} is not between 1 and 12", month),
            FormError::Horizon(months) => write!(
                f,
                "Forecast horizon {} is not between 1 and {}",
                months, MAX_MONTHS_TO_FORECAST
            ),
            FormError::NoTrainedSeries => write!(f, "No trained time series to forecast with"),
        }
    }
}

impl std::error::Error for FormError {}

/// Builds the forecast request from the training page form.
///
/// Without an explicit selection the best ranked series is used.
pub fn forecast_request(
    trained: &[TrainedTimeSeries],
    selected: Option<TimeSeriesId>,
    year_init: i32,
    month_init: u32,
    months_to_forecast: u32,
) -> Result<ForecastRequest, FormError> {
    if !FORECAST_YEARS.contains(&year_init) {
        return Err(FormError::Year(year_init));
    }
    if !(1..=12).contains(&month_init) {
        return Err(FormError::Month(month_init));
    }
    if !(1..=MAX_MONTHS_TO_FORECAST).contains(&months_to_forecast) {
        return Err(FormError::Horizon(months_to_forecast));
    }

    let id = match selected {
        Some(id) => id,
        None => trained
            .first()
            .map(|series| series.time_serie_id)
            .ok_or(FormError::NoTrainedSeries)?,
    };

    Ok(ForecastRequest {
        id,
        year_init,
        month_init,
        months_to_forecast,
    })
}

/// Rows at or after the requested forecast start.
pub fn forecast_rows<'a>(points: &'a [ForecastPoint], request: &ForecastRequest) -> Vec<&'a ForecastPoint> {
    points
        .iter()
        .filter(|point| point.is_from(request.year_init, request.month_init))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvaluationFilter {
    All,
    /// Only the evaluation year.
    TrainedOnly { year: i32 },
}

impl Default for EvaluationFilter {
    fn default() -> Self {
        EvaluationFilter::TrainedOnly {
            year: DEFAULT_EVALUATION_YEAR,
        }
    }
}

impl EvaluationFilter {
    pub fn toggled(self) -> Self {
        match self {
            EvaluationFilter::All => EvaluationFilter::default(),
            EvaluationFilter::TrainedOnly { .. } => EvaluationFilter::All,
        }
    }

    pub fn apply<'a>(&self, points: &'a [ForecastPoint]) -> Vec<&'a ForecastPoint> {
        match self {
            EvaluationFilter::All => points.iter().collect(),
            EvaluationFilter::TrainedOnly { year } => {
                points.iter().filter(|point| point.year == *year).collect()
            }
        }
    }
}

pub fn csv_file_name(group: Option<&Group>) -> String {
    match group {
        Some(group) => format!(
            "ForecastData({}, {}).csv",
            group.branch_office, group.price_category
        ),
        None => "ForecastData(undefined, undefined).csv".to_string(),
    }
}

/// `;`-separated export of the predicted values from the forecast start on.
pub fn forecast_csv(points: &[ForecastPoint], request: &ForecastRequest) -> String {
    let rows: Vec<String> = forecast_rows(points, request)
        .into_iter()
        .map(|point| {
            format!(
                "{}; {}; {}",
                point.year,
                point.month,
                point.predict_value.as_deref().unwrap_or("")
            )
        })
        .collect();

    format!("{}{}", CSV_HEADINGS, rows.join("\n"))
}
