use crate::models::{
    ForecastPoint, ForecastRequest, Group, GroupDataPoint, GroupId, TimeSeriesId, TrainedTimeSeries,
};
use crate::routes::Page;
use crate::session::SessionCache;
use crate::views::{self, EvaluationFilter};
use crate::ApiClient;

#[derive(Debug, Clone, PartialEq)]
pub struct DetailsView {
    pub group: Option<Group>,
    pub data: Vec<GroupDataPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingView {
    pub group: Option<Group>,
    pub series: Vec<TrainedTimeSeries>,
    /// Served from the session cache instead of a new training run.
    pub cached: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationView {
    pub group: Option<Group>,
    pub points: Vec<ForecastPoint>,
}

impl EvaluationView {
    pub fn rows(&self, filter: EvaluationFilter) -> Vec<&ForecastPoint> {
        filter.apply(&self.points)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastView {
    pub group: Option<Group>,
    pub request: ForecastRequest,
    pub points: Vec<ForecastPoint>,
}

impl ForecastView {
    pub fn rows(&self) -> Vec<&ForecastPoint> {
        views::forecast_rows(&self.points, &self.request)
    }

    pub fn csv(&self) -> String {
        views::forecast_csv(&self.points, &self.request)
    }

    pub fn csv_file_name(&self) -> String {
        views::csv_file_name(self.group.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    Home,
    Upload(Option<Vec<Group>>),
    Details(DetailsView),
    TrainedModel(TrainingView),
    ModelEvaluation(EvaluationView),
    Forecast(ForecastView),
}

/// Loads the data behind each dashboard page for one browser session.
#[derive(Debug, Default)]
pub struct Dashboard {
    client: ApiClient,
    cache: SessionCache,
}

impl Dashboard {
    pub fn new(client: ApiClient) -> Self {
        Dashboard {
            client,
            cache: SessionCache::new(),
        }
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    pub async fn open(&mut self, page: &Page) -> Result<PageView, anyhow::Error> {
        debug!("Opening {}", page.path());

        let view = match page {
            Page::Home => PageView::Home,
            Page::Upload => PageView::Upload(self.cache.groups().map(|groups| groups.to_vec())),
            Page::Details { group_id } => PageView::Details(self.details(*group_id).await?),
            Page::TrainedModel { group_id } => {
                PageView::TrainedModel(self.training(*group_id).await?)
            }
            Page::ModelEvaluation {
                group_id,
                time_serie_id,
            } => PageView::ModelEvaluation(self.evaluation(*group_id, *time_serie_id).await?),
            Page::Forecast { group_id, request } => {
                PageView::Forecast(self.forecast(*group_id, request).await?)
            }
        };

        Ok(view)
    }

    pub async fn upload(&mut self, content: &str) -> Result<Vec<Group>, anyhow::Error> {
        let groups = self.client.upload_file(content).await?;
        self.cache.store_groups(groups.clone());

        Ok(groups)
    }

    pub async fn details(&self, group_id: GroupId) -> Result<DetailsView, anyhow::Error> {
        let (group, data) = tokio::try_join!(
            self.client.get_group(group_id),
            self.client.load_group_data(group_id)
        )?;

        Ok(DetailsView { group, data })
    }

    pub async fn training(&mut self, group_id: GroupId) -> Result<TrainingView, anyhow::Error> {
        let group = self.client.get_group(group_id).await?;

        if let Some(series) = self.cache.trained(group_id) {
            return Ok(TrainingView {
                group,
                series: series.to_vec(),
                cached: true,
            });
        }

        let series = self.client.train_model(group_id).await?;
        self.cache.store_trained(group_id, series.clone());

        Ok(TrainingView {
            group,
            series,
            cached: false,
        })
    }

    pub async fn evaluation(
        &self,
        group_id: GroupId,
        time_serie_id: TimeSeriesId,
    ) -> Result<EvaluationView, anyhow::Error> {
        let (group, points) = tokio::try_join!(
            self.client.get_group(group_id),
            self.client.load_forecast(time_serie_id)
        )?;

        Ok(EvaluationView { group, points })
    }

    pub async fn forecast(
        &self,
        group_id: GroupId,
        request: &ForecastRequest,
    ) -> Result<ForecastView, anyhow::Error> {
        let (group, points) = tokio::try_join!(
            self.client.get_group(group_id),
            self.client.forecast(request)
        )?;

        Ok(ForecastView {
            group,
            request: request.clone(),
            points,
        })
    }

    pub fn end_session(&mut self) {
        self.cache.end_session();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_view_export() {
        let view = ForecastView {
            group: Some(Group {
                id: 2,
                branch_office: "Ирбитское".to_string(),
                price_category: "ПК4".to_string(),
            }),
            request: ForecastRequest {
                id: 20,
                year_init: 2020,
                month_init: 2,
                months_to_forecast: 1,
            },
            points: vec![
                ForecastPoint::new(2020, 1, Some(5.0), Some(5.1), Some(5.2), None),
                ForecastPoint::new(2020, 2, None, None, Some(6.0), Some(4.0)),
            ],
        };

        assert_eq!(view.rows().len(), 1);
        assert!(view.csv().ends_with("2020; 2; 6.000"));
        assert_eq!(view.csv_file_name(), "ForecastData(Ирбитское, ПК4).csv");
    }

    #[tokio::test]
    async fn test_static_pages_need_no_requests() {
        let mut dashboard = Dashboard::new(ApiClient::new("http://127.0.0.1:9"));

        assert_eq!(dashboard.open(&Page::Home).await.unwrap(), PageView::Home);
        assert_eq!(dashboard.open(&Page::Upload).await.unwrap(), PageView::Upload(None));
    }
}
