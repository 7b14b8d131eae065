use reqwest::Url;

use crate::models::{ForecastRequest, GroupId, TimeSeriesId};

/// Pages of the dashboard, addressed by their browser path.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Home,
    Upload,
    Details {
        group_id: GroupId,
    },
    TrainedModel {
        group_id: GroupId,
    },
    ModelEvaluation {
        group_id: GroupId,
        time_serie_id: TimeSeriesId,
    },
    Forecast {
        group_id: GroupId,
        request: ForecastRequest,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Breadcrumb {
    pub label: &'static str,
    pub path: String,
}

impl Page {
    /// Parses a path such as `/trainedModel/3/forecast/41?yearInit=2020&monthInit=1&monthsToForecast=3`.
    pub fn from_path(path: &str) -> Option<Page> {
        let url = Url::parse("http://localhost").ok()?.join(path).ok()?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [] => Some(Page::Home),
            ["loadData"] => Some(Page::Upload),
            ["details", id] => Some(Page::Details {
                group_id: id.parse().ok()?,
            }),
            ["trainedModel", id] => Some(Page::TrainedModel {
                group_id: id.parse().ok()?,
            }),
            ["trainedModel", group_id, "modelEvaluation", time_serie_id] => {
                Some(Page::ModelEvaluation {
                    group_id: group_id.parse().ok()?,
                    time_serie_id: time_serie_id.parse().ok()?,
                })
            }
            ["trainedModel", group_id, "forecast", time_serie_id] => {
                let query_value = |name: &str| {
                    url.query_pairs()
                        .find(|(key, _)| key == name)
                        .map(|(_, value)| value.into_owned())
                };

                Some(Page::Forecast {
                    group_id: group_id.parse().ok()?,
                    request: ForecastRequest {
                        id: time_serie_id.parse().ok()?,
                        year_init: query_value("yearInit")?.parse().ok()?,
                        month_init: query_value("monthInit")?.parse().ok()?,
                        months_to_forecast: query_value("monthsToForecast")?.parse().ok()?,
                    },
                })
            }
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Page::Home => "/".to_string(),
            Page::Upload => "/loadData".to_string(),
            Page::Details { group_id } => format!("/details/{}", group_id),
            Page::TrainedModel { group_id } => format!("/trainedModel/{}", group_id),
            Page::ModelEvaluation {
                group_id,
                time_serie_id,
            } => format!("/trainedModel/{}/modelEvaluation/{}", group_id, time_serie_id),
            Page::Forecast { group_id, request } => format!(
                "/trainedModel/{}/forecast/{}?yearInit={}&monthInit={}&monthsToForecast={}",
                group_id, request.id, request.year_init, request.month_init, request.months_to_forecast
            ),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Home | Page::Upload => "Главная",
            Page::Details { .. } => "Детализация временного ряда",
            Page::TrainedModel { .. } => "Обучение модели",
            Page::ModelEvaluation { .. } => "Сравнение факта и прогноза",
            Page::Forecast { .. } => "Прогнозирование",
        }
    }

    pub fn parent(&self) -> Option<Page> {
        match self {
            Page::Home => None,
            Page::Upload => None,
            Page::Details { .. } => Some(Page::Upload),
            Page::TrainedModel { group_id } => Some(Page::Details {
                group_id: *group_id,
            }),
            Page::ModelEvaluation { group_id, .. } | Page::Forecast { group_id, .. } => {
                Some(Page::TrainedModel {
                    group_id: *group_id,
                })
            }
        }
    }

    /// Trail from the upload page down to this page.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut trail = vec![Breadcrumb {
            label: self.label(),
            path: self.path(),
        }];

        let mut current = self.parent();
        while let Some(page) = current {
            trail.push(Breadcrumb {
                label: page.label(),
                path: page.path(),
            });
            current = page.parent();
        }

        trail.reverse();
        trail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_pages() {
        assert_eq!(Page::from_path("/"), Some(Page::Home));
        assert_eq!(Page::from_path("/loadData"), Some(Page::Upload));
        assert_eq!(Page::from_path("/details/4"), Some(Page::Details { group_id: 4 }));
        assert_eq!(
            Page::from_path("/trainedModel/4/modelEvaluation/77"),
            Some(Page::ModelEvaluation {
                group_id: 4,
                time_serie_id: 77
            })
        );
    }

    #[test]
    fn test_parse_forecast_page() {
        let page = Page::from_path(
            "/trainedModel/3/forecast/41?yearInit=2020&monthInit=1&monthsToForecast=3",
        )
        .unwrap();

        assert_eq!(
            page,
            Page::Forecast {
                group_id: 3,
                request: ForecastRequest {
                    id: 41,
                    year_init: 2020,
                    month_init: 1,
                    months_to_forecast: 3,
                },
            }
        );
    }

    #[test]
    fn test_forecast_page_requires_query() {
        assert_eq!(Page::from_path("/trainedModel/3/forecast/41"), None);
        assert_eq!(
            Page::from_path("/trainedModel/3/forecast/41?yearInit=undefined&monthInit=1&monthsToForecast=3"),
            None
        );
    }

    #[test]
    fn test_unknown_paths() {
        assert_eq!(Page::from_path("/details/abc"), None);
        assert_eq!(Page::from_path("/nothing/here"), None);
    }

    #[test]
    fn test_path_round_trip() {
        let page = Page::Forecast {
            group_id: 2,
            request: ForecastRequest {
                id: 9,
                year_init: 2021,
                month_init: 11,
                months_to_forecast: 5,
            },
        };

        assert_eq!(Page::from_path(&page.path()), Some(page));
    }

    #[test]
    fn test_breadcrumbs() {
        let page = Page::ModelEvaluation {
            group_id: 5,
            time_serie_id: 50,
        };

        let paths: Vec<String> = page.breadcrumbs().into_iter().map(|b| b.path).collect();
        assert_eq!(
            paths,
            vec![
                "/loadData",
                "/details/5",
                "/trainedModel/5",
                "/trainedModel/5/modelEvaluation/50",
            ]
        );
        assert_eq!(Page::Upload.breadcrumbs().len(), 1);
    }
}
