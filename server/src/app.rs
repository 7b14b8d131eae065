use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use actix_files::{Files, NamedFile};
use actix_web::dev::{fn_service, Server, ServiceRequest, ServiceResponse};
use actix_web::{middleware, web, App, HttpServer};

use crate::endpoints::{forecast, groups, health, path_error, query_error, upload};
use crate::service::ForecastService;
use crate::settings::config_model::SettingsConfig;

/// Registers the REST API handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(health::health_check)
        .service(upload::upload_file)
        .service(groups::get_group)
        .service(groups::load_group_data)
        .service(forecast::train_model)
        .service(forecast::load_forecast)
        .service(forecast::forecast);
}

/// The dashboard bundle. Paths without a file get `index.html` so that
/// client side routes survive a reload.
pub fn static_files(root: &Path) -> Files {
    let index: PathBuf = root.join("index.html");

    Files::new("/", root)
        .index_file("index.html")
        .default_handler(fn_service(move |req: ServiceRequest| {
            let index = index.clone();
            async move {
                let (req, _) = req.into_parts();
                let file = NamedFile::open_async(&index).await?;
                let res = file.into_response(&req);
                Ok(ServiceResponse::new(req, res))
            }
        }))
}

pub fn run_server(
    settings: &SettingsConfig,
    service: web::Data<ForecastService>,
) -> std::io::Result<(Server, Vec<SocketAddr>)> {
    let static_root = settings.server.static_root.clone();
    let max_upload_bytes = settings.server.max_upload_bytes;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .app_data(service.clone())
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .configure(configure)
            .service(static_files(&static_root))
    })
    .bind((settings.server.host.as_str(), settings.server.port))?;

    let addrs = server.addrs();
    for addr in &addrs {
        info!("REST API started at {}", addr);
    }

    Ok((server.run(), addrs))
}
