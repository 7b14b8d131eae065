use actix_web::error::{InternalError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use api::ErrorBody;

use crate::service::ServiceError;

pub mod forecast;
pub mod groups;
pub mod health;
pub mod upload;

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidUpload(_) | ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::Storage(_) | ServiceError::Upload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }

        HttpResponse::build(status).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorBody { error: message })
}

/// Malformed query ids are a 400 with the usual error body.
pub fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(err.to_string());
    InternalError::from_response(err, response).into()
}

/// Non-numeric path ids are a 400 rather than actix's default 404.
pub fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(err.to_string());
    InternalError::from_response(err, response).into()
}
