//! HTTP surface of the leads API.

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, web};

use crate::dto::leads::ErrorResponse;
use crate::services::ServiceError;

pub mod leads;

/// Maps a service failure to its status code and `{error}` body.
pub fn error_response(err: &ServiceError) -> HttpResponse {
    let body = ErrorResponse::new(err.to_string());
    match err {
        ServiceError::Form(_) | ServiceError::TypeConstraint(_) => {
            HttpResponse::BadRequest().json(body)
        }
        ServiceError::NotFound => HttpResponse::NotFound().json(body),
        ServiceError::Repository(_) | ServiceError::Internal(_) => {
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(err.to_string()));
    InternalError::from_response(err, response).into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(err.to_string()));
    InternalError::from_response(err, response).into()
}

/// Registers the leads routes and payload error handlers. The repository is
/// expected as `web::Data<DieselRepository>` app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        // `/leads/export` must be matched before `/leads/{id}`.
        .service(leads::export_leads)
        .service(leads::list_leads)
        .service(leads::create_lead)
        .service(leads::update_lead)
        .service(leads::delete_leads);
}
