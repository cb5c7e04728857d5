use actix_web::http::header;
use actix_web::{HttpResponse, Responder, delete, get, patch, post, web};

use crate::dto::leads::DeleteResponse;
use crate::forms::leads::{CreateLeadForm, LeadsQueryParams, UpdateLeadForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::leads as leads_service;

#[get("/leads")]
pub async fn list_leads(
    params: web::Query<LeadsQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match leads_service::list_leads(&params, repo.get_ref()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(&err),
    }
}

#[get("/leads/export")]
pub async fn export_leads(
    params: web::Query<LeadsQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match leads_service::export_leads_csv(&params, repo.get_ref()) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"leads.csv\"",
            ))
            .body(csv),
        Err(err) => error_response(&err),
    }
}

#[post("/leads")]
pub async fn create_lead(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateLeadForm>,
) -> impl Responder {
    match leads_service::create_lead(form, repo.get_ref()) {
        Ok(lead) => HttpResponse::Created().json(lead),
        Err(err) => error_response(&err),
    }
}

#[patch("/leads/{id}")]
pub async fn update_lead(
    id: web::Path<String>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateLeadForm>,
) -> impl Responder {
    match leads_service::update_lead(&id, form, repo.get_ref()) {
        Ok(lead) => HttpResponse::Ok().json(lead),
        Err(err) => error_response(&err),
    }
}

#[delete("/leads/{id}")]
pub async fn delete_leads(
    ids: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let batch = ids.contains(',');
    match leads_service::delete_leads(&ids, repo.get_ref()) {
        Ok(outcome) => HttpResponse::Ok().json(DeleteResponse::new(outcome, batch)),
        Err(err) => error_response(&err),
    }
}
