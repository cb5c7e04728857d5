use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use pushkind_leads::domain::types::LeadId;
use pushkind_leads::repository::{LeadListQuery, LeadReader};
use pushkind_leads::routes::configure;
use serde_json::{Value, json};

mod common;

macro_rules! app {
    ($test_db:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($test_db.repo()))
                .configure(configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_list_defaults_to_first_page_of_ten() {
    let test_db = common::TestDb::new("test_routes_list_defaults.db");
    let repo = test_db.repo();
    for n in 1..=12 {
        common::insert(&repo, n, common::new_lead(&format!("Lead {n:02}"), "Acme", 1, false));
    }
    let app = app!(test_db);

    let req = test::TestRequest::get().uri("/leads").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["count"], 12);
    assert_eq!(body["leads"].as_array().unwrap().len(), 10);
    assert_eq!(body["leads"][0]["name"], "Lead 01");
    assert_eq!(body["leads"][0]["lastContacted"], Value::Null);
}

#[actix_web::test]
async fn test_list_applies_filters_and_sort() {
    let test_db = common::TestDb::new("test_routes_list_filters.db");
    common::seed(&test_db.repo());
    let app = app!(test_db);

    let req = test::TestRequest::get()
        .uri("/leads?page=1&pageSize=2&stage=2&engaged=false&sortBy=company")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["count"], 2);
    assert_eq!(body["leads"][0]["company"], "Flux Technologies");
    assert_eq!(body["leads"][0]["lastContacted"], "2025-01-23");
    assert_eq!(body["leads"][1]["company"], "Prism Tech");
}

#[actix_web::test]
async fn test_list_rejects_malformed_parameters() {
    let test_db = common::TestDb::new("test_routes_list_bad_params.db");
    let app = app!(test_db);

    for uri in [
        "/leads?sortBy=email",
        "/leads?page=0",
        "/leads?pageSize=0",
        "/leads?page=abc",
        "/leads?stage=two",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string(), "{uri}");
    }
}

#[actix_web::test]
async fn test_create_with_empty_email_is_rejected_without_insert() {
    let test_db = common::TestDb::new("test_routes_create_invalid.db");
    let app = app!(test_db);

    let req = test::TestRequest::post()
        .uri("/leads")
        .set_json(json!({"name": "Emma Blake", "email": "", "company": "Flux"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "missing required fields: email");

    let (total, _) = test_db.repo().list_leads(&LeadListQuery::new()).unwrap();
    assert_eq!(total, 0);
}

#[actix_web::test]
async fn test_create_update_and_list_round_trip() {
    let test_db = common::TestDb::new("test_routes_round_trip.db");
    let app = app!(test_db);

    let req = test::TestRequest::post()
        .uri("/leads")
        .set_json(json!({
            "name": "Milo Park",
            "email": "milo.park@echo.com",
            "company": "Echo",
            "stage": 2,
            "engaged": false,
            "lastContacted": "2025-01-16"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["initials"], "MP");
    let id = created["id"].as_i64().unwrap();
    assert!((1..=LeadId::MAX_GENERATED).contains(&id));

    let req = test::TestRequest::patch()
        .uri(&format!("/leads/{id}"))
        .set_json(json!({"engaged": true, "lastContacted": null}))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["engaged"], true);
    assert_eq!(updated["lastContacted"], Value::Null);
    assert_eq!(updated["name"], "Milo Park");

    let req = test::TestRequest::get()
        .uri("/leads?search=MILO&engaged=true")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["leads"][0]["id"], id);
    assert_eq!(body["leads"][0]["engaged"], true);
}

#[actix_web::test]
async fn test_update_missing_lead_returns_not_found() {
    let test_db = common::TestDb::new("test_routes_update_missing.db");
    let app = app!(test_db);

    let req = test::TestRequest::patch()
        .uri("/leads/404")
        .set_json(json!({"stage": 3}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Lead not found");
}

#[actix_web::test]
async fn test_update_rejects_malformed_json() {
    let test_db = common::TestDb::new("test_routes_update_bad_json.db");
    let app = app!(test_db);

    let req = test::TestRequest::patch()
        .uri("/leads/1")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn test_batch_delete_reports_requested_and_deleted() {
    let test_db = common::TestDb::new("test_routes_batch_delete.db");
    let repo = test_db.repo();
    common::insert(&repo, 5, common::new_lead("Felix Gray", "Nova", 2, false));
    common::insert(&repo, 9, common::new_lead("Iris Cole", "Drift", 4, true));
    let app = app!(test_db);

    let req = test::TestRequest::delete().uri("/leads/5,7,9").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["requested"], 3);
    assert_eq!(body["deleted"], 2);
    assert_eq!(body["message"], "2 leads deleted successfully");

    let (total, _) = repo.list_leads(&LeadListQuery::new()).unwrap();
    assert_eq!(total, 0);
}

#[actix_web::test]
async fn test_single_delete_of_missing_lead_succeeds() {
    let test_db = common::TestDb::new("test_routes_single_delete.db");
    let app = app!(test_db);

    let req = test::TestRequest::delete().uri("/leads/12").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Lead deleted successfully");
    assert_eq!(body["deleted"], 0);
}

#[actix_web::test]
async fn test_delete_rejects_bad_id_list() {
    let test_db = common::TestDb::new("test_routes_delete_bad_ids.db");
    let app = app!(test_db);

    let req = test::TestRequest::delete().uri("/leads/5,abc").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_export_returns_filtered_csv() {
    let test_db = common::TestDb::new("test_routes_export.db");
    common::seed(&test_db.repo());
    let app = app!(test_db);

    let req = test::TestRequest::get()
        .uri("/leads/export?engaged=true")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "text/csv; charset=utf-8"
    );
    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines,
        vec![
            "id,name,email,company,stage,engaged,lastContacted,initials",
            "5,Iris Cole,iris.cole@driftanalytics.com,Drift Analytics,4,true,,IC",
            "4,Milo Park,milo.park@echo.com,Echo,2,true,2025-01-16,MP",
        ]
    );
}
