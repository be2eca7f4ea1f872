//! Router-level tests for the full lead lifecycle: scrape with dedup, patch,
//! enrich, pitch generation and CSV export.

use axum::{
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

mod test_utils;
use test_utils::{TEST_TOKEN, insert_lead, setup_test_app};

fn authed(builder: axum::http::request::Builder) -> axum::http::request::Builder {
    builder.header(AUTHORIZATION, format!("Bearer {}", TEST_TOKEN))
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn api_routes_require_bearer_token() {
    let (_state, app) = setup_test_app("http://localhost:9").await.unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/leads")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn root_is_unauthenticated() {
    let (_state, app) = setup_test_app("http://localhost:9").await.unwrap();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["service"], "leadscout");
}

#[tokio::test]
async fn scrape_skips_duplicates_and_reports_summary() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(
            "/v2/acts/compass~google-maps-extractor/run-sync-get-dataset-items",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "title": "GroenTotaal",
                "address": "Lange Laan 1, Rotterdam, Nederland",
                "city": "Rotterdam",
                "postalCode": "3011 AB"
            },
            {
                "title": "De Tuinman",
                "address": "Dorpsstraat 5, Delft, Nederland",
                "city": "Delft",
                "postalCode": "2611 AA"
            }
        ])))
        .mount(&mock_server)
        .await;

    let (state, app) = setup_test_app(&mock_server.uri()).await.unwrap();

    // Already present, so the first listing is a duplicate.
    insert_lead(&state.db, "GroenTotaal", "Rotterdam").await.unwrap();

    let response = app
        .oneshot(
            authed(Request::builder().method("POST").uri("/api/scrape"))
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"max_leads": 10, "auto_enrich": false}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["leads_found"], 1);
    assert_eq!(body["message"], "Succesvol 1 leads gescraped");
}

#[tokio::test]
async fn scrape_maps_provider_failure_returns_502() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("actor crashed"))
        .mount(&mock_server)
        .await;

    let (_state, app) = setup_test_app(&mock_server.uri()).await.unwrap();

    let response = app
        .oneshot(
            authed(Request::builder().method("POST").uri("/api/scrape"))
                .header("content-type", "application/json")
                .body(Body::from(json!({"auto_enrich": false}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert_eq!(body["code"], "PROVIDER_ERROR");
    assert_eq!(body["details"]["provider"], "maps");
}

#[tokio::test]
async fn list_leads_paginates_and_reports_total() {
    let (state, app) = setup_test_app("http://localhost:9").await.unwrap();

    insert_lead(&state.db, "Bedrijf Een", "Rotterdam").await.unwrap();
    insert_lead(&state.db, "Bedrijf Twee", "Delft").await.unwrap();
    insert_lead(&state.db, "Bedrijf Drie", "Leiden").await.unwrap();

    let response = app
        .oneshot(
            authed(Request::builder().uri("/api/leads?limit=2&offset=0"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["leads"].as_array().unwrap().len(), 2);
    assert_eq!(body["total"], 3);
    // Insertion order.
    assert_eq!(body["leads"][0]["company_name"], "Bedrijf Een");
}

#[tokio::test]
async fn patch_updates_call_review_fields() {
    let (state, app) = setup_test_app("http://localhost:9").await.unwrap();
    let lead = insert_lead(&state.db, "GroenTotaal", "Rotterdam").await.unwrap();

    let response = app
        .oneshot(
            authed(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/api/leads/{}", lead.id)),
            )
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "call_status": "interested",
                    "call_notes": "Terugbellen na de vakantie",
                    "contact_person": "Jan de Vries"
                })
                .to_string(),
            ))
            .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["call_status"], "interested");
    assert_eq!(body["call_notes"], "Terugbellen na de vakantie");
    assert_eq!(body["contact_person"], "Jan de Vries");
    // Call tracking does not advance the lifecycle stage.
    assert_eq!(body["status"], "scraped");
    assert!(!body["called_at"].is_null());
}

#[tokio::test]
async fn patch_unknown_lead_returns_404() {
    let (_state, app) = setup_test_app("http://localhost:9").await.unwrap();

    let response = app
        .oneshot(
            authed(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/api/leads/{}", uuid::Uuid::new_v4())),
            )
            .header("content-type", "application/json")
            .body(Body::from(json!({"call_notes": "x"}).to_string()))
            .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn enrich_merges_website_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(
            "/v2/acts/apify~website-content-crawler/run-sync-get-dataset-items",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"markdown": "Over ons: Wij zijn een familiebedrijf met ruime ervaring in \
                          tuinaanleg en snoeien voor particulieren in de regio Rotterdam. \
                          Ons team van 8 medewerkers staat voor u klaar."}
        ])))
        .mount(&mock_server)
        .await;

    let (state, app) = setup_test_app(&mock_server.uri()).await.unwrap();

    let repo = leadscout::repositories::LeadRepository::new(&state.db);
    let lead = repo
        .create(leadscout::repositories::CreateLeadRequest {
            source: "google_maps".to_string(),
            company_name: "GroenTotaal".to_string(),
            address: "Lange Laan 1, Rotterdam".to_string(),
            city: "Rotterdam".to_string(),
            postal_code: "3011 AB".to_string(),
            website: Some("https://groentotaal.nl".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let response = app
        .oneshot(
            authed(Request::builder().method("POST").uri("/api/enrich"))
                .header("content-type", "application/json")
                .body(Body::from(json!({"lead_ids": [lead.id]}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["leads_enriched"], 1);
    assert_eq!(body["message"], "Succesvol 1 leads verrijkt met website data");

    let repo = leadscout::repositories::LeadRepository::new(&state.db);
    let enriched = repo.get(lead.id).await.unwrap();
    assert_eq!(enriched.status, leadscout::models::lead::LeadStatus::Enriched);
    assert!(!enriched.services.is_empty());
    assert_eq!(enriched.employee_estimate, Some(8));
}

#[tokio::test]
async fn generate_pitch_for_single_lead() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "Goedemorgen, u spreekt met Uitbrekers."}]
        })))
        .mount(&mock_server)
        .await;

    let (state, app) = setup_test_app(&mock_server.uri()).await.unwrap();
    let lead = insert_lead(&state.db, "GroenTotaal", "Rotterdam").await.unwrap();

    let response = app
        .oneshot(
            authed(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/generate-pitch/{}", lead.id)),
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["pitch"], "Goedemorgen, u spreekt met Uitbrekers.");
    assert_eq!(body["status"], "pitch_ready");
    assert!(!body["pitch_generated_at"].is_null());
}

#[tokio::test]
async fn batch_pitch_continues_past_failures() {
    let mock_server = MockServer::start().await;

    // First call succeeds, everything after gets rate limited.
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "Eerste pitch"}]
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&mock_server)
        .await;

    let (state, app) = setup_test_app(&mock_server.uri()).await.unwrap();
    let first = insert_lead(&state.db, "Bedrijf Een", "Rotterdam").await.unwrap();
    let second = insert_lead(&state.db, "Bedrijf Twee", "Delft").await.unwrap();

    let response = app
        .oneshot(
            authed(Request::builder().method("POST").uri("/api/generate-pitches"))
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"lead_ids": [first.id, second.id]}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["pitches_generated"], 1);
    assert_eq!(body["message"], "Succesvol 1 pitches gegenereerd");
}

#[tokio::test]
async fn batch_pitch_with_no_existing_leads_returns_404() {
    let (_state, app) = setup_test_app("http://localhost:9").await.unwrap();

    let response = app
        .oneshot(
            authed(Request::builder().method("POST").uri("/api/generate-pitches"))
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"lead_ids": [uuid::Uuid::new_v4()]}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn export_csv_returns_attachment() {
    let (state, app) = setup_test_app("http://localhost:9").await.unwrap();
    insert_lead(&state.db, "GroenTotaal", "Rotterdam").await.unwrap();
    insert_lead(&state.db, "De Tuinman", "Delft").await.unwrap();

    let response = app
        .oneshot(
            authed(Request::builder().uri("/api/export/csv"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/csv; charset=utf-8"
    );
    let disposition = response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=leads_export_"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(csv.starts_with("Bedrijfsnaam,Eigenaar,Telefoon"));
    assert!(csv.contains("GroenTotaal"));
    assert!(csv.contains("De Tuinman"));
}

#[tokio::test]
async fn delete_lead_then_404() {
    let (state, app) = setup_test_app("http://localhost:9").await.unwrap();
    let lead = insert_lead(&state.db, "GroenTotaal", "Rotterdam").await.unwrap();

    let response = app
        .clone()
        .oneshot(
            authed(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/leads/{}", lead.id)),
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Lead verwijderd");

    let response = app
        .oneshot(
            authed(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/leads/{}", lead.id)),
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
