use actix_web::{test, web, App};
use serde_json::json;
use serial_test::serial;

use dateplan_api::models::place::Category;
use dateplan_api::models::plan::{Itinerary, PlanStop, StopDraft, TravelLegDraft};
use dateplan_api::routes;
use dateplan_api::services::gemini_service::GeminiClient;
use dateplan_api::services::geocoding_service::NominatimClient;
use dateplan_api::services::location_finder::CandidateFinder;
use dateplan_api::services::places_service::GooglePlacesClient;
use dateplan_api::services::plan_service::{DatePlanner, LivePlanner, PlanConfig};

/// Builds the live planner against dummy credentials. The tests below only
/// exercise request validation, which never reaches an upstream service.
fn test_planner() -> web::Data<LivePlanner> {
    std::env::set_var("GOOGLE_MAPS_API_KEY", "test-places-key");
    std::env::set_var("GEMINI_API_KEY", "test-gemini-key");

    let places = GooglePlacesClient::new().expect("places client");
    let geocoder = NominatimClient::new().expect("geocoding client");
    let model = GeminiClient::new().expect("gemini client");

    web::Data::new(DatePlanner::new(
        CandidateFinder::new(places),
        geocoder,
        model,
        PlanConfig::default(),
    ))
}

#[actix_web::test]
#[serial]
async fn test_empty_request_is_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(test_planner())
            .route("/api/plan", web::post().to(routes::plan::generate_plan)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/plan")
        .set_json(&json!({}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("Provide a location"));
}

#[actix_web::test]
#[serial]
async fn test_preferences_without_location_are_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(test_planner())
            .route("/api/plan", web::post().to(routes::plan::generate_plan)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/plan")
        .set_json(&json!({
            "dateVibe": "romantic",
            "transportMode": "walking",
            "isAdult": true
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
#[serial]
async fn test_malformed_body_is_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(test_planner())
            .route("/api/plan", web::post().to(routes::plan::generate_plan)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/plan")
        .insert_header(("content-type", "application/json"))
        .set_payload("not json at all")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}

#[actix_web::test]
#[serial]
async fn test_health_reports_configured_services() {
    std::env::set_var("GOOGLE_MAPS_API_KEY", "test-places-key");
    std::env::set_var("GEMINI_API_KEY", "test-gemini-key");

    let app = test::init_service(
        App::new().route("/health", web::get().to(routes::health::health_check)),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["services"]["places"]["status"], "ok");
    assert_eq!(body["services"]["gemini"]["status"], "ok");
}

#[::core::prelude::v1::test]
fn test_itinerary_wire_shape_is_camel_case() {
    let itinerary = Itinerary {
        plan_title: "Evening in Fitzroy".to_string(),
        stops: vec![PlanStop {
            stop: StopDraft {
                stop_number: 1,
                name: "Naked for Satan".to_string(),
                description: "Rooftop pintxos to start.".to_string(),
                address: "285 Brunswick St".to_string(),
                lat: -37.796,
                lng: 144.978,
                category: Category::Bar,
                start_time: "6:00 PM".to_string(),
                duration: "1 hour".to_string(),
            },
            travel_to_next: Some(TravelLegDraft {
                from_stop: 1,
                to_stop: 2,
                transport_mode: "walking".to_string(),
                travel_time: "5 minutes".to_string(),
            }),
        }],
    };

    let body = serde_json::to_value(&itinerary).unwrap();
    assert_eq!(body["planTitle"], "Evening in Fitzroy");
    assert_eq!(body["stops"][0]["stopNumber"], 1);
    assert_eq!(body["stops"][0]["category"], "Bar");
    assert_eq!(body["stops"][0]["travelToNext"]["fromStop"], 1);
    assert_eq!(body["stops"][0]["travelToNext"]["travelTime"], "5 minutes");
}
