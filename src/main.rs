use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use dateplan_api::routes;
use dateplan_api::services::gemini_service::GeminiClient;
use dateplan_api::services::geocoding_service::NominatimClient;
use dateplan_api::services::location_finder::CandidateFinder;
use dateplan_api::services::places_service::GooglePlacesClient;
use dateplan_api::services::plan_service::{DatePlanner, PlanConfig};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    let places = GooglePlacesClient::new().expect("GOOGLE_MAPS_API_KEY must be set");
    let geocoder = NominatimClient::new().expect("Failed to build geocoding client");
    let model = GeminiClient::new().expect("GEMINI_API_KEY must be set");
    println!("External service clients constructed");

    let planner = web::Data::new(DatePlanner::new(
        CandidateFinder::new(places),
        geocoder,
        model,
        PlanConfig::default(),
    ));

    println!("Starting HTTP server...");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .route("/health", web::get().to(routes::health::health_check))
            .app_data(planner.clone())
            .service(
                web::scope("/api").route("/plan", web::post().to(routes::plan::generate_plan)),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
