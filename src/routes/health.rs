use actix_web::{HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check() -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let places_result = check_api_key("GOOGLE_MAPS_API_KEY", "Places API");
    health
        .services
        .insert("places".to_string(), places_result.clone());

    let gemini_result = check_api_key("GEMINI_API_KEY", "Gemini API");
    health
        .services
        .insert("gemini".to_string(), gemini_result.clone());

    // Nominatim needs no key; report which instance is configured.
    let geocoding_result = ServiceStatus {
        status: "ok".to_string(),
        details: Some(format!(
            "Using {}",
            env::var("NOMINATIM_BASE_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string())
        )),
    };
    health
        .services
        .insert("geocoding".to_string(), geocoding_result);

    if places_result.status != "ok" || gemini_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

fn check_api_key(var: &str, label: &str) -> ServiceStatus {
    match env::var(var) {
        Ok(key) => {
            let masked_key = if key.len() > 8 {
                format!("{}***{}", &key[0..4], &key[key.len() - 4..])
            } else {
                "***".to_string()
            };

            ServiceStatus {
                status: "ok".to_string(),
                details: Some(format!("{} key configured ({})", label, masked_key)),
            }
        }
        Err(_) => ServiceStatus {
            status: "error".to_string(),
            details: Some(format!("{} not configured", var)),
        },
    }
}
