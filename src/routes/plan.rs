use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::models::plan::PlanRequest;
use crate::services::plan_service::{LivePlanner, PlanError};

/*
    /api/plan
*/
pub async fn generate_plan(
    data: web::Data<LivePlanner>,
    input: web::Json<PlanRequest>,
) -> impl Responder {
    let request = input.into_inner();

    match data.plan(&request).await {
        Ok(itinerary) => HttpResponse::Ok().json(itinerary),
        Err(err) => {
            eprintln!("Plan request failed: {}", err);
            let body = json!({ "error": err.to_string() });
            match err {
                PlanError::MissingInput => HttpResponse::BadRequest().json(body),
                PlanError::LocationNotFound(_) => HttpResponse::NotFound().json(body),
                PlanError::InsufficientCandidates(_) => {
                    HttpResponse::UnprocessableEntity().json(body)
                }
                PlanError::Generation(_) | PlanError::Assembly(_) => {
                    HttpResponse::InternalServerError().json(body)
                }
            }
        }
    }
}
