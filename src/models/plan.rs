use serde::{Deserialize, Serialize};

use super::place::Category;

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Inbound payload for the single planning endpoint. Exactly one of
/// `location`, `location_name`, or `prompt` is enough to pick a mode; the
/// rest of the fields tune the search.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub location: Option<Coordinates>,
    pub location_name: Option<String>,
    pub prompt: Option<String>,
    pub date_vibe: Option<String>,
    pub transport_mode: Option<String>,
    #[serde(default)]
    pub is_adult: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum PlanMode {
    Curated,
    FreeForm,
    Simple,
}

impl PlanMode {
    /// Fewest stops a generated plan may contain in this mode.
    pub fn min_stops(&self) -> usize {
        match self {
            PlanMode::Curated => 2,
            PlanMode::FreeForm => 2,
            PlanMode::Simple => 1,
        }
    }
}

/// One itinerary stop as emitted by the AI model, before travel legs are
/// attached. `stop_number` is the model-assigned sequence position.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StopDraft {
    pub stop_number: u32,
    pub name: String,
    pub description: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub category: Category,
    pub start_time: String,
    pub duration: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TravelLegDraft {
    pub from_stop: u32,
    pub to_stop: u32,
    pub transport_mode: String,
    pub travel_time: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlanStop {
    #[serde(flatten)]
    pub stop: StopDraft,
    pub travel_to_next: Option<TravelLegDraft>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub plan_title: String,
    pub stops: Vec<PlanStop>,
}
