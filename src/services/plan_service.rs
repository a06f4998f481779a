use std::error::Error;
use std::fmt;

use crate::models::plan::{Itinerary, PlanMode, PlanRequest};
use crate::services::gemini_service::{GeminiClient, GeminiError, GenerativeModel};
use crate::services::geocoding_service::{Geocode, NominatimClient};
use crate::services::location_finder::CandidateFinder;
use crate::services::places_service::{GooglePlacesClient, PlaceSearch};
use crate::services::plan_assembler::{assemble, AssembleError};
use crate::services::prompt_builder::{
    build_curated_prompt, build_free_prompt, build_simple_prompt, TOOL_SCHEMAS,
};

const DEFAULT_TRANSPORT_MODE: &str = "walking";

/// Fewest candidates the search must yield before the model is consulted.
/// Must stay at or above the curated-mode minimum stop count.
const DEFAULT_MIN_CANDIDATES: usize = 3;

#[derive(Debug, Clone)]
pub struct PlanConfig {
    pub min_candidates: usize,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            min_candidates: DEFAULT_MIN_CANDIDATES,
        }
    }
}

#[derive(Debug)]
pub enum PlanError {
    MissingInput,
    LocationNotFound(String),
    InsufficientCandidates(usize),
    Generation(GeminiError),
    Assembly(AssembleError),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::MissingInput => {
                write!(f, "Provide a location, a locationName, or a prompt")
            }
            PlanError::LocationNotFound(name) => write!(f, "Location not found: {}", name),
            PlanError::InsufficientCandidates(count) => write!(
                f,
                "Only {} places found near that location, not enough to plan a date",
                count
            ),
            PlanError::Generation(err) => write!(f, "Plan generation failed: {}", err),
            PlanError::Assembly(err) => write!(f, "The model did not produce a valid plan: {}", err),
        }
    }
}

impl Error for PlanError {}

impl From<GeminiError> for PlanError {
    fn from(err: GeminiError) -> Self {
        PlanError::Generation(err)
    }
}

impl From<AssembleError> for PlanError {
    fn from(err: AssembleError) -> Self {
        PlanError::Assembly(err)
    }
}

/// Orchestrates one planning request: resolve the location, gather
/// candidates, compose the prompt, run the model, assemble the itinerary.
/// Collaborators are injected so tests can substitute fakes.
pub struct DatePlanner<S, G, M> {
    finder: CandidateFinder<S>,
    geocoder: G,
    model: M,
    config: PlanConfig,
}

/// The planner wired to the live clients, as constructed in `main`.
pub type LivePlanner = DatePlanner<GooglePlacesClient, NominatimClient, GeminiClient>;

impl<S, G, M> DatePlanner<S, G, M>
where
    S: PlaceSearch,
    G: Geocode,
    M: GenerativeModel,
{
    pub fn new(finder: CandidateFinder<S>, geocoder: G, model: M, config: PlanConfig) -> Self {
        Self {
            finder,
            geocoder,
            model,
            config,
        }
    }

    pub async fn plan(&self, request: &PlanRequest) -> Result<Itinerary, PlanError> {
        let vibe = request.date_vibe.as_deref();
        let transport = request
            .transport_mode
            .as_deref()
            .unwrap_or(DEFAULT_TRANSPORT_MODE);

        let coordinates = match (&request.location, &request.location_name) {
            (Some(location), _) => Some((location.lat, location.lng)),
            (None, Some(name)) => match self.geocoder.resolve_by_name(name).await {
                Ok(coordinates) => Some(coordinates),
                Err(err) => {
                    eprintln!("Forward geocoding '{}' failed: {}", name, err);
                    return Err(PlanError::LocationNotFound(name.clone()));
                }
            },
            (None, None) => None,
        };

        match (coordinates, request.prompt.as_deref()) {
            (Some((lat, lng)), None) => {
                self.plan_curated(lat, lng, vibe, transport, request.is_adult)
                    .await
            }
            (Some((lat, lng)), Some(prompt)) => {
                self.plan_free_form(lat, lng, prompt, vibe, transport, request.is_adult)
                    .await
            }
            (None, Some(prompt)) => self.plan_simple(prompt).await,
            (None, None) => Err(PlanError::MissingInput),
        }
    }

    async fn plan_curated(
        &self,
        lat: f64,
        lng: f64,
        vibe: Option<&str>,
        transport: &str,
        is_adult: bool,
    ) -> Result<Itinerary, PlanError> {
        let vibe_keyword = vibe.unwrap_or("");
        let candidates = self
            .finder
            .find(lat, lng, vibe_keyword, transport, is_adult)
            .await;

        if candidates.len() < self.config.min_candidates {
            println!(
                "Only {} candidates near ({}, {}), refusing to plan",
                candidates.len(),
                lat,
                lng
            );
            return Err(PlanError::InsufficientCandidates(candidates.len()));
        }

        let area = self.geocoder.describe_area(lat, lng).await;
        println!(
            "Planning a {} date in {} from {} candidates",
            vibe.unwrap_or("surprise"),
            area,
            candidates.len()
        );

        let prompt = build_curated_prompt(
            &candidates,
            &area,
            vibe.unwrap_or("memorable"),
            transport,
            is_adult,
        );
        let outcome = self.model.generate(&prompt, &TOOL_SCHEMAS).await?;

        Ok(assemble(&outcome, PlanMode::Curated, vibe)?)
    }

    async fn plan_free_form(
        &self,
        lat: f64,
        lng: f64,
        user_prompt: &str,
        vibe: Option<&str>,
        transport: &str,
        is_adult: bool,
    ) -> Result<Itinerary, PlanError> {
        let area = self.geocoder.describe_area(lat, lng).await;

        let prompt = build_free_prompt(
            &area,
            user_prompt,
            vibe.unwrap_or("memorable"),
            transport,
            is_adult,
        );
        let outcome = self.model.generate(&prompt, &TOOL_SCHEMAS).await?;

        Ok(assemble(&outcome, PlanMode::FreeForm, vibe)?)
    }

    async fn plan_simple(&self, user_prompt: &str) -> Result<Itinerary, PlanError> {
        let prompt = build_simple_prompt(user_prompt);
        let outcome = self.model.generate(&prompt, &TOOL_SCHEMAS).await?;

        Ok(assemble(&outcome, PlanMode::Simple, None)?)
    }
}
