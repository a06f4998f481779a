use std::env;
use std::error::Error;
use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::services::search_params::SearchSpec;

const NEARBY_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<NearbyPlace>,
}

/// One raw venue as the places provider reports it.
#[derive(Debug, Deserialize, Clone)]
pub struct NearbyPlace {
    pub name: String,
    pub vicinity: Option<String>,
    pub geometry: Geometry,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug)]
pub enum PlacesError {
    EnvironmentError(String),
    HttpError(reqwest::Error),
    ResponseError(String),
}

impl fmt::Display for PlacesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacesError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
            PlacesError::HttpError(err) => write!(f, "HTTP error: {}", err),
            PlacesError::ResponseError(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl Error for PlacesError {}

impl From<reqwest::Error> for PlacesError {
    fn from(err: reqwest::Error) -> Self {
        PlacesError::HttpError(err)
    }
}

/// Nearby-place search capability. Implemented by the live Google Places
/// client below; tests substitute counting fakes.
pub trait PlaceSearch {
    async fn nearby(&self, spec: &SearchSpec) -> Result<Vec<NearbyPlace>, PlacesError>;
}

#[derive(Clone)]
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
}

impl GooglePlacesClient {
    pub fn new() -> Result<Self, PlacesError> {
        let api_key = env::var("GOOGLE_MAPS_API_KEY").map_err(|_| {
            PlacesError::EnvironmentError("GOOGLE_MAPS_API_KEY environment variable not set".to_string())
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, api_key })
    }

    fn build_url(&self, spec: &SearchSpec) -> Result<Url, PlacesError> {
        let mut url = Url::parse(NEARBY_SEARCH_URL)
            .map_err(|e| PlacesError::ResponseError(format!("Invalid search URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("location", &format!("{},{}", spec.lat, spec.lng))
            .append_pair("radius", &spec.radius_meters.to_string())
            .append_pair("keyword", &spec.keyword)
            .append_pair("key", &self.api_key);
        Ok(url)
    }
}

impl PlaceSearch for GooglePlacesClient {
    async fn nearby(&self, spec: &SearchSpec) -> Result<Vec<NearbyPlace>, PlacesError> {
        let url = self.build_url(spec)?;

        let response = self.client.get(url).send().await?;
        let response_text = response.text().await?;

        let search_response: NearbySearchResponse = serde_json::from_str(&response_text)
            .map_err(|e| {
                PlacesError::ResponseError(format!(
                    "Failed to parse places response: {}. Response: {}",
                    e, response_text
                ))
            })?;

        match search_response.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(search_response.results),
            status => Err(PlacesError::ResponseError(format!(
                "Places API error: {}",
                status
            ))),
        }
    }
}
