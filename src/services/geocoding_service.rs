use std::env;
use std::error::Error;
use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const USER_AGENT: &str = concat!("dateplan-api/", env!("CARGO_PKG_VERSION"));

/// Phrase used when reverse geocoding fails. Area description is cosmetic
/// context for the AI prompt, so a failure degrades instead of surfacing.
const FALLBACK_AREA: &str = "the local area";

#[derive(Debug, Deserialize)]
struct ForwardMatch {
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: ReverseAddress,
}

#[derive(Debug, Deserialize, Default)]
pub struct ReverseAddress {
    pub suburb: Option<String>,
    pub neighbourhood: Option<String>,
    pub quarter: Option<String>,
    pub road: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
}

#[derive(Debug)]
pub enum GeocodingError {
    NotFound(String),
    HttpError(reqwest::Error),
    ResponseError(String),
}

impl fmt::Display for GeocodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodingError::NotFound(query) => write!(f, "No match for location '{}'", query),
            GeocodingError::HttpError(err) => write!(f, "HTTP error: {}", err),
            GeocodingError::ResponseError(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl Error for GeocodingError {}

impl From<reqwest::Error> for GeocodingError {
    fn from(err: reqwest::Error) -> Self {
        GeocodingError::HttpError(err)
    }
}

/// Geocoding capability: free-text place name to coordinates, and
/// coordinates to a short human-readable area phrase.
pub trait Geocode {
    async fn resolve_by_name(&self, query: &str) -> Result<(f64, f64), GeocodingError>;
    async fn describe_area(&self, lat: f64, lng: f64) -> String;
}

#[derive(Clone)]
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new() -> Result<Self, GeocodingError> {
        let base_url =
            env::var("NOMINATIM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, base_url })
    }

    async fn reverse(&self, lat: f64, lng: f64) -> Result<ReverseAddress, GeocodingError> {
        let mut url = Url::parse(&format!("{}/reverse", self.base_url))
            .map_err(|e| GeocodingError::ResponseError(format!("Invalid reverse URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("lat", &lat.to_string())
            .append_pair("lon", &lng.to_string())
            .append_pair("format", "json");

        let response: ReverseResponse = self.client.get(url).send().await?.json().await?;
        Ok(response.address)
    }
}

impl Geocode for NominatimClient {
    async fn resolve_by_name(&self, query: &str) -> Result<(f64, f64), GeocodingError> {
        let mut url = Url::parse(&format!("{}/search", self.base_url))
            .map_err(|e| GeocodingError::ResponseError(format!("Invalid search URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("limit", "1");

        let matches: Vec<ForwardMatch> = self.client.get(url).send().await?.json().await?;

        let top = matches
            .first()
            .ok_or_else(|| GeocodingError::NotFound(query.to_string()))?;

        let lat: f64 = top.lat.parse().map_err(|_| {
            GeocodingError::ResponseError(format!("Unparseable latitude '{}'", top.lat))
        })?;
        let lng: f64 = top.lon.parse().map_err(|_| {
            GeocodingError::ResponseError(format!("Unparseable longitude '{}'", top.lon))
        })?;

        Ok((lat, lng))
    }

    async fn describe_area(&self, lat: f64, lng: f64) -> String {
        match self.reverse(lat, lng).await {
            Ok(address) => compose_area_phrase(&address).unwrap_or_else(|| FALLBACK_AREA.to_string()),
            Err(err) => {
                eprintln!("Reverse geocoding ({}, {}) failed: {}", lat, lng, err);
                FALLBACK_AREA.to_string()
            }
        }
    }
}

/// Builds "the {area} area of {city}" from the most specific administrative
/// unit available, dropping the city clause when none resolves.
fn compose_area_phrase(address: &ReverseAddress) -> Option<String> {
    let area = address
        .suburb
        .as_deref()
        .or(address.neighbourhood.as_deref())
        .or(address.quarter.as_deref())
        .or(address.road.as_deref())?;

    let city = address.city.as_deref().or(address.town.as_deref());

    Some(match city {
        Some(city) => format!("the {} area of {}", area, city),
        None => area.to_string(),
    })
}
