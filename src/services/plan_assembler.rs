//! Reconciles the model's raw output into an ordered, validated itinerary.
//! The model answers either with tagged function calls (one per stop or
//! travel leg, in no guaranteed order) or with a single JSON object embedded
//! in free text; both forms funnel into the same `Itinerary`.

use std::error::Error;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::models::place::Category;
use crate::models::plan::{Itinerary, PlanMode, PlanStop, StopDraft, TravelLegDraft};
use crate::services::gemini_service::{FunctionCall, GenerationOutcome};

pub const STOP_CALL: &str = "create_date_stop";
pub const TRAVEL_LEG_CALL: &str = "create_travel_leg";

#[derive(Debug)]
pub enum AssembleError {
    TooFewStops { got: usize, needed: usize },
    NoJsonObject,
    InvalidJson(String),
    NoUsableStops,
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssembleError::TooFewStops { got, needed } => {
                write!(f, "Model produced {} valid stops, need at least {}", got, needed)
            }
            AssembleError::NoJsonObject => write!(f, "No JSON object found in the model response"),
            AssembleError::InvalidJson(msg) => write!(f, "Failed to parse plan JSON: {}", msg),
            AssembleError::NoUsableStops => {
                write!(f, "No stops with usable coordinates in the model response")
            }
        }
    }
}

impl Error for AssembleError {}

/// One structured call from the model, validated at the boundary. Payloads
/// that do not hold up are rejected rather than trusted.
#[derive(Debug)]
pub enum PlannerCall {
    CreateDateStop(StopDraft),
    CreateTravelLeg(TravelLegDraft),
}

impl PlannerCall {
    pub fn from_function_call(call: &FunctionCall) -> Option<Self> {
        match call.name.as_str() {
            STOP_CALL => stop_from_args(&call.args).map(PlannerCall::CreateDateStop),
            TRAVEL_LEG_CALL => leg_from_args(&call.args).map(PlannerCall::CreateTravelLeg),
            _ => None,
        }
    }
}

/// Builds the final itinerary out of the model's output for the given mode.
pub fn assemble(
    outcome: &GenerationOutcome,
    mode: PlanMode,
    vibe: Option<&str>,
) -> Result<Itinerary, AssembleError> {
    if outcome.function_calls.is_empty() {
        assemble_from_text(&outcome.text, mode, vibe)
    } else {
        assemble_from_calls(outcome, mode, vibe)
    }
}

fn assemble_from_calls(
    outcome: &GenerationOutcome,
    mode: PlanMode,
    vibe: Option<&str>,
) -> Result<Itinerary, AssembleError> {
    let mut stops: Vec<StopDraft> = Vec::new();
    let mut legs: Vec<TravelLegDraft> = Vec::new();

    for call in &outcome.function_calls {
        match PlannerCall::from_function_call(call) {
            Some(PlannerCall::CreateDateStop(stop)) => stops.push(stop),
            Some(PlannerCall::CreateTravelLeg(leg)) => legs.push(leg),
            None => eprintln!("Skipping malformed planner call '{}'", call.name),
        }
    }

    let needed = mode.min_stops();
    if stops.len() < needed {
        return Err(AssembleError::TooFewStops {
            got: stops.len(),
            needed,
        });
    }

    // Numeric order only; gaps and duplicate numbers are tolerated and the
    // sort is stable among them.
    stops.sort_by_key(|stop| stop.stop_number);

    let stops = stops
        .into_iter()
        .map(|stop| {
            let travel_to_next = legs
                .iter()
                .find(|leg| leg.from_stop == stop.stop_number)
                .cloned();
            PlanStop {
                stop,
                travel_to_next,
            }
        })
        .collect();

    Ok(Itinerary {
        plan_title: extract_title(&outcome.text).unwrap_or_else(|| fallback_title(vibe)),
        stops,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct JsonPlan {
    plan_title: String,
    stops: Vec<JsonStop>,
}

impl Default for JsonPlan {
    fn default() -> Self {
        Self {
            plan_title: String::new(),
            stops: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct JsonStop {
    name: String,
    description: String,
    address: String,
    lat: Value,
    lng: Value,
    category: Option<String>,
    start_time: String,
    duration: String,
}

fn assemble_from_text(
    text: &str,
    mode: PlanMode,
    vibe: Option<&str>,
) -> Result<Itinerary, AssembleError> {
    let blob = extract_json_object(text).ok_or(AssembleError::NoJsonObject)?;
    let plan: JsonPlan =
        serde_json::from_str(blob).map_err(|e| AssembleError::InvalidJson(e.to_string()))?;

    let total = plan.stops.len();
    let mut stops = Vec::new();
    for (index, stop) in plan.stops.into_iter().enumerate() {
        let (lat, lng) = match (value_as_f64(&stop.lat), value_as_f64(&stop.lng)) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => {
                eprintln!(
                    "Dropping stop '{}' with unparseable coordinates",
                    stop.name
                );
                continue;
            }
        };

        let category = stop
            .category
            .as_deref()
            .map(Category::from_label)
            .unwrap_or(Category::Activity);

        stops.push(PlanStop {
            stop: StopDraft {
                stop_number: (index + 1) as u32,
                name: stop.name,
                description: stop.description,
                address: stop.address,
                lat,
                lng,
                category,
                start_time: stop.start_time,
                duration: stop.duration,
            },
            travel_to_next: None,
        });
    }

    if stops.is_empty() && total > 0 {
        return Err(AssembleError::NoUsableStops);
    }
    let needed = mode.min_stops();
    if stops.len() < needed {
        return Err(AssembleError::TooFewStops {
            got: stops.len(),
            needed,
        });
    }

    let plan_title = if plan.plan_title.trim().is_empty() {
        fallback_title(vibe)
    } else {
        plan.plan_title.trim().to_string()
    };

    Ok(Itinerary {
        plan_title,
        stops,
    })
}

fn stop_from_args(args: &Value) -> Option<StopDraft> {
    let stop_number = value_as_u32(args.get("stopNumber")?)?;
    if stop_number == 0 {
        return None;
    }
    let name = required_string(args, "name")?;
    let address = required_string(args, "address")?;
    let description = args.get("description")?.as_str()?.to_string();
    let start_time = args.get("startTime")?.as_str()?.to_string();
    let duration = args.get("duration")?.as_str()?.to_string();
    let lat = value_as_f64(args.get("lat")?)?;
    let lng = value_as_f64(args.get("lng")?)?;
    let category = Category::from_label(args.get("category")?.as_str()?);

    Some(StopDraft {
        stop_number,
        name,
        description,
        address,
        lat,
        lng,
        category,
        start_time,
        duration,
    })
}

fn leg_from_args(args: &Value) -> Option<TravelLegDraft> {
    Some(TravelLegDraft {
        from_stop: value_as_u32(args.get("fromStop")?)?,
        to_stop: value_as_u32(args.get("toStop")?)?,
        transport_mode: args.get("transportMode")?.as_str()?.to_string(),
        travel_time: args.get("travelTime")?.as_str()?.to_string(),
    })
}

fn required_string(args: &Value, key: &str) -> Option<String> {
    let value = args.get(key)?.as_str()?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Accepts JSON numbers as well as numeric strings ("12.3"); anything that
/// does not land on a finite float is rejected.
fn value_as_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

fn value_as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// The span between the first `{` and the last `}` of the response text.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// First non-empty free-text line, with markdown heading markers shaved off.
/// The title convention is prompt-enforced only, so this is best effort.
fn extract_title(text: &str) -> Option<String> {
    let line = text.lines().find(|line| !line.trim().is_empty())?;
    let title = line.trim().trim_matches(['#', '*', ' ']).trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

fn fallback_title(vibe: Option<&str>) -> String {
    match vibe.map(str::trim).filter(|v| !v.is_empty()) {
        Some(vibe) => {
            let mut chars = vibe.chars();
            let capitalized = match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            };
            format!("A Great {} Date", capitalized)
        }
        None => "A Great Date Out".to_string(),
    }
}
