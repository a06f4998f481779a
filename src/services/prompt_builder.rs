//! Builds the instruction payloads for the generative model. Three variants
//! share the same two function-calling schemas: a curated prompt constrained
//! to a candidate list, a free-form prompt anchored to a described area, and
//! a simple prompt driven entirely by the user's own text.

use std::sync::LazyLock;

use chrono::Local;
use serde_json::{json, Value};

use crate::models::place::PlaceRecord;
use crate::services::gemini_service::PlanPrompt;

pub static TOOL_SCHEMAS: LazyLock<Vec<Value>> = LazyLock::new(|| {
    vec![
        json!({
            "name": "create_date_stop",
            "description": "Add one stop to the date itinerary. Call once per stop, in visit order.",
            "parameters": {
                "type": "object",
                "properties": {
                    "stopNumber": { "type": "integer", "description": "Position in the itinerary, starting at 1" },
                    "name": { "type": "string", "description": "Venue name" },
                    "description": { "type": "string", "description": "One or two sentences on what to do here and why it fits" },
                    "address": { "type": "string", "description": "Street address of the venue" },
                    "lat": { "type": "number" },
                    "lng": { "type": "number" },
                    "category": { "type": "string", "enum": ["Food", "Cafe", "Bar", "Activity", "Park", "Shop"] },
                    "startTime": { "type": "string", "description": "Suggested arrival time, e.g. '6:30 PM'" },
                    "duration": { "type": "string", "description": "Suggested length of the visit, e.g. '1 hour'" }
                },
                "required": ["stopNumber", "name", "description", "address", "lat", "lng", "category", "startTime", "duration"]
            }
        }),
        json!({
            "name": "create_travel_leg",
            "description": "Describe the travel between two consecutive stops.",
            "parameters": {
                "type": "object",
                "properties": {
                    "fromStop": { "type": "integer", "description": "stopNumber of the departure stop" },
                    "toStop": { "type": "integer", "description": "stopNumber of the arrival stop" },
                    "transportMode": { "type": "string", "description": "How the couple gets there, e.g. 'walking'" },
                    "travelTime": { "type": "string", "description": "Rough travel estimate, e.g. '10 minutes'" }
                },
                "required": ["fromStop", "toStop", "transportMode", "travelTime"]
            }
        }),
    ]
});

fn date_context() -> String {
    format!("Today is {}.", Local::now().format("%A, %B %e, %Y"))
}

fn audience_line(is_adult: bool) -> &'static str {
    if is_adult {
        "The couple are adults: bars, wineries, and late-night venues are all fair game."
    } else {
        "Keep every stop all-ages friendly; do not include bars or venues centered on alcohol."
    }
}

/// Curated mode: the model selects and narrates, it does not invent venues.
pub fn build_curated_prompt(
    candidates: &[PlaceRecord],
    area: &str,
    vibe: &str,
    transport_mode: &str,
    is_adult: bool,
) -> PlanPrompt {
    let candidate_list =
        serde_json::to_string_pretty(candidates).unwrap_or_else(|_| "[]".to_string());

    let system_instruction = format!(
        "You are a thoughtful local date planner. Build a date itinerary of 3 to 5 stops \
         in {area} with a {vibe} vibe, visited by {transport}.\n\
         {audience}\n\
         {date}\n\n\
         You are given a list of real candidate venues. Every stop you choose MUST come \
         from this list: copy its name, address, lat, lng, and category exactly as given. \
         Do not invent venues and do not alter coordinates.\n\n\
         Candidate venues:\n{candidates}\n\n\
         Emit the plan by calling create_date_stop once per stop (stopNumber starting at 1, \
         in visit order) and create_travel_leg for each pair of consecutive stops, using \
         {transport} as the transport mode. Begin your text reply with a short, catchy \
         title for the date on its own first line, then a one-paragraph summary.",
        area = area,
        vibe = vibe,
        transport = transport_mode,
        audience = audience_line(is_adult),
        date = date_context(),
        candidates = candidate_list,
    );

    PlanPrompt {
        system_instruction,
        user_message: format!("Plan a {} date for us.", vibe),
    }
}

/// Context-aware free mode: no candidate list, but the venues must be real
/// places in the described area.
pub fn build_free_prompt(
    area: &str,
    user_prompt: &str,
    vibe: &str,
    transport_mode: &str,
    is_adult: bool,
) -> PlanPrompt {
    let system_instruction = format!(
        "You are a thoughtful local date planner with deep knowledge of real venues. \
         Build a date itinerary of 3 to 5 stops in {area} with a {vibe} vibe, visited \
         by {transport}. Only use real venues you know exist in that area, with their \
         real addresses and coordinates.\n\
         {audience}\n\
         {date}\n\n\
         Emit the plan by calling create_date_stop once per stop (stopNumber starting at 1, \
         in visit order) and create_travel_leg for each pair of consecutive stops, using \
         {transport} as the transport mode. Begin your text reply with a short, catchy \
         title for the date on its own first line, then a one-paragraph summary.",
        area = area,
        vibe = vibe,
        transport = transport_mode,
        audience = audience_line(is_adult),
        date = date_context(),
    );

    PlanPrompt {
        system_instruction,
        user_message: user_prompt.to_string(),
    }
}

/// Simple mode: a general-purpose multi-stop day plan from free text alone.
pub fn build_simple_prompt(user_prompt: &str) -> PlanPrompt {
    let system_instruction = format!(
        "You are a day-planning assistant. Turn the user's request into a multi-stop \
         plan, typically 4 to 6 stops.\n\
         {date}\n\n\
         Preferably emit the plan by calling create_date_stop once per stop (stopNumber \
         starting at 1) and create_travel_leg between consecutive stops. If you cannot \
         use the tools, reply instead with a single JSON object of the shape \
         {{\"planTitle\": string, \"stops\": [{{\"name\", \"description\", \"address\", \
         \"lat\", \"lng\", \"category\", \"startTime\", \"duration\"}}]}}. Begin any text \
         reply with a short title on its own first line.",
        date = date_context(),
    );

    PlanPrompt {
        system_instruction,
        user_message: user_prompt.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::place::Category;

    fn candidate() -> PlaceRecord {
        PlaceRecord {
            name: "Harbour View Cafe".to_string(),
            address: "3 Pier Rd".to_string(),
            lat: -33.85,
            lng: 151.21,
            category: Category::Cafe,
        }
    }

    #[test]
    fn test_tool_schemas_declare_both_calls() {
        let names: Vec<&str> = TOOL_SCHEMAS
            .iter()
            .map(|schema| schema["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["create_date_stop", "create_travel_leg"]);

        for schema in TOOL_SCHEMAS.iter() {
            assert!(schema["parameters"]["required"].is_array());
        }
    }

    #[test]
    fn test_curated_prompt_embeds_candidates_and_constraint() {
        let prompt = build_curated_prompt(
            &[candidate()],
            "the Rocks area of Sydney",
            "romantic",
            "walking",
            false,
        );

        assert!(prompt.system_instruction.contains("Harbour View Cafe"));
        assert!(prompt.system_instruction.contains("3 Pier Rd"));
        assert!(prompt.system_instruction.contains("MUST come"));
        assert!(prompt.system_instruction.contains("the Rocks area of Sydney"));
        assert!(prompt.system_instruction.contains("all-ages"));
    }

    #[test]
    fn test_adult_wording_switches() {
        let prompt = build_curated_prompt(&[candidate()], "town", "romantic", "walking", true);
        assert!(prompt.system_instruction.contains("late-night"));
        assert!(!prompt.system_instruction.contains("all-ages"));
    }

    #[test]
    fn test_free_prompt_has_no_candidate_list() {
        let prompt = build_free_prompt("the Mission", "somewhere quiet", "artsy", "transit", false);
        assert!(!prompt.system_instruction.contains("Candidate venues"));
        assert!(prompt.system_instruction.contains("real venues"));
        assert_eq!(prompt.user_message, "somewhere quiet");
    }

    #[test]
    fn test_simple_prompt_mentions_json_fallback() {
        let prompt = build_simple_prompt("a rainy saturday with kids");
        assert!(prompt.system_instruction.contains("planTitle"));
        assert_eq!(prompt.user_message, "a rainy saturday with kids");
    }
}
