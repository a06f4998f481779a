//! Deterministic derivation of nearby-search parameters from the user's
//! transport mode, vibe, and age flag. Everything here is a static lookup
//! table so the orchestration layer stays free of keyword policy.

const DEFAULT_RADIUS_METERS: u32 = 3000;

const RADIUS_TABLE: &[(&str, u32)] = &[
    ("walking", 2000),
    ("transit", 5000),
    ("driving", 10000),
];

/// Disjunctive provider keywords per vibe, all-ages variant.
const VIBE_KEYWORDS: &[(&str, &str)] = &[
    (
        "romantic",
        "scenic viewpoint OR botanical garden OR waterfront promenade OR dessert cafe",
    ),
    (
        "adventurous",
        "hiking trail OR climbing gym OR escape room OR kayak rental",
    ),
    (
        "artsy",
        "art gallery OR museum OR street art OR pottery studio",
    ),
    (
        "foodie",
        "popular restaurant OR food market OR street food OR bakery",
    ),
    (
        "casual",
        "cafe OR arcade OR bowling alley OR ice cream shop",
    ),
];

/// Disjunctive provider keywords per vibe, adult variant.
const VIBE_KEYWORDS_ADULT: &[(&str, &str)] = &[
    (
        "romantic",
        "wine bar OR cocktail lounge OR rooftop bar OR jazz club",
    ),
    (
        "adventurous",
        "brewery tour OR axe throwing OR karaoke bar OR night market",
    ),
    (
        "artsy",
        "art gallery OR live music venue OR independent theater OR paint and sip studio",
    ),
    (
        "foodie",
        "tapas bar OR gastropub OR tasting menu OR food hall",
    ),
    (
        "casual",
        "pub OR billiards hall OR beer garden OR comedy club",
    ),
];

const FALLBACK_KEYWORD: &str = "point of interest";
const FALLBACK_KEYWORD_ADULT: &str = "bar OR point of interest";

/// Immutable parameters for one nearby-search call.
#[derive(Debug, Clone)]
pub struct SearchSpec {
    pub lat: f64,
    pub lng: f64,
    pub radius_meters: u32,
    pub keyword: String,
}

impl SearchSpec {
    pub fn new(lat: f64, lng: f64, radius_meters: u32, keyword: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            radius_meters,
            keyword: keyword.into(),
        }
    }
}

/// Search radius for a transport mode. Unrecognized modes get the default
/// rather than an error.
pub fn radius_for(transport_mode: &str) -> u32 {
    let mode = transport_mode.trim().to_lowercase();
    RADIUS_TABLE
        .iter()
        .find(|(name, _)| *name == mode)
        .map(|(_, radius)| *radius)
        .unwrap_or(DEFAULT_RADIUS_METERS)
}

/// Primary search keyword for a vibe, bucketed by the age flag.
pub fn keyword_for(vibe: &str, is_adult: bool) -> &'static str {
    let table = if is_adult {
        VIBE_KEYWORDS_ADULT
    } else {
        VIBE_KEYWORDS
    };
    let vibe = vibe.trim().to_lowercase();
    table
        .iter()
        .find(|(name, _)| *name == vibe)
        .map(|(_, keyword)| *keyword)
        .unwrap_or(if is_adult {
            FALLBACK_KEYWORD_ADULT
        } else {
            FALLBACK_KEYWORD
        })
}

/// Keyword for the supplemental food search.
pub fn food_keyword(is_adult: bool) -> &'static str {
    if is_adult {
        "late night restaurant OR gastropub"
    } else {
        "restaurant OR dessert shop"
    }
}

/// Keyword for the supplemental ambiance search.
pub fn ambiance_keyword(is_adult: bool) -> &'static str {
    if is_adult {
        "cocktail bar OR lounge OR live music"
    } else {
        "scenic park OR cozy cafe OR garden"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_table() {
        assert_eq!(radius_for("walking"), 2000);
        assert_eq!(radius_for("Transit"), 5000);
        assert_eq!(radius_for("DRIVING"), 10000);
    }

    #[test]
    fn test_radius_default_for_unknown_mode() {
        assert_eq!(radius_for("teleport"), DEFAULT_RADIUS_METERS);
        assert_eq!(radius_for(""), DEFAULT_RADIUS_METERS);
    }

    #[test]
    fn test_keyword_known_vibes_non_empty() {
        for vibe in ["romantic", "adventurous", "artsy", "foodie", "casual"] {
            assert!(!keyword_for(vibe, false).is_empty());
            assert!(!keyword_for(vibe, true).is_empty());
        }
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        assert_eq!(keyword_for("Romantic", false), keyword_for("romantic", false));
        assert_eq!(keyword_for("FOODIE", true), keyword_for("foodie", true));
    }

    #[test]
    fn test_keyword_fallback_per_age_bucket() {
        assert_eq!(keyword_for("mysterious", false), FALLBACK_KEYWORD);
        assert_eq!(keyword_for("mysterious", true), FALLBACK_KEYWORD_ADULT);
    }
}
