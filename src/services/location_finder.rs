use crate::models::place::{CandidateSet, PlaceRecord};
use crate::services::place_classifier::classify;
use crate::services::places_service::{NearbyPlace, PlaceSearch};
use crate::services::search_params::{
    ambiance_keyword, food_keyword, keyword_for, radius_for, SearchSpec,
};

/// Primary-search result count at or above which no supplemental searches
/// are issued. Supplemental queries cost a provider round-trip each, so they
/// only fire when the vibe search under-delivers.
const SUFFICIENT_PRIMARY_RESULTS: usize = 6;

/// Finds candidate venues around a point with a vibe-first search strategy:
/// one primary vibe-keyword query, then, only if that under-delivers,
/// supplemental food and ambiance queries issued concurrently.
pub struct CandidateFinder<S> {
    search: S,
}

impl<S: PlaceSearch> CandidateFinder<S> {
    pub fn new(search: S) -> Self {
        Self { search }
    }

    pub async fn find(
        &self,
        lat: f64,
        lng: f64,
        vibe: &str,
        transport_mode: &str,
        is_adult: bool,
    ) -> Vec<PlaceRecord> {
        let radius = radius_for(transport_mode);
        let primary_keyword = keyword_for(vibe, is_adult);

        let mut candidates = CandidateSet::new();

        // The primary search is merged before anything else runs; its result
        // count gates the supplemental queries and its entries always survive
        // truncation ahead of supplemental ones.
        let primary = self
            .fetch(SearchSpec::new(lat, lng, radius, primary_keyword))
            .await;
        candidates.merge(primary);

        if candidates.len() >= SUFFICIENT_PRIMARY_RESULTS {
            println!(
                "Primary '{}' search returned {} candidates, skipping supplemental searches",
                vibe,
                candidates.len()
            );
            return candidates.finalize();
        }

        // A foodie primary search already carries the food intent; a second
        // food query would mostly return near-duplicates.
        let wants_food_search = !vibe.trim().eq_ignore_ascii_case("foodie");

        let food = async {
            if wants_food_search {
                self.fetch(SearchSpec::new(lat, lng, radius, food_keyword(is_adult)))
                    .await
            } else {
                Vec::new()
            }
        };
        let ambiance = self.fetch(SearchSpec::new(lat, lng, radius, ambiance_keyword(is_adult)));

        let (food_results, ambiance_results) = futures::join!(food, ambiance);
        candidates.merge(food_results);
        candidates.merge(ambiance_results);

        candidates.finalize()
    }

    /// One adapter call: runs the search, classifies each venue, and drops
    /// records without an address. Provider failures are swallowed into an
    /// empty result so a flaky search never aborts the planning flow.
    async fn fetch(&self, spec: SearchSpec) -> Vec<PlaceRecord> {
        match self.search.nearby(&spec).await {
            Ok(places) => places.into_iter().filter_map(to_place_record).collect(),
            Err(err) => {
                eprintln!("Nearby search for '{}' failed: {}", spec.keyword, err);
                Vec::new()
            }
        }
    }
}

fn to_place_record(place: NearbyPlace) -> Option<PlaceRecord> {
    let address = place.vicinity.filter(|v| !v.trim().is_empty())?;
    Some(PlaceRecord {
        name: place.name,
        address,
        lat: place.geometry.location.lat,
        lng: place.geometry.location.lng,
        category: classify(&place.types),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::place::Category;
    use crate::services::places_service::{Geometry, LatLng, PlacesError};
    use std::sync::Mutex;

    struct FakeSearch {
        calls: Mutex<Vec<String>>,
        primary: Vec<NearbyPlace>,
        supplemental: Vec<NearbyPlace>,
        fail: bool,
    }

    impl FakeSearch {
        fn new(primary: Vec<NearbyPlace>, supplemental: Vec<NearbyPlace>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                primary,
                supplemental,
                fail: false,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn keywords(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl PlaceSearch for FakeSearch {
        async fn nearby(&self, spec: &SearchSpec) -> Result<Vec<NearbyPlace>, PlacesError> {
            let first_call = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(spec.keyword.clone());
                calls.len() == 1
            };
            if self.fail {
                return Err(PlacesError::ResponseError("OVER_QUERY_LIMIT".to_string()));
            }
            if first_call {
                Ok(self.primary.clone())
            } else {
                Ok(self.supplemental.clone())
            }
        }
    }

    fn place(name: &str, vicinity: &str, types: &[&str]) -> NearbyPlace {
        NearbyPlace {
            name: name.to_string(),
            vicinity: if vicinity.is_empty() {
                None
            } else {
                Some(vicinity.to_string())
            },
            geometry: Geometry {
                location: LatLng { lat: 19.2, lng: 72.9 },
            },
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn places(count: usize, prefix: &str) -> Vec<NearbyPlace> {
        (0..count)
            .map(|i| {
                place(
                    &format!("{} {}", prefix, i),
                    &format!("{} {} Rd", i, prefix),
                    &["restaurant"],
                )
            })
            .collect()
    }

    #[actix_web::test]
    async fn test_sufficient_primary_skips_supplemental_searches() {
        let fake = FakeSearch::new(places(6, "Primary"), places(10, "Extra"));
        let finder = CandidateFinder::new(fake);

        let found = finder.find(19.2, 72.9, "romantic", "walking", false).await;

        assert_eq!(found.len(), 6);
        assert_eq!(finder.search.call_count(), 1);
    }

    #[actix_web::test]
    async fn test_sparse_primary_triggers_both_supplemental_searches() {
        let fake = FakeSearch::new(places(2, "Primary"), places(3, "Extra"));
        let finder = CandidateFinder::new(fake);

        let found = finder.find(19.2, 72.9, "romantic", "walking", false).await;

        assert_eq!(finder.search.call_count(), 3);
        assert_eq!(found.len(), 5);
        // Primary results keep their position ahead of supplemental ones.
        assert_eq!(found[0].name, "Primary 0");
    }

    #[actix_web::test]
    async fn test_foodie_vibe_skips_food_search_even_when_sparse() {
        let fake = FakeSearch::new(places(2, "Primary"), places(2, "Extra"));
        let finder = CandidateFinder::new(fake);

        finder.find(19.2, 72.9, "Foodie", "Walking", false).await;

        let keywords = finder.search.keywords();
        assert_eq!(keywords.len(), 2);
        assert!(!keywords.contains(&food_keyword(false).to_string()));
        assert!(keywords.contains(&ambiance_keyword(false).to_string()));
    }

    #[actix_web::test]
    async fn test_duplicate_addresses_keep_primary_record() {
        let primary = vec![place("Primary Cafe", "1 Shared Ln", &["cafe"])];
        let supplemental = vec![
            place("Duplicate Listing", "1 Shared Ln", &["restaurant"]),
            place("Fresh Venue", "2 Other St", &["park"]),
        ];
        let finder = CandidateFinder::new(FakeSearch::new(primary, supplemental));

        let found = finder.find(19.2, 72.9, "casual", "transit", false).await;

        let shared: Vec<_> = found.iter().filter(|p| p.address == "1 Shared Ln").collect();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].name, "Primary Cafe");
        assert_eq!(shared[0].category, Category::Cafe);
    }

    #[actix_web::test]
    async fn test_results_are_capped_at_twenty() {
        let fake = FakeSearch::new(places(5, "Primary"), places(30, "Extra"));
        let finder = CandidateFinder::new(fake);

        let found = finder.find(19.2, 72.9, "artsy", "driving", true).await;

        assert_eq!(found.len(), 20);
    }

    #[actix_web::test]
    async fn test_provider_failure_yields_empty_set() {
        let mut fake = FakeSearch::new(places(5, "Primary"), Vec::new());
        fake.fail = true;
        let finder = CandidateFinder::new(fake);

        let found = finder.find(19.2, 72.9, "romantic", "walking", false).await;

        assert!(found.is_empty());
    }

    #[actix_web::test]
    async fn test_missing_address_is_dropped() {
        let primary = vec![
            place("No Address Venue", "", &["bar"]),
            place("Proper Venue", "9 High St", &["bar"]),
        ];
        let finder = CandidateFinder::new(FakeSearch::new(primary, Vec::new()));

        let found = finder.find(19.2, 72.9, "romantic", "walking", true).await;

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Proper Venue");
        assert_eq!(found[0].category, Category::Bar);
    }
}
