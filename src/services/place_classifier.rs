use crate::models::place::Category;

/// Classification rules in priority order. A venue usually carries several
/// overlapping provider tags (a wine bar is also a "restaurant" and an
/// "establishment"), so only the first matching row governs.
const CATEGORY_RULES: &[(&[&str], Category)] = &[
    (&["bar", "night_club", "pub", "nightlife"], Category::Bar),
    (&["cafe", "coffee_shop", "bakery", "tea_house"], Category::Cafe),
    (
        &["restaurant", "food", "meal_takeaway", "meal_delivery"],
        Category::Food,
    ),
    (&["park", "campground", "garden", "beach"], Category::Park),
    (
        &["tourist_attraction", "amusement_park", "zoo", "aquarium"],
        Category::Activity,
    ),
    (
        &["store", "shopping_mall", "book_store", "clothing_store", "market"],
        Category::Shop,
    ),
    (
        &["museum", "art_gallery", "movie_theater", "bowling_alley", "performing_arts_theater"],
        Category::Activity,
    ),
];

/// Maps a provider's raw place tags to an application category. Total over
/// any input: unmatched tag sets fall through to `Activity`.
pub fn classify(provider_tags: &[String]) -> Category {
    for (tags, category) in CATEGORY_RULES {
        if provider_tags.iter().any(|t| tags.contains(&t.as_str())) {
            return *category;
        }
    }
    Category::Activity
}
