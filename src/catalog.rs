//! Built-in recipe catalog used when the backend cannot be reached, plus the
//! ingredient vocabulary offered as autocomplete suggestions.

use log::error;
use std::sync::OnceLock;

use crate::model::{Comment, Recipe};

const FALLBACK_RECIPES_JSON: &str = include_str!("../data/fallback_recipes.json");

static FALLBACK_RECIPES: OnceLock<Vec<Recipe>> = OnceLock::new();

/// The bundled recipes, parsed on first use
pub fn fallback_recipes() -> &'static [Recipe] {
    FALLBACK_RECIPES.get_or_init(|| {
        serde_json::from_str(FALLBACK_RECIPES_JSON).unwrap_or_else(|e| {
            error!("Bundled recipe catalog is malformed: {}", e);
            Vec::new()
        })
    })
}

/// Canned comment thread shown with a recipe from the bundled catalog
pub fn sample_comments() -> Vec<Comment> {
    vec![
        Comment {
            id: "1".to_string(),
            username: "Chef Mai".to_string(),
            text: "Amazing recipe! My family loved this dish.".to_string(),
            rating: 5,
            created_at: "2024-01-15".to_string(),
        },
        Comment {
            id: "2".to_string(),
            username: "John Smith".to_string(),
            text: "Easy to make and delicious. I added some extra garlic.".to_string(),
            rating: 4,
            created_at: "2024-01-10".to_string(),
        },
    ]
}

/// Ingredients offered for autocomplete
pub const COMMON_INGREDIENTS: &[&str] = &[
    "egg", "milk", "flour", "butter", "sugar", "salt", "pepper", "olive oil",
    "chicken", "beef", "pork", "fish", "shrimp",
    "tomato", "onion", "garlic", "carrot", "potato", "bell pepper", "broccoli",
    "lettuce", "cucumber", "spinach", "kale", "avocado",
    "rice", "pasta", "bread", "quinoa",
    "cheese", "mozzarella", "parmesan", "feta",
    "lemon", "lime", "basil", "oregano", "cilantro", "parsley",
    "soy sauce", "vinegar", "honey", "maple syrup",
];

/// How well a vocabulary entry matches what the user typed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SuggestionTier {
    Contains = 1,
    WordPrefix = 2,
    Prefix = 3,
    Exact = 4,
}

fn tier(candidate: &str, input: &str) -> Option<SuggestionTier> {
    if candidate == input {
        Some(SuggestionTier::Exact)
    } else if candidate.starts_with(input) {
        Some(SuggestionTier::Prefix)
    } else if candidate.split_whitespace().any(|word| word.starts_with(input)) {
        Some(SuggestionTier::WordPrefix)
    } else if candidate.contains(input) {
        Some(SuggestionTier::Contains)
    } else {
        None
    }
}

/// Suggest up to `limit` ingredients for a partially typed term.
///
/// Better tiers come first; within a tier the vocabulary order is kept.
pub fn suggest_ingredients(input: &str, limit: usize) -> Vec<&'static str> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<(SuggestionTier, &'static str)> = COMMON_INGREDIENTS
        .iter()
        .filter_map(|candidate| tier(candidate, &input).map(|t| (t, *candidate)))
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    ranked.into_iter().take(limit).map(|(_, c)| c).collect()
}
