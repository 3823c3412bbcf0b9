//! Search the bundled catalog without a backend
//!
//! Run with: cargo run --example offline_search -- egg milk flour

use mystere_meal::{
    distinct_terms, match_count, search_offline, FallbackSource, LocalCatalog, RecipeSearch,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ingredients: Vec<String> = std::env::args().skip(1).collect();
    let ingredients = if ingredients.is_empty() {
        vec!["egg".to_string(), "milk".to_string()]
    } else {
        ingredients
    };

    // "egg EGG" is one term to the matcher
    let terms = distinct_terms(&ingredients);

    println!("=== Plain matcher ===");
    for recipe in search_offline(&terms, None) {
        println!(
            "{} ({} of {} ingredients matched)",
            recipe.title,
            match_count(&recipe, &terms),
            terms.len()
        );
    }

    println!("\n=== Builder with filters ===");
    let source = FallbackSource::offline(LocalCatalog::default());
    let result = RecipeSearch::builder()
        .ingredients(ingredients.iter().cloned())
        .max_time(30)
        .vegetarian()
        .search(&source)
        .await?;

    for recipe in &result.value {
        println!("{}", recipe);
    }

    Ok(())
}
