//! Search the configured backend, falling back to the bundled catalog
//!
//! Run with: cargo run --example backend_search
//! Point it elsewhere with MYSTERE_MEAL__API__BASE_URL=http://host:5000/api

use mystere_meal::{AppConfig, FallbackSource, RecipeSearch};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = AppConfig::load()?;
    let source = FallbackSource::new(&config)?;

    let result = RecipeSearch::builder()
        .ingredients(["chicken", "lemon", "garlic"])
        .min_rating(4.5)
        .search(&source)
        .await?;

    if result.is_fallback() {
        println!("Backend unreachable at {}, showing bundled recipes", config.api.base_url);
    }
    for recipe in &result.value {
        println!("{}", recipe);
    }

    let Some(first) = result.value.first() else {
        println!("No recipes found");
        return Ok(());
    };

    let detail = source.recipe(&first.id).await?;
    println!("\n{}", detail.value.recipe.title);
    for comment in &detail.value.comments {
        println!("  {} [{}/5] {}", comment.username, comment.rating, comment.text);
    }

    Ok(())
}
