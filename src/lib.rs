//! Find recipes from the ingredients you already have.
//!
//! The backend is asked first; when it cannot be reached the bundled catalog
//! is searched locally with [`matcher::search`].

pub mod builder;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod matcher;
pub mod model;
pub mod sources;
pub mod store;

pub use builder::{RecipeSearch, RecipeSearchBuilder};
pub use client::{ApiClient, Credentials, Signup};
pub use config::AppConfig;
pub use error::{AppError, Result};
pub use matcher::{distinct_terms, match_count, search, RecipeFilters, SearchQuery};
pub use model::{Comment, NewComment, NewRecipe, Nutrition, Recipe, RecipeDetail, User};
pub use sources::{FallbackSource, LocalCatalog, Origin, RecipeSource, Sourced};
pub use store::{FileStore, KeyValueStore, MemoryStore, Pantry};

/// Search the bundled catalog without touching the network
///
/// # Example
/// ```
/// let recipes = mystere_meal::search_offline(&["basil", "tomato"], None);
/// assert_eq!(recipes[0].title, "Classic Margherita Pizza");
/// ```
pub fn search_offline<S: AsRef<str>>(ingredients: &[S], filters: Option<&RecipeFilters>) -> Vec<Recipe> {
    search(catalog::fallback_recipes(), ingredients, filters)
}
