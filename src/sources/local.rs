use async_trait::async_trait;
use log::debug;

use super::RecipeSource;
use crate::catalog::{fallback_recipes, sample_comments};
use crate::error::{AppError, Result};
use crate::matcher::SearchQuery;
use crate::model::{Recipe, RecipeDetail};

/// Answers queries from an in-memory recipe list using the local matcher
#[derive(Debug, Clone)]
pub struct LocalCatalog {
    recipes: Vec<Recipe>,
}

impl LocalCatalog {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }
}

impl Default for LocalCatalog {
    /// The bundled catalog
    fn default() -> Self {
        Self::new(fallback_recipes().to_vec())
    }
}

#[async_trait]
impl RecipeSource for LocalCatalog {
    fn source_name(&self) -> &str {
        "local"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Recipe>> {
        let results = query.apply(&self.recipes);
        debug!(
            "Local catalog matched {} of {} recipes",
            results.len(),
            self.recipes.len()
        );
        Ok(results)
    }

    async fn recipe(&self, id: &str) -> Result<RecipeDetail> {
        self.recipes
            .iter()
            .find(|r| r.id == id)
            .map(|recipe| RecipeDetail {
                recipe: recipe.clone(),
                comments: sample_comments(),
            })
            .ok_or_else(|| AppError::NotFound(format!("recipe '{}'", id)))
    }

    // Demo profile: the first three recipes are favorites
    async fn favorites(&self, _user_id: &str) -> Result<Vec<Recipe>> {
        Ok(self.recipes.iter().take(3).cloned().collect())
    }

    // ...and the next three were "created" by the user
    async fn created_recipes(&self, _user_id: &str) -> Result<Vec<Recipe>> {
        Ok(self.recipes.iter().skip(3).take(3).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::RecipeFilters;

    #[tokio::test]
    async fn test_search_bundled_catalog() {
        let catalog = LocalCatalog::default();
        let query = SearchQuery::new(
            vec!["egg".to_string(), "milk".to_string(), "maple".to_string()],
            RecipeFilters::default(),
        );
        let results = catalog.search(&query).await.unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        // 4 and 10 hit all three terms; 7, 8 ("coconut milk") and 12 hit one
        assert_eq!(ids, vec!["4", "10", "7", "8", "12"]);
    }

    #[tokio::test]
    async fn test_search_with_filters() {
        let catalog = LocalCatalog::default();
        let query = SearchQuery::new(
            vec![],
            RecipeFilters {
                cuisine: Some("Italian".to_string()),
                max_time: Some(30),
                ..Default::default()
            },
        );
        let results = catalog.search(&query).await.unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["9", "12"]);
    }

    #[tokio::test]
    async fn test_recipe_lookup() {
        let catalog = LocalCatalog::default();
        let detail = catalog.recipe("5").await.unwrap();
        assert_eq!(detail.recipe.title, "Beef Tacos");
        assert_eq!(detail.comments.len(), 2);

        assert!(matches!(
            catalog.recipe("missing").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_demo_profile_lists() {
        let catalog = LocalCatalog::default();
        let favorites = catalog.favorites("anyone").await.unwrap();
        let created = catalog.created_recipes("anyone").await.unwrap();
        assert_eq!(
            favorites.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["1", "2", "3"]
        );
        assert_eq!(
            created.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["4", "5", "6"]
        );
    }
}
