use log::{debug, info};

use super::ApiClient;
use crate::error::Result;
use crate::matcher::SearchQuery;
use crate::model::{NewComment, NewRecipe, Recipe, RecipeDetail};

/// Query-string parameters for `/recipes/search`; unset and falsy values are left out
pub(crate) fn search_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    let filters = &query.filters;

    if !query.ingredients.is_empty() {
        params.push(("ingredients", query.ingredients.join(",")));
    }
    if let Some(cuisine) = filters.cuisine() {
        params.push(("cuisine", cuisine.to_string()));
    }
    if let Some(meal_type) = filters.meal_type() {
        params.push(("mealType", meal_type.to_string()));
    }
    if let Some(difficulty) = filters.difficulty() {
        params.push(("difficulty", difficulty.to_string()));
    }
    if let Some(max_time) = filters.max_time() {
        params.push(("maxTime", max_time.to_string()));
    }
    if let Some(min_rating) = filters.min_rating() {
        params.push(("minRating", min_rating.to_string()));
    }
    if filters.is_vegetarian {
        params.push(("isVegetarian", "true".to_string()));
    }
    if filters.is_vegan {
        params.push(("isVegan", "true".to_string()));
    }
    if filters.is_gluten_free {
        params.push(("isGlutenFree", "true".to_string()));
    }
    params
}

impl ApiClient {
    /// Search recipes on the backend
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Recipe>> {
        let params = search_params(query);
        debug!("Searching backend with {:?}", params);
        let recipes: Vec<Recipe> = self.fetch(self.get("/recipes/search").query(&params)).await?;
        info!("Backend returned {} recipes", recipes.len());
        Ok(recipes)
    }

    /// Fetch one recipe with its comments
    pub async fn recipe(&self, id: &str) -> Result<RecipeDetail> {
        self.fetch(self.get(&format!("/recipes/{}", id))).await
    }

    /// Post a comment and rating on a recipe
    pub async fn add_comment(&self, recipe_id: &str, comment: &NewComment) -> Result<()> {
        self.execute(
            self.post(&format!("/recipes/{}/comments", recipe_id))
                .json(comment),
        )
        .await
    }

    pub async fn create_recipe(&self, recipe: &NewRecipe) -> Result<Recipe> {
        self.fetch(self.post("/recipes").json(recipe)).await
    }
}
