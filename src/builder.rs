use crate::error::Result;
use crate::matcher::{RecipeFilters, SearchQuery};
use crate::model::Recipe;
use crate::sources::{FallbackSource, RecipeSource, Sourced};

/// Builder for assembling and running a recipe search
#[derive(Debug, Default, Clone)]
pub struct RecipeSearchBuilder {
    ingredients: Vec<String>,
    filters: RecipeFilters,
}

impl RecipeSearchBuilder {
    /// Add one ingredient the user has on hand
    ///
    /// # Example
    /// ```
    /// use mystere_meal::RecipeSearch;
    ///
    /// let query = RecipeSearch::builder()
    ///     .ingredient("egg")
    ///     .ingredient("milk")
    ///     .query();
    /// assert_eq!(query.ingredients, vec!["egg", "milk"]);
    /// ```
    pub fn ingredient(mut self, ingredient: impl Into<String>) -> Self {
        self.ingredients.push(ingredient.into());
        self
    }

    /// Add several ingredients at once
    pub fn ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients
            .extend(ingredients.into_iter().map(Into::into));
        self
    }

    /// Only recipes of this cuisine (exact match, e.g. "Italian")
    pub fn cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.filters.cuisine = Some(cuisine.into());
        self
    }

    /// Only recipes for this meal (e.g. "Dinner")
    pub fn meal_type(mut self, meal_type: impl Into<String>) -> Self {
        self.filters.meal_type = Some(meal_type.into());
        self
    }

    pub fn difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.filters.difficulty = Some(difficulty.into());
        self
    }

    /// Only recipes ready within this many minutes
    ///
    /// # Example
    /// ```
    /// use mystere_meal::RecipeSearch;
    ///
    /// let query = RecipeSearch::builder()
    ///     .cuisine("Italian")
    ///     .max_time(30)
    ///     .query();
    /// assert_eq!(query.filters.max_time, Some(30));
    /// ```
    pub fn max_time(mut self, minutes: u32) -> Self {
        self.filters.max_time = Some(minutes);
        self
    }

    pub fn min_rating(mut self, rating: f64) -> Self {
        self.filters.min_rating = Some(rating);
        self
    }

    pub fn vegetarian(mut self) -> Self {
        self.filters.is_vegetarian = true;
        self
    }

    pub fn vegan(mut self) -> Self {
        self.filters.is_vegan = true;
        self
    }

    pub fn gluten_free(mut self) -> Self {
        self.filters.is_gluten_free = true;
        self
    }

    /// Replace all filters at once
    pub fn filters(mut self, filters: RecipeFilters) -> Self {
        self.filters = filters;
        self
    }

    /// The assembled query
    pub fn query(&self) -> SearchQuery {
        SearchQuery::new(self.ingredients.clone(), self.filters.clone())
    }

    /// Search the backend, falling back to the local catalog when it fails
    ///
    /// # Example
    /// ```no_run
    /// # use mystere_meal::{AppConfig, FallbackSource, RecipeSearch};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let source = FallbackSource::new(&AppConfig::load()?)?;
    /// let result = RecipeSearch::builder()
    ///     .ingredients(["chicken", "lemon"])
    ///     .max_time(30)
    ///     .search(&source)
    ///     .await?;
    /// println!("{} recipes", result.value.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(&self, source: &FallbackSource) -> Result<Sourced<Vec<Recipe>>> {
        source.search(&self.query()).await
    }

    /// Search a single source with no fallback
    pub async fn search_with<S: RecipeSource + ?Sized>(&self, source: &S) -> Result<Vec<Recipe>> {
        source.search(&self.query()).await
    }
}

/// Main entry point for the builder API
pub struct RecipeSearch;

impl RecipeSearch {
    /// Creates a new builder for searching recipes
    ///
    /// # Example
    /// ```
    /// use mystere_meal::RecipeSearch;
    ///
    /// let builder = RecipeSearch::builder();
    /// ```
    pub fn builder() -> RecipeSearchBuilder {
        RecipeSearchBuilder::default()
    }
}
