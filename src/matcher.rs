//! Ingredient-based recipe matching.
//!
//! A recipe matches when any of its ingredients contains any of the user's
//! terms as a case-insensitive substring. Matches are ranked by how many
//! distinct terms hit, then narrowed by the filters. Everything here is pure:
//! inputs are borrowed and never modified.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::model::Recipe;

/// Optional narrowing criteria, AND-combined.
///
/// Empty category strings and zero time/rating bounds mean "any", the same
/// way an unset filter does.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// Inclusive upper bound in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time: Option<u32>,
    /// Inclusive lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_gluten_free: bool,
}

impl RecipeFilters {
    pub fn cuisine(&self) -> Option<&str> {
        non_empty(&self.cuisine)
    }

    pub fn meal_type(&self) -> Option<&str> {
        non_empty(&self.meal_type)
    }

    pub fn difficulty(&self) -> Option<&str> {
        non_empty(&self.difficulty)
    }

    pub fn max_time(&self) -> Option<u32> {
        self.max_time.filter(|t| *t > 0)
    }

    pub fn min_rating(&self) -> Option<f64> {
        self.min_rating.filter(|r| *r > 0.0)
    }

    /// True when no filter constrains anything
    pub fn is_empty(&self) -> bool {
        self.cuisine().is_none()
            && self.meal_type().is_none()
            && self.difficulty().is_none()
            && self.max_time().is_none()
            && self.min_rating().is_none()
            && !self.is_vegetarian
            && !self.is_vegan
            && !self.is_gluten_free
    }

    /// Whether a recipe satisfies every active filter
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if let Some(cuisine) = self.cuisine() {
            if recipe.cuisine != cuisine {
                return false;
            }
        }
        if let Some(meal_type) = self.meal_type() {
            if recipe.meal_type != meal_type {
                return false;
            }
        }
        if let Some(difficulty) = self.difficulty() {
            if recipe.difficulty != difficulty {
                return false;
            }
        }
        if let Some(max_time) = self.max_time() {
            if recipe.time > max_time {
                return false;
            }
        }
        if let Some(min_rating) = self.min_rating() {
            if recipe.rating < min_rating {
                return false;
            }
        }
        if self.is_vegetarian && !recipe.vegetarian() {
            return false;
        }
        if self.is_vegan && !recipe.vegan() {
            return false;
        }
        if self.is_gluten_free && !recipe.gluten_free() {
            return false;
        }
        true
    }
}

/// Ingredient terms plus filters for one search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub ingredients: Vec<String>,
    pub filters: RecipeFilters,
}

impl SearchQuery {
    pub fn new(ingredients: Vec<String>, filters: RecipeFilters) -> Self {
        Self {
            ingredients,
            filters,
        }
    }

    /// Run this query against a recipe collection
    pub fn apply(&self, recipes: &[Recipe]) -> Vec<Recipe> {
        search(recipes, &self.ingredients, Some(&self.filters))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Lowercase the terms once and drop case-insensitive duplicates, keeping first occurrence order
pub fn distinct_terms<S: AsRef<str>>(terms: &[S]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(terms.len());
    for term in terms {
        let lower = term.as_ref().to_lowercase();
        if !normalized.contains(&lower) {
            normalized.push(lower);
        }
    }
    normalized
}

fn count_hits(ingredients: &[String], terms: &[String]) -> usize {
    terms
        .iter()
        .filter(|term| {
            ingredients
                .iter()
                .any(|ingredient| ingredient.to_lowercase().contains(term.as_str()))
        })
        .count()
}

/// Number of distinct terms with at least one substring hit among the recipe's ingredients
pub fn match_count<S: AsRef<str>>(recipe: &Recipe, terms: &[S]) -> usize {
    count_hits(&recipe.ingredients, &distinct_terms(terms))
}

/// Search `recipes` for the given ingredient terms and filters.
///
/// With no terms every recipe passes the ingredient stage in input order.
/// Otherwise recipes with zero hits are dropped and the rest are sorted by
/// match count, descending; the sort is stable so ties keep input order.
pub fn search<S: AsRef<str>>(
    recipes: &[Recipe],
    terms: &[S],
    filters: Option<&RecipeFilters>,
) -> Vec<Recipe> {
    let ranked: Vec<&Recipe> = if terms.is_empty() {
        recipes.iter().collect()
    } else {
        let terms = distinct_terms(terms);
        let mut scored: Vec<(usize, &Recipe)> = recipes
            .iter()
            .map(|recipe| (count_hits(&recipe.ingredients, &terms), recipe))
            .filter(|(hits, _)| *hits > 0)
            .collect();
        scored.sort_by_key(|(hits, _)| Reverse(*hits));
        scored.into_iter().map(|(_, recipe)| recipe).collect()
    };

    ranked
        .into_iter()
        .filter(|recipe| filters.map_or(true, |f| f.matches(recipe)))
        .cloned()
        .collect()
}
