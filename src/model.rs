use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AppError, Result};

/// Nutrition facts per serving
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

/// A recipe as served by the backend or the built-in catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecipeDocument", rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub cuisine: String,
    pub meal_type: String,
    pub difficulty: String,
    /// Total time in minutes
    pub time: u32,
    pub rating: f64,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub nutrition: Nutrition,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_vegetarian: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_vegan: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_gluten_free: Option<bool>,
}

/// Recipe as stored by the backend (`_id`) or bundled (`id`); either may be present, or both
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipeDocument {
    #[serde(rename = "_id", default)]
    document_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    cuisine: String,
    #[serde(default)]
    meal_type: String,
    #[serde(default)]
    difficulty: String,
    #[serde(default)]
    time: u32,
    #[serde(default)]
    rating: f64,
    #[serde(default)]
    ingredients: Vec<String>,
    #[serde(default)]
    steps: Vec<String>,
    #[serde(default)]
    nutrition: Nutrition,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    is_vegetarian: Option<bool>,
    #[serde(default)]
    is_vegan: Option<bool>,
    #[serde(default)]
    is_gluten_free: Option<bool>,
}

impl TryFrom<RecipeDocument> for Recipe {
    type Error = String;

    fn try_from(doc: RecipeDocument) -> std::result::Result<Self, Self::Error> {
        let id = doc
            .document_id
            .or(doc.id)
            .ok_or_else(|| format!("recipe '{}' has no `_id` or `id`", doc.title))?;

        Ok(Recipe {
            id,
            title: doc.title,
            image: doc.image,
            cuisine: doc.cuisine,
            meal_type: doc.meal_type,
            difficulty: doc.difficulty,
            time: doc.time,
            rating: doc.rating,
            ingredients: doc.ingredients,
            steps: doc.steps,
            nutrition: doc.nutrition,
            tags: doc.tags,
            is_vegetarian: doc.is_vegetarian,
            is_vegan: doc.is_vegan,
            is_gluten_free: doc.is_gluten_free,
        })
    }
}

impl Recipe {
    pub fn vegetarian(&self) -> bool {
        self.is_vegetarian.unwrap_or(false)
    }

    pub fn vegan(&self) -> bool {
        self.is_vegan.unwrap_or(false)
    }

    pub fn gluten_free(&self) -> bool {
        self.is_gluten_free.unwrap_or(false)
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {} {} ({}, {} min, {:.1}★)",
            self.id, self.title, self.cuisine, self.meal_type, self.difficulty, self.time, self.rating
        )
    }
}

/// Recipe payload for creating a new recipe
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub cuisine: String,
    pub meal_type: String,
    pub difficulty: String,
    pub time: u32,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub nutrition: Nutrition,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_vegetarian: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_vegan: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_gluten_free: Option<bool>,
}

/// A comment in a recipe's rating thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CommentDocument", rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub username: String,
    pub text: String,
    pub rating: u8,
    /// Date only, formatted as YYYY-MM-DD
    pub created_at: String,
}

impl Comment {
    /// Build the local copy of a comment that was just accepted by the backend.
    pub fn posted_now(id: impl Into<String>, username: impl Into<String>, comment: &NewComment) -> Self {
        Comment {
            id: id.into(),
            username: username.into(),
            text: comment.text.clone(),
            rating: comment.rating,
            created_at: chrono::Utc::now().date_naive().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CommentAuthor {
    #[serde(default)]
    name: Option<String>,
}

/// Comment as stored by the backend
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentDocument {
    #[serde(rename = "_id", default)]
    document_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    user: Option<CommentAuthor>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    rating: u8,
    #[serde(default)]
    created_at: String,
}

impl From<CommentDocument> for Comment {
    fn from(doc: CommentDocument) -> Self {
        let username = doc
            .user
            .and_then(|u| u.name)
            .or(doc.username)
            .unwrap_or_else(|| "Anonymous".to_string());

        Comment {
            id: doc.document_id.or(doc.id).unwrap_or_default(),
            username,
            text: doc.text,
            rating: doc.rating,
            created_at: date_part(&doc.created_at).to_string(),
        }
    }
}

/// Keep the calendar date of an ISO-8601 timestamp
fn date_part(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or_default()
}

/// A recipe together with its comment thread
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl RecipeDetail {
    /// Average of the comment ratings, if there are any
    pub fn average_comment_rating(&self) -> Option<f64> {
        if self.comments.is_empty() {
            return None;
        }
        let total: u32 = self.comments.iter().map(|c| c.rating as u32).sum();
        Some(total as f64 / self.comments.len() as f64)
    }
}

/// Comment submission payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewComment {
    pub text: String,
    pub rating: u8,
}

impl NewComment {
    pub const DEFAULT_RATING: u8 = 5;

    /// Validate and build a comment; text must not be blank and rating must be 1-5
    pub fn new(text: impl Into<String>, rating: u8) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Comment text cannot be empty".to_string(),
            ));
        }
        if !(1..=5).contains(&rating) {
            return Err(AppError::InvalidInput(format!(
                "Rating must be between 1 and 5, got {}",
                rating
            )));
        }
        Ok(NewComment { text, rating })
    }
}

/// An authenticated account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Percentage of a recipe's ingredients the cook has ticked off
pub fn ingredient_completion(checked: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let checked = checked.min(total);
    ((checked as f64 / total as f64) * 100.0).round() as u8
}
