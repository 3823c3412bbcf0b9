use log::info;
use serde::Serialize;
use serde_json::json;

use super::ApiClient;
use crate::error::Result;
use crate::model::{Recipe, User};

/// Login payload
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Account creation payload
#[derive(Debug, Clone, Serialize)]
pub struct Signup {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl ApiClient {
    pub async fn signup(&self, signup: &Signup) -> Result<User> {
        let user: User = self.fetch(self.post("/users/signup").json(signup)).await?;
        info!("Created account for {}", user.email);
        Ok(user)
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        let user: User = self.fetch(self.post("/users/login").json(credentials)).await?;
        info!("Logged in as {}", user.email);
        Ok(user)
    }

    pub async fn profile(&self, user_id: &str) -> Result<User> {
        self.fetch(self.get(&format!("/users/{}", user_id))).await
    }

    pub async fn add_favorite(&self, user_id: &str, recipe_id: &str) -> Result<()> {
        self.execute(
            self.post(&format!("/users/{}/favorites", user_id))
                .json(&json!({ "recipeId": recipe_id })),
        )
        .await
    }

    pub async fn remove_favorite(&self, user_id: &str, recipe_id: &str) -> Result<()> {
        self.execute(self.delete(&format!("/users/{}/favorites/{}", user_id, recipe_id)))
            .await
    }

    pub async fn favorites(&self, user_id: &str) -> Result<Vec<Recipe>> {
        self.fetch(self.get(&format!("/users/{}/favorites", user_id)))
            .await
    }

    /// Recipes the user has authored
    pub async fn created_recipes(&self, user_id: &str) -> Result<Vec<Recipe>> {
        self.fetch(self.get(&format!("/users/{}/recipes", user_id)))
            .await
    }
}
