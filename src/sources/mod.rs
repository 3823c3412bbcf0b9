mod fallback;
mod local;

pub use fallback::FallbackSource;
pub use local::LocalCatalog;

use async_trait::async_trait;

use crate::client::ApiClient;
use crate::error::Result;
use crate::matcher::SearchQuery;
use crate::model::{Recipe, RecipeDetail};

/// Anything that can answer recipe queries
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Short name used in logs (e.g. "backend", "local")
    fn source_name(&self) -> &str;

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Recipe>>;

    async fn recipe(&self, id: &str) -> Result<RecipeDetail>;

    async fn favorites(&self, user_id: &str) -> Result<Vec<Recipe>>;

    async fn created_recipes(&self, user_id: &str) -> Result<Vec<Recipe>>;
}

/// Which source produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Remote,
    Local,
}

/// A value together with the source that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub value: T,
    pub origin: Origin,
}

impl<T> Sourced<T> {
    pub fn remote(value: T) -> Self {
        Self {
            value,
            origin: Origin::Remote,
        }
    }

    pub fn local(value: T) -> Self {
        Self {
            value,
            origin: Origin::Local,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == Origin::Local
    }
}

#[async_trait]
impl RecipeSource for ApiClient {
    fn source_name(&self) -> &str {
        "backend"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Recipe>> {
        ApiClient::search(self, query).await
    }

    async fn recipe(&self, id: &str) -> Result<RecipeDetail> {
        ApiClient::recipe(self, id).await
    }

    async fn favorites(&self, user_id: &str) -> Result<Vec<Recipe>> {
        ApiClient::favorites(self, user_id).await
    }

    async fn created_recipes(&self, user_id: &str) -> Result<Vec<Recipe>> {
        ApiClient::created_recipes(self, user_id).await
    }
}
