use log::{debug, info, warn};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use super::{LocalCatalog, RecipeSource, Sourced};
use crate::client::ApiClient;
use crate::config::{AppConfig, FallbackConfig};
use crate::error::{AppError, Result};
use crate::matcher::SearchQuery;
use crate::model::{Recipe, RecipeDetail};

/// Tries the backend first and answers from the local catalog when it fails
pub struct FallbackSource {
    primary: Option<Box<dyn RecipeSource>>,
    local: LocalCatalog,
    enabled: bool,
    retry_attempts: u32,
    retry_delay_ms: u64,
}

impl FallbackSource {
    /// Create the backend-then-bundled-catalog chain from configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = ApiClient::new(&config.api)?;
        Ok(Self::with_primary(
            Box::new(client),
            LocalCatalog::default(),
            &config.fallback,
        ))
    }

    pub fn with_primary(
        primary: Box<dyn RecipeSource>,
        local: LocalCatalog,
        config: &FallbackConfig,
    ) -> Self {
        if config.enabled {
            info!(
                "Using '{}' with fallback to '{}'",
                primary.source_name(),
                local.source_name()
            );
        }
        FallbackSource {
            primary: Some(primary),
            local,
            enabled: config.enabled,
            retry_attempts: config.retry_attempts.max(1),
            retry_delay_ms: config.retry_delay_ms,
        }
    }

    /// Answer everything from the local catalog without touching the network
    pub fn offline(local: LocalCatalog) -> Self {
        FallbackSource {
            primary: None,
            local,
            enabled: true,
            retry_attempts: 1,
            retry_delay_ms: 0,
        }
    }

    pub fn local(&self) -> &LocalCatalog {
        &self.local
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<Sourced<Vec<Recipe>>> {
        let primary = self.primary.as_deref();
        self.resolve(
            "search",
            primary.map(|p| move || p.search(query)),
            self.local.search(query),
        )
        .await
    }

    pub async fn recipe(&self, id: &str) -> Result<Sourced<RecipeDetail>> {
        let primary = self.primary.as_deref();
        self.resolve(
            "recipe",
            primary.map(|p| move || p.recipe(id)),
            self.local.recipe(id),
        )
        .await
    }

    pub async fn favorites(&self, user_id: &str) -> Result<Sourced<Vec<Recipe>>> {
        let primary = self.primary.as_deref();
        self.resolve(
            "favorites",
            primary.map(|p| move || p.favorites(user_id)),
            self.local.favorites(user_id),
        )
        .await
    }

    pub async fn created_recipes(&self, user_id: &str) -> Result<Sourced<Vec<Recipe>>> {
        let primary = self.primary.as_deref();
        self.resolve(
            "created_recipes",
            primary.map(|p| move || p.created_recipes(user_id)),
            self.local.created_recipes(user_id),
        )
        .await
    }

    /// Run `remote` with retries, then `local` if that fails and fallback is enabled
    async fn resolve<T, R, RF, LF>(
        &self,
        operation: &str,
        remote: Option<R>,
        local: LF,
    ) -> Result<Sourced<T>>
    where
        R: FnMut() -> RF,
        RF: Future<Output = Result<T>>,
        LF: Future<Output = Result<T>>,
    {
        let mut all_errors: Vec<String> = Vec::new();

        if let (Some(call), Some(primary)) = (remote, self.primary.as_deref()) {
            match self
                .try_with_retry(primary.source_name(), operation, call)
                .await
            {
                Ok(value) => return Ok(Sourced::remote(value)),
                Err(e) if !self.enabled => return Err(e),
                Err(e) => {
                    warn!(
                        "{} failed on '{}', falling back to '{}': {}",
                        operation,
                        primary.source_name(),
                        self.local.source_name(),
                        e
                    );
                    all_errors.push(format!("{}: {}", primary.source_name(), e));
                }
            }
        }

        match local.await {
            Ok(value) => Ok(Sourced::local(value)),
            Err(e) if all_errors.is_empty() => Err(e),
            Err(e) => {
                all_errors.push(format!("{}: {}", self.local.source_name(), e));
                Err(AppError::AllSourcesFailed(all_errors.join("\n")))
            }
        }
    }

    /// Try a source with linear backoff between attempts
    async fn try_with_retry<T, F, Fut>(
        &self,
        source_name: &str,
        operation: &str,
        mut call: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            debug!(
                "Attempting {} with {} (attempt {}/{})",
                operation, source_name, attempt, self.retry_attempts
            );

            match call().await {
                Ok(value) => {
                    info!("{} answered by {}", operation, source_name);
                    return Ok(value);
                }
                Err(e) => {
                    warn!(
                        "{} failed on {} (attempt {}/{}): {}",
                        operation, source_name, attempt, self.retry_attempts, e
                    );
                    if attempt >= self.retry_attempts {
                        return Err(e);
                    }
                }
            }

            let delay = Duration::from_millis(self.retry_delay_ms * attempt as u64);
            debug!("Waiting {:?} before retry", delay);
            sleep(delay).await;
            attempt += 1;
        }
    }
}
