//! Persistent key/value storage for the pantry and the login session.

use async_trait::async_trait;
use log::{debug, error};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::error::Result;
use crate::model::User;

/// Key holding the user's ingredient list
pub const INGREDIENTS_KEY: &str = "mystere-meal-ingredients";

/// Key holding the logged-in user
pub const SESSION_KEY: &str = "mystere-meal-user";

/// String key/value storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
                // the next write replaces the unreadable file
                error!("{} is not a valid store, starting empty: {}", self.path.display(), e);
                BTreeMap::new()
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, content).await?;
        debug!("Wrote {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        if entries.remove(key).is_some() {
            self.write_all(&entries).await?;
        }
        Ok(())
    }
}

/// The user's ingredients on hand, persisted after every change
pub struct Pantry<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
    ingredients: Vec<String>,
}

impl<'a, S: KeyValueStore + ?Sized> Pantry<'a, S> {
    /// Load the saved ingredient list; unreadable data starts an empty pantry
    pub async fn load(store: &'a S) -> Result<Self> {
        let ingredients = match store.get(INGREDIENTS_KEY).await? {
            Some(raw) => serde_json::from_str::<Vec<String>>(&raw).unwrap_or_else(|e| {
                error!("Failed to parse stored ingredients: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };
        Ok(Self { store, ingredients })
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Add an ingredient unless it is blank or the exact same string is
    /// already present.
    ///
    /// Returns whether the list changed.
    pub async fn add(&mut self, ingredient: impl Into<String>) -> Result<bool> {
        let ingredient = ingredient.into();
        if ingredient.trim().is_empty() || self.ingredients.contains(&ingredient) {
            return Ok(false);
        }
        let mut updated = self.ingredients.clone();
        updated.push(ingredient);
        self.commit(updated).await?;
        Ok(true)
    }

    /// Remove an ingredient. Returns whether the list changed.
    pub async fn remove(&mut self, ingredient: &str) -> Result<bool> {
        if !self.ingredients.iter().any(|i| i == ingredient) {
            return Ok(false);
        }
        let updated = self
            .ingredients
            .iter()
            .filter(|i| *i != ingredient)
            .cloned()
            .collect();
        self.commit(updated).await?;
        Ok(true)
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.commit(Vec::new()).await
    }

    /// Persist `updated`, then adopt it; a failed write leaves the pantry as it was
    async fn commit(&mut self, updated: Vec<String>) -> Result<()> {
        let raw = serde_json::to_string(&updated)?;
        self.store.set(INGREDIENTS_KEY, &raw).await?;
        self.ingredients = updated;
        Ok(())
    }
}

/// Persist the logged-in user
pub async fn save_session<S: KeyValueStore + ?Sized>(store: &S, user: &User) -> Result<()> {
    let raw = serde_json::to_string(user)?;
    store.set(SESSION_KEY, &raw).await
}

/// The logged-in user, if any; a corrupt session counts as logged out
pub async fn load_session<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<User>> {
    let Some(raw) = store.get(SESSION_KEY).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(user) => Ok(Some(user)),
        Err(e) => {
            error!("Failed to parse stored session: {}", e);
            Ok(None)
        }
    }
}

pub async fn clear_session<S: KeyValueStore + ?Sized>(store: &S) -> Result<()> {
    store.remove(SESSION_KEY).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    /// Reads like an empty store but refuses every write
    struct ReadOnlyStore;

    #[async_trait]
    impl KeyValueStore for ReadOnlyStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(AppError::Storage("read-only".to_string()))
        }

        async fn remove(&self, _key: &str) -> Result<()> {
            Err(AppError::Storage("read-only".to_string()))
        }
    }

    fn temp_store_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("mystere-meal-test-{}", std::process::id()))
            .join(name)
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let path = temp_store_path("persist.json");
        let _ = tokio::fs::remove_file(&path).await;

        let store = FileStore::new(&path);
        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("a").await.unwrap().as_deref(), Some("1"));
        reopened.remove("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("2"));

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_file_store_missing_file_is_empty() {
        let store = FileStore::new(temp_store_path("does-not-exist.json"));
        assert_eq!(store.get("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_recovers_from_garbage() {
        let path = temp_store_path("garbage.json");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, "{ truncated").await.unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get(SESSION_KEY).await.unwrap(), None);
        assert!(load_session(&store).await.unwrap().is_none());
        assert!(Pantry::load(&store).await.unwrap().is_empty());
        clear_session(&store).await.unwrap();

        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("k").await.unwrap().as_deref(), Some("v"));

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_pantry_add_dedupes_and_persists() {
        let store = MemoryStore::new();
        let mut pantry = Pantry::load(&store).await.unwrap();
        assert!(pantry.is_empty());

        assert!(pantry.add("egg").await.unwrap());
        assert!(pantry.add("milk").await.unwrap());
        assert!(!pantry.add("egg").await.unwrap());
        // exact comparison: different case is a different entry
        assert!(pantry.add("Egg").await.unwrap());

        let reloaded = Pantry::load(&store).await.unwrap();
        assert_eq!(reloaded.ingredients(), ["egg", "milk", "Egg"]);
    }

    #[tokio::test]
    async fn test_pantry_remove_and_clear() {
        let store = MemoryStore::new();
        let mut pantry = Pantry::load(&store).await.unwrap();
        pantry.add("egg").await.unwrap();
        pantry.add("flour").await.unwrap();

        assert!(pantry.remove("egg").await.unwrap());
        assert!(!pantry.remove("egg").await.unwrap());
        assert_eq!(pantry.ingredients(), ["flour"]);

        pantry.clear().await.unwrap();
        assert!(Pantry::load(&store).await.unwrap().is_empty());
        assert_eq!(store.get(INGREDIENTS_KEY).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_pantry_ignores_corrupt_value() {
        let store = MemoryStore::new();
        store.set(INGREDIENTS_KEY, "{\"not\": \"a list\"}").await.unwrap();
        let pantry = Pantry::load(&store).await.unwrap();
        assert!(pantry.is_empty());
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = MemoryStore::new();
        assert_eq!(load_session(&store).await.unwrap(), None);

        let user = User {
            id: "u1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            token: Some("t0k3n".to_string()),
        };
        save_session(&store, &user).await.unwrap();
        assert_eq!(load_session(&store).await.unwrap(), Some(user));

        clear_session(&store).await.unwrap();
        assert_eq!(load_session(&store).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_pantry_ignores_blank_ingredients() {
        let store = MemoryStore::new();
        let mut pantry = Pantry::load(&store).await.unwrap();

        assert!(!pantry.add("").await.unwrap());
        assert!(!pantry.add("   ").await.unwrap());
        assert!(pantry.is_empty());
        assert_eq!(store.get(INGREDIENTS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_pantry_unchanged_when_save_fails() {
        let store = ReadOnlyStore;
        let mut pantry = Pantry::load(&store).await.unwrap();

        assert!(matches!(pantry.add("egg").await, Err(AppError::Storage(_))));
        assert!(pantry.is_empty());

        pantry.ingredients = vec!["egg".to_string()];
        assert!(pantry.remove("egg").await.is_err());
        assert!(pantry.clear().await.is_err());
        assert_eq!(pantry.ingredients(), ["egg"]);
    }
}
