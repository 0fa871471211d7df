//! Favorites record
//!
//! A JSON object in local storage mapping favorite keys to `true`. It is
//! read fresh before every change so edits from other tabs are kept.

use std::rc::Rc;

use cc_platform::KeyValueStore;
use serde_json::{Map, Value};

use crate::{ActionError, Page};

/// Favorites stored under one storage key
pub struct Favorites {
    store: Rc<dyn KeyValueStore>,
    key: String,
}

impl Favorites {
    pub fn new(store: Rc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    /// The page's local storage under the configured key
    pub fn for_page(page: &Page) -> Self {
        Self::new(page.navigator().local_storage.clone(), page.config().favorites_key.clone())
    }

    /// Current record; a missing entry is an empty record
    pub fn load(&self) -> Result<Map<String, Value>, ActionError> {
        let Some(raw) = self.store.get_item(&self.key)? else {
            return Ok(Map::new());
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&raw)? {
            Value::Object(map) => Ok(map),
            other => {
                tracing::warn!(key = %self.key, kind = json_kind(&other), "favorites record is not an object, starting over");
                Ok(Map::new())
            }
        }
    }

    pub fn save(&self, record: &Map<String, Value>) -> Result<(), ActionError> {
        let raw = serde_json::to_string(record)?;
        self.store.set_item(&self.key, &raw)?;
        Ok(())
    }

    /// Add (`true`) or delete a favorite
    pub fn set(&self, favorite: &str, on: bool) -> Result<(), ActionError> {
        let mut record = self.load()?;
        if on {
            record.insert(favorite.to_string(), Value::Bool(true));
        } else {
            record.remove(favorite);
        }
        self.save(&record)?;
        tracing::debug!(key = %self.key, favorite, on, "favorites updated");
        Ok(())
    }

    pub fn contains(&self, favorite: &str) -> Result<bool, ActionError> {
        Ok(self.load()?.get(favorite).is_some_and(is_truthy))
    }

    /// Favorited keys, sorted
    pub fn keys(&self) -> Result<Vec<String>, ActionError> {
        let mut keys: Vec<String> = self
            .load()?
            .into_iter()
            .filter(|(_, value)| is_truthy(value))
            .map(|(key, _)| key)
            .collect();
        keys.sort();
        Ok(keys)
    }
}

/// JavaScript truthiness of a JSON value
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_platform::Storage;
    use serde_json::json;

    fn favorites() -> (Rc<Storage>, Favorites) {
        let store = Rc::new(Storage::session());
        let favs = Favorites::new(store.clone(), "favs::cifras");
        (store, favs)
    }

    #[test]
    fn test_missing_record_is_empty() {
        let (_, favs) = favorites();
        assert!(favs.load().unwrap().is_empty());
        assert!(!favs.contains("song-1").unwrap());
    }

    #[test]
    fn test_set_and_unset() {
        let (store, favs) = favorites();
        favs.set("song-1", true).unwrap();
        favs.set("song-2", true).unwrap();
        favs.set("song-1", false).unwrap();

        assert_eq!(favs.keys().unwrap(), ["song-2"]);
        assert_eq!(store.get_item("favs::cifras").unwrap().as_deref(), Some(r#"{"song-2":true}"#));
    }

    #[test]
    fn test_unrelated_entries_survive() {
        let (store, favs) = favorites();
        store.set_item("favs::cifras", r#"{"other":1,"off":0}"#).unwrap();
        favs.set("song-1", true).unwrap();

        let record = favs.load().unwrap();
        assert_eq!(record.get("other"), Some(&json!(1)));
        assert!(favs.contains("other").unwrap());
        assert!(!favs.contains("off").unwrap());
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!("yes")));
        assert!(is_truthy(&json!([])));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
    }

    #[test]
    fn test_corrupt_record_is_an_error() {
        let (store, favs) = favorites();
        store.set_item("favs::cifras", "{not json").unwrap();

        assert!(matches!(favs.set("song-1", true), Err(ActionError::Json(_))));
        assert_eq!(store.get_item("favs::cifras").unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn test_non_object_record_restarts() {
        let (store, favs) = favorites();
        store.set_item("favs::cifras", "[1, 2]").unwrap();
        favs.set("song-1", true).unwrap();

        assert_eq!(favs.keys().unwrap(), ["song-1"]);
    }
}
