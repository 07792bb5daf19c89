use std::collections::HashMap;
use std::sync::Mutex;

/// In-process response cache for the read-only aggregations (search,
/// calendar). Writes through the conflict guards invalidate by key prefix:
/// the whole `search:` namespace, and `calendar:{property_id}:` per property.
#[derive(Debug, Default)]
pub struct Cache {
    entries: Mutex<HashMap<String, String>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn put(&self, key: &str, value: String) {
        self.entries.lock().unwrap().insert(key.to_string(), value);
    }

    pub fn invalidate_prefix(&self, prefix: &str) {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let dropped = before - entries.len();
        if dropped > 0 {
            tracing::debug!(prefix, dropped, "invalidated cache entries");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

pub fn search_prefix() -> &'static str {
    "search:"
}

pub fn calendar_prefix(property_id: i64) -> String {
    format!("calendar:{property_id}:")
}
