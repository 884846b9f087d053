//! Resource version store backing conditional requests
//!
//! Versions are keyed by request path only. They are not scoped per caller,
//! and each process keeps its own store, so instances behind a load balancer
//! will disagree on versions.

use std::sync::Arc;

use dashmap::DashMap;

/// Concurrent `path -> content hash` map
pub trait EtagStore: Send + Sync {
    fn get(&self, path: &str) -> Option<String>;

    /// Record the latest hash for `path`, replacing any earlier one
    fn set(&self, path: &str, etag: String);

    fn remove(&self, path: &str) -> Option<String>;
}

/// Process-local [`EtagStore`] with no expiry
#[derive(Debug, Default, Clone)]
pub struct InMemoryEtagStore {
    entries: Arc<DashMap<String, String>>,
}

impl InMemoryEtagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EtagStore for InMemoryEtagStore {
    fn get(&self, path: &str) -> Option<String> {
        self.entries.get(path).map(|entry| entry.value().clone())
    }

    fn set(&self, path: &str, etag: String) {
        self.entries.insert(path.to_string(), etag);
    }

    fn remove(&self, path: &str) -> Option<String> {
        self.entries.remove(path).map(|(_, etag)| etag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites() {
        let store = InMemoryEtagStore::new();
        store.set("/entries/e_1", "AA".into());
        store.set("/entries/e_1", "BB".into());
        assert_eq!(store.get("/entries/e_1").as_deref(), Some("BB"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_keyed_by_exact_path() {
        let store = InMemoryEtagStore::new();
        store.set("/entries", "AA".into());
        assert!(store.get("/entries/").is_none());
        assert!(store.get("/Entries").is_none());
    }

    #[test]
    fn test_remove() {
        let store = InMemoryEtagStore::new();
        store.set("/entries/e_1", "AA".into());
        assert_eq!(store.remove("/entries/e_1").as_deref(), Some("AA"));
        assert!(store.is_empty());
        assert!(store.remove("/entries/e_1").is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = InMemoryEtagStore::new();
        let shared = store.clone();
        shared.set("/x", "1".into());
        assert_eq!(store.get("/x").as_deref(), Some("1"));
    }

    #[test]
    fn test_concurrent_writers() {
        let store = InMemoryEtagStore::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for n in 0..100 {
                        store.set(&format!("/entries/{}", n % 10), format!("{i}-{n}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 10);
    }
}
