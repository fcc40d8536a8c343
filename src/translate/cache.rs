use std::collections::{HashMap, VecDeque};

/// Default capacity matching the browser-side cache.
pub const MAX_CACHE_ENTRIES: usize = 1000;

/// Bounded original → translated store. Eviction is strictly
/// oldest-inserted-first (not LRU): lookups and overwrites never change an
/// entry's position in the eviction queue.
pub struct TranslationCache {
    entries: HashMap<String, String>,
    order: VecDeque<String>,
    capacity: usize,
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::with_capacity(MAX_CACHE_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    pub fn get(&self, text: &str) -> Option<&str> {
        self.entries.get(text).map(String::as_str)
    }

    /// Insert or overwrite. When the insert pushes the size past capacity, the
    /// single oldest-inserted key is evicted.
    pub fn put(&mut self, text: String, translated: String) {
        if self.entries.insert(text.clone(), translated).is_some() {
            return;
        }
        self.order.push_back(text);

        if self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    /// Degraded fallback used while live translation is unavailable: first
    /// entry (insertion order) whose key is a substring of `text` or contains
    /// `text`. A heuristic, not a primary lookup path.
    pub fn find_similar(&self, text: &str) -> Option<&str> {
        self.order
            .iter()
            .find(|key| text.contains(key.as_str()) || key.contains(text))
            .and_then(|key| self.entries.get(key))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_round_trips() {
        let mut cache = TranslationCache::new();
        cache.put("Hello world".into(), "ආයුබෝවන් ලෝකය".into());
        assert_eq!(cache.get("Hello world"), Some("ආයුබෝවන් ලෝකය"));
        assert_eq!(cache.get("hello world"), None);
    }

    #[test]
    fn overwrite_keeps_a_single_entry_and_its_position() {
        let mut cache = TranslationCache::with_capacity(2);
        cache.put("a".into(), "1".into());
        cache.put("b".into(), "2".into());
        cache.put("a".into(), "1b".into());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some("1b"));

        // "a" kept its original slot, so the next insert evicts it.
        cache.put("c".into(), "3".into());
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some("2"));
        assert_eq!(cache.get("c"), Some("3"));
    }

    #[test]
    fn insert_past_capacity_evicts_the_oldest_key() {
        let mut cache = TranslationCache::new();
        for i in 0..1001 {
            cache.put(format!("line {i}"), format!("translated {i}"));
        }
        assert_eq!(cache.len(), 1000);
        assert_eq!(cache.get("line 0"), None);
        assert_eq!(cache.get("line 1"), Some("translated 1"));
        assert_eq!(cache.get("line 1000"), Some("translated 1000"));
    }

    #[test]
    fn lookups_do_not_refresh_eviction_order() {
        let mut cache = TranslationCache::with_capacity(2);
        cache.put("a".into(), "1".into());
        cache.put("b".into(), "2".into());
        assert_eq!(cache.get("a"), Some("1"));

        cache.put("c".into(), "3".into());
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn find_similar_matches_substrings_in_both_directions() {
        let mut cache = TranslationCache::new();
        cache.put("Hello world".into(), "ආයුබෝවන් ලෝකය".into());

        // Cached key contained in the query.
        assert_eq!(
            cache.find_similar("Hello world again"),
            Some("ආයුබෝවන් ලෝකය")
        );
        // Query contained in the cached key.
        assert_eq!(cache.find_similar("Hello"), Some("ආයුබෝවන් ලෝකය"));
        assert_eq!(cache.find_similar("Goodbye"), None);
    }

    #[test]
    fn find_similar_returns_the_first_match_in_insertion_order() {
        let mut cache = TranslationCache::new();
        cache.put("Hello there".into(), "first".into());
        cache.put("Hello friend".into(), "second".into());
        assert_eq!(cache.find_similar("Hello"), Some("first"));
    }
}
