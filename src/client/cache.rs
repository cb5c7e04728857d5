use std::collections::HashMap;
use std::hash::Hash;

/// Tag shared by every cached lead listing.
pub const LEADS_TAG: &str = "leads";

/// Entries kept before the oldest ones are evicted.
pub const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
struct Entry<V> {
    tag: &'static str,
    value: V,
    stamp: u64,
}

/// Query results keyed by request, invalidated by tag.
///
/// Each tag carries an epoch that [`QueryCache::invalidate_tag`] bumps. A
/// result fetched under an older epoch is refused on insert, so a request that
/// was in flight during a mutation cannot bring back pre-mutation data.
///
/// At most `capacity` entries are kept; inserting past it evicts the entries
/// stored longest ago.
#[derive(Debug, Clone)]
pub struct QueryCache<K, V> {
    entries: HashMap<K, Entry<V>>,
    epochs: HashMap<&'static str, u64>,
    capacity: usize,
    next_stamp: u64,
}

impl<K, V> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<K, V> QueryCache<K, V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            epochs: HashMap::new(),
            capacity: capacity.max(1),
            next_stamp: 0,
        }
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn epoch(&self, tag: &str) -> u64 {
        self.epochs.get(tag).copied().unwrap_or_default()
    }

    /// Stores `value` unless `tag` was invalidated after `epoch` was read.
    pub fn insert(&mut self, key: K, tag: &'static str, epoch: u64, value: V) -> bool {
        if epoch != self.epoch(tag) {
            return false;
        }
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        self.entries.insert(key, Entry { tag, value, stamp });

        while self.entries.len() > self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.stamp)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => self.entries.remove(&key),
                None => break,
            };
        }
        true
    }

    /// Drops every entry carrying `tag`.
    pub fn invalidate_tag(&mut self, tag: &'static str) {
        self.entries.retain(|_, entry| entry.tag != tag);
        *self.epochs.entry(tag).or_default() += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
