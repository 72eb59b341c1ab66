use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// What `KeyedStore::scan_and_mutate` should do with a matched entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAction {
    Keep,
    Evict,
}

/// A map guarded by a single lock. Every read and write, iteration
/// included, holds the lock for its whole duration.
pub struct KeyedStore<K, V> {
    entries: Mutex<HashMap<K, V>>,
}

impl<K, V> KeyedStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, V>> {
        // Every operation leaves the map consistent, so a panic in
        // another holder does not invalidate it
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts the value, returning the value it replaced if any
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.lock().insert(key, value)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().get(key).cloned()
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.lock().remove(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<(K, V)> {
        self.lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Copies out every entry matching the predicate
    pub fn collect_matching<P>(&self, mut predicate: P) -> Vec<(K, V)>
    where
        P: FnMut(&K, &V) -> bool,
    {
        self.lock()
            .iter()
            .filter(|(k, v)| predicate(*k, *v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Applies `action` to every entry matching `predicate` while holding the
    /// lock. Entries the action evicts are removed once the whole map has been
    /// visited. Returns the number of evicted entries.
    pub fn scan_and_mutate<P, A>(&self, mut predicate: P, mut action: A) -> usize
    where
        P: FnMut(&K, &V) -> bool,
        A: FnMut(&K, &mut V) -> ScanAction,
    {
        let mut entries = self.lock();
        let mut evictions = Vec::new();
        for (key, value) in entries.iter_mut() {
            if predicate(key, value) && action(key, value) == ScanAction::Evict {
                evictions.push(key.clone());
            }
        }
        for key in &evictions {
            entries.remove(key);
        }
        evictions.len()
    }
}

impl<K, V> Default for KeyedStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

// Does not print the entries as that would require the lock
impl<K, V> std::fmt::Debug for KeyedStore<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn put_overwrites_existing_key() {
        let store = KeyedStore::new();
        assert_eq!(store.put("a", 1), None);
        assert_eq!(store.put("a", 2), Some(1));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&"a"), Some(2));
        assert_eq!(store.remove(&"a"), Some(2));
        assert!(store.is_empty());
    }

    #[test]
    fn scan_and_mutate_evicts_after_full_pass() {
        let store = KeyedStore::<i32, i32>::new();
        for i in 0..10 {
            store.put(i, i * 10);
        }

        let mut visited = 0;
        let evicted = store.scan_and_mutate(
            |k, _| k % 2 == 0,
            |_, v| {
                visited += 1;
                if *v >= 40 {
                    ScanAction::Evict
                } else {
                    *v += 1;
                    ScanAction::Keep
                }
            },
        );

        assert_eq!(visited, 5);
        assert_eq!(evicted, 3);
        assert_eq!(store.len(), 7);
        assert_eq!(store.get(&0), Some(1));
        assert_eq!(store.get(&2), Some(21));
        assert_eq!(store.get(&3), Some(30));
        assert_eq!(store.get(&4), None);
        assert_eq!(store.get(&8), None);
    }

    #[test]
    fn collect_matching_copies_entries() {
        let store = KeyedStore::new();
        store.put("x", 1);
        store.put("y", 5);
        let matching = store.collect_matching(|_, v| *v > 2);
        assert_eq!(matching, vec![("y", 5)]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn concurrent_writers_do_not_lose_updates() {
        let store = Arc::new(KeyedStore::<i32, i32>::new());
        let writers = (0..8)
            .map(|t| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..500 {
                        store.put(t * 1000 + i, i);
                    }
                })
            })
            .collect::<Vec<_>>();
        let scanner = {
            let store = store.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    store.scan_and_mutate(|_, _| true, |_, _| ScanAction::Keep);
                }
            })
        };

        for writer in writers {
            writer.join().unwrap();
        }
        scanner.join().unwrap();
        assert_eq!(store.len(), 8 * 500);
    }
}
