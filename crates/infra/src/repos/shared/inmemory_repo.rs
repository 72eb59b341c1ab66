use reminder_service_domain::{Entity, ID};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Useful functions for creating inmemory repositories

fn lock<T>(collection: &Mutex<Vec<T>>) -> MutexGuard<'_, Vec<T>> {
    collection.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    lock(collection).push(val.clone());
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(
    collection: &Mutex<Vec<T>>,
    mut compare: F,
) -> Vec<T> {
    lock(collection)
        .iter()
        .filter(|item| compare(*item))
        .cloned()
        .collect()
}

pub fn delete<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let mut collection = lock(collection);
    let index = collection.iter().position(|item| item.id() == val_id)?;
    Some(collection.remove(index))
}
