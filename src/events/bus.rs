//! Typed publish/subscribe bus
//!
//! Listeners are registered per event kind and called synchronously, in
//! registration order, whenever that kind is signalled. Every registration
//! returns a [`ListenerHandle`] that removes the listener again.

use std::collections::HashMap;
use std::hash::Hash;

/// Handle returned on registration, used to remove the listener later
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerHandle<K> {
    key: K,
    id: u64,
}

impl<K: Copy> ListenerHandle<K> {
    /// Event kind this listener was registered for
    pub fn key(&self) -> K {
        self.key
    }
}

struct ListenerEntry<P: ?Sized> {
    id: u64,
    name: Option<String>,
    callback: Box<dyn FnMut(&P)>,
}

/// Event bus keyed by an event-kind enum `K` delivering payloads of type `P`
pub struct EventBus<K, P: ?Sized = ()> {
    listeners: HashMap<K, Vec<ListenerEntry<P>>>,
    next_id: u64,
}

impl<K, P> EventBus<K, P>
where
    K: Copy + Eq + Hash + std::fmt::Debug,
    P: ?Sized,
{
    /// Create an empty bus
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            next_id: 0,
        }
    }

    /// Register a listener for `key`
    pub fn add_listener<F>(&mut self, key: K, callback: F) -> ListenerHandle<K>
    where
        F: FnMut(&P) + 'static,
    {
        self.insert(key, None, Box::new(callback))
    }

    /// Register a listener under a name
    ///
    /// A listener previously registered for the same key and name is
    /// replaced, so re-running setup code never stacks duplicate callbacks.
    pub fn add_named_listener<F>(&mut self, key: K, name: &str, callback: F) -> ListenerHandle<K>
    where
        F: FnMut(&P) + 'static,
    {
        if let Some(entries) = self.listeners.get_mut(&key) {
            let before = entries.len();
            entries.retain(|entry| entry.name.as_deref() != Some(name));
            if entries.len() != before {
                log::debug!("Replacing listener '{}' for {:?}", name, key);
            }
        }
        self.insert(key, Some(name.to_string()), Box::new(callback))
    }

    fn insert(&mut self, key: K, name: Option<String>, callback: Box<dyn FnMut(&P)>) -> ListenerHandle<K> {
        let id = self.next_id;
        self.next_id += 1;

        self.listeners.entry(key).or_default().push(ListenerEntry { id, name, callback });
        log::debug!("Registered listener {} for {:?}", id, key);

        ListenerHandle { key, id }
    }

    /// Remove a listener; returns `false` if it was already gone
    pub fn remove_listener(&mut self, handle: &ListenerHandle<K>) -> bool {
        let Some(entries) = self.listeners.get_mut(&handle.key) else {
            return false;
        };

        let before = entries.len();
        entries.retain(|entry| entry.id != handle.id);
        before != entries.len()
    }

    /// Deliver `payload` to every listener registered for `key`
    pub fn signal(&mut self, key: K, payload: &P) {
        if let Some(entries) = self.listeners.get_mut(&key) {
            for entry in entries.iter_mut() {
                (entry.callback)(payload);
            }
        }
    }

    /// Number of listeners registered for `key`
    pub fn listener_count(&self, key: K) -> usize {
        self.listeners.get(&key).map_or(0, Vec::len)
    }

    /// Drop every listener
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl<K, P> Default for EventBus<K, P>
where
    K: Copy + Eq + Hash + std::fmt::Debug,
    P: ?Sized,
{
    fn default() -> Self {
        Self::new()
    }
}
