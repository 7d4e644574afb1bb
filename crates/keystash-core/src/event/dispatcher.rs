use std::collections::HashMap;
use std::fmt;

use log::trace;

use crate::event::{Listener, ListenerId, StorageEvent};

struct Registration {
    id: ListenerId,
    once: bool,
    listener: Listener,
}

/// Registry of change listeners, keyed by key id
pub struct ChangeDispatcher {
    listeners: HashMap<String, Vec<Registration>>,
    next_listener_id: ListenerId,
}

impl fmt::Debug for ChangeDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count: usize = self.listeners.values().map(|v| v.len()).sum();
        f.debug_struct("ChangeDispatcher")
            .field("listener_count", &count)
            .field("next_listener_id", &self.next_listener_id)
            .finish()
    }
}

impl ChangeDispatcher {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            next_listener_id: 1,
        }
    }

    /// Call `listener` on every change to `key_id`.
    pub fn subscribe(&mut self, key_id: &str, listener: Listener) -> ListenerId {
        self.register(key_id, listener, false)
    }

    /// Call `listener` on the next change to `key_id` only.
    pub fn subscribe_once(&mut self, key_id: &str, listener: Listener) -> ListenerId {
        self.register(key_id, listener, true)
    }

    /// Drop a listener. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let mut found = false;
        self.listeners.values_mut().for_each(|registrations| {
            let len_before = registrations.len();
            registrations.retain(|r| r.id != id);
            if registrations.len() < len_before {
                found = true;
            }
        });
        self.listeners.retain(|_, registrations| !registrations.is_empty());
        found
    }

    /// Deliver `event` to the listeners of its key id, in registration
    /// order. Returns how many listeners ran.
    pub fn emit(&mut self, event: &StorageEvent) -> usize {
        let Some(registrations) = self.listeners.get_mut(&event.id) else {
            return 0;
        };

        for registration in registrations.iter() {
            (registration.listener)(event);
        }
        let count = registrations.len();

        registrations.retain(|r| !r.once);
        if registrations.is_empty() {
            self.listeners.remove(&event.id);
        }

        trace!("Delivered change for {} to {} listener(s)", event.id, count);
        count
    }

    pub fn listener_count(&self, key_id: &str) -> usize {
        self.listeners.get(key_id).map_or(0, |v| v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    fn register(&mut self, key_id: &str, listener: Listener, once: bool) -> ListenerId {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners
            .entry(key_id.to_string())
            .or_default()
            .push(Registration { id, once, listener });
        id
    }
}

impl Default for ChangeDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
