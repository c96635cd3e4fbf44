//! Shared application state
//!
//! Holds named numeric sliders that the UI (or code) can change at runtime,
//! and notifies subscribers when a slider's value changes. Node models get
//! the state passed in explicitly at construction instead of reaching for a
//! global.

use std::any::Any;
use std::collections::HashMap;
use std::rc::Weak;

use crate::error::{Result, SceneryError};

/// A numeric control with its allowed range and UI step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slider {
    pub value: f32,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Slider {
    fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Handle returned by [`AppState::subscribe`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    key: String,
    id: u64,
}

impl SubscriptionHandle {
    /// Slider key this subscription watches
    pub fn key(&self) -> &str {
        &self.key
    }
}

struct Subscriber {
    id: u64,
    /// Subscription lapses once this is gone
    owner: Option<Weak<dyn Any>>,
    callback: Box<dyn FnMut(f32)>,
}

impl Subscriber {
    fn is_live(&self) -> bool {
        self.owner.as_ref().map_or(true, |owner| owner.strong_count() > 0)
    }
}

/// Named sliders plus the observers watching them
#[derive(Default)]
pub struct AppState {
    sliders: HashMap<String, Slider>,
    subscribers: HashMap<String, Vec<Subscriber>>,
    next_id: u64,
}

impl AppState {
    /// Create an empty state store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a slider unless one already exists under `key`
    ///
    /// An existing slider keeps its current value and range, so several
    /// models may declare the same control safely.
    ///
    /// # Arguments
    /// * `key` - Slider name, also used as the UI label
    /// * `value` - Initial value, clamped into `[min, max]`
    /// * `min` / `max` - Allowed range
    /// * `step` - UI step size
    pub fn add_slider_if_missing(&mut self, key: &str, value: f32, min: f32, max: f32, step: f32) -> Result<()> {
        if self.sliders.contains_key(key) {
            return Ok(());
        }

        if !(min < max) {
            return Err(SceneryError::InvalidSlider {
                key: key.to_string(),
                min,
                max,
            });
        }

        let slider = Slider {
            value: value.clamp(min, max),
            min,
            max,
            step,
        };
        log::debug!("Added slider '{}' = {} in [{}, {}] step {}", key, slider.value, min, max, step);
        self.sliders.insert(key.to_string(), slider);
        Ok(())
    }

    /// Current value of a slider
    pub fn get_state(&self, key: &str) -> Result<f32> {
        self.slider(key)
            .map(|slider| slider.value)
            .ok_or_else(|| SceneryError::UnknownStateKey(key.to_string()))
    }

    /// Full slider description
    pub fn slider(&self, key: &str) -> Option<&Slider> {
        self.sliders.get(key)
    }

    /// Names of all registered sliders, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.sliders.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Set a slider's value and notify subscribers
    ///
    /// The value is clamped into the slider's range. Subscribers are only
    /// called when the stored value actually changes.
    pub fn set_state(&mut self, key: &str, value: f32) -> Result<()> {
        let slider = self
            .sliders
            .get_mut(key)
            .ok_or_else(|| SceneryError::UnknownStateKey(key.to_string()))?;

        let clamped = slider.clamp(value);
        if clamped != value {
            log::warn!("Clamped '{}' from {} to {}", key, value, clamped);
        }
        if clamped == slider.value {
            return Ok(());
        }
        slider.value = clamped;

        if let Some(subscribers) = self.subscribers.get_mut(key) {
            subscribers.retain(Subscriber::is_live);
            for subscriber in subscribers.iter_mut() {
                (subscriber.callback)(clamped);
            }
        }
        Ok(())
    }

    /// Watch a slider for changes
    ///
    /// The callback receives the new value every time [`AppState::set_state`]
    /// changes it.
    pub fn subscribe<F>(&mut self, key: &str, callback: F) -> Result<SubscriptionHandle>
    where
        F: FnMut(f32) + 'static,
    {
        self.insert_subscriber(key, None, Box::new(callback))
    }

    /// Like [`AppState::subscribe`], but the subscription ends by itself
    /// once every strong reference to `owner` has been dropped
    pub fn subscribe_owned<F>(&mut self, key: &str, owner: Weak<dyn Any>, callback: F) -> Result<SubscriptionHandle>
    where
        F: FnMut(f32) + 'static,
    {
        self.insert_subscriber(key, Some(owner), Box::new(callback))
    }

    fn insert_subscriber(
        &mut self,
        key: &str,
        owner: Option<Weak<dyn Any>>,
        callback: Box<dyn FnMut(f32)>,
    ) -> Result<SubscriptionHandle> {
        if !self.sliders.contains_key(key) {
            return Err(SceneryError::UnknownStateKey(key.to_string()));
        }

        let id = self.next_id;
        self.next_id += 1;

        let subscribers = self.subscribers.entry(key.to_string()).or_default();
        subscribers.retain(Subscriber::is_live);
        subscribers.push(Subscriber { id, owner, callback });

        Ok(SubscriptionHandle {
            key: key.to_string(),
            id,
        })
    }

    /// Stop a subscription; returns `false` if it was already removed
    pub fn unsubscribe(&mut self, handle: &SubscriptionHandle) -> bool {
        let Some(subscribers) = self.subscribers.get_mut(&handle.key) else {
            return false;
        };
        let before = subscribers.len();
        subscribers.retain(|subscriber| subscriber.id != handle.id);
        before != subscribers.len()
    }

    /// Number of live subscriptions on a key
    pub fn subscriber_count(&self, key: &str) -> usize {
        self.subscribers
            .get(key)
            .map_or(0, |subscribers| subscribers.iter().filter(|s| s.is_live()).count())
    }
}
