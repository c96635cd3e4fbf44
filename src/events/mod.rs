//! Event signalling between node models and whoever renders them
//!
//! Node models batch their per-element mutations and announce them with a
//! single signal on an [`EventBus`], keyed by a per-model event enum.

pub mod bus;

pub use bus::{EventBus, ListenerHandle};
