//! Application state shared between the UI and node models

pub mod app_state;

pub use app_state::{AppState, Slider, SubscriptionHandle};
