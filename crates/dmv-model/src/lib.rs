//! Normalized device data model and the builder that produces it.
//!
//! The model is the hand-off point between parsing and validation:
//! endpoint -> cluster -> {attributes, events, commands, features}, every
//! element keyed by its canonical id string. The builder owns the model
//! while folding log entries into it; afterwards the model is read-only.

pub mod buckets;
pub mod builder;
pub mod model;

pub use builder::ModelBuilder;
pub use model::{ClusterInstance, DeviceModel, Element, Endpoint};
