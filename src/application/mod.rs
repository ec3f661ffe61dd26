//! Application layer managing state and business workflows.
//!
//! This module holds the session's store, routes intents to the entity
//! collections, and keeps the console view-model in step with it.

pub mod store;
pub mod snapshot;
pub mod aggregator;
pub mod console;
pub mod demo;

pub use store::*;
pub use snapshot::*;
pub use aggregator::*;
pub use console::*;
pub use demo::*;
