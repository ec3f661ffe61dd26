//! farmdesk - Farm Management Console Library
//!
//! An in-memory store for farm and fleet records (vehicles, equipment,
//! staff, fields and crops) with a terminal console on top.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
