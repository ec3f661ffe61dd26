//! Infrastructure layer providing external service integrations.
//!
//! This module contains the file output the console offers: CSV reports
//! of a page's records.

pub mod export;

pub use export::*;
