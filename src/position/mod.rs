//! Position payloads and fix translation.
//!
//! [`types`] defines the stable schema hosts receive with every position
//! event; [`translate`] turns raw provider records into it and decides
//! which status codes count as failures.

pub mod translate;
pub mod types;

pub use translate::{classify, translate, FixOutcome};
pub use types::{Coordinates, LocationResult, PointOfInterest};
