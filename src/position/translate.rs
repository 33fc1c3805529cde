//! Classification and translation of raw provider fixes.
//!
//! Every provider callback lands here exactly once: [`classify`] decides
//! whether the status code means a usable fix or a failure message, and
//! [`translate`] maps a usable record onto the stable outbound schema.
//! Translation is total; partial provider data produces a partial
//! payload, never an error.

use tracing::{debug, warn};

use super::types::{Coordinates, LocationResult, PointOfInterest};
use crate::provider::{FixCode, RawFix};

/// Outcome of classifying one raw fix.
#[derive(Debug, Clone, PartialEq)]
pub enum FixOutcome {
    /// The fix is usable; the translated payload is ready to emit.
    Success(LocationResult),
    /// The fix reported a failure; the message is ready for an error
    /// event.
    Failure(String),
}

/// Classifies a raw fix by its status code.
///
/// A [`FixCode::NoFix`] means positioning failed outright; criteria,
/// network, offline-fallback and server errors mean the provider ran but
/// produced nothing usable. Every other code, including ones this crate
/// does not recognize, translates to a success.
///
/// # Examples
///
/// ```
/// use geobridge_core::position::{classify, FixOutcome};
/// use geobridge_core::provider::{FixCode, RawFix};
///
/// let fix = RawFix::new(FixCode::NoFix, 0.0, 0.0);
/// let FixOutcome::Failure(message) = classify(&fix) else {
///     panic!("no-fix must classify as failure");
/// };
/// assert_eq!(message, "location failed: no fix acquired");
/// ```
#[must_use]
pub fn classify(fix: &RawFix) -> FixOutcome {
    match fix.code {
        FixCode::NoFix => {
            FixOutcome::Failure(format!("location failed: {}", fix.status_description()))
        }
        FixCode::CriteriaException
        | FixCode::NetworkException
        | FixCode::OfflineFailed
        | FixCode::ServerError => {
            FixOutcome::Failure(format!("location invalid: {}", fix.status_description()))
        }
        _ => FixOutcome::Success(translate(fix)),
    }
}

/// Maps a raw fix onto the stable outbound schema.
///
/// Numeric fields copy over without transformation (coordinate-system
/// conversion happened inside the provider), geocoding strings move as
/// they are, and the POI list goes through best-effort extraction.
#[must_use]
pub fn translate(fix: &RawFix) -> LocationResult {
    LocationResult {
        coords: Coordinates {
            latitude: fix.latitude,
            longitude: fix.longitude,
            altitude: fix.altitude,
            accuracy_radius: fix.radius,
            heading_degrees: fix.direction,
            speed: fix.speed,
            address: fix.address.clone(),
            country: fix.country.clone(),
            province: fix.province.clone(),
            city: fix.city.clone(),
            district: fix.district.clone(),
            town: fix.town.clone(),
            street: fix.street.clone(),
            street_number: fix.street_number.clone(),
            pois: convert_pois(fix),
        },
        timestamp: fix.time.clone(),
    }
}

/// Extracts the typed POI list from a raw fix.
///
/// `None` when the provider attached no list or an empty one (the
/// outbound payload omits the key). Entries missing their id or name are
/// dropped; whatever remains keeps provider order.
fn convert_pois(fix: &RawFix) -> Option<Vec<PointOfInterest>> {
    let raw = match fix.pois.as_deref() {
        None | Some([]) => {
            debug!("fix carried no poi list");
            return None;
        }
        Some(raw) => raw,
    };

    let mut pois = Vec::with_capacity(raw.len());
    let mut skipped = 0_usize;
    for entry in raw {
        match (entry.id.as_ref(), entry.name.as_ref()) {
            (Some(id), Some(name)) => pois.push(PointOfInterest {
                id: id.clone(),
                name: name.clone(),
                address: entry.address.clone(),
                rank: entry.rank,
            }),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(
            skipped,
            total = raw.len(),
            "dropped poi entries missing id or name"
        );
    }

    Some(pois)
}
