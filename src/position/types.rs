//! Stable outbound payload types.
//!
//! These structs define the wire schema hosts receive with every
//! position event. Serialized key names are frozen: embedders bind to
//! them, so renaming a field here is a breaking change even though the
//! Rust-side names are free to differ.

use serde::{Deserialize, Serialize};

/// Coordinates and metadata for one delivered fix.
///
/// Numeric fields are always present (zero when the provider had no
/// value); reverse-geocoding strings serialize as `null` when the
/// provider did not supply them; `pois` is omitted from the JSON
/// entirely when no list was attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Latitude in the coordinate system the session was configured with.
    pub latitude: f64,

    /// Longitude in the coordinate system the session was configured with.
    pub longitude: f64,

    /// Altitude in meters.
    pub altitude: f64,

    /// Horizontal accuracy radius in meters.
    #[serde(rename = "accuracy")]
    pub accuracy_radius: f64,

    /// Heading in degrees from true north.
    #[serde(rename = "heading")]
    pub heading_degrees: f64,

    /// Ground speed in km/h.
    pub speed: f64,

    /// Full formatted address.
    pub address: Option<String>,

    /// Country name.
    pub country: Option<String>,

    /// Province or state.
    pub province: Option<String>,

    /// City.
    pub city: Option<String>,

    /// District within the city.
    #[serde(rename = "area")]
    pub district: Option<String>,

    /// Town or subdistrict.
    pub town: Option<String>,

    /// Street name.
    pub street: Option<String>,

    /// Street number.
    pub street_number: Option<String>,

    /// Nearby points of interest, in provider order. Absent from the
    /// JSON when the provider attached no list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pois: Option<Vec<PointOfInterest>>,
}

/// One point of interest near a fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    /// Provider-assigned identifier. Serialized as `uid`, the key hosts
    /// already bind to.
    #[serde(rename = "uid")]
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// Street address, when known.
    pub address: Option<String>,

    /// Relevance rank, higher is closer.
    pub rank: f64,
}

/// The payload emitted with every successful fix.
///
/// # Examples
///
/// ```
/// use geobridge_core::position::LocationResult;
///
/// let json = r#"{
///     "coords": {
///         "latitude": 39.9042, "longitude": 116.4074,
///         "altitude": 43.5, "accuracy": 12.0,
///         "heading": 90.0, "speed": 1.2,
///         "address": null, "country": null, "province": null,
///         "city": null, "area": null, "town": null,
///         "street": null, "streetNumber": null
///     },
///     "timestamp": "2024-05-01 10:30:00"
/// }"#;
///
/// let result = LocationResult::from_json(json).unwrap();
/// assert_eq!(result.coords.latitude, 39.9042);
/// assert!(result.coords.pois.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    /// Coordinates and metadata for the fix.
    pub coords: Coordinates,

    /// Provider wall-clock timestamp, passed through unparsed.
    pub timestamp: String,
}

impl LocationResult {
    /// Creates a `LocationResult` from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or missing required fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Converts this `LocationResult` to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (extremely rare).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
