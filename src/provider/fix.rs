//! Raw fix records as delivered by provider callbacks.
//!
//! A [`RawFix`] is the untranslated record a provider adapter hands to the
//! session's listener. Field names follow the provider's vocabulary
//! (`radius` for horizontal accuracy, `direction` for heading); the stable
//! outbound schema lives in [`crate::position`].

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Format of the wall-clock string providers stamp on fixes.
pub const PROVIDER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Provider status code attached to every fix.
///
/// The underlying SDK reports these as plain integers; codes this crate
/// does not know about are preserved in [`FixCode::Other`] instead of
/// being rejected, so fixes from newer SDK versions keep flowing.
///
/// # Examples
///
/// ```
/// use geobridge_core::provider::FixCode;
///
/// assert_eq!(FixCode::from_raw(61), FixCode::Gnss);
/// assert_eq!(FixCode::from_raw(4711), FixCode::Other(4711));
/// assert_eq!(FixCode::Network.as_raw(), 161);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum FixCode {
    /// No fix could be acquired.
    NoFix,
    /// Satellite fix.
    Gnss,
    /// The positioning request violated provider criteria.
    CriteriaException,
    /// Network trouble while acquiring the fix.
    NetworkException,
    /// Fix answered from the provider's cache.
    Cached,
    /// Offline (on-device) fix.
    Offline,
    /// Offline positioning failed.
    OfflineFailed,
    /// Offline positioning failed and the network fallback failed too.
    OfflineNetworkFailed,
    /// Network (cell/wifi) fix.
    Network,
    /// The positioning server reported an error.
    ServerError,
    /// A status code this crate does not know about.
    Other(i32),
}

impl FixCode {
    /// Maps a provider status integer to a code.
    #[must_use]
    pub const fn from_raw(code: i32) -> Self {
        match code {
            0 => Self::NoFix,
            61 => Self::Gnss,
            62 => Self::CriteriaException,
            63 => Self::NetworkException,
            65 => Self::Cached,
            66 => Self::Offline,
            67 => Self::OfflineFailed,
            68 => Self::OfflineNetworkFailed,
            161 => Self::Network,
            167 => Self::ServerError,
            other => Self::Other(other),
        }
    }

    /// The provider status integer for this code.
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        match self {
            Self::NoFix => 0,
            Self::Gnss => 61,
            Self::CriteriaException => 62,
            Self::NetworkException => 63,
            Self::Cached => 65,
            Self::Offline => 66,
            Self::OfflineFailed => 67,
            Self::OfflineNetworkFailed => 68,
            Self::Network => 161,
            Self::ServerError => 167,
            Self::Other(other) => other,
        }
    }

    /// Built-in description, used when the provider did not attach one.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::NoFix => "no fix acquired",
            Self::Gnss => "gnss fix",
            Self::CriteriaException => "criteria exception",
            Self::NetworkException => "network exception",
            Self::Cached => "cached fix",
            Self::Offline => "offline fix",
            Self::OfflineFailed => "offline fix failed",
            Self::OfflineNetworkFailed => "offline fix failed over network",
            Self::Network => "network fix",
            Self::ServerError => "positioning server error",
            Self::Other(_) => "unrecognized provider status",
        }
    }
}

impl From<i32> for FixCode {
    fn from(code: i32) -> Self {
        Self::from_raw(code)
    }
}

impl From<FixCode> for i32 {
    fn from(code: FixCode) -> Self {
        code.as_raw()
    }
}

/// One nearby point of interest as reported by the provider.
///
/// Providers hand these over with nullable fields; entries missing an id
/// or name are dropped during translation rather than surfaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPoi {
    /// Provider-assigned identifier.
    pub id: Option<String>,
    /// Human-readable name.
    pub name: Option<String>,
    /// Street address, when the provider knows it.
    pub address: Option<String>,
    /// Relevance rank, higher is closer.
    pub rank: f64,
}

impl RawPoi {
    /// A well-formed entry with the given id and name.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            address: None,
            rank: 0.0,
        }
    }

    /// Sets the street address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the relevance rank.
    #[must_use]
    pub const fn with_rank(mut self, rank: f64) -> Self {
        self.rank = rank;
        self
    }
}

/// The raw record a provider callback delivers for one fix attempt.
///
/// Everything beyond the status code and coordinates is optional:
/// reverse-geocoding strings and the POI list are only populated when the
/// session config asked for them and the lookup succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFix {
    /// Provider status code for this attempt.
    pub code: FixCode,
    /// Latitude in the session's coordinate system.
    pub latitude: f64,
    /// Longitude in the session's coordinate system.
    pub longitude: f64,
    /// Altitude in meters.
    pub altitude: f64,
    /// Horizontal accuracy radius in meters.
    pub radius: f64,
    /// Heading in degrees from true north.
    pub direction: f64,
    /// Ground speed in km/h.
    pub speed: f64,
    /// Provider wall-clock timestamp, formatted per
    /// [`PROVIDER_TIME_FORMAT`].
    pub time: String,
    /// Provider's own description of the status code.
    pub description: Option<String>,
    /// Full formatted address.
    pub address: Option<String>,
    /// Country name.
    pub country: Option<String>,
    /// Province or state.
    pub province: Option<String>,
    /// City.
    pub city: Option<String>,
    /// District within the city.
    pub district: Option<String>,
    /// Town or subdistrict.
    pub town: Option<String>,
    /// Street name.
    pub street: Option<String>,
    /// Street number.
    pub street_number: Option<String>,
    /// Nearby points of interest. `None` when the provider attached no
    /// list at all.
    pub pois: Option<Vec<RawPoi>>,
}

impl RawFix {
    /// A fix with the given status and coordinates, stamped with the
    /// current local time.
    ///
    /// All optional fields start empty; tests and adapters fill in what
    /// they need directly.
    #[must_use]
    pub fn new(code: FixCode, latitude: f64, longitude: f64) -> Self {
        Self {
            code,
            latitude,
            longitude,
            altitude: 0.0,
            radius: 0.0,
            direction: 0.0,
            speed: 0.0,
            time: Local::now().format(PROVIDER_TIME_FORMAT).to_string(),
            description: None,
            address: None,
            country: None,
            province: None,
            city: None,
            district: None,
            town: None,
            street: None,
            street_number: None,
            pois: None,
        }
    }

    /// Description of the fix status: the provider's own text when
    /// present, the built-in one otherwise.
    #[must_use]
    pub fn status_description(&self) -> &str {
        self.description
            .as_deref()
            .unwrap_or_else(|| self.code.describe())
    }
}
