//! Session configuration: coordinate systems, scan-interval clamping,
//! and provider tuning defaults.
//!
//! A [`SessionConfig`] is a pure description of how a positioning session
//! should run. It is built once per start request and handed to the
//! provider client unchanged; nothing here talks to the provider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Scan interval used when the caller requests a non-positive interval.
pub const DEFAULT_SCAN_INTERVAL_MS: u32 = 3_000;

/// Largest scan interval a caller may request before it is capped.
pub const MAX_REQUESTED_SCAN_INTERVAL_MS: i32 = 30_000;

/// Scan interval applied when the requested interval exceeds
/// [`MAX_REQUESTED_SCAN_INTERVAL_MS`].
pub const CAPPED_SCAN_INTERVAL_MS: u32 = 10_000;

/// How long the provider may spend acquiring a single fix.
pub const DEFAULT_FIX_TIMEOUT_MS: u32 = 5_000;

/// Clamps a caller-supplied scan interval into the range the provider
/// is allowed to run at.
///
/// Callers pass the interval as a signed integer straight off the host
/// bridge, so zero and negative values are possible and mean "no
/// preference".
///
/// # Clamping Rules
///
/// | Requested (ms)  | Effective (ms) |
/// |-----------------|----------------|
/// | `<= 0`          | `3000`         |
/// | `1..=30000`     | unchanged      |
/// | `> 30000`       | `10000`        |
///
/// # Examples
///
/// ```
/// use geobridge_core::session::clamp_scan_interval;
///
/// assert_eq!(clamp_scan_interval(0), 3000);
/// assert_eq!(clamp_scan_interval(5000), 5000);
/// assert_eq!(clamp_scan_interval(45000), 10000);
/// ```
#[must_use]
pub fn clamp_scan_interval(requested_ms: i32) -> u32 {
    if requested_ms <= 0 {
        info!(
            requested_ms,
            effective_ms = DEFAULT_SCAN_INTERVAL_MS,
            "scan interval not positive, using default"
        );
        return DEFAULT_SCAN_INTERVAL_MS;
    }
    if requested_ms > MAX_REQUESTED_SCAN_INTERVAL_MS {
        info!(
            requested_ms,
            effective_ms = CAPPED_SCAN_INTERVAL_MS,
            "scan interval too large, capping"
        );
        return CAPPED_SCAN_INTERVAL_MS;
    }
    // Positive and within range, so the conversion cannot fail.
    u32::try_from(requested_ms).unwrap_or(DEFAULT_SCAN_INTERVAL_MS)
}

/// Coordinate system the provider should report fixes in.
///
/// Conversion between systems happens inside the provider SDK; this crate
/// only selects which one is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSystem {
    /// Plain GPS coordinates.
    Wgs84,
    /// GCJ-02 ("Mars coordinates"), the system mainland-China providers
    /// report in by default.
    #[default]
    Gcj02,
    /// BD-09, the Baidu-specific offset system.
    Bd09,
}

impl CoordinateSystem {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wgs84 => "wgs84",
            Self::Gcj02 => "gcj02",
            Self::Bd09 => "bd09",
        }
    }

    /// Parses a coordinate system name.
    ///
    /// Matching is case-insensitive and accepts `"bd09ll"`, the spelling
    /// provider SDKs use for the longitude/latitude flavor of BD-09.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownCoordinateSystem`] if the name is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use geobridge_core::session::CoordinateSystem;
    ///
    /// assert_eq!(CoordinateSystem::parse("gcj02").unwrap(), CoordinateSystem::Gcj02);
    /// assert_eq!(CoordinateSystem::parse("bd09ll").unwrap(), CoordinateSystem::Bd09);
    /// assert!(CoordinateSystem::parse("mercator").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self, UnknownCoordinateSystem> {
        match value.to_ascii_lowercase().as_str() {
            "wgs84" => Ok(Self::Wgs84),
            "gcj02" => Ok(Self::Gcj02),
            "bd09" | "bd09ll" => Ok(Self::Bd09),
            other => Err(UnknownCoordinateSystem(other.to_string())),
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoordinateSystem {
    type Err = UnknownCoordinateSystem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Error returned when a coordinate system name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown coordinate system: {0}")]
pub struct UnknownCoordinateSystem(pub String);

/// How the provider should schedule fix deliveries for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTrigger {
    /// Deliver one fix, then halt.
    SingleShot,
    /// Deliver fixes on a fixed scan interval.
    Interval,
    /// Deliver fixes on the scan interval, suppressed while the device
    /// has moved less than the distance filter.
    IntervalAndDistance,
}

/// Validated configuration for one positioning session.
///
/// Built through [`SessionConfig::one_shot`] or
/// [`SessionConfig::continuous`]; the constructors apply the clamping
/// rules so a stored config is always within provider limits.
///
/// # Examples
///
/// ```
/// use geobridge_core::session::{CoordinateSystem, SessionConfig, UpdateTrigger};
///
/// let config = SessionConfig::continuous(CoordinateSystem::Bd09, 0, 50);
/// assert_eq!(config.scan_interval_ms, 3000); // non-positive request clamped
/// assert_eq!(config.distance_filter_m, 50);
/// assert_eq!(config.update_trigger(), UpdateTrigger::IntervalAndDistance);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Coordinate system fixes are reported in.
    pub coordinate_system: CoordinateSystem,

    /// Interval between fixes in milliseconds. `0` for one-shot sessions.
    pub scan_interval_ms: u32,

    /// Whether the session delivers exactly one fix and halts.
    pub one_shot: bool,

    /// Minimum movement in meters before a new fix is delivered.
    /// `0` disables distance filtering. Only meaningful for continuous
    /// sessions.
    pub distance_filter_m: u32,

    /// How long the provider may spend acquiring one fix, in milliseconds.
    pub fix_timeout_ms: u32,

    /// Request the provider's high-accuracy mode.
    pub high_accuracy: bool,

    /// Allow satellite positioning in addition to network positioning.
    pub use_gnss: bool,

    /// Ask the provider to include altitude in fixes.
    pub need_altitude: bool,

    /// Ask the provider to reverse-geocode fixes into address strings.
    pub need_address: bool,

    /// Ask the provider to attach nearby points of interest to fixes.
    pub need_poi_list: bool,
}

impl Default for SessionConfig {
    /// A one-shot session in the default coordinate system with provider
    /// tuning matching what positioning SDKs ship with.
    fn default() -> Self {
        Self {
            coordinate_system: CoordinateSystem::default(),
            scan_interval_ms: 0,
            one_shot: true,
            distance_filter_m: 0,
            fix_timeout_ms: DEFAULT_FIX_TIMEOUT_MS,
            high_accuracy: true,
            use_gnss: true,
            need_altitude: true,
            need_address: false,
            need_poi_list: false,
        }
    }
}

impl SessionConfig {
    /// Configuration for a single-fix session.
    ///
    /// Scan interval and distance filter do not apply to one-shot
    /// sessions and are stored as zero.
    #[must_use]
    pub fn one_shot(coordinate_system: CoordinateSystem) -> Self {
        Self {
            coordinate_system,
            ..Self::default()
        }
    }

    /// Configuration for a continuous session.
    ///
    /// `requested_interval_ms` is clamped via [`clamp_scan_interval`].
    /// A `requested_distance_m` greater than zero enables the combined
    /// interval-and-distance trigger; zero or negative values disable
    /// distance filtering.
    #[must_use]
    pub fn continuous(
        coordinate_system: CoordinateSystem,
        requested_interval_ms: i32,
        requested_distance_m: i32,
    ) -> Self {
        Self {
            coordinate_system,
            scan_interval_ms: clamp_scan_interval(requested_interval_ms),
            one_shot: false,
            distance_filter_m: u32::try_from(requested_distance_m).unwrap_or(0),
            ..Self::default()
        }
    }

    /// How the provider should schedule fixes for this config.
    #[must_use]
    pub const fn update_trigger(&self) -> UpdateTrigger {
        if self.one_shot {
            UpdateTrigger::SingleShot
        } else if self.distance_filter_m > 0 {
            UpdateTrigger::IntervalAndDistance
        } else {
            UpdateTrigger::Interval
        }
    }

    /// Sets the per-fix acquisition timeout.
    #[must_use]
    pub const fn with_fix_timeout_ms(mut self, fix_timeout_ms: u32) -> Self {
        self.fix_timeout_ms = fix_timeout_ms;
        self
    }

    /// Enables or disables the provider's high-accuracy mode.
    #[must_use]
    pub const fn with_high_accuracy(mut self, high_accuracy: bool) -> Self {
        self.high_accuracy = high_accuracy;
        self
    }

    /// Enables or disables satellite positioning.
    #[must_use]
    pub const fn with_gnss(mut self, use_gnss: bool) -> Self {
        self.use_gnss = use_gnss;
        self
    }

    /// Asks the provider to include altitude in fixes.
    #[must_use]
    pub const fn with_altitude(mut self, need_altitude: bool) -> Self {
        self.need_altitude = need_altitude;
        self
    }

    /// Asks the provider to reverse-geocode fixes into address strings.
    #[must_use]
    pub const fn with_address_lookup(mut self, need_address: bool) -> Self {
        self.need_address = need_address;
        self
    }

    /// Asks the provider to attach nearby points of interest to fixes.
    #[must_use]
    pub const fn with_poi_lookup(mut self, need_poi_list: bool) -> Self {
        self.need_poi_list = need_poi_list;
        self
    }
}
