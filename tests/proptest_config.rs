//! Property-based tests for session configuration.
//!
//! These tests verify:
//! - The scan interval clamp is total over raw host integers and always
//!   lands in the provider-safe range
//! - Values already in range pass through untouched
//! - The update trigger follows the one-shot flag and distance filter
//! - Coordinate system names parse regardless of ASCII case

use geobridge_core::session::{
    clamp_scan_interval, CoordinateSystem, SessionConfig, UpdateTrigger,
    CAPPED_SCAN_INTERVAL_MS, DEFAULT_SCAN_INTERVAL_MS,
};
use proptest::prelude::*;

// ============================================================================
// Scan interval clamping
// ============================================================================

/// Verifies the documented behavior at every boundary of the clamp:
/// zero and below fall back to the default, values above the cap are
/// capped, and both extremes of `i32` are absorbed.
#[test]
fn boundary_values_clamp_as_documented() {
    assert_eq!(clamp_scan_interval(i32::MIN), DEFAULT_SCAN_INTERVAL_MS);
    assert_eq!(clamp_scan_interval(-1), DEFAULT_SCAN_INTERVAL_MS);
    assert_eq!(clamp_scan_interval(0), DEFAULT_SCAN_INTERVAL_MS);
    assert_eq!(clamp_scan_interval(1), 1);
    assert_eq!(clamp_scan_interval(30_000), 30_000);
    assert_eq!(clamp_scan_interval(30_001), CAPPED_SCAN_INTERVAL_MS);
    assert_eq!(clamp_scan_interval(i32::MAX), CAPPED_SCAN_INTERVAL_MS);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: For every possible host integer, the clamp produces a
    /// value the provider can actually run: positive and no larger than
    /// the largest accepted request.
    #[test]
    fn clamp_is_total_and_lands_in_the_safe_range(requested in any::<i32>()) {
        let effective = clamp_scan_interval(requested);
        prop_assert!(
            (1..=30_000).contains(&effective),
            "clamp({}) produced {} outside the safe range",
            requested,
            effective,
        );
    }

    /// Property: Requests already inside the accepted range are never
    /// altered.
    #[test]
    fn in_range_requests_pass_through(requested in 1i32..=30_000) {
        prop_assert_eq!(clamp_scan_interval(requested), requested as u32);
    }

    /// Property: Non-positive requests always fall back to the default,
    /// never to the cap or to some derived value.
    #[test]
    fn non_positive_requests_use_the_default(requested in i32::MIN..=0) {
        prop_assert_eq!(clamp_scan_interval(requested), DEFAULT_SCAN_INTERVAL_MS);
    }

    /// Property: Oversized requests always land on the cap, which is
    /// deliberately not the largest accepted value.
    #[test]
    fn oversized_requests_are_capped(requested in 30_001i32..=i32::MAX) {
        prop_assert_eq!(clamp_scan_interval(requested), CAPPED_SCAN_INTERVAL_MS);
    }

    /// Property: A continuous config always carries exactly the clamped
    /// interval and a non-negative distance filter, whatever raw
    /// integers the host supplied.
    #[test]
    fn continuous_configs_absorb_raw_host_integers(
        requested_interval in any::<i32>(),
        requested_distance in any::<i32>(),
    ) {
        let config = SessionConfig::continuous(
            CoordinateSystem::Gcj02,
            requested_interval,
            requested_distance,
        );

        prop_assert_eq!(config.scan_interval_ms, clamp_scan_interval(requested_interval));
        prop_assert_eq!(
            config.distance_filter_m,
            u32::try_from(requested_distance).unwrap_or(0)
        );
        prop_assert!(!config.one_shot);
    }
}

// ============================================================================
// Update trigger selection
// ============================================================================

/// Verifies each of the three trigger modes is reachable: one-shot wins
/// outright, and otherwise the distance filter decides between the
/// interval-only and combined modes.
#[test]
fn update_trigger_covers_all_three_modes() {
    assert_eq!(
        SessionConfig::one_shot(CoordinateSystem::Gcj02).update_trigger(),
        UpdateTrigger::SingleShot
    );
    assert_eq!(
        SessionConfig::continuous(CoordinateSystem::Gcj02, 3_000, 0).update_trigger(),
        UpdateTrigger::Interval
    );
    assert_eq!(
        SessionConfig::continuous(CoordinateSystem::Gcj02, 3_000, 25).update_trigger(),
        UpdateTrigger::IntervalAndDistance
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: For continuous sessions the trigger is decided by the
    /// distance filter alone; negative and zero distances both mean
    /// interval-only.
    #[test]
    fn continuous_trigger_follows_the_distance_filter(
        requested_interval in any::<i32>(),
        requested_distance in any::<i32>(),
    ) {
        let config = SessionConfig::continuous(
            CoordinateSystem::Gcj02,
            requested_interval,
            requested_distance,
        );

        let expected = if requested_distance > 0 {
            UpdateTrigger::IntervalAndDistance
        } else {
            UpdateTrigger::Interval
        };
        prop_assert_eq!(config.update_trigger(), expected);
    }
}

// ============================================================================
// Coordinate system parsing
// ============================================================================

/// Verifies each variant survives a display-then-parse roundtrip.
#[test]
fn coordinate_system_roundtrips_through_its_name() {
    for system in [
        CoordinateSystem::Wgs84,
        CoordinateSystem::Gcj02,
        CoordinateSystem::Bd09,
    ] {
        let parsed = CoordinateSystem::parse(system.as_str()).unwrap();
        assert_eq!(parsed, system, "{system} must parse from its own name");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: Valid coordinate system names parse under any ASCII
    /// casing, including the provider's long spelling of bd09.
    #[test]
    fn coordinate_system_parse_ignores_ascii_case(
        name in prop_oneof![
            Just("wgs84"),
            Just("gcj02"),
            Just("bd09"),
            Just("bd09ll"),
        ],
        caps in proptest::collection::vec(any::<bool>(), 6),
    ) {
        let mixed: String = name
            .chars()
            .zip(caps)
            .map(|(c, upper)| if upper { c.to_ascii_uppercase() } else { c })
            .collect();

        let expected = match name {
            "wgs84" => CoordinateSystem::Wgs84,
            "gcj02" => CoordinateSystem::Gcj02,
            _ => CoordinateSystem::Bd09,
        };
        let parsed = CoordinateSystem::parse(&mixed);
        prop_assert_eq!(parsed, Ok(expected), "failed to parse {}", mixed);
    }
}
