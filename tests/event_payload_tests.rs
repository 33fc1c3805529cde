//! End-to-end wire format checks.
//!
//! These drive a whole session and assert on the JSON the host would
//! see, key for key, rather than on intermediate types.

mod helpers;

use geobridge_core::event::OutboundEvent;
use geobridge_core::provider::{FixCode, RawFix, RawPoi};
use geobridge_core::session::{CoordinateSystem, SessionConfig};

use helpers::{drain, good_fix, granted_bridge, settle};

fn geocoded_fix() -> RawFix {
    let mut fix = good_fix();
    fix.address = Some("1 Zhongguancun St, Haidian, Beijing".to_string());
    fix.country = Some("China".to_string());
    fix.province = Some("Beijing".to_string());
    fix.city = Some("Beijing".to_string());
    fix.district = Some("Haidian".to_string());
    fix.town = Some("Haidian Subdistrict".to_string());
    fix.street = Some("Zhongguancun St".to_string());
    fix.street_number = Some("1".to_string());
    fix
}

#[tokio::test]
async fn continuous_update_carries_the_wire_payload() {
    let mut fixture = granted_bridge();
    fixture
        .bridge
        .start_locating(CoordinateSystem::Bd09, 0, 0)
        .await
        .expect("start");

    fixture.provider.deliver(Some(good_fix()));
    // The status round-trip also flushes the delivery through the session.
    assert!(
        fixture.bridge.is_started().await,
        "a continuous fix leaves the session running"
    );

    let events = drain(&mut fixture.events);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name(), "LocationUpdate");

    let payload = events[0].payload();
    let coords = &payload["coords"];
    assert_eq!(coords["latitude"], 39.9042);
    assert_eq!(coords["longitude"], 116.4074);
    assert_eq!(coords["altitude"], 43.5);
    assert_eq!(coords["accuracy"], 30.0);
    assert_eq!(coords["heading"], 182.0);
    assert_eq!(coords["speed"], 1.4);
    assert_eq!(payload["timestamp"], "2024-05-11 09:30:12");

    // No geocoding arrived, so the string keys are present but null.
    for key in [
        "address",
        "country",
        "province",
        "city",
        "area",
        "town",
        "street",
        "streetNumber",
    ] {
        assert!(
            coords.get(key).is_some_and(serde_json::Value::is_null),
            "{key} should be a null entry"
        );
    }

    // No POI list on the fix means no pois key at all.
    assert!(coords.get("pois").is_none());
}

#[tokio::test]
async fn geocoded_fields_pass_through_verbatim() {
    let mut fixture = granted_bridge();
    fixture
        .bridge
        .start_locating(CoordinateSystem::Gcj02, 3_000, 0)
        .await
        .expect("start");

    fixture.provider.deliver(Some(geocoded_fix()));
    settle(&fixture.bridge).await;

    let events = drain(&mut fixture.events);
    let coords = &events[0].payload()["coords"];
    assert_eq!(coords["address"], "1 Zhongguancun St, Haidian, Beijing");
    assert_eq!(coords["country"], "China");
    assert_eq!(coords["province"], "Beijing");
    assert_eq!(coords["city"], "Beijing");
    assert_eq!(coords["area"], "Haidian");
    assert_eq!(coords["town"], "Haidian Subdistrict");
    assert_eq!(coords["street"], "Zhongguancun St");
    assert_eq!(coords["streetNumber"], "1");
}

#[tokio::test]
async fn one_shot_event_uses_its_own_name() {
    let mut fixture = granted_bridge();
    fixture
        .bridge
        .get_current_position(CoordinateSystem::default())
        .await
        .expect("start");

    fixture.provider.deliver(Some(good_fix()));
    settle(&fixture.bridge).await;

    let events = drain(&mut fixture.events);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name(), "GetCurrentLocationPosition");
    assert_eq!(events[0].payload()["coords"]["latitude"], 39.9042);
}

#[tokio::test]
async fn poi_entries_are_mapped_in_order() {
    let mut fixture = granted_bridge();
    fixture
        .bridge
        .start_session(
            SessionConfig::continuous(CoordinateSystem::Gcj02, 3_000, 0).with_poi_lookup(true),
        )
        .await
        .expect("start");

    let mut fix = good_fix();
    fix.pois = Some(vec![
        RawPoi::new("poi-1", "West Gate Cafe")
            .with_address("2 College Rd")
            .with_rank(0.91),
        RawPoi::new("poi-2", "Bus Stop 17"),
    ]);
    fixture.provider.deliver(Some(fix));
    settle(&fixture.bridge).await;

    let events = drain(&mut fixture.events);
    let pois = &events[0].payload()["coords"]["pois"];
    let entries = pois.as_array().expect("pois should be an array");
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0]["uid"], "poi-1");
    assert_eq!(entries[0]["name"], "West Gate Cafe");
    assert_eq!(entries[0]["address"], "2 College Rd");
    assert_eq!(entries[0]["rank"], 0.91);

    assert_eq!(entries[1]["uid"], "poi-2");
    assert!(entries[1]["address"].is_null());
    assert_eq!(entries[1]["rank"], 0.0);
}

#[tokio::test]
async fn malformed_poi_entries_are_skipped() {
    let mut fixture = granted_bridge();
    fixture
        .bridge
        .start_locating(CoordinateSystem::Gcj02, 3_000, 0)
        .await
        .expect("start");

    let nameless = RawPoi {
        id: Some("poi-9".to_string()),
        name: None,
        address: None,
        rank: 0.5,
    };
    let idless = RawPoi {
        id: None,
        name: Some("Ghost Entry".to_string()),
        address: None,
        rank: 0.5,
    };
    let mut fix = good_fix();
    fix.pois = Some(vec![nameless, RawPoi::new("poi-3", "Kept"), idless]);
    fixture.provider.deliver(Some(fix));
    settle(&fixture.bridge).await;

    let events = drain(&mut fixture.events);
    let pois = &events[0].payload()["coords"]["pois"];
    let entries = pois.as_array().expect("pois should be an array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["uid"], "poi-3");
}

#[tokio::test]
async fn an_entirely_malformed_list_still_serializes_as_an_array() {
    let mut fixture = granted_bridge();
    fixture
        .bridge
        .start_locating(CoordinateSystem::Gcj02, 3_000, 0)
        .await
        .expect("start");

    let mut fix = good_fix();
    fix.pois = Some(vec![RawPoi {
        id: None,
        name: None,
        address: None,
        rank: 0.0,
    }]);
    fixture.provider.deliver(Some(fix));
    settle(&fixture.bridge).await;

    let events = drain(&mut fixture.events);
    let coords = &events[0].payload()["coords"];
    assert_eq!(coords["pois"], serde_json::json!([]));
}

#[tokio::test]
async fn error_payload_is_a_single_keyed_object() {
    let mut fixture = granted_bridge();
    fixture
        .bridge
        .start_locating(CoordinateSystem::Gcj02, 3_000, 0)
        .await
        .expect("start");

    fixture
        .provider
        .deliver(Some(RawFix::new(FixCode::NoFix, 0.0, 0.0)));
    settle(&fixture.bridge).await;

    let events = drain(&mut fixture.events);
    assert_eq!(events[0].name(), "LocationError");

    let payload = events[0].payload();
    let object = payload.as_object().expect("payload should be an object");
    assert_eq!(object.len(), 1);
    assert_eq!(payload["error"], "location failed: no fix acquired");
}

#[tokio::test]
async fn invalid_fix_reports_the_provider_description() {
    let mut fixture = granted_bridge();
    fixture
        .bridge
        .start_locating(CoordinateSystem::Gcj02, 3_000, 0)
        .await
        .expect("start");

    let mut fix = RawFix::new(FixCode::ServerError, 0.0, 0.0);
    fix.description = Some("quota exceeded".to_string());
    fixture.provider.deliver(Some(fix));
    settle(&fixture.bridge).await;

    let events = drain(&mut fixture.events);
    assert_eq!(
        events[0].payload()["error"],
        "location invalid: quota exceeded"
    );
}

#[tokio::test]
async fn interval_clamping_reaches_the_provider() {
    let fixture = granted_bridge();

    fixture
        .bridge
        .start_locating(CoordinateSystem::Gcj02, -1, 0)
        .await
        .expect("start");
    let config = fixture.provider.last_config().expect("options applied");
    assert_eq!(config.scan_interval_ms, 3_000);

    fixture
        .bridge
        .start_locating(CoordinateSystem::Gcj02, 60_000, 0)
        .await
        .expect("restart");
    let config = fixture.provider.last_config().expect("options applied");
    assert_eq!(config.scan_interval_ms, 10_000);

    fixture
        .bridge
        .start_locating(CoordinateSystem::Gcj02, 12_345, 25)
        .await
        .expect("restart");
    let config = fixture.provider.last_config().expect("options applied");
    assert_eq!(config.scan_interval_ms, 12_345);
    assert_eq!(config.distance_filter_m, 25);
}

#[tokio::test]
async fn tuning_defaults_reach_the_provider() {
    let fixture = granted_bridge();

    fixture
        .bridge
        .get_current_position(CoordinateSystem::default())
        .await
        .expect("start");

    let config = fixture.provider.last_config().expect("options applied");
    assert_eq!(config.coordinate_system, CoordinateSystem::Gcj02);
    assert!(config.one_shot);
    assert!(config.high_accuracy);
    assert!(config.use_gnss);
    assert!(config.need_altitude);
    assert!(!config.need_address);
    assert!(!config.need_poi_list);
    assert_eq!(config.fix_timeout_ms, 5_000);
}

#[tokio::test]
async fn explicit_sessions_expose_the_tuning_knobs() {
    let fixture = granted_bridge();

    fixture
        .bridge
        .start_session(
            SessionConfig::continuous(CoordinateSystem::Wgs84, 8_000, 0)
                .with_address_lookup(true)
                .with_poi_lookup(true)
                .with_high_accuracy(false),
        )
        .await
        .expect("start");

    let config = fixture.provider.last_config().expect("options applied");
    assert_eq!(config.coordinate_system, CoordinateSystem::Wgs84);
    assert!(config.need_address);
    assert!(config.need_poi_list);
    assert!(!config.high_accuracy);
}
