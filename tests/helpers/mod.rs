//! Reusable test helpers for bridge integration tests.
//!
//! These helpers wire a real `GeoBridge` to scripted doubles: a
//! `ScriptedProvider` standing in for the positioning SDK and a
//! `ScriptedConsent` standing in for its privacy flag. Fixes are
//! injected by hand through the provider; events are collected from
//! the bridge's channel. No runtime mocking is needed.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use geobridge_core::consent::ConsentBackend;
use geobridge_core::event::OutboundEvent;
use geobridge_core::provider::scripted::{ScriptedConsent, ScriptedProvider};
use geobridge_core::provider::{FixCode, LocationProvider, RawFix};
use geobridge_core::GeoBridge;

/// A bridge wired to scripted doubles, plus the handles to drive them.
pub struct BridgeFixture {
    pub bridge: GeoBridge,
    pub provider: Arc<ScriptedProvider>,
    pub consent: Arc<ScriptedConsent>,
    pub events: UnboundedReceiver<OutboundEvent>,
}

/// Builds a bridge around fresh scripted doubles. Consent starts
/// ungranted.
pub fn scripted_bridge() -> BridgeFixture {
    let provider = Arc::new(ScriptedProvider::new());
    let consent = Arc::new(ScriptedConsent::new());
    let (bridge, events) = GeoBridge::with_event_channel(
        Arc::clone(&provider) as Arc<dyn LocationProvider>,
        Arc::clone(&consent) as Arc<dyn ConsentBackend>,
    );
    BridgeFixture {
        bridge,
        provider,
        consent,
        events,
    }
}

/// Builds a bridge with consent already granted.
pub fn granted_bridge() -> BridgeFixture {
    let fixture = scripted_bridge();
    fixture
        .bridge
        .init_consent()
        .expect("should grant consent");
    fixture
}

/// Waits until the session task has processed everything sent so far.
///
/// Commands are handled strictly in order, so by the time this status
/// round-trip resolves, every earlier call and injected fix has been
/// handled too.
pub async fn settle(bridge: &GeoBridge) {
    let _ = bridge.is_started().await;
}

/// A plausible successful network fix for downtown Beijing.
pub fn good_fix() -> RawFix {
    let mut fix = RawFix::new(FixCode::Network, 39.9042, 116.4074);
    fix.altitude = 43.5;
    fix.radius = 30.0;
    fix.direction = 182.0;
    fix.speed = 1.4;
    fix.time = "2024-05-11 09:30:12".to_string();
    fix
}

/// A fix the provider reports as failed outright.
pub fn failed_fix() -> RawFix {
    RawFix::new(FixCode::NoFix, 0.0, 0.0)
}

/// Drains every event currently sitting in the channel.
pub fn drain(events: &mut UnboundedReceiver<OutboundEvent>) -> Vec<OutboundEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}
