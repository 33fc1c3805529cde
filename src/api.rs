//! The host-facing bridge surface.
//!
//! [`GeoBridge`] bundles the consent gate and the session manager into
//! the one object an embedding holds on to. Commands come in through
//! its methods; positions and failures go out through the event sink
//! it was built with.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::consent::{ConsentBackend, ConsentGate, ConsentResult};
use crate::event::{ChannelSink, EventSink, OutboundEvent};
use crate::provider::LocationProvider;
use crate::session::{CoordinateSystem, SessionConfig, SessionManager, SessionResult};

/// The geolocation bridge.
///
/// One instance per embedding. The provider and consent backend are
/// supplied by the host's SDK glue; the sink is wherever the host wants
/// events delivered (often just a channel, see
/// [`with_event_channel`](Self::with_event_channel)).
///
/// # Examples
///
/// ```rust,ignore
/// let (bridge, mut events) = GeoBridge::with_event_channel(provider, consent_backend);
///
/// bridge.init_consent()?;
/// bridge.get_current_position(CoordinateSystem::default()).await?;
///
/// while let Some(event) = events.recv().await {
///     println!("{}: {}", event.name(), event.payload());
/// }
/// ```
pub struct GeoBridge {
    consent: Arc<ConsentGate>,
    session: SessionManager,
}

impl GeoBridge {
    /// Builds a bridge around the given provider, consent backend and
    /// event sink, and spawns its session task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn new(
        provider: Arc<dyn LocationProvider>,
        consent_backend: Arc<dyn ConsentBackend>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let consent = Arc::new(ConsentGate::new(consent_backend));
        let session = SessionManager::new(provider, Arc::clone(&consent), sink);
        Self { consent, session }
    }

    /// Like [`new`](Self::new), but delivers events into an unbounded
    /// channel and hands back the receiving end.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn with_event_channel(
        provider: Arc<dyn LocationProvider>,
        consent_backend: Arc<dyn ConsentBackend>,
    ) -> (Self, mpsc::UnboundedReceiver<OutboundEvent>) {
        let (sink, events) = ChannelSink::new();
        let bridge = Self::new(provider, consent_backend, Arc::new(sink));
        (bridge, events)
    }

    /// Records the user's consent and pushes it to the backend.
    ///
    /// Must succeed once before any positioning call. Idempotent: once
    /// granted, further calls do nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError::Init`](crate::consent::ConsentError) when
    /// the backend rejects the flag. The gate stays closed and the call
    /// can simply be retried.
    pub fn init_consent(&self) -> ConsentResult<()> {
        self.consent.grant()
    }

    /// Whether consent has been granted on this bridge.
    #[must_use]
    pub fn is_consent_granted(&self) -> bool {
        self.consent.is_granted()
    }

    /// Requests a single position fix.
    ///
    /// Replaces any session already running. The fix arrives later as a
    /// `GetCurrentLocationPosition` event; by the time it does, the
    /// session is already closed.
    ///
    /// # Errors
    ///
    /// See [`SessionManager::start`].
    pub async fn get_current_position(
        &self,
        coordinate_system: CoordinateSystem,
    ) -> SessionResult<()> {
        self.session
            .start(SessionConfig::one_shot(coordinate_system))
            .await
    }

    /// Starts continuous positioning, replacing any session already
    /// running.
    ///
    /// `scan_interval_ms` and `distance_filter_m` are taken as raw host
    /// integers; out-of-range intervals are clamped as described on
    /// [`clamp_scan_interval`](crate::session::clamp_scan_interval). A
    /// positive distance filter makes movement a second update trigger.
    /// Each fix arrives as a `LocationUpdate` event until
    /// [`stop_locating`](Self::stop_locating) is called.
    ///
    /// # Errors
    ///
    /// See [`SessionManager::start`].
    pub async fn start_locating(
        &self,
        coordinate_system: CoordinateSystem,
        scan_interval_ms: i32,
        distance_filter_m: i32,
    ) -> SessionResult<()> {
        self.session
            .start(SessionConfig::continuous(
                coordinate_system,
                scan_interval_ms,
                distance_filter_m,
            ))
            .await
    }

    /// Starts a session from an explicit [`SessionConfig`].
    ///
    /// This is the way to reach the tuning knobs the two convenience
    /// calls leave at their defaults, such as address lookup or POI
    /// collection.
    ///
    /// # Errors
    ///
    /// See [`SessionManager::start`].
    pub async fn start_session(&self, config: SessionConfig) -> SessionResult<()> {
        self.session.start(config).await
    }

    /// Stops the running session. Idempotent; never emits an event.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Terminated`](crate::session::SessionError)
    /// only if the session task is gone.
    pub async fn stop_locating(&self) -> SessionResult<()> {
        self.session.stop().await
    }

    /// Whether a positioning session is currently running.
    ///
    /// One-shot sessions stop counting as started the moment their fix
    /// is accepted, even before the event is observed.
    pub async fn is_started(&self) -> bool {
        self.session.is_active().await
    }
}
