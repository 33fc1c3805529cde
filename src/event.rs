//! Outbound events and the host-facing sink.
//!
//! Everything the core tells its host travels as an [`OutboundEvent`]
//! pushed into an [`EventSink`]. Delivery is fire-and-forget: no
//! acknowledgement, no retry, no backpressure. Hosts that just want a
//! stream can use the shipped [`ChannelSink`]; hosts bridging into
//! another runtime implement [`EventSink`] themselves.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::position::LocationResult;

/// Event name for a delivered one-shot position.
pub const GET_CURRENT_LOCATION_POSITION: &str = "GetCurrentLocationPosition";

/// Event name for a delivered continuous-session position.
pub const LOCATION_UPDATE: &str = "LocationUpdate";

/// Event name for a positioning error.
pub const LOCATION_ERROR: &str = "LocationError";

/// Payload of a [`LOCATION_ERROR`] event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Human-readable description of what went wrong.
    pub error: String,
}

/// One event delivered to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    /// The single fix of a one-shot session.
    CurrentPosition(LocationResult),
    /// One fix of a continuous session.
    Update(LocationResult),
    /// A positioning failure, fatal or transient.
    Error(ErrorPayload),
}

impl OutboundEvent {
    /// The stable event name hosts subscribe to.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CurrentPosition(_) => GET_CURRENT_LOCATION_POSITION,
            Self::Update(_) => LOCATION_UPDATE,
            Self::Error(_) => LOCATION_ERROR,
        }
    }

    /// The JSON payload for name-plus-payload host channels.
    ///
    /// Payload types serialize infallibly (plain numbers, strings and
    /// lists), so this returns `Value::Null` only if that ever stops
    /// holding.
    #[must_use]
    pub fn payload(&self) -> serde_json::Value {
        let payload = match self {
            Self::CurrentPosition(result) | Self::Update(result) => serde_json::to_value(result),
            Self::Error(error) => serde_json::to_value(error),
        };
        payload.unwrap_or(serde_json::Value::Null)
    }
}

/// Where outbound events go.
///
/// Implementations must not block: `emit` is called from the session
/// task, and a slow sink would stall fix processing.
pub trait EventSink: Send + Sync {
    /// Delivers one event. Failures are the sink's problem; the core
    /// never retries.
    fn emit(&self, event: OutboundEvent);
}

/// An [`EventSink`] backed by an unbounded Tokio channel.
///
/// The receiving half is handed out at construction; once it is dropped,
/// further events are silently discarded.
///
/// # Examples
///
/// ```
/// use geobridge_core::event::{ChannelSink, ErrorPayload, EventSink, OutboundEvent};
///
/// let (sink, mut events) = ChannelSink::new();
/// sink.emit(OutboundEvent::Error(ErrorPayload {
///     error: "no fix".to_string(),
/// }));
///
/// let event = events.try_recv().unwrap();
/// assert_eq!(event.name(), "LocationError");
/// ```
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<OutboundEvent>,
}

impl ChannelSink {
    /// Creates the sink and the receiver hosts consume events from.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: OutboundEvent) {
        if self.tx.send(event).is_err() {
            trace!("event receiver dropped, discarding event");
        }
    }
}

/// Crate-internal wrapper that logs and forwards events to the sink.
#[derive(Clone)]
pub(crate) struct Emitter {
    sink: Arc<dyn EventSink>,
}

impl Emitter {
    pub(crate) fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    pub(crate) fn emit(&self, event: OutboundEvent) {
        debug!(event = event.name(), "emitting event");
        self.sink.emit(event);
    }

    pub(crate) fn emit_error(&self, message: impl Into<String>) {
        self.emit(OutboundEvent::Error(ErrorPayload {
            error: message.into(),
        }));
    }
}
