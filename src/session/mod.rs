//! Positioning session management.
//!
//! A session is one run of the provider: configure, start, receive
//! fixes, stop. [`SessionConfig`] captures what to run and
//! [`SessionManager`] runs it, serializing every operation through a
//! dedicated task so at most one provider client exists at a time.

pub mod config;
pub mod error;
pub mod manager;

pub use config::{
    clamp_scan_interval, CoordinateSystem, SessionConfig, UnknownCoordinateSystem, UpdateTrigger,
    CAPPED_SCAN_INTERVAL_MS, DEFAULT_FIX_TIMEOUT_MS, DEFAULT_SCAN_INTERVAL_MS,
    MAX_REQUESTED_SCAN_INTERVAL_MS,
};
pub use error::{SessionError, SessionResult};
pub use manager::{FixListener, SessionManager};
