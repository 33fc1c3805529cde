//! The positioning provider seam.
//!
//! Provider SDKs live behind two small traits: [`LocationProvider`]
//! constructs clients, and [`ProviderClient`] drives one client through
//! its lifecycle (configure, start, stop). Adapters for a concrete SDK
//! implement both and push raw fixes through the [`FixListener`] they
//! were connected with; everything above the seam is SDK-agnostic.
//!
//! Errors crossing the seam are [`ProviderError`]s carrying the SDK's
//! message as opaque text.

use thiserror::Error;

use crate::session::manager::FixListener;
use crate::session::SessionConfig;

pub mod fix;
#[cfg(any(test, feature = "test-utils"))]
pub mod scripted;

pub use fix::{FixCode, RawFix, RawPoi, PROVIDER_TIME_FORMAT};

/// Factory for positioning clients.
///
/// One provider outlives many clients: the session tears a client down
/// and asks for a fresh one on every restart.
pub trait LocationProvider: Send + Sync {
    /// Constructs a client wired to deliver fixes through `listener`.
    ///
    /// The client must not deliver anything before
    /// [`ProviderClient::start`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Construct`] if the SDK cannot build a
    /// client.
    fn connect(&self, listener: FixListener) -> ProviderResult<Box<dyn ProviderClient>>;
}

/// One live positioning client.
///
/// Methods are synchronous; adapters wrapping callback-driven SDKs
/// resolve them as soon as the SDK has accepted the request. Dropping a
/// client releases its SDK resources.
pub trait ProviderClient: Send {
    /// Applies the session configuration to the client.
    ///
    /// Called exactly once, between construction and [`start`].
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Options`] if the SDK rejects the
    /// configuration.
    ///
    /// [`start`]: ProviderClient::start
    fn apply_options(&mut self, config: &SessionConfig) -> ProviderResult<()>;

    /// Requests positioning to begin. Fixes arrive later through the
    /// listener.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Start`] if the SDK refuses to start.
    fn start(&mut self) -> ProviderResult<()>;

    /// Requests positioning to halt.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Stop`] if the SDK fails while halting.
    /// Callers discard the client either way.
    fn stop(&mut self) -> ProviderResult<()>;
}

/// Errors crossing the provider seam.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The SDK could not construct a client.
    #[error("failed to construct provider client: {0}")]
    Construct(String),

    /// The SDK rejected the session configuration.
    #[error("failed to apply session options: {0}")]
    Options(String),

    /// The SDK refused to start positioning.
    #[error("failed to start positioning: {0}")]
    Start(String),

    /// The SDK failed while halting positioning.
    #[error("failed to stop positioning: {0}")]
    Stop(String),

    /// The SDK rejected the consent update.
    #[error("consent backend update failed: {0}")]
    Consent(String),
}

/// Result type for provider seam operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
