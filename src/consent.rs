//! The consent gate.
//!
//! Positioning SDKs in regulated markets refuse to run until the user
//! has accepted the vendor's privacy agreement, and the acceptance has
//! to be pushed into the SDK itself. [`ConsentGate`] owns that state:
//! it latches "granted" exactly once per process and relays the
//! acceptance through the host's [`ConsentBackend`].
//!
//! A backend failure leaves the gate closed and is surfaced to the
//! caller; the gate never assumes consent on the SDK's behalf.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::provider::{ProviderError, ProviderResult};

/// Host-side hook that pushes the consent flag into the provider SDK.
pub trait ConsentBackend: Send + Sync {
    /// Records the user's agreement (or withdrawal) with the SDK.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Consent`] if the SDK rejects the update.
    fn set_agree(&self, agree: bool) -> ProviderResult<()>;
}

/// Errors from consent operations.
#[derive(Debug, Error)]
pub enum ConsentError {
    /// The consent backend rejected the agreement; the gate stays
    /// closed and the call may be retried.
    #[error("consent initialization failed: {0}")]
    Init(#[source] ProviderError),
}

/// Result type for consent operations.
pub type ConsentResult<T> = Result<T, ConsentError>;

/// Latches whether positioning consent has been granted.
///
/// The flag starts `false`, flips to `true` on the first successful
/// [`grant`](Self::grant), and is never reset. Every positioning
/// operation checks [`is_granted`](Self::is_granted) before touching
/// the provider.
pub struct ConsentGate {
    granted: AtomicBool,
    backend: Arc<dyn ConsentBackend>,
}

impl ConsentGate {
    /// Creates an ungranted gate over the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn ConsentBackend>) -> Self {
        Self {
            granted: AtomicBool::new(false),
            backend,
        }
    }

    /// Relays the user's agreement to the backend and latches the gate.
    ///
    /// Idempotent: once granted, further calls return `Ok` without
    /// touching the backend again.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError::Init`] if the backend rejects the
    /// agreement. The gate stays closed and the call may be retried.
    pub fn grant(&self) -> ConsentResult<()> {
        if self.granted.load(Ordering::SeqCst) {
            debug!("consent already granted, skipping backend call");
            return Ok(());
        }

        self.backend.set_agree(true).map_err(|err| {
            error!(%err, "consent backend rejected the agreement");
            ConsentError::Init(err)
        })?;

        self.granted.store(true, Ordering::SeqCst);
        info!("positioning consent granted");
        Ok(())
    }

    /// Whether consent has been granted.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }
}
