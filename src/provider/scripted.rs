//! Scripted doubles for the provider and consent seams.
//!
//! These stand in for a real positioning SDK in tests: every call the
//! bridge makes is recorded, each call can be made to fail once, and
//! fixes are injected by hand through the captured listeners. Compiled
//! only for tests or behind the `test-utils` feature.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::consent::ConsentBackend;
use crate::provider::{LocationProvider, ProviderClient, ProviderError, ProviderResult, RawFix};
use crate::session::manager::FixListener;
use crate::session::SessionConfig;

/// One recorded call against a [`ScriptedProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptEvent {
    /// A client was constructed; carries its zero-based ordinal.
    Connected(u64),
    /// A client received session options.
    OptionsApplied(SessionConfig),
    /// A client was started.
    Started,
    /// A client was stopped. Not recorded when the stop was scripted
    /// to fail.
    Stopped,
}

#[derive(Default)]
struct Inner {
    log: Vec<ScriptEvent>,
    listeners: Vec<FixListener>,
    connects: u64,
    fail_connect: Option<String>,
    fail_options: Option<String>,
    fail_start: Option<String>,
    fail_stop: Option<String>,
}

/// Tracks how many scripted clients exist right now and the most that
/// ever existed at once. The peak is how tests prove the bridge never
/// ran two clients side by side.
#[derive(Default)]
struct LiveCounter {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl LiveCounter {
    fn attach(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn detach(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// An in-memory [`LocationProvider`] driven entirely by the test.
///
/// # Examples
///
/// ```ignore
/// let provider = Arc::new(ScriptedProvider::new());
/// // ... hand it to the bridge, start a session ...
/// provider.deliver(Some(RawFix::new(FixCode::Gnss, 39.9, 116.4)));
/// assert_eq!(provider.peak_live_clients(), 1);
/// ```
pub struct ScriptedProvider {
    inner: Arc<Mutex<Inner>>,
    live: Arc<LiveCounter>,
}

impl ScriptedProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            live: Arc::new(LiveCounter::default()),
        }
    }

    fn locked(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("scripted provider state poisoned")
    }

    /// Makes the next client construction fail with the given message.
    pub fn fail_next_connect(&self, message: &str) {
        self.locked().fail_connect = Some(message.to_string());
    }

    /// Makes the next options call on any client fail.
    pub fn fail_next_options(&self, message: &str) {
        self.locked().fail_options = Some(message.to_string());
    }

    /// Makes the next start call on any client fail.
    pub fn fail_next_start(&self, message: &str) {
        self.locked().fail_start = Some(message.to_string());
    }

    /// Makes the next stop call on any client fail.
    pub fn fail_next_stop(&self, message: &str) {
        self.locked().fail_stop = Some(message.to_string());
    }

    /// Everything the bridge has done to this provider, in order.
    #[must_use]
    pub fn log(&self) -> Vec<ScriptEvent> {
        self.locked().log.clone()
    }

    /// How many clients were ever constructed.
    #[must_use]
    pub fn connect_count(&self) -> u64 {
        self.locked().connects
    }

    /// How many clients exist right now.
    #[must_use]
    pub fn live_clients(&self) -> usize {
        self.live.current.load(Ordering::SeqCst)
    }

    /// The most clients that ever existed at the same time.
    #[must_use]
    pub fn peak_live_clients(&self) -> usize {
        self.live.peak.load(Ordering::SeqCst)
    }

    /// The options most recently applied to any client.
    #[must_use]
    pub fn last_config(&self) -> Option<SessionConfig> {
        self.locked().log.iter().rev().find_map(|event| match event {
            ScriptEvent::OptionsApplied(config) => Some(config.clone()),
            _ => None,
        })
    }

    /// How many listeners have been handed out.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.locked().listeners.len()
    }

    /// Injects a fix through the most recently connected client.
    ///
    /// # Panics
    ///
    /// Panics if no client has ever connected.
    pub fn deliver(&self, report: Option<RawFix>) {
        let inner = self.locked();
        let listener = inner
            .listeners
            .last()
            .expect("no client has connected yet")
            .clone();
        drop(inner);
        listener.deliver(report);
    }

    /// Injects a fix through the client with the given ordinal, even if
    /// it has since been replaced. This is how tests produce stale
    /// deliveries.
    ///
    /// # Panics
    ///
    /// Panics if no client with that ordinal ever connected.
    pub fn deliver_from(&self, ordinal: usize, report: Option<RawFix>) {
        let inner = self.locked();
        let listener = inner
            .listeners
            .get(ordinal)
            .expect("no client with that ordinal")
            .clone();
        drop(inner);
        listener.deliver(report);
    }
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationProvider for ScriptedProvider {
    fn connect(&self, listener: FixListener) -> ProviderResult<Box<dyn ProviderClient>> {
        let mut inner = self.locked();
        if let Some(message) = inner.fail_connect.take() {
            return Err(ProviderError::Construct(message));
        }
        let ordinal = inner.connects;
        inner.connects += 1;
        inner.log.push(ScriptEvent::Connected(ordinal));
        inner.listeners.push(listener);
        drop(inner);

        self.live.attach();
        Ok(Box::new(ScriptedClient {
            inner: Arc::clone(&self.inner),
            live: Arc::clone(&self.live),
        }))
    }
}

struct ScriptedClient {
    inner: Arc<Mutex<Inner>>,
    live: Arc<LiveCounter>,
}

impl ScriptedClient {
    fn locked(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("scripted provider state poisoned")
    }
}

impl ProviderClient for ScriptedClient {
    fn apply_options(&mut self, config: &SessionConfig) -> ProviderResult<()> {
        let mut inner = self.locked();
        if let Some(message) = inner.fail_options.take() {
            return Err(ProviderError::Options(message));
        }
        inner.log.push(ScriptEvent::OptionsApplied(config.clone()));
        Ok(())
    }

    fn start(&mut self) -> ProviderResult<()> {
        let mut inner = self.locked();
        if let Some(message) = inner.fail_start.take() {
            return Err(ProviderError::Start(message));
        }
        inner.log.push(ScriptEvent::Started);
        Ok(())
    }

    fn stop(&mut self) -> ProviderResult<()> {
        let mut inner = self.locked();
        if let Some(message) = inner.fail_stop.take() {
            return Err(ProviderError::Stop(message));
        }
        inner.log.push(ScriptEvent::Stopped);
        Ok(())
    }
}

impl Drop for ScriptedClient {
    fn drop(&mut self) {
        self.live.detach();
    }
}

/// An in-memory [`ConsentBackend`] that records every call.
#[derive(Default)]
pub struct ScriptedConsent {
    calls: Mutex<Vec<bool>>,
    fail_next: Mutex<Option<String>>,
}

impl ScriptedConsent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `set_agree` call fail with the given message.
    /// The call is still recorded.
    pub fn fail_next(&self, message: &str) {
        *self.fail_next.lock().expect("scripted consent state poisoned") =
            Some(message.to_string());
    }

    /// Every flag value the bridge has pushed, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<bool> {
        self.calls.lock().expect("scripted consent state poisoned").clone()
    }

    /// How many times the bridge pushed the flag.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("scripted consent state poisoned").len()
    }
}

impl ConsentBackend for ScriptedConsent {
    fn set_agree(&self, agree: bool) -> ProviderResult<()> {
        self.calls
            .lock()
            .expect("scripted consent state poisoned")
            .push(agree);
        if let Some(message) = self
            .fail_next
            .lock()
            .expect("scripted consent state poisoned")
            .take()
        {
            return Err(ProviderError::Consent(message));
        }
        Ok(())
    }
}
