//! The positioning session actor.
//!
//! All session state lives inside one spawned task. Caller operations
//! and provider callbacks arrive as messages on a single unbounded
//! channel and are handled strictly one at a time, so start/stop races
//! and callback races cannot corrupt the state; there are no locks.
//!
//! # Lifecycle
//!
//! The task owns at most one provider client. `start` tears down any
//! running client before constructing the next one, `stop` is
//! idempotent, and a successful one-shot fix closes the session before
//! its event is emitted. Fix deliveries are tagged with the generation
//! of the client they came from; anything from a replaced client is
//! dropped.

use std::fmt;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, trace, warn};

use super::config::SessionConfig;
use super::error::{SessionError, SessionResult};
use crate::consent::ConsentGate;
use crate::event::{Emitter, EventSink, OutboundEvent};
use crate::position::{classify, FixOutcome};
use crate::provider::{LocationProvider, ProviderClient, ProviderError, RawFix};

/// Messages processed by the session task.
enum Command {
    Start {
        config: SessionConfig,
        reply: oneshot::Sender<SessionResult<()>>,
    },
    Stop {
        reply: oneshot::Sender<()>,
    },
    Status {
        reply: oneshot::Sender<bool>,
    },
    Fix {
        generation: u64,
        report: Option<RawFix>,
    },
}

/// Where a provider client delivers its fixes.
///
/// Each client gets its own listener, tagged with the session generation
/// it was created for. Listeners hold only a weak handle to the session
/// task: a provider that outlives the bridge cannot keep the task alive,
/// and deliveries after teardown are silently dropped.
#[derive(Clone)]
pub struct FixListener {
    tx: mpsc::WeakUnboundedSender<Command>,
    generation: u64,
}

impl FixListener {
    /// Delivers one callback result to the session.
    ///
    /// `None` reports a provider glitch (a callback that carried no
    /// record). Safe to call from any thread, at any time; deliveries
    /// that can no longer be handled are dropped.
    pub fn deliver(&self, report: Option<RawFix>) {
        let Some(tx) = self.tx.upgrade() else {
            trace!(generation = self.generation, "session task gone, dropping fix");
            return;
        };
        let _ = tx.send(Command::Fix {
            generation: self.generation,
            report,
        });
    }
}

impl fmt::Debug for FixListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixListener")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// Handle to the session task.
///
/// Cheap to share behind the bridge; all methods just exchange messages
/// with the task. Dropping the last handle shuts the task down, halting
/// any live client on the way out.
#[derive(Debug)]
pub struct SessionManager {
    tx: mpsc::UnboundedSender<Command>,
}

impl SessionManager {
    /// Spawns the session task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn new(
        provider: Arc<dyn LocationProvider>,
        consent: Arc<ConsentGate>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let actor = SessionActor {
            rx,
            listener_tx: tx.downgrade(),
            provider,
            consent,
            emitter: Emitter::new(sink),
            live: None,
            generation: 0,
        };
        tokio::spawn(actor.run());
        Self { tx }
    }

    /// Starts a session with the given configuration, replacing any
    /// session already running.
    ///
    /// Resolves once the provider has accepted the start request; fixes
    /// arrive later as events.
    ///
    /// # Errors
    ///
    /// - [`SessionError::ConsentRequired`] if consent has not been
    ///   granted (also emitted as an error event).
    /// - [`SessionError::Configuration`] if the provider failed to
    ///   construct, configure or start a client (also emitted).
    /// - [`SessionError::Terminated`] if the session task is gone.
    pub async fn start(&self, config: SessionConfig) -> SessionResult<()> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Command::Start { config, reply })
            .map_err(|_| SessionError::Terminated)?;
        response.await.map_err(|_| SessionError::Terminated)?
    }

    /// Stops the running session, if any. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Terminated`] if the session task is gone.
    /// Provider stop failures are absorbed, never surfaced.
    pub async fn stop(&self) -> SessionResult<()> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Command::Stop { reply })
            .map_err(|_| SessionError::Terminated)?;
        response.await.map_err(|_| SessionError::Terminated)
    }

    /// Whether a session is currently active.
    ///
    /// Reads the task's own state, never the provider. Returns `false`
    /// if the task is gone.
    pub async fn is_active(&self) -> bool {
        let (reply, response) = oneshot::channel();
        if self.tx.send(Command::Status { reply }).is_err() {
            return false;
        }
        response.await.unwrap_or(false)
    }
}

/// A constructed-and-started provider client plus the config it runs.
struct LiveSession {
    client: Box<dyn ProviderClient>,
    config: SessionConfig,
}

/// State owned exclusively by the session task.
struct SessionActor {
    rx: mpsc::UnboundedReceiver<Command>,
    /// Weak so outstanding listeners never keep the task alive.
    listener_tx: mpsc::WeakUnboundedSender<Command>,
    provider: Arc<dyn LocationProvider>,
    consent: Arc<ConsentGate>,
    emitter: Emitter,
    live: Option<LiveSession>,
    generation: u64,
}

impl SessionActor {
    async fn run(mut self) {
        while let Some(command) = self.rx.recv().await {
            self.handle(command);
        }
        // Bridge dropped; halt whatever is still running.
        self.teardown();
        trace!("session task exited");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Start { config, reply } => {
                let result = self.handle_start(config);
                let _ = reply.send(result);
            }
            Command::Stop { reply } => {
                self.handle_stop();
                let _ = reply.send(());
            }
            Command::Status { reply } => {
                let _ = reply.send(self.live.is_some());
            }
            Command::Fix { generation, report } => self.handle_fix(generation, report),
        }
    }

    fn handle_start(&mut self, config: SessionConfig) -> SessionResult<()> {
        if !self.consent.is_granted() {
            warn!("positioning requested before consent was granted");
            let err = SessionError::ConsentRequired;
            self.emitter.emit_error(err.to_string());
            return Err(err);
        }

        if self.live.is_some() {
            debug!("session already running, stopping it first");
            self.teardown();
        }

        // Every attempt gets a fresh generation, so fixes from clients
        // of failed or replaced attempts identify themselves as stale.
        self.generation += 1;
        let listener = FixListener {
            tx: self.listener_tx.clone(),
            generation: self.generation,
        };

        let mut client = self
            .provider
            .connect(listener)
            .map_err(|err| self.reject_start(err))?;
        client
            .apply_options(&config)
            .map_err(|err| self.reject_start(err))?;
        client.start().map_err(|err| self.reject_start(err))?;

        info!(
            trigger = ?config.update_trigger(),
            coordinate_system = %config.coordinate_system,
            scan_interval_ms = config.scan_interval_ms,
            distance_filter_m = config.distance_filter_m,
            "positioning session started"
        );
        self.live = Some(LiveSession { client, config });
        Ok(())
    }

    /// Emits the failure event and maps the provider error. The
    /// partially built client is dropped by the caller, leaving the
    /// session idle.
    fn reject_start(&self, err: ProviderError) -> SessionError {
        error!(%err, "session start failed");
        self.emitter.emit_error(err.to_string());
        SessionError::Configuration(err)
    }

    fn handle_stop(&mut self) {
        if self.live.is_some() {
            self.teardown();
            info!("positioning session stopped");
        } else {
            debug!("stop requested with no active session");
        }
    }

    fn handle_fix(&mut self, generation: u64, report: Option<RawFix>) {
        let Some(live) = self.live.as_ref() else {
            trace!(generation, "no active session, dropping fix");
            return;
        };
        let one_shot = live.config.one_shot;

        if generation != self.generation {
            trace!(
                generation,
                current = self.generation,
                "stale fix from a replaced client, dropping"
            );
            return;
        }
        let Some(fix) = report else {
            warn!("provider delivered an empty fix record");
            return;
        };

        match classify(&fix) {
            FixOutcome::Failure(message) => {
                // Transient for the session: the client keeps running.
                warn!(%message, "provider fix rejected");
                self.emitter.emit_error(message);
            }
            FixOutcome::Success(result) => {
                if one_shot {
                    self.teardown();
                    info!("one-shot fix delivered, session closed");
                    self.emitter.emit(OutboundEvent::CurrentPosition(result));
                } else {
                    self.emitter.emit(OutboundEvent::Update(result));
                }
            }
        }
    }

    /// Halts and discards the live client, if any. Stop failures are
    /// logged and absorbed; the client is discarded either way.
    fn teardown(&mut self) {
        if let Some(mut live) = self.live.take() {
            if let Err(err) = live.client.stop() {
                warn!(%err, "provider stop failed, discarding client anyway");
            }
        }
    }
}
