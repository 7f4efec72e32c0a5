//! Session lifecycle: mutex-guarded state, the command surface, and the
//! three background workers (income accrual, effect decay, autosave).
//!
//! Every command and every tick step is one short transaction under the
//! state mutex, so transactions are atomic and totally ordered; there is
//! no interleaving that could lose an update on coins or unit cost/count.
//! Workers block on `recv_timeout` against a shutdown channel: a timeout
//! fires the tick, a disconnect ends the worker. Dropping the session
//! stops all workers and writes one final save.

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use tracing::debug;

use crate::catalog::{Catalog, AUTOSAVE_SECS, DECAY_TICK_SECS, INCOME_TICK_SECS};
use crate::logic;
use crate::save;
use crate::snapshot::EconomySnapshot;
use crate::state::EconomyState;
use crate::storage::KeyValueStore;

/// Worker periods. Defaults are the production cadence; tests shrink them
/// to drive the workers without real-time waits.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub income_tick: Duration,
    pub decay_tick: Duration,
    pub autosave: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            income_tick: Duration::from_secs(INCOME_TICK_SECS),
            decay_tick: Duration::from_secs(DECAY_TICK_SECS),
            autosave: Duration::from_secs(AUTOSAVE_SECS),
        }
    }
}

/// One player's running game. Owns the economy state; the presentation
/// layer issues commands and reads snapshots, never the state itself.
pub struct GameSession {
    state: Arc<Mutex<EconomyState>>,
    store: Arc<dyn KeyValueStore>,
    /// Player identity gating persistence. None runs in memory only.
    identity: Option<String>,
    shutdown: Option<crossbeam_channel::Sender<()>>,
    workers: Vec<JoinHandle<()>>,
}

/// A poisoned lock only means some other thread panicked mid-hold; the
/// transition functions never leave state partially applied, so the data
/// is still sound. Recover instead of propagating the panic.
fn lock_state(state: &Mutex<EconomyState>) -> MutexGuard<'_, EconomyState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

fn spawn_worker<F>(period: Duration, shutdown: Receiver<()>, mut step: F) -> JoinHandle<()>
where
    F: FnMut() + Send + 'static,
{
    thread::spawn(move || loop {
        match shutdown.recv_timeout(period) {
            Err(RecvTimeoutError::Timeout) => step(),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    })
}

impl GameSession {
    /// Start a session at the production cadence. Loads the identity's
    /// save if one exists.
    pub fn start(
        catalog: Catalog,
        store: Arc<dyn KeyValueStore>,
        identity: Option<&str>,
    ) -> Self {
        Self::start_with_config(catalog, store, identity, SessionConfig::default())
    }

    pub fn start_with_config(
        catalog: Catalog,
        store: Arc<dyn KeyValueStore>,
        identity: Option<&str>,
        config: SessionConfig,
    ) -> Self {
        let mut state = EconomyState::new(catalog);
        if let Some(id) = identity {
            if save::load(&mut state, store.as_ref(), id) {
                debug!("loaded save for {id}");
            }
        }
        let state = Arc::new(Mutex::new(state));
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);

        let mut workers = Vec::with_capacity(3);

        let income_state = Arc::clone(&state);
        workers.push(spawn_worker(
            config.income_tick,
            shutdown_rx.clone(),
            move || logic::income_tick(&mut lock_state(&income_state)),
        ));

        let decay_state = Arc::clone(&state);
        workers.push(spawn_worker(
            config.decay_tick,
            shutdown_rx.clone(),
            move || logic::decay_tick(&mut lock_state(&decay_state)),
        ));

        // Autosave only runs for identified players; anonymous sessions
        // stay purely in memory.
        if let Some(id) = identity {
            let autosave_state = Arc::clone(&state);
            let autosave_store = Arc::clone(&store);
            let id = id.to_string();
            workers.push(spawn_worker(config.autosave, shutdown_rx, move || {
                persist(&autosave_state, autosave_store.as_ref(), &id);
            }));
        }

        debug!("session started (identity: {:?})", identity);
        Self {
            state,
            store,
            identity: identity.map(str::to_string),
            shutdown: Some(shutdown_tx),
            workers,
        }
    }

    // ── Commands ────────────────────────────────────────────────────

    /// Manual click. Returns the amount earned for display.
    pub fn click(&self) -> f64 {
        logic::click(&mut lock_state(&self.state))
    }

    pub fn buy_unit(&self, id: &str) -> bool {
        logic::buy_unit(&mut lock_state(&self.state), id)
    }

    pub fn buy_boost(&self, id: &str) -> bool {
        logic::buy_boost(&mut lock_state(&self.state), id)
    }

    /// Invoked by the payment collaborator once it has confirmed an
    /// out-of-band purchase. Safe to call at any point in the session and
    /// idempotent against duplicate confirmations.
    pub fn grant_premium_bonus(&self, id: &str) -> bool {
        logic::grant_premium_bonus(&mut lock_state(&self.state), id)
    }

    /// Collect a loot goblin. Returns the reward for display.
    pub fn collect_goblin(&self) -> f64 {
        logic::collect_goblin(&mut lock_state(&self.state))
    }

    pub fn can_afford(&self, amount: f64) -> bool {
        lock_state(&self.state).can_afford(amount)
    }

    /// Consistent read-only view for one render pass.
    pub fn snapshot(&self) -> EconomySnapshot {
        EconomySnapshot::of(&lock_state(&self.state))
    }

    /// Persist immediately (on top of the periodic autosave). Inert
    /// without an identity.
    pub fn save_now(&self) {
        if let Some(id) = &self.identity {
            persist(&self.state, self.store.as_ref(), id);
        }
    }

    /// Stop the workers and write the final save.
    pub fn stop(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        let shutdown = match self.shutdown.take() {
            Some(tx) => tx,
            None => return, // already torn down
        };
        drop(shutdown); // disconnects every worker's receiver
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
        self.save_now();
        debug!("session stopped");
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Serialize under the lock, write outside it, so storage latency never
/// holds up gameplay transactions.
fn persist(state: &Mutex<EconomyState>, store: &dyn KeyValueStore, identity: &str) {
    let json = save::to_json(&lock_state(state));
    if let Some(json) = json {
        save::write(store, identity, &json);
    }
}
