//! Shared application state: the live game, its snapshot store and the SSE hubs.

/// Read-only song catalog.
pub mod catalog;
/// Game domain types.
pub mod game;
/// Placement judging.
pub mod judge;
mod sse;
/// Pure game reducer.
pub mod state_machine;
/// Transition helpers that also notify SSE subscribers.
pub mod transitions;

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::{
    config::AppConfig,
    dao::{
        models::{GameSnapshotEntity, migrate},
        snapshot_store::SnapshotStore,
    },
    state::{
        catalog::Catalog,
        game::GameState,
        state_machine::{GameEvent, Ignored, TransitionContext, transition},
    },
};

pub use self::sse::SseHub;
use self::sse::SseState;

/// Handle shared by every request handler.
pub type SharedState = Arc<AppState>;

/// Result of feeding one host action through the state machine.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    /// Game state after the action; unchanged when the action was ignored.
    pub state: GameState,
    /// Why the action had no effect.
    pub ignored: Option<Ignored>,
}

impl TransitionOutcome {
    /// Whether the action changed the game.
    pub fn applied(&self) -> bool {
        self.ignored.is_none()
    }
}

/// Central application state: configuration, catalog, the current game and its store.
pub struct AppState {
    config: AppConfig,
    catalog: Catalog,
    store: Arc<dyn SnapshotStore>,
    sse: SseState,
    game: RwLock<GameState>,
    transition_gate: Mutex<()>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`], resuming the stored game when possible.
    ///
    /// A missing snapshot starts a fresh individual game; an unreadable one is
    /// logged and treated as missing.
    pub async fn bootstrap(
        config: AppConfig,
        catalog: Catalog,
        store: Arc<dyn SnapshotStore>,
    ) -> SharedState {
        let game = match store.load().await {
            Ok(Some(snapshot)) => {
                let version = snapshot.version;
                let game = migrate(snapshot, &catalog);
                info!(
                    ?version,
                    mode = ?game.mode,
                    participants = game.participants.len(),
                    remaining = game.deck.deck_song_ids.len(),
                    "resumed stored game"
                );
                game
            }
            Ok(None) => {
                info!("no stored game; starting a fresh one");
                GameState::fresh_individual(&catalog, &mut rand::rng())
            }
            Err(err) => {
                warn!(error = %err, "failed to load stored game; starting a fresh one");
                GameState::fresh_individual(&catalog, &mut rand::rng())
            }
        };

        Arc::new(Self {
            config,
            catalog,
            store,
            sse: SseState::new(16, 16),
            game: RwLock::new(game),
            transition_gate: Mutex::new(()),
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Song catalog loaded at startup.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Snapshot store the game is persisted to.
    pub fn store(&self) -> &Arc<dyn SnapshotStore> {
        &self.store
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        self.sse.public()
    }

    /// Broadcast hub used for the host SSE stream.
    pub fn host_sse(&self) -> &SseHub {
        self.sse.host()
    }

    /// Run `f` against the current game.
    pub async fn read_game<T>(&self, f: impl FnOnce(&GameState) -> T) -> T {
        let guard = self.game.read().await;
        f(&guard)
    }

    /// Clone of the current game.
    pub async fn snapshot(&self) -> GameState {
        self.read_game(GameState::clone).await
    }

    fn transition_context(&self) -> TransitionContext<'_> {
        TransitionContext {
            catalog: &self.catalog,
            team_count: self.config.team_count(),
            team_name_prefix: self.config.team_name_prefix(),
        }
    }

    /// Apply `event` to the game, then persist the new state.
    ///
    /// Transitions are serialised: the next state is computed from the current
    /// one in full, swapped in, and only then written to the store. Store
    /// failures are logged and never reported to the caller.
    pub async fn run_transition(&self, event: GameEvent) -> TransitionOutcome {
        let _gate = self.transition_gate.lock().await;
        let current = self.snapshot().await;

        let computed = {
            let mut rng = rand::rng();
            transition(&current, event.clone(), &self.transition_context(), &mut rng)
        };

        match computed {
            Ok(next) => {
                *self.game.write().await = next.clone();
                info!(event = ?event, "host action applied");
                self.persist(&next, event.is_destructive()).await;
                TransitionOutcome {
                    state: next,
                    ignored: None,
                }
            }
            Err(reason) => {
                debug!(event = ?event, %reason, "host action ignored");
                TransitionOutcome {
                    state: current,
                    ignored: Some(reason),
                }
            }
        }
    }

    async fn persist(&self, game: &GameState, destructive: bool) {
        if destructive {
            if let Err(err) = self.store.clear().await {
                warn!(error = %err, "failed to clear stored game");
            }
        }

        if let Err(err) = self.store.save(GameSnapshotEntity::from(game)).await {
            warn!(error = %err, "failed to save game");
        }
    }
}
