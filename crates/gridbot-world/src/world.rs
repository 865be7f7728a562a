//! Shared world state and the execution controller.

use crate::entity::Entity;
use crate::exec::ExecContext;
use crate::grid::Grid;
use crate::persist::{NoopCodec, WorldCodec};
use crate::view::{ListenerSet, WorldView};
use gridbot_core::BoardConfig;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Shared simulation state plus the entity collection operating on it.
///
/// The world owns the board, the entities, the pacing configuration, and two
/// observer channels: `world_updates` listeners hear every granular change
/// (moves, turns, tile mutations), `entity_updates` listeners hear only
/// structural changes (entities added, removed, replaced).
///
/// Entities run concurrently against this state with no cross-entity
/// transactional consistency; see the crate docs for the contract.
pub struct World {
    name: String,
    grid: RwLock<Grid>,
    entities: RwLock<Vec<Arc<Entity>>>,
    delayed: AtomicBool,
    delay_ms: AtomicU64,
    parameters: RwLock<Vec<serde_json::Value>>,
    codec: RwLock<Arc<dyn WorldCodec>>,
    world_updates: ListenerSet,
    entity_updates: ListenerSet,
}

impl World {
    pub fn new(name: impl Into<String>, config: &BoardConfig) -> Self {
        Self::with_grid(name, Grid::from_config(config), config)
    }

    pub fn with_grid(name: impl Into<String>, grid: Grid, config: &BoardConfig) -> Self {
        Self {
            name: name.into(),
            grid: RwLock::new(grid),
            entities: RwLock::new(Vec::new()),
            delayed: AtomicBool::new(config.delayed),
            delay_ms: AtomicU64::new(config.default_delay_ms),
            parameters: RwLock::new(Vec::new()),
            codec: RwLock::new(Arc::new(NoopCodec)),
            world_updates: ListenerSet::new(),
            entity_updates: ListenerSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &RwLock<Grid> {
        &self.grid
    }

    /* Pacing */

    pub fn is_delayed(&self) -> bool {
        self.delayed.load(Ordering::Relaxed)
    }

    /// Delay applied between two instruction executions of one entity
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms.load(Ordering::Relaxed))
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms.load(Ordering::Relaxed)
    }

    /// Store the pacing delay to use while delayed.
    ///
    /// Fires one granular notification so a speed-control view can pick up
    /// the new value. Does not switch delayed mode on or off.
    pub fn set_delay(&self, ms: u64) {
        self.delay_ms.store(ms, Ordering::Relaxed);
        self.notify_world_updates();
    }

    /// Enter interactive (slowed) execution; consulted, not observed
    pub fn do_delay(&self) {
        self.delayed.store(true, Ordering::Relaxed);
    }

    /// Leave interactive execution; consulted, not observed
    pub fn done_delay(&self) {
        self.delayed.store(false, Ordering::Relaxed);
    }

    /* Entity collection */

    /// Append an entity and fire one structural notification
    pub fn add_entity(&self, entity: Arc<Entity>) {
        self.entities.write().push(entity);
        self.notify_entity_updates();
    }

    /// Drop all entities and fire one structural notification
    pub fn empty_entities(&self) {
        *self.entities.write() = Vec::new();
        self.notify_entity_updates();
    }

    /// Replace the whole collection and fire one structural notification
    pub fn set_entities(&self, entities: Vec<Arc<Entity>>) {
        *self.entities.write() = entities;
        self.notify_entity_updates();
    }

    pub fn entity_count(&self) -> usize {
        self.entities.read().len()
    }

    pub fn get_entity(&self, index: usize) -> Option<Arc<Entity>> {
        self.entities.read().get(index).cloned()
    }

    /// Snapshot of the entity collection taken at call time.
    ///
    /// The returned sequence is finite and restartable; it does not observe
    /// later structural changes.
    pub fn entities(&self) -> Vec<Arc<Entity>> {
        self.entities.read().clone()
    }

    /* Parameters */

    /// Attach board-specific opaque configuration
    pub fn set_parameters(&self, parameters: Vec<serde_json::Value>) {
        *self.parameters.write() = parameters;
    }

    pub fn parameters(&self) -> Vec<serde_json::Value> {
        self.parameters.read().clone()
    }

    /* Lifecycle */

    /// Reset this world's content to match `initial`.
    ///
    /// Replaces the entity set with deep copies of `initial`'s entities,
    /// restores the board, and copies the pacing configuration. The world's
    /// identity is preserved: listeners stay attached and are told about the
    /// replacement, granular notification first, then structural, each
    /// exactly once, after state is fully replaced.
    pub fn reset(&self, initial: &World) {
        {
            let mut entities = self.entities.write();
            *entities = initial
                .entities()
                .iter()
                .map(|e| Arc::new(e.deep_clone()))
                .collect();
        }
        *self.grid.write() = initial.grid.read().clone();
        self.delayed
            .store(initial.is_delayed(), Ordering::Relaxed);
        self.delay_ms.store(initial.delay_ms(), Ordering::Relaxed);

        debug!(world = %self.name, entities = self.entity_count(), "world reset");
        self.notify_world_updates();
        self.notify_entity_updates();
    }

    /// Independent deep clone: fresh entities, cloned board and parameters.
    ///
    /// Listener sets start empty; observers of the original do not hear
    /// about the copy.
    pub fn copy(&self) -> World {
        World {
            name: self.name.clone(),
            grid: RwLock::new(self.grid.read().clone()),
            entities: RwLock::new(
                self.entities()
                    .iter()
                    .map(|e| Arc::new(e.deep_clone()))
                    .collect(),
            ),
            delayed: AtomicBool::new(self.is_delayed()),
            delay_ms: AtomicU64::new(self.delay_ms()),
            parameters: RwLock::new(self.parameters()),
            codec: RwLock::new(self.codec.read().clone()),
            world_updates: ListenerSet::new(),
            entity_updates: ListenerSet::new(),
        }
    }

    /* Execution */

    /// Start one task per entity currently in the collection.
    ///
    /// Every task registers this world's name on the context's status board
    /// for its duration, runs its entity's script, and logs (never
    /// propagates) any script fault so one entity cannot abort its siblings.
    /// Each spawned handle is appended to `handles`; the caller owns them
    /// and may join or abort, or cancel the context's token to stop all
    /// entities cooperatively between instructions.
    pub fn run_entities(self: &Arc<Self>, ctx: &ExecContext, handles: &mut Vec<JoinHandle<()>>) {
        let entities = self.entities();
        info!(world = %self.name, count = entities.len(), "starting entities");

        for entity in entities {
            let world = Arc::clone(self);
            let ctx = ctx.clone();
            let handle = tokio::spawn(async move {
                ctx.status().enter(world.name());
                if let Err(e) = entity.run(&world, &ctx).await {
                    warn!(
                        world = %world.name(),
                        entity = %entity.name(),
                        error = %e,
                        "entity script faulted"
                    );
                }
                ctx.status().leave(world.name());
            });
            handles.push(handle);
        }
    }

    /* Observers */

    pub fn add_world_updates_listener(&self, view: Arc<dyn WorldView>) {
        self.world_updates.add(view);
    }

    pub fn remove_world_updates_listener(&self, view: &Arc<dyn WorldView>) {
        self.world_updates.remove(view);
    }

    /// Notify granular-change observers, in registration order
    pub fn notify_world_updates(&self) {
        self.world_updates.notify(|v| v.world_has_moved());
    }

    pub fn add_entity_updates_listener(&self, view: Arc<dyn WorldView>) {
        self.entity_updates.add(view);
    }

    pub fn remove_entity_updates_listener(&self, view: &Arc<dyn WorldView>) {
        self.entity_updates.remove(view);
    }

    /// Notify structural-change observers, in registration order
    pub fn notify_entity_updates(&self) {
        self.entity_updates.notify(|v| v.world_has_changed());
    }

    /* Persistence */

    /// Install the codec used by the file helpers; boards without one keep
    /// the default no-op behavior
    pub fn set_codec(&self, codec: Arc<dyn WorldCodec>) {
        *self.codec.write() = codec;
    }

    pub(crate) fn codec(&self) -> Arc<dyn WorldCodec> {
        self.codec.read().clone()
    }
}
