//! Scripted entities and their interpreter.

use crate::exec::ExecContext;
use crate::world::World;
use gridbot_core::{Direction, EntityId, Error, Position, Result};
use gridbot_script::{Instruction, Program};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Procedure call depth at which a run is declared a fault
pub const MAX_CALL_DEPTH: usize = 32;

/// Mutable state of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityState {
    pub position: Position,
    pub direction: Direction,
}

/// A scripted bot on the board.
///
/// The entity owns its script and its position/orientation; all shared state
/// it touches belongs to the [`World`] handed into [`Entity::run`]. The
/// entity is owned by exactly one world at a time; [`Entity::deep_clone`]
/// produces an independent copy for reset/copy so that no two worlds ever
/// alias one entity's state.
pub struct Entity {
    id: EntityId,
    name: String,
    script: Program,
    state: Mutex<EntityState>,
}

enum Move {
    Walk,
    Jump,
}

impl Entity {
    pub fn new(
        name: impl Into<String>,
        position: Position,
        direction: Direction,
        script: Program,
    ) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            script,
            state: Mutex::new(EntityState {
                position,
                direction,
            }),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn script(&self) -> &Program {
        &self.script
    }

    pub fn state(&self) -> EntityState {
        *self.state.lock()
    }

    pub fn position(&self) -> Position {
        self.state.lock().position
    }

    pub fn direction(&self) -> Direction {
        self.state.lock().direction
    }

    /// Independent copy with the same id, script, and current state.
    ///
    /// The clone shares nothing mutable with the original, so the worlds
    /// produced by reset/copy cannot corrupt each other through a shared
    /// entity.
    pub fn deep_clone(&self) -> Entity {
        Entity {
            id: self.id,
            name: self.name.clone(),
            script: self.script.clone(),
            state: Mutex::new(self.state()),
        }
    }

    /// Execute the full script against `world`.
    ///
    /// Interprets instructions one at a time. Effects mutate the world's
    /// grid and this entity's state, firing one granular notification per
    /// actual change. Between instructions the interpreter honors the
    /// world's pacing and the context's cancellation token; cancellation
    /// ends the run cleanly. Unrecoverable script faults (undefined
    /// procedure, call depth overflow) are returned to the caller.
    pub async fn run(&self, world: &World, ctx: &ExecContext) -> Result<()> {
        struct Frame<'a> {
            block: &'a [Instruction],
            pc: usize,
        }

        let mut frames = vec![Frame {
            block: self.script.main.as_slice(),
            pc: 0,
        }];

        while let Some(frame) = frames.last_mut() {
            if ctx.is_cancelled() {
                debug!(entity = %self.name, "run cancelled");
                return Ok(());
            }

            let Some(inst) = frame.block.get(frame.pc) else {
                frames.pop();
                continue;
            };
            frame.pc += 1;

            if let Instruction::Call(name) = inst {
                if frames.len() >= MAX_CALL_DEPTH {
                    return Err(Error::Script(format!(
                        "call depth exceeded at procedure '{}'",
                        name
                    )));
                }
                let proc = self.script.procedure(name).ok_or_else(|| {
                    Error::Script(format!("call to undefined procedure '{}'", name))
                })?;
                frames.push(Frame {
                    block: proc.body.as_slice(),
                    pc: 0,
                });
                continue;
            }

            self.execute(world, inst);

            if world.is_delayed() {
                // A cancel request interrupts the pacing sleep immediately
                tokio::select! {
                    _ = tokio::time::sleep(world.delay()) => {}
                    _ = ctx.cancellation_token().cancelled() => {
                        debug!(entity = %self.name, "run cancelled");
                        return Ok(());
                    }
                }
            } else {
                // Keep long scripts from starving other tasks
                tokio::task::yield_now().await;
            }
        }

        Ok(())
    }

    fn execute(&self, world: &World, inst: &Instruction) {
        match inst {
            Instruction::Forward => {
                self.try_move(world, Move::Walk, false);
            }
            Instruction::Backward => {
                self.try_move(world, Move::Walk, true);
            }
            Instruction::Jump => {
                self.try_move(world, Move::Jump, false);
            }
            Instruction::Left => {
                self.turn(world, Direction::left);
            }
            Instruction::Right => {
                self.turn(world, Direction::right);
            }
            Instruction::ToggleLight => {
                let pos = self.position();
                let changed = world.grid().write().toggle_lamp(pos);
                if changed {
                    world.notify_world_updates();
                } else {
                    trace!(entity = %self.name, %pos, "no lamp to toggle");
                }
            }
            Instruction::Call(_) => unreachable!("calls are handled by the run loop"),
        }
    }

    fn turn(&self, world: &World, towards: fn(&Direction) -> Direction) {
        {
            let mut state = self.state.lock();
            state.direction = towards(&state.direction);
        }
        world.notify_world_updates();
    }

    /// Attempt a move; blocked moves (edge, height mismatch) are no-ops
    fn try_move(&self, world: &World, kind: Move, backwards: bool) -> bool {
        let moved = {
            let mut state = self.state.lock();
            let dir = if backwards {
                state.direction.opposite()
            } else {
                state.direction
            };
            let target = state.position.step(dir);

            let allowed = {
                let grid = world.grid().read();
                match (grid.get(state.position), grid.get(target)) {
                    (Some(from), Some(to)) => match kind {
                        Move::Walk => to.height == from.height,
                        Move::Jump => {
                            to.height == from.height + 1 || to.height < from.height
                        }
                    },
                    _ => false,
                }
            };

            if allowed {
                state.position = target;
            } else {
                trace!(entity = %self.name, %target, "move blocked");
            }
            allowed
        };

        if moved {
            world.notify_world_updates();
        }
        moved
    }
}

/// Serializable entity snapshot (state plus script)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityData {
    pub id: EntityId,
    pub name: String,
    pub position: Position,
    pub direction: Direction,
    pub script: Program,
}

impl From<&Entity> for EntityData {
    fn from(entity: &Entity) -> Self {
        let state = entity.state();
        Self {
            id: entity.id,
            name: entity.name.clone(),
            position: state.position,
            direction: state.direction,
            script: entity.script.clone(),
        }
    }
}

impl From<EntityData> for Entity {
    fn from(data: EntityData) -> Self {
        Entity {
            id: data.id,
            name: data.name,
            script: data.script,
            state: Mutex::new(EntityState {
                position: data.position,
                direction: data.direction,
            }),
        }
    }
}
