//! Demo driver: runs a scripted bot across the "stairs" board.
//!
//! Pass a script file as the first argument to drive the bot yourself;
//! without one a built-in script climbs the stairs and lights the lamp.
//! Ctrl+C cancels the run cooperatively.

mod telemetry;

use anyhow::{Context, Result};
use gridbot_core::{BoardConfig, Direction, Position};
use gridbot_script::{parse_script, validate_program};
use gridbot_world::{Entity, ExecContext, World, WorldView};
use std::sync::Arc;
use tokio::signal;
use tokio::time::Duration;
use tracing::info;

const DEMO_SCRIPT: &str = "\
# climb the stairs, walk to the lamp, switch it on
forward
jump
jump
forward
right
forward
forward
forward
forward
forward
light
";

/// Logs every notification the world publishes
struct TraceView {
    world: Arc<World>,
}

impl WorldView for TraceView {
    fn world_has_moved(&self) {
        for entity in self.world.entities() {
            let state = entity.state();
            info!(
                entity = %entity.name(),
                position = %state.position,
                direction = ?state.direction,
                "moved"
            );
        }
    }

    fn world_has_changed(&self) {
        info!(count = self.world.entity_count(), "entity population changed");
    }
}

/// The stairs board: heights rising towards a lamp in the far corner
fn stairs_world() -> Arc<World> {
    let config = BoardConfig::default();
    let world = Arc::new(World::new("Mars", &config));
    {
        let mut grid = world.grid().write();
        grid.set_height(3, 2, 1);
        grid.set_height(4, 2, 2);
        for y in 2..8 {
            grid.set_height(5, y, 2);
        }
        grid.add_lamp(5, 7);
    }
    world
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_telemetry();

    let source = match std::env::args().nth(1) {
        Some(path) => {
            std::fs::read_to_string(&path).with_context(|| format!("reading script {path}"))?
        }
        None => DEMO_SCRIPT.to_string(),
    };
    let script = parse_script(&source).context("parsing script")?;
    validate_program(&script).context("validating script")?;

    let world = stairs_world();
    world.add_entity(Arc::new(Entity::new(
        "D2R2",
        Position::new(1, 2),
        Direction::East,
        script,
    )));

    let view = Arc::new(TraceView {
        world: world.clone(),
    });
    world.add_world_updates_listener(view.clone());
    world.add_entity_updates_listener(view);

    // Slow the run down so the log is watchable
    world.set_delay(250);
    world.do_delay();

    let ctx = ExecContext::new();
    let mut handles = Vec::new();
    world.run_entities(&ctx, &mut handles);

    let run = futures::future::join_all(handles);
    tokio::pin!(run);

    tokio::select! {
        _ = &mut run => {
            info!("all entities finished");
        }
        _ = signal::ctrl_c() => {
            info!("interrupted, cancelling entities");
            ctx.cancel();
            let _ = tokio::time::timeout(Duration::from_secs(5), &mut run).await;
        }
    }

    let lit = world.grid().read().lit_count();
    let lamps = world.grid().read().lamp_count();
    info!(lit, lamps, "run complete");
    if lit == lamps {
        info!("all lamps lit, puzzle solved");
    }

    Ok(())
}
