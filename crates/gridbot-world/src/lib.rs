//! The concurrent entity-execution engine.
//!
//! A [`World`] owns a shared mutable [`Grid`] and a collection of scripted
//! [`Entity`] instances. [`World::run_entities`] starts one task per entity;
//! each task interprets its entity's script, mutating shared state and
//! publishing progress notifications to registered [`WorldView`] observers at
//! a pace the user controls.
//!
//! # Consistency contract
//!
//! Entities run concurrently with no transactional consistency between them.
//! The grid and each entity's state are individually locked for data-race
//! freedom, but two entities interleave freely between instructions. Lessons
//! are expected to keep entities on disjoint or loosely-coupled regions of
//! the board; this weak-consistency model is deliberate and is part of the
//! engine's teaching semantics.

pub mod entity;
pub mod exec;
pub mod grid;
pub mod persist;
pub mod view;
pub mod world;

pub use entity::{Entity, EntityData, EntityState};
pub use exec::{ExecContext, StatusBoard};
pub use grid::Grid;
pub use persist::{JsonBoardCodec, NoopCodec, WorldCodec};
pub use view::WorldView;
pub use world::World;
