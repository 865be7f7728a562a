//! Core type definitions for the puzzle world.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an entity.
///
/// The id survives `deep_clone`, so the copy of an entity in a reset or
/// copied world is the same logical bot as the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 2D position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Position one tile ahead in the given direction
    pub fn step(&self, dir: Direction) -> Self {
        let (dx, dy) = dir.to_delta();
        self.add(dx, dy)
    }

    /// Whether the position lies on a board of the given dimensions
    pub fn in_bounds(&self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.x < width && self.y >= 0 && self.y < height
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Facing direction of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// North is towards decreasing y, matching screen coordinates.
    pub fn to_delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    pub fn left(&self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    pub fn right(&self) -> Direction {
        self.left().left().left()
    }

    pub fn opposite(&self) -> Direction {
        self.left().left()
    }

    pub fn all() -> [Direction; 4] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ]
    }
}

/// One board tile: a height (stairs) and an optional lamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub height: i32,
    pub has_lamp: bool,
    pub lit: bool,
}

impl Tile {
    pub fn flat() -> Self {
        Self {
            height: 0,
            has_lamp: false,
            lit: false,
        }
    }

    pub fn raised(height: i32) -> Self {
        Self {
            height,
            has_lamp: false,
            lit: false,
        }
    }

    pub fn lamp(height: i32) -> Self {
        Self {
            height,
            has_lamp: true,
            lit: false,
        }
    }

    /// Toggle the lamp; returns false when the tile has none.
    pub fn toggle_lamp(&mut self) -> bool {
        if self.has_lamp {
            self.lit = !self.lit;
            true
        } else {
            false
        }
    }
}
