//! 2D tile board for the world.

use gridbot_core::{BoardConfig, Position, Tile};
use serde::{Deserialize, Serialize};

/// A bounded 2D board of tiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::flat(); size],
        }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(config.width, config.height)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.in_bounds(self.width, self.height)
    }

    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.in_bounds(pos)
            .then(|| &self.tiles[self.index(pos)])
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if self.in_bounds(pos) {
            let idx = self.index(pos);
            Some(&mut self.tiles[idx])
        } else {
            None
        }
    }

    /// Set the height of a tile; out-of-bounds positions are ignored
    pub fn set_height(&mut self, x: i32, y: i32, height: i32) {
        if let Some(tile) = self.get_mut(Position::new(x, y)) {
            tile.height = height;
        }
    }

    /// Place a lamp on a tile, keeping its current height
    pub fn add_lamp(&mut self, x: i32, y: i32) {
        if let Some(tile) = self.get_mut(Position::new(x, y)) {
            tile.has_lamp = true;
        }
    }

    /// Toggle the lamp at `pos`; returns false when there is none
    pub fn toggle_lamp(&mut self, pos: Position) -> bool {
        match self.get_mut(pos) {
            Some(tile) => tile.toggle_lamp(),
            None => false,
        }
    }

    /// Number of lamps currently switched on
    pub fn lit_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.lit).count()
    }

    /// Number of lamps on the board, lit or not
    pub fn lamp_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.has_lamp).count()
    }

    fn index(&self, pos: Position) -> usize {
        (pos.y * self.width + pos.x) as usize
    }
}
