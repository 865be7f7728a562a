//! Configuration types for boards.

use serde::{Deserialize, Serialize};

/// Board construction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Width of the board in tiles
    pub width: i32,
    /// Height of the board in tiles
    pub height: i32,
    /// Delay between two instruction executions of an entity, in milliseconds
    pub default_delay_ms: u64,
    /// Whether execution starts in interactive (slowed) mode
    pub delayed: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            default_delay_ms: 100,
            delayed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BoardConfig::default();
        assert_eq!(config.width, 8);
        assert_eq!(config.height, 8);
        assert_eq!(config.default_delay_ms, 100);
        assert!(!config.delayed);
    }
}
