//! Instruction set for entity scripts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One scripted step of an entity.
///
/// Movement instructions are relative to the entity's facing direction.
/// `Call` invokes a named procedure defined in the same program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Step one tile forward onto a tile of equal height
    Forward,
    /// Step one tile backward onto a tile of equal height
    Backward,
    /// Turn 90 degrees counterclockwise
    Left,
    /// Turn 90 degrees clockwise
    Right,
    /// Step forward onto a tile exactly one higher, or any amount lower
    Jump,
    /// Toggle the lamp on the current tile, if any
    ToggleLight,
    /// Invoke a named procedure
    Call(String),
}

impl Instruction {
    /// Keyword used in the text script format
    pub fn keyword(&self) -> &str {
        match self {
            Instruction::Forward => "forward",
            Instruction::Backward => "backward",
            Instruction::Left => "left",
            Instruction::Right => "right",
            Instruction::Jump => "jump",
            Instruction::ToggleLight => "light",
            Instruction::Call(_) => "call",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Call(name) => write!(f, "call {}", name),
            other => write!(f, "{}", other.keyword()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Instruction::Forward.to_string(), "forward");
        assert_eq!(Instruction::ToggleLight.to_string(), "light");
        assert_eq!(Instruction::Call("f1".to_string()).to_string(), "call f1");
    }
}
