//! Program structure for entity scripts.

use crate::instruction::Instruction;
use serde::{Deserialize, Serialize};

/// A named procedure: a reusable sequence of instructions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    pub name: String,
    pub body: Vec<Instruction>,
}

impl Procedure {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Vec::new(),
        }
    }

    pub fn with_body(name: impl Into<String>, body: Vec<Instruction>) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// A complete entity script: main sequence plus named procedures
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub main: Vec<Instruction>,
    pub procedures: Vec<Procedure>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_main(main: Vec<Instruction>) -> Self {
        Self {
            main,
            procedures: Vec::new(),
        }
    }

    pub fn add_procedure(&mut self, proc: Procedure) {
        self.procedures.push(proc);
    }

    pub fn procedure(&self, name: &str) -> Option<&Procedure> {
        self.procedures.iter().find(|p| p.name == name)
    }

    /// Count instructions across the main sequence and all procedures
    pub fn instruction_count(&self) -> usize {
        self.main.len() + self.procedures.iter().map(|p| p.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.instruction_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_lookup() {
        let mut program = Program::with_main(vec![Instruction::Forward]);
        program.add_procedure(Procedure::with_body(
            "climb",
            vec![Instruction::Jump, Instruction::Jump],
        ));

        assert!(program.procedure("climb").is_some());
        assert!(program.procedure("descend").is_none());
        assert_eq!(program.instruction_count(), 3);
    }

    #[test]
    fn test_empty_program() {
        assert!(Program::new().is_empty());
        assert!(!Program::with_main(vec![Instruction::Left]).is_empty());
    }
}
