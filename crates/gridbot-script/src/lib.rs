//! Script model for entity programs.
//!
//! Learners drive their bots with small text scripts: a main instruction
//! sequence plus optional named procedures. This crate defines the in-memory
//! representation, a line-oriented parser, and structural validation. The
//! interpreter itself lives with the entities, next to the state it mutates.

pub mod instruction;
pub mod parser;
pub mod program;
pub mod validation;

pub use instruction::Instruction;
pub use parser::parse_script;
pub use program::{Procedure, Program};
pub use validation::validate_program;
