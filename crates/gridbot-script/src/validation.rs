//! Validation for entity scripts.

use crate::instruction::Instruction;
use crate::program::Program;
use gridbot_core::{Error, Result};

/// Validate that a program is well-formed.
///
/// Checks that the program is non-empty, procedure names are unique and
/// non-empty, and every `call` targets a defined procedure. Call cycles are
/// allowed here; the interpreter bounds call depth at run time.
pub fn validate_program(program: &Program) -> Result<()> {
    if program.is_empty() {
        return Err(Error::Validation("program has no instructions".to_string()));
    }

    for proc in &program.procedures {
        if proc.name.is_empty() {
            return Err(Error::Validation("procedure with empty name".to_string()));
        }
        let occurrences = program
            .procedures
            .iter()
            .filter(|p| p.name == proc.name)
            .count();
        if occurrences > 1 {
            return Err(Error::Validation(format!(
                "procedure '{}' defined {} times",
                proc.name, occurrences
            )));
        }
    }

    let all_blocks = std::iter::once(&program.main)
        .chain(program.procedures.iter().map(|p| &p.body));
    for block in all_blocks {
        for inst in block {
            if let Instruction::Call(name) = inst {
                if program.procedure(name).is_none() {
                    return Err(Error::Validation(format!(
                        "call to undefined procedure '{}'",
                        name
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::Procedure;

    #[test]
    fn test_validate_empty_program() {
        assert!(validate_program(&Program::new()).is_err());
    }

    #[test]
    fn test_validate_undefined_call() {
        let program = Program::with_main(vec![Instruction::Call("nope".to_string())]);
        assert!(validate_program(&program).is_err());
    }

    #[test]
    fn test_validate_duplicate_procedure() {
        let mut program = Program::with_main(vec![Instruction::Forward]);
        program.add_procedure(Procedure::with_body("a", vec![Instruction::Left]));
        program.add_procedure(Procedure::with_body("a", vec![Instruction::Right]));
        assert!(validate_program(&program).is_err());
    }

    #[test]
    fn test_validate_valid_program() {
        let mut program = Program::with_main(vec![
            Instruction::Forward,
            Instruction::Call("climb".to_string()),
        ]);
        program.add_procedure(Procedure::with_body("climb", vec![Instruction::Jump]));
        assert!(validate_program(&program).is_ok());
    }

    #[test]
    fn test_validate_allows_recursion() {
        // Bounded at run time, not here
        let mut program = Program::with_main(vec![Instruction::Call("loop".to_string())]);
        program.add_procedure(Procedure::with_body(
            "loop",
            vec![Instruction::Forward, Instruction::Call("loop".to_string())],
        ));
        assert!(validate_program(&program).is_ok());
    }
}
