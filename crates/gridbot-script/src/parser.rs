//! Line-oriented parser for the text script format.
//!
//! One instruction per line. `#` starts a comment, blank lines are skipped.
//! Procedures are declared with `proc <name>` and closed with `end`:
//!
//! ```text
//! # climb the stairs and switch the lamp on
//! proc climb
//!   jump
//!   jump
//! end
//! forward
//! call climb
//! light
//! ```

use crate::instruction::Instruction;
use crate::program::{Procedure, Program};
use gridbot_core::{Error, Result};

/// Parse a text script into a [`Program`].
///
/// Errors carry the 1-based line number of the offending line.
pub fn parse_script(source: &str) -> Result<Program> {
    let mut program = Program::new();
    let mut current_proc: Option<Procedure> = None;

    for (idx, raw_line) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let mut words = line.split_whitespace();
        let keyword = words.next().unwrap_or_default();
        let arg = words.next();

        if words.next().is_some() {
            return Err(parse_error(line_no, format!("trailing input after '{}'", keyword)));
        }

        match keyword {
            "proc" => {
                if current_proc.is_some() {
                    return Err(parse_error(line_no, "nested 'proc' is not allowed"));
                }
                let name = arg
                    .ok_or_else(|| parse_error(line_no, "'proc' requires a name"))?;
                current_proc = Some(Procedure::new(name));
            }
            "end" => {
                if arg.is_some() {
                    return Err(parse_error(line_no, "'end' takes no argument"));
                }
                let proc = current_proc
                    .take()
                    .ok_or_else(|| parse_error(line_no, "'end' outside of a procedure"))?;
                program.add_procedure(proc);
            }
            _ => {
                let inst = parse_instruction(keyword, arg, line_no)?;
                match current_proc.as_mut() {
                    Some(proc) => proc.body.push(inst),
                    None => program.main.push(inst),
                }
            }
        }
    }

    if let Some(proc) = current_proc {
        return Err(Error::Parse {
            line: source.lines().count(),
            message: format!("procedure '{}' is missing its 'end'", proc.name),
        });
    }

    Ok(program)
}

fn parse_instruction(keyword: &str, arg: Option<&str>, line_no: usize) -> Result<Instruction> {
    let inst = match keyword {
        "forward" => Instruction::Forward,
        "backward" => Instruction::Backward,
        "left" => Instruction::Left,
        "right" => Instruction::Right,
        "jump" => Instruction::Jump,
        "light" => Instruction::ToggleLight,
        "call" => {
            let name = arg
                .ok_or_else(|| parse_error(line_no, "'call' requires a procedure name"))?;
            return Ok(Instruction::Call(name.to_string()));
        }
        other => {
            return Err(parse_error(line_no, format!("unknown instruction '{}'", other)));
        }
    };

    if arg.is_some() {
        return Err(parse_error(line_no, format!("'{}' takes no argument", keyword)));
    }
    Ok(inst)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        line,
        message: message.into(),
    }
}
