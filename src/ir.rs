//! Run-length encoded intermediate representation.
//!
//! A [`Program`] is a flat list of [`Instruction`]s. Adjacent identical
//! arithmetic, move and I/O commands are coalesced into one instruction with a
//! repeat count. Loop brackets are never coalesced; each one carries the index
//! of its partner instead.

use std::fmt;
use std::ops::Index;

use crate::lexer::Token;

/// Operand of a loop-open whose close has not been seen yet.
const UNRESOLVED: usize = usize::MAX;

/// Instruction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Add,
    Sub,
    Right,
    Left,
    Output,
    Input,
    LoopOpen,
    LoopClose,
}

impl Op {
    pub fn as_char(self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Right => '>',
            Op::Left => '<',
            Op::Output => '.',
            Op::Input => ',',
            Op::LoopOpen => '[',
            Op::LoopClose => ']',
        }
    }
}

impl From<Token> for Op {
    fn from(token: Token) -> Self {
        match token {
            Token::Add => Op::Add,
            Token::Sub => Op::Sub,
            Token::Right => Op::Right,
            Token::Left => Op::Left,
            Token::Output => Op::Output,
            Token::Input => Op::Input,
            Token::LoopOpen => Op::LoopOpen,
            Token::LoopClose => Op::LoopClose,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One IR instruction.
///
/// For loop instructions `operand` is the index of the matching bracket;
/// for everything else it is a repeat count of at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub op: Op,
    pub operand: usize,
}

impl Instruction {
    pub fn new(op: Op, operand: usize) -> Self {
        Self { op, operand }
    }
}

/// A compiled program: the IR sequence shared by both back ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }
}

impl Index<usize> for Program {
    type Output = Instruction;

    fn index(&self, index: usize) -> &Instruction {
        &self.instructions[index]
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

/// Listing format, one instruction per line: `index op operand`.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, instr) in self.instructions.iter().enumerate() {
            writeln!(f, "{:<5} {} {}", i, instr.op, instr.operand)?;
        }
        Ok(())
    }
}

/// Build the IR from a token stream that has already passed
/// [`validate`](crate::validate::validate).
///
/// # Panics
///
/// Panics on a `]` with no pending `[`; balance is not re-checked here.
pub fn build(tokens: &[Token]) -> Program {
    let mut instructions: Vec<Instruction> = Vec::with_capacity(tokens.len());
    let mut pending: Vec<usize> = Vec::new();

    for &token in tokens {
        let op = Op::from(token);
        match op {
            Op::LoopOpen => {
                pending.push(instructions.len());
                instructions.push(Instruction::new(op, UNRESOLVED));
            }
            Op::LoopClose => {
                let here = instructions.len();
                let open = pending.pop().expect("validated bracket");
                instructions[open].operand = here;
                instructions.push(Instruction::new(op, open));
            }
            _ => match instructions.last_mut() {
                Some(last) if last.op == op => last.operand += 1,
                _ => instructions.push(Instruction::new(op, 1)),
            },
        }
    }

    debug_assert!(pending.is_empty(), "unresolved loop-open left after build");
    tracing::trace!(tokens = tokens.len(), instructions = instructions.len(), "built IR");

    Program { instructions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::filter;

    fn ir(code: &str) -> Program {
        build(filter(code.as_bytes()).tokens())
    }

    fn pairs(program: &Program) -> Vec<(Op, usize)> {
        program.iter().map(|i| (i.op, i.operand)).collect()
    }

    #[test]
    fn coalesces_adjacent_operators() {
        let program = ir("+++-->>><..,,,");
        assert_eq!(
            pairs(&program),
            vec![
                (Op::Add, 3),
                (Op::Sub, 2),
                (Op::Right, 3),
                (Op::Left, 1),
                (Op::Output, 2),
                (Op::Input, 3),
            ]
        );
    }

    #[test]
    fn coalescing_is_purely_adjacent() {
        let program = ir("+>+");
        assert_eq!(pairs(&program), vec![(Op::Add, 1), (Op::Right, 1), (Op::Add, 1)]);
    }

    #[test]
    fn comments_do_not_break_runs() {
        // Filtering happens first, so `+ +` is two adjacent tokens.
        let program = ir("+ comment +");
        assert_eq!(pairs(&program), vec![(Op::Add, 2)]);
    }

    #[test]
    fn loop_instructions_reference_each_other() {
        let program = ir("+[->+<]");
        assert_eq!(program[1], Instruction::new(Op::LoopOpen, 6));
        assert_eq!(program[6], Instruction::new(Op::LoopClose, 1));
    }

    #[test]
    fn nested_loops_pair_innermost_first() {
        let program = ir("[[]][]");
        assert_eq!(
            pairs(&program),
            vec![
                (Op::LoopOpen, 3),
                (Op::LoopOpen, 2),
                (Op::LoopClose, 1),
                (Op::LoopClose, 0),
                (Op::LoopOpen, 5),
                (Op::LoopClose, 4),
            ]
        );
    }

    #[test]
    fn pairing_is_bijective_and_well_nested() {
        let program = ir("++[>[-]<[>+<-]>[<+>-]<-]+[.]");
        for (i, instr) in program.iter().enumerate() {
            match instr.op {
                Op::LoopOpen => {
                    assert!(instr.operand > i);
                    assert_eq!(program[instr.operand], Instruction::new(Op::LoopClose, i));
                }
                Op::LoopClose => {
                    assert!(instr.operand < i);
                    assert_eq!(program[instr.operand], Instruction::new(Op::LoopOpen, i));
                }
                _ => assert!(instr.operand >= 1),
            }
        }
    }

    #[test]
    fn empty_token_stream_builds_empty_program() {
        assert!(ir("just words").is_empty());
    }

    #[test]
    fn listing_shows_index_op_operand() {
        let listing = ir("++[-]").to_string();
        assert_eq!(listing, "0     + 2\n1     [ 3\n2     - 1\n3     ] 1\n");
    }

    #[test]
    #[should_panic(expected = "validated bracket")]
    fn stray_close_panics() {
        ir("]");
    }
}
