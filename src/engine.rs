//! Execution engine: walks a [`Program`] over a fixed-size byte tape.
//!
//! Features and behaviors:
//! - Tape of `N` cells (30,000 by default) initialized to 0; the size is a
//!   const generic, so it is chosen at build time.
//! - Strict pointer bounds: moving left of cell 0 or right past the last cell
//!   returns [`EngineError::TapeBounds`] and leaves the pointer where it was.
//! - Cell arithmetic wraps modulo 256 in both directions.
//! - Input reads one byte per repeat; on end-of-input the cell is set to 0.
//! - Output writes the raw cell byte once per repeat. Output already written
//!   when a run fails stays written.
//!
//! Quick start:
//!
//! ```no_run
//! use bfc::{compile, Engine};
//!
//! let program = compile(b"++++++++[>++++++++<-]>+.").expect("balanced brackets");
//! let mut engine = Engine::new();
//! engine.run(&program, std::io::stdin().lock(), std::io::stdout().lock()).expect("program should run");
//! ```

use std::io::{self, Read, Write};

use crate::error::EngineError;
use crate::ir::{Instruction, Op, Program};

/// Default number of tape cells.
pub const TAPE_SIZE: usize = 30_000;

/// Limits applied to a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepControl {
    /// Abort after this many executed instructions.
    pub max_steps: Option<usize>,
}

impl StepControl {
    pub fn new(max_steps: Option<usize>) -> Self {
        Self { max_steps }
    }
}

/// The tape, the data pointer, and the interpreter loop.
///
/// The engine keeps its tape between runs; call [`Engine::reset`] for a
/// fresh state.
#[derive(Debug, Clone)]
pub struct Engine<const N: usize = TAPE_SIZE> {
    memory: Vec<u8>,
    pointer: usize,
}

impl Engine {
    /// Create an engine with the default [`TAPE_SIZE`] tape.
    pub fn new() -> Self {
        Self::zeroed()
    }
}

impl<const N: usize> Default for Engine<N> {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<const N: usize> Engine<N> {
    /// Create an engine with an `N`-cell tape, every cell zero.
    pub fn zeroed() -> Self {
        const { assert!(N > 0, "tape must have at least one cell") };
        Self {
            memory: vec![0; N],
            pointer: 0,
        }
    }

    pub fn tape(&self) -> &[u8] {
        &self.memory
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Value of the cell under the data pointer.
    pub fn current_cell(&self) -> u8 {
        self.memory[self.pointer]
    }

    /// Zero the tape and move the pointer back to cell 0.
    pub fn reset(&mut self) {
        self.memory.fill(0);
        self.pointer = 0;
    }

    /// Execute `program` until the instruction pointer runs off the end.
    ///
    /// `,` reads from `input`, `.` writes to `output`.
    pub fn run<R: Read, W: Write>(
        &mut self,
        program: &Program,
        input: R,
        output: W,
    ) -> Result<(), EngineError> {
        self.run_with_control(program, input, output, StepControl::default())
    }

    /// Execute with an optional step limit.
    pub fn run_with_control<R: Read, W: Write>(
        &mut self,
        program: &Program,
        mut input: R,
        mut output: W,
        control: StepControl,
    ) -> Result<(), EngineError> {
        let result = self.execute(program, &mut input, &mut output, None, control);
        match result {
            Ok(()) => output.flush().map_err(|source| EngineError::Io {
                ip: program.len(),
                source,
            }),
            Err(e) => {
                // Keep whatever was written before the failure.
                let _ = output.flush();
                Err(e)
            }
        }
    }

    /// Trace-run the program, writing a step-by-step table to `out` instead
    /// of performing I/O. The tape and pointer advance exactly as in a real
    /// run, but:
    /// - `.` does not write anything; the action is logged instead
    /// - `,` does not read; end-of-input is simulated and the cell set to 0
    pub fn trace<T: Write>(&mut self, program: &Program, out: T) -> Result<(), EngineError> {
        self.trace_with_control(program, out, StepControl::default())
    }

    /// Trace-run with an optional step limit.
    pub fn trace_with_control<T: Write>(
        &mut self,
        program: &Program,
        mut out: T,
        control: StepControl,
    ) -> Result<(), EngineError> {
        write_trace_header(&mut out).map_err(|source| EngineError::Io { ip: 0, source })?;

        let result = self.execute(
            program,
            &mut io::empty(),
            &mut io::sink(),
            Some(&mut out as &mut dyn Write),
            control,
        );
        let _ = out.flush();
        result
    }

    fn execute<R: Read, W: Write>(
        &mut self,
        program: &Program,
        input: &mut R,
        output: &mut W,
        mut trace: Option<&mut dyn Write>,
        control: StepControl,
    ) -> Result<(), EngineError> {
        tracing::debug!(instructions = program.len(), tape = N, "run started");

        let mut ip: usize = 0;
        let mut step: usize = 0;

        while ip < program.len() {
            if let Some(max) = control.max_steps {
                if step >= max {
                    tracing::debug!(limit = max, ip, "step limit reached");
                    return Err(EngineError::StepLimitExceeded { limit: max });
                }
            }

            let Instruction { op, operand: count } = program[ip];
            let (ptr_before, cell_before) = (self.pointer, self.memory[self.pointer]);
            let mut action: Option<String> = if trace.is_some() { Some(String::new()) } else { None };
            let mut next = ip + 1;

            match op {
                Op::Right => {
                    if count >= N - self.pointer {
                        return Err(EngineError::TapeBounds { ip, ptr: self.pointer, op });
                    }
                    self.pointer += count;
                    if let Some(a) = action.as_mut() { *a = format!("Moved pointer head to index {}", self.pointer); }
                }
                Op::Left => {
                    if count > self.pointer {
                        return Err(EngineError::TapeBounds { ip, ptr: self.pointer, op });
                    }
                    self.pointer -= count;
                    if let Some(a) = action.as_mut() { *a = format!("Moved pointer head to index {}", self.pointer); }
                }
                Op::Add => {
                    let after = cell_before.wrapping_add((count % 256) as u8);
                    self.memory[self.pointer] = after;
                    if let Some(a) = action.as_mut() { *a = format!("Increment cell[{}] by {} from {} to {}", ptr_before, count, cell_before, after); }
                }
                Op::Sub => {
                    let after = cell_before.wrapping_sub((count % 256) as u8);
                    self.memory[self.pointer] = after;
                    if let Some(a) = action.as_mut() { *a = format!("Decrement cell[{}] by {} from {} to {}", ptr_before, count, cell_before, after); }
                }
                Op::Output => {
                    let byte = [cell_before];
                    for _ in 0..count {
                        output.write_all(&byte).map_err(|source| EngineError::Io { ip, source })?;
                    }
                    if let Some(a) = action.as_mut() { *a = format!("Output byte {} x{} (suppressed in trace)", cell_before, count); }
                }
                Op::Input => {
                    // Prompts written so far must be visible before blocking on input.
                    output.flush().map_err(|source| EngineError::Io { ip, source })?;
                    for _ in 0..count {
                        let byte = read_byte(input).map_err(|source| EngineError::Io { ip, source })?;
                        self.memory[self.pointer] = byte.unwrap_or(0);
                    }
                    if let Some(a) = action.as_mut() { *a = "Read byte -> simulated end-of-input (set cell to 0)".to_string(); }
                }
                Op::LoopOpen => {
                    if cell_before == 0 {
                        next = count + 1;
                        if let Some(a) = action.as_mut() { *a = format!("Cell is 0; jump past matching ']' at IP {}", count); }
                    } else if let Some(a) = action.as_mut() {
                        *a = "Enter loop (cell != 0)".to_string();
                    }
                }
                Op::LoopClose => {
                    next = count;
                    if let Some(a) = action.as_mut() { *a = format!("Jump back to matching '[' at IP {}", count); }
                }
            }

            if let Some(out) = trace.as_mut() {
                let instr = format!("{}{}", op, count);
                writeln!(
                    out,
                    "{:<4} | {:<3} | {:<3} | {:<4} | {:<5} | {}",
                    step,
                    ip,
                    ptr_before,
                    cell_before,
                    instr,
                    action.unwrap_or_default()
                )
                .map_err(|source| EngineError::Io { ip, source })?;
            }

            step += 1;
            ip = next;
        }

        tracing::debug!(steps = step, pointer = self.pointer, "run finished");
        Ok(())
    }
}

fn write_trace_header<T: Write>(out: &mut T) -> io::Result<()> {
    writeln!(out, "STEP | IP  | PTR | CELL | INSTR | ACTION")?;
    writeln!(out, "-----+-----+-----+------+-------+------------------------------------------------")
}

/// Read exactly one byte, `None` on end-of-input.
fn read_byte<R: Read>(input: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
