use std::io::{self, IsTerminal, Write};

use clap::Args;

use crate::cli_util::print_engine_error;
use crate::commands::{compile_or_report, load_source};
use crate::config;
use crate::engine::{Engine, StepControl};

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Print a step-by-step table of operations instead of performing I/O
    #[arg(short = 't', long = "trace")]
    pub trace: bool,

    /// Read program code from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Concatenated program code parts
    #[arg(value_name = "code", trailing_var_arg = true, allow_hyphen_values = true)]
    pub code: Vec<String>,

    /// Maximum executed instructions before abort (fallback BFC_MAX_STEPS; default unlimited)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<usize>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let RunArgs {
        trace,
        file,
        code,
        max_steps,
        ..
    } = args;

    if file.is_none() && code.is_empty() {
        usage_and_exit(program, 2);
    }

    if file.is_some() && !code.is_empty() {
        eprintln!("{program}: cannot use positional code together with --file");
        usage_and_exit(program, 2);
    }

    let source = match load_source(program, file.as_deref(), &code) {
        Ok(s) => s,
        Err(exit_code) => return exit_code,
    };

    let Some(ir) = compile_or_report(Some(program), &source) else {
        return 1;
    };

    let control = StepControl::new(config::resolve_max_steps(max_steps));
    let mut engine = Engine::new();
    let result = if trace {
        engine.trace_with_control(&ir, io::stdout().lock(), control)
    } else {
        engine.run_with_control(&ir, io::stdin().lock(), io::stdout().lock(), control)
    };

    let exit_code = match result {
        Ok(()) => 0,
        Err(err) => {
            print_engine_error(Some(program), &err);
            1
        }
    };

    // Program bytes pass through untouched when piped; a terminal gets a
    // trailing newline so the shell prompt starts at column 0.
    if io::stdout().is_terminal() {
        println!();
    }
    let _ = io::stdout().flush();
    exit_code
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [--trace|-t] [--max-steps N] "<code>"
  {0} run [--trace|-t] [--max-steps N] --file <PATH>

Options:
  --file,  -f <PATH>  Read program code from PATH instead of positional "<code>"
  --trace, -t         Print a step-by-step table of operations instead of performing I/O
  --max-steps <N>     Abort after N executed instructions (fallback BFC_MAX_STEPS)
  --help,  -h         Show this help

Notes:
- Input (`,`) reads a single byte from stdin; on EOF the current cell is set to 0.
- Characters outside of ><+-.,[] are comments and are ignored.
- Moving the pointer off either end of the 30,000-cell tape is an error.

Examples:
- Load a program from a file:
    {0} run --file ./program.bf
- Read bytes from a file as stdin (`,` will consume file input):
    {0} run ",[.,]" < input.txt
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
