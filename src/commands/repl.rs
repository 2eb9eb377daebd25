use std::env;
use std::io::{self, IsTerminal, Write};

use clap::Args;

use crate::repl::repl_loop;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct ReplArgs {
    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

// Public entry point for the REPL from main.rs
pub fn run(program: &str, args: ReplArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    // Install SIGINT (ctrl+c) handler to exit(0) immediately. It must not
    // touch stdout: the session may be blocked holding that lock.
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stderr().flush();
        std::process::exit(0);
    }) {
        eprintln!("{program}: failed to set ctrl+c handler: {e}");
        let _ = io::stderr().flush();
        return 1;
    }

    // Prompts and banners only when a person is typing
    let interactive = io::stdin().is_terminal();
    if interactive {
        eprintln!("Brainfuck REPL");
        eprintln!("Enter runs the current line. Ctrl+d exits, ctrl+c exits immediately");
        let _ = io::stderr().flush();
    }

    // Test hook: if BFC_REPL_ONCE=1, exit after one execution
    let once = env::var("BFC_REPL_ONCE").ok().as_deref() == Some("1");

    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout();
    match repl_loop(&mut stdin, &mut stdout, interactive, once) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{program}: REPL error: {e}");
            let _ = io::stderr().flush();
            1
        }
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} repl   # Start a line-by-line REPL

Options:
  --help,   -h        Show this help

Description:
  Reads one line at a time, checks its brackets, and runs it.

Notes:
    - Each line starts with a fresh tape and pointer.
    - `,` reads from the same input the lines come from.
    - A newline is printed after each execution for readability.
    - Ctrl+d ends the session; ctrl+c exits immediately.
    - The REPL exits after a single execution if `BFC_REPL_ONCE` is set to `1`.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
