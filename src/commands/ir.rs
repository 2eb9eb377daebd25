use std::io::{self, Write};

use clap::Args;

use crate::commands::{compile_or_report, load_source};

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct IrArgs {
    /// Read program code from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Concatenated program code parts
    #[arg(value_name = "code", trailing_var_arg = true, allow_hyphen_values = true)]
    pub code: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: IrArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let IrArgs { file, code, .. } = args;

    if file.is_none() == code.is_empty() {
        usage_and_exit(program, 2);
    }

    let source = match load_source(program, file.as_deref(), &code) {
        Ok(s) => s,
        Err(exit_code) => return exit_code,
    };

    let Some(ir) = compile_or_report(Some(program), &source) else {
        return 1;
    };

    print!("{ir}");
    let _ = io::stdout().flush();
    0
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} ir "<code>"
  {0} ir --file <PATH>

Options:
  --file,  -f <PATH>  Read program code from PATH instead of positional "<code>"
  --help,  -h         Show this help

Description:
  Prints the compiled instruction list, one per line: INDEX OP OPERAND.
  For loop brackets the operand is the index of the matching bracket;
  otherwise it is the repeat count.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
