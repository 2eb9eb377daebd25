use std::env;
use std::io::{self, Write};

use bfc::commands::{check, emit, ir, repl, run};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

fn print_top_usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run   [--trace|-t] "<code>"      # Run code (args are concatenated)
  {0} run   [--trace|-t] --file <PATH> # Run code loaded from file
  {0} check [--file <PATH>] ["<code>"] # Check bracket balance only
  {0} ir    [--file <PATH>] ["<code>"] # Print the compiled instruction list
  {0} emit  [--target c|rust] <FILE>   # Translate FILE to C or Rust source
  {0} repl                             # Start a line-by-line REPL

Run "{0} <subcommand> --help" for more info.
Set BFC_LOG=debug to see what the compiler is doing.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(name = "bfc", disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    Run(run::RunArgs),
    Check(check::CheckArgs),
    Ir(ir::IrArgs),
    Emit(emit::EmitArgs),
    Repl(repl::ReplArgs),
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("BFC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn main() {
    init_logging();

    // We still pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("bfc"));

    let cli = Cli::parse();

    if cli.help {
        print_top_usage_and_exit(&program, 0);
    }
    let Some(command) = cli.command else {
        print_top_usage_and_exit(&program, 2);
    };

    let code = match command {
        Command::Run(args) => run::run(&program, args),
        Command::Check(args) => check::run(&program, args),
        Command::Ir(args) => ir::run(&program, args),
        Command::Emit(args) => emit::run(&program, args),
        Command::Repl(args) => repl::run(&program, args),
    };

    std::process::exit(code);
}
