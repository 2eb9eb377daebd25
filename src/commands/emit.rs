use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Args;

use crate::codegen::{output_path, CodeGenerator, TargetKind};
use crate::commands::{compile_or_report, load_source};
use crate::config;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct EmitArgs {
    /// Source file to translate
    #[arg(value_name = "FILE")]
    pub file: Option<String>,

    /// Target language (fallback: config file; default c)
    #[arg(long = "target", value_enum)]
    pub target: Option<TargetKind>,

    /// Write to PATH instead of FILE with its extension replaced
    #[arg(short = 'o', long = "output", conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Write the generated source to stdout
    #[arg(long = "stdout")]
    pub stdout: bool,

    /// Spaces per nesting level (fallback BFC_INDENT, then config file; default 4)
    #[arg(long = "indent", value_name = "N")]
    pub indent: Option<usize>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: EmitArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let EmitArgs {
        file,
        target,
        output,
        stdout,
        indent,
        ..
    } = args;

    let Some(file) = file else {
        usage_and_exit(program, 2);
    };

    let source = match load_source(program, Some(file.as_str()), &[]) {
        Ok(s) => s,
        Err(exit_code) => return exit_code,
    };

    if source.is_empty() {
        eprintln!("{program}: file is empty ({file})");
        let _ = io::stderr().flush();
        return 1;
    }

    let Some(ir) = compile_or_report(Some(program), &source) else {
        return 1;
    };

    let target = config::resolve_target(target);
    let generated = CodeGenerator::for_kind(target)
        .with_indent(config::resolve_indent(indent))
        .generate(&ir);

    if stdout {
        print!("{generated}");
        let _ = io::stdout().flush();
        return 0;
    }

    let dest = output.unwrap_or_else(|| output_path(Path::new(&file), target));
    if let Err(e) = fs::write(&dest, generated) {
        eprintln!("{program}: failed to write {}: {e}", dest.display());
        let _ = io::stderr().flush();
        return 1;
    }

    tracing::info!(path = %dest.display(), "wrote generated source");
    println!("{} written successfully.", dest.display());
    let _ = io::stdout().flush();
    0
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} emit [--target c|rust] [--indent N] <FILE>
  {0} emit [--target c|rust] [--indent N] --output <PATH> <FILE>
  {0} emit [--target c|rust] [--indent N] --stdout <FILE>

Options:
  --target <LANG>      Target language: c (default) or rust
  --output, -o <PATH>  Write to PATH (default: FILE with the target's extension)
  --stdout             Print the generated source instead of writing a file
  --indent <N>         Spaces per nesting level (default 4)
  --help,   -h         Show this help

Description:
  Translates a program into equivalent C or Rust source. Adjacent repeated
  commands become a single statement; loops become while loops.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
