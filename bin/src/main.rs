use std::{
    io::{stdin, stdout, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{error::ErrorKind, Parser};

use interpreter::{Config, InterpretError, Interpreter};

/// Exit status for input that failed to compile or evaluate.
const EX_DATAERR: u8 = 64;

#[derive(clap::Parser)]
#[command(version, about)]
struct Args {
    /// Script to run. Starts an interactive prompt when omitted.
    file: Option<PathBuf>,

    /// Print the parsed tree before the value (always on in the prompt).
    #[arg(long)]
    ast: bool,

    /// Reject inputs that scan to more than this many tokens.
    #[arg(long, value_name = "N")]
    max_tokens: Option<usize>,
}

impl Args {
    fn config(&self) -> Config {
        Config { print_ast: self.ast || self.file.is_none(), max_tokens: self.max_tokens }
    }
}

fn run_file(path: PathBuf, interpreter: &Interpreter) -> anyhow::Result<ExitCode> {
    let source = std::fs::read_to_string(path)?;
    match interpreter.run_source(&source, &mut stdout()) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(InterpretError::Io(e)) => Err(e.into()),
        Err(e) => {
            eprintln!("{}", e);
            Ok(ExitCode::from(EX_DATAERR))
        }
    }
}

fn run_prompt(
    interpreter: &Interpreter,
    mut input: impl BufRead,
    output: &mut impl Write,
    errors: &mut impl Write,
) -> anyhow::Result<()> {
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output, "Done.")?;
            return Ok(());
        }

        let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
        match interpreter.run_source(line, output) {
            Ok(value) => log::debug!("Evaluated to {:?}", value),
            Err(InterpretError::Io(e)) => return Err(e.into()),
            Err(e) => writeln!(errors, "{}", e)?,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let interpreter = Interpreter::new(args.config());
    log::debug!("Running with {:?}", interpreter.config());

    match args.file {
        Some(file) => run_file(file, &interpreter),
        None => {
            run_prompt(&interpreter, stdin().lock(), &mut stdout(), &mut std::io::stderr())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn prompt(input: &str) -> (String, String) {
        let mut output = Vec::new();
        let mut errors = Vec::new();
        let interpreter = Interpreter::new(Config { print_ast: true, ..Default::default() });
        run_prompt(&interpreter, input.as_bytes(), &mut output, &mut errors).unwrap();
        (String::from_utf8(output).unwrap(), String::from_utf8(errors).unwrap())
    }

    #[test]
    fn prompt_prints_tree_and_value() {
        let (output, errors) = prompt("1 + 2\n\"a\" + \"b\"\n");
        assert_eq!(output, "> (+ 1.000 2.000)\n3.000\n> (+ a b)\nab\n> Done.\n");
        assert_eq!(errors, "");
    }

    #[test]
    fn prompt_continues_after_errors() {
        let (output, errors) = prompt("(1\n-nil\n2 * 3");
        assert_eq!(output, "> > (- nil)\n> (* 2.000 3.000)\n6.000\n> Done.\n");
        assert_eq!(
            errors,
            "[line 1] Error at end: Expect ')' after expression.\n\
             [line 1] Error: Operand of unary '-' must be a number, got nil.\n"
        );
    }

    #[test]
    fn errors_stay_on_the_input_line() {
        let (_, errors) = prompt("1 +\r\n\"open\n");
        assert_eq!(
            errors,
            "[line 1] Error at end: Expected literal.\n\
             [line 1] Error: Unterminated string.\n"
        );
    }

    #[test]
    fn arguments() {
        let args = Args::try_parse_from(["loxc"]).unwrap();
        assert_eq!(args.config(), Config { print_ast: true, max_tokens: None });

        let args = Args::try_parse_from(["loxc", "script.lox", "--max-tokens", "10"]).unwrap();
        assert_eq!(args.config(), Config { print_ast: false, max_tokens: Some(10) });

        let args = Args::try_parse_from(["loxc", "--ast", "script.lox"]).unwrap();
        assert!(args.config().print_ast);

        let error = Args::try_parse_from(["loxc", "a.lox", "b.lox"]).err().unwrap();
        assert_eq!(error.kind(), ErrorKind::UnknownArgument);
    }
}
