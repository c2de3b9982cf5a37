//! The interactive shell. Reads one command per line, hands it to a `Session`, and renders what
//! comes back.
//!
//!   vonneumann [--max-steps N] [--step] [FILE]
//!
//! `FILE` is a script of commands run before the prompt appears. With `--step` the shell pauses
//! after every executed instruction until Enter is pressed.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process;

use vonneumann::catalog;
use vonneumann::{
  parse_command, parse_script, Command, Error, Response, RunConfig, Session, StepRecord,
  DEFAULT_MAX_STEPS
};

struct Options {
  max_steps : usize,
  pace      : bool,
  script    : Option<String>,
}

fn parse_args<I>(args: I) -> Result<Options, String>
  where I: Iterator<Item = String>
{
  let mut options = Options { max_steps: DEFAULT_MAX_STEPS, pace: false, script: None };
  let mut args = args;

  while let Some(arg) = args.next() {
    match arg.as_str() {
      "--step"      => options.pace = true,
      "--max-steps" => {
        let value = args.next().ok_or("--max-steps needs a number")?;
        options.max_steps = value.parse()
                                 .map_err(|_| format!("`{}` is not a step count", value))?;
      }
      _ if arg.starts_with("--") => return Err(format!("unknown option {}", arg)),
      _             => options.script = Some(arg),
    }
  }
  Ok(options)
}

fn print_help() {
  println!("Instructions (appended at the load cursor):");
  println!("  LOAD a | ADD a | SUB a | STORE a | JMP a | JZ a | PRINT | NOP | HALT");
  println!("Memory:");
  println!("  <address> <integer>     write a value into a cell");
  println!("  <address> <name>        label a cell");
  println!("  {:<23} load an example program", catalog::names().collect::<Vec<_>>().join(" | "));
  println!("Shell:");
  println!("  run | clear | mem | list | isa | help | quit");
}

fn wait_for_enter() {
  print!("  [Enter] ");
  let _ = io::stdout().flush();
  let mut line = String::new();
  let _ = io::stdin().read_line(&mut line);
}

fn dispatch(session: &mut Session, command: Command, pace: bool) {
  let result = session.execute(command, |record: &StepRecord| {
    if pace {
      println!("{}", record);
      wait_for_enter();
    }
  });

  match result {
    Ok(Response::Loaded(message)) => println!("{}", message),
    Ok(Response::Ran(report))     => print!("{}", report),
    Ok(Response::Show(table))     => print!("{}", table),
    Err(error @ Error::UnknownExample(_)) => {
      println!("Error: {}; try one of: {}", error, catalog::names().collect::<Vec<_>>().join(", "))
    }
    Err(error)                    => println!("Error: {}", error),
  }
}

fn main() {
  let options = match parse_args(env::args().skip(1)) {
    Ok(options) => options,
    Err(message) => {
      eprintln!("{}", message);
      eprintln!("usage: vonneumann [--max-steps N] [--step] [FILE]");
      process::exit(2);
    }
  };

  let mut session = Session::new(RunConfig::default().with_max_steps(options.max_steps));

  if let Some(path) = &options.script {
    match fs::read_to_string(path) {
      Ok(text) => {
        for (line, parsed) in parse_script(&text) {
          match parsed {
            Ok(command) => dispatch(&mut session, command, options.pace),
            Err(error)  => println!("{}:{}: {}", path, line, error),
          }
        }
      }
      Err(error) => {
        eprintln!("cannot read {}: {}", path, error);
        process::exit(1);
      }
    }
  }

  println!("von Neumann machine, {} cells. Type `help` for commands.", vonneumann::MEM_SIZE);
  loop {
    print!("[{:>2}]> ", session.cursor());
    let _ = io::stdout().flush();

    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
      Ok(0) | Err(_) => break,
      Ok(_)          => {}
    }

    match line.trim() {
      "quit" | "exit" => break,
      "help"          => print_help(),
      text            => {
        match parse_command(text) {
          Ok(Some(command)) => dispatch(&mut session, command, options.pace),
          Ok(None)          => {}
          Err(error)        => println!("Error: {}", error),
        }
      }
    }
  }
}
