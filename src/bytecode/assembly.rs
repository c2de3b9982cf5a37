/*!
  The human readable textual form of the load and run surfaces. One line holds one command:

  ```text
  LOAD 8        # append an instruction at the load cursor
  PRINT
  10 42         # write 42 into mem[10]
  10 result     # label mem[10] as "result"
  suma          # load an example program, or a shell verb such as `run`
  ```

  A line starting with an integer addresses a cell directly; whether it writes data or a label
  depends only on whether the second token is an integer. A word starting with an uppercase letter
  is a mnemonic. Any other word must be a shell verb or the name of an example program. Comments begin
  with `#` or `;`.

  Mnemonics are not validated here. `Opcode::encode` is the single place that decides whether
  a word names an instruction, so a misspelled mnemonic is reported as such by the loader.
*/

use nom::{
  branch::alt,
  bytes::complete::tag,
  character::complete::{
    alpha1,
    alphanumeric1,
    char as one_char,
    digit1,
    one_of,
    space0,
    space1
  },
  combinator::{all_consuming, map, map_res, opt, recognize, rest, value},
  error::ErrorKind,
  multi::many0,
  sequence::{delimited, pair, preceded},
  IResult
};

use crate::catalog;
use crate::error::{Error, Result};
use crate::memory::Word;

/// A parsed shell command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
  /// Append an instruction at the load cursor.
  Append {
    mnemonic : String,
    operand  : Option<Word>
  },
  /// Write a raw value into a cell.
  Write {
    address : Word,
    value   : Word
  },
  /// Attach a label to a cell.
  Label {
    address : Word,
    name    : String
  },
  /// Replace memory with one of the canned programs.
  Example(String),
  Run,
  Clear,
  /// Show the memory table.
  Memory,
  /// Show the disassembly of memory.
  List,
  /// Show the instruction set.
  Isa,
}

// Syntax of a line before words are classified.
enum Syntax<'a> {
  Cell {
    address : Word,
    value   : CellValue<'a>
  },
  Word {
    word    : &'a str,
    operand : Option<Word>
  }
}

enum CellValue<'a> {
  Integer(Word),
  Identifier(&'a str)
}

type ParseResult<'a, O> = IResult<&'a str, O, (&'a str, ErrorKind)>;

fn integer(input: &str) -> ParseResult<'_, Word> {
  map_res(
    recognize(pair(opt(one_char('-')), digit1)),
    |text: &str| text.parse::<Word>()
  )(input)
}

fn identifier(input: &str) -> ParseResult<'_, &str> {
  recognize(
    pair(
      alt((alpha1, tag("_"))),
      many0(alt((alphanumeric1, tag("_"))))
    )
  )(input)
}

fn comment(input: &str) -> ParseResult<'_, ()> {
  value((), pair(one_of("#;"), rest))(input)
}

fn cell_syntax(input: &str) -> ParseResult<'_, Syntax<'_>> {
  let (input, address) = integer(input)?;
  let (input, _)       = space1(input)?;
  let (input, value)   = alt((
    map(integer, CellValue::Integer),
    map(identifier, CellValue::Identifier)
  ))(input)?;

  Ok((input, Syntax::Cell { address, value }))
}

fn word_syntax(input: &str) -> ParseResult<'_, Syntax<'_>> {
  let (input, word)    = identifier(input)?;
  let (input, operand) = opt(preceded(space1, integer))(input)?;

  Ok((input, Syntax::Word { word, operand }))
}

fn line_syntax(input: &str) -> ParseResult<'_, Option<Syntax<'_>>> {
  all_consuming(
    delimited(
      space0,
      opt(alt((cell_syntax, word_syntax))),
      pair(space0, opt(comment))
    )
  )(input)
}

fn classify(syntax: Syntax, text: &str) -> Result<Command> {
  match syntax {

    Syntax::Cell { address, value: CellValue::Integer(value) } => {
      Ok(Command::Write { address, value })
    }

    Syntax::Cell { address, value: CellValue::Identifier(name) } => {
      Ok(Command::Label { address, name: name.to_string() })
    }

    Syntax::Word { word, operand } if word.starts_with(|c: char| c.is_ascii_uppercase()) => {
      Ok(Command::Append { mnemonic: word.to_string(), operand })
    }

    Syntax::Word { operand: Some(_), .. } => {
      Err(Error::UnrecognizedCommand(text.to_string()))
    }

    Syntax::Word { word, operand: None } => {
      let command = match word {
        "run"   => Command::Run,
        "clear" => Command::Clear,
        "mem"   => Command::Memory,
        "list"  => Command::List,
        "isa"   => Command::Isa,
        name if catalog::find(name).is_some() => Command::Example(name.to_string()),
        _       => return Err(Error::UnrecognizedCommand(text.to_string()))
      };
      Ok(command)
    }

  }
}

/// Parses one line of input. Blank lines and lines holding only a comment are `Ok(None)`.
pub fn parse_command(text: &str) -> Result<Option<Command>> {
  let text = text.trim();
  match line_syntax(text) {
    Ok((_rest, Some(syntax))) => classify(syntax, text).map(Some),
    Ok((_rest, None))         => Ok(None),
    Err(_e)                   => Err(Error::UnrecognizedCommand(text.to_string()))
  }
}

/// Parses a script of commands, one per line. Each result is paired with its 1-based line number
/// so that the caller can report errors where they occur; blank lines are skipped.
pub fn parse_script(text: &str) -> Vec<(usize, Result<Command>)> {
  text
    .lines()
    .enumerate()
    .filter_map(|(i, line)| {
      match parse_command(line) {
        Ok(Some(command)) => Some((i + 1, Ok(command))),
        Ok(None)          => None,
        Err(e)            => Some((i + 1, Err(e)))
      }
    })
    .collect()
}
