//! The step trace: one record per executed instruction, and the report of a whole run.

use std::fmt::{Display, Formatter};

use prettytable::Table;

use crate::address::{Address, AddressNumberType};
use crate::bytecode::Opcode;
use crate::error::Error;
use crate::memory::{Snapshot, Word, TABLE_DISPLAY_FORMAT};

/// The state of the machine right after one instruction executed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StepRecord {
  /// Address the instruction was fetched from.
  pub pc          : AddressNumberType,
  /// The raw contents of `mem[pc]`.
  pub code        : Word,
  /// `None` only for the record of an unknown instruction.
  pub opcode      : Option<Opcode>,
  pub operand     : Option<Address>,
  pub acc         : Word,
  pub z           : bool,
  pub description : String,
  /// The value written by `PRINT`.
  pub output      : Option<Word>,
}

impl StepRecord {
  pub fn opcode_name(&self) -> String {
    match self.opcode {
      Some(opcode) => opcode.to_string(),
      None         => format!("?{}", self.code)
    }
  }
}

impl Display for StepRecord {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let operand = match self.operand {
      Some(address) => format!(" {}", address.idx()),
      None          => String::new()
    };
    write!(
      f,
      "PC: {:>2} | {}{} | {} | ACC: {} Z: {}",
      self.pc, self.opcode_name(), operand, self.description, self.acc, self.z as u8
    )
  }
}

/// How a run ended.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Termination {
  /// A `HALT` instruction executed.
  Halted,
  /// An invalid address was met. The run ended without recording the offending step.
  AbortedFatal(Error),
  /// The cell at PC did not hold an opcode.
  StoppedUnknownOpcode,
  /// The step guard was reached before the program stopped.
  GuardExpired,
}

impl Display for Termination {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Termination::Halted               => write!(f, "halted"),
      Termination::AbortedFatal(error)  => write!(f, "aborted: {}", error),
      Termination::StoppedUnknownOpcode => write!(f, "stopped on an unknown instruction"),
      Termination::GuardExpired         => write!(f, "step limit reached"),
    }
  }
}

/// Everything a run produced. Memory itself is wiped when the run ends, so the report carries a
/// snapshot of memory as the program left it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunReport {
  pub trace       : Vec<StepRecord>,
  pub termination : Termination,
  pub memory      : Snapshot,
}

impl RunReport {
  /// The values printed by the program, in order.
  pub fn output(&self) -> Vec<Word> {
    self.trace.iter().filter_map(|record| record.output).collect()
  }

  pub fn is_fatal(&self) -> bool {
    match self.termination {
      Termination::AbortedFatal(_) => true,
      _                            => false
    }
  }

  /// The unrecoverable error that ended the run, if there was one.
  pub fn fatal_error(&self) -> Option<&Error> {
    match &self.termination {
      Termination::AbortedFatal(error) => Some(error),
      _                                => None
    }
  }

  // region Display methods

  /// The summary table of the trace, one row per step.
  pub fn make_trace_table(&self) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(
      row![ubr->"Step", ubr->"PC", ubl->"Instruction", ubr->"ACC", ubc->"Z", ubl->"Description"]
    );

    for (i, record) in self.trace.iter().enumerate() {
      let instruction = match record.operand {
        Some(address) => format!("{} {}", record.opcode_name(), address.idx()),
        None          => record.opcode_name()
      };
      table.add_row(
        row![r->i + 1, r->record.pc, instruction, r->record.acc, c->record.z as u8, record.description]
      );
    }
    table
  }

  // endregion
}

impl Display for RunReport {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let output = self.output()
                     .iter()
                     .map(Word::to_string)
                     .collect::<Vec<String>>()
                     .join(", ");
    let mut combined_table = table!([self.make_trace_table(), self.memory.make_table(None)]);

    combined_table.set_titles(row![ub->"Trace", ub->"Memory"]);
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);

    write!(
      f,
      "{}\nExecution {} after {} steps.\nOutput: {}\n",
      combined_table, self.termination, self.trace.len(), output
    )
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::memory::Memory;

  fn record(pc: usize, opcode: Option<Opcode>, output: Option<Word>) -> StepRecord {
    StepRecord {
      pc,
      code        : opcode.map(|op| op.code()).unwrap_or(42),
      opcode,
      operand     : None,
      acc         : 7,
      z           : false,
      description : "test".to_string(),
      output,
    }
  }

  #[test]
  fn output_collects_printed_values() {
    let report = RunReport {
      trace       : vec![
        record(0, Some(Opcode::Print), Some(7)),
        record(1, Some(Opcode::Nop), None),
        record(2, Some(Opcode::Print), Some(7)),
      ],
      termination : Termination::GuardExpired,
      memory      : Memory::new(),
    };
    assert_eq!(report.output(), vec![7, 7]);
    assert!(!report.is_fatal());
    assert_eq!(report.fatal_error(), None);
  }

  #[test]
  fn unknown_instructions_show_their_code() {
    assert_eq!(record(3, None, None).opcode_name(), "?42");
  }

  #[test]
  fn summary_mentions_termination() {
    let report = RunReport {
      trace       : vec![record(0, Some(Opcode::Halt), None)],
      termination : Termination::AbortedFatal(Error::OutOfRangeAddress { address: 99 }),
      memory      : Memory::new(),
    };
    let text = report.to_string();
    assert!(text.contains("aborted: address 99 is out of range"));
    assert!(text.contains("after 1 steps"));
    assert!(report.is_fatal());
  }
}
