//! The fetch-decode-execute engine. A `Machine` owns the registers and borrows memory for the
//! duration of a run.

use std::fmt::{Display, Formatter};

use prettytable::Table;

use crate::address::{Address, AddressNumberType};
use crate::bytecode::{try_decode_instruction, Instruction, Opcode};
use crate::error::{Error, Result};
use crate::memory::{Memory, Word, TABLE_DISPLAY_FORMAT};
use crate::trace::{RunReport, StepRecord, Termination};

/// Default for the step guard. The example programs need well under this many steps.
pub const DEFAULT_MAX_STEPS: usize = 100;

/// Settings for a single run.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RunConfig {
  /// The step guard: the run is cut short after this many steps.
  pub max_steps: usize,
}

impl RunConfig {
  pub fn with_max_steps(self, max_steps: usize) -> RunConfig {
    RunConfig { max_steps, ..self }
  }
}

impl Default for RunConfig {
  fn default() -> Self {
    RunConfig { max_steps: DEFAULT_MAX_STEPS }
  }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum State {
  Running,
  Halted,
  AbortedFatal(Error),
  StoppedUnknownOpcode,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Machine {
  /// Program counter, the address of the next instruction.
  pc    : AddressNumberType,
  /// Accumulator.
  acc   : Word,
  /// Zero flag, recomputed only by `LOAD`, `ADD` and `SUB`.
  z     : bool,
  state : State,
}

impl Machine {

  pub fn new() -> Machine {
    Machine {
      pc    : 0,
      acc   : 0,
      z     : false,
      state : State::Running,
    }
  }

  pub fn pc(&self) -> AddressNumberType {
    self.pc
  }

  pub fn acc(&self) -> Word {
    self.acc
  }

  pub fn z(&self) -> bool {
    self.z
  }

  pub fn state(&self) -> &State {
    &self.state
  }

  /// How the machine stopped, or `None` while it is still running.
  pub fn termination(&self) -> Option<Termination> {
    match &self.state {
      State::Running              => None,
      State::Halted               => Some(Termination::Halted),
      State::AbortedFatal(error)  => Some(Termination::AbortedFatal(error.clone())),
      State::StoppedUnknownOpcode => Some(Termination::StoppedUnknownOpcode),
    }
  }

  // region Execution

  /**
    Executes one instruction and returns the record describing it.

    An unknown instruction is not an error: it stops the machine and still produces a record.
    An invalid address is. It moves the machine to `State::AbortedFatal`, no record is produced,
    and every later call fails with `Error::MachineHalted`.
  */
  pub fn step(&mut self, memory: &mut Memory) -> Result<StepRecord> {
    if self.state != State::Running {
      return Err(Error::MachineHalted);
    }

    match self.execute(memory) {

      Ok(record) => {
        #[cfg(feature = "trace_computation")]
          println!("{}\n{}", record, self.make_state_table(memory));
        Ok(record)
      }

      Err(error) => {
        #[cfg(feature = "trace_computation")]
          println!("PC: {:>2} | fatal: {}", self.pc, error);
        self.state = State::AbortedFatal(error.clone());
        Err(error)
      }

    }
  }

  fn execute(&mut self, memory: &mut Memory) -> Result<StepRecord> {
    let pc   = Address::from_idx(self.pc)?;
    let code = memory.get(pc);

    let instruction = match try_decode_instruction(memory, pc) {
      Ok(instruction)                 => instruction,
      Err(Error::UnknownOpcode(code)) => {
        self.state = State::StoppedUnknownOpcode;
        return Ok(self.record(pc, code, None, "unknown instruction".to_string(), None));
      }
      Err(error)                      => return Err(error)
    };

    let opcode      = instruction.opcode();
    let mut next_pc = self.pc + opcode.len();
    let mut output  = None;

    let description = match instruction {

      Instruction::Nullary(opcode) => {
        match opcode {
          Opcode::Halt  => {
            self.state = State::Halted;
            next_pc    = self.pc;
            "halt".to_string()
          }
          Opcode::Print => {
            output = Some(self.acc);
            format!("print ACC ({})", self.acc)
          }
          Opcode::Nop   => "no operation".to_string(),
          _             => unreachable!("{} decoded without its operand", opcode)
        }
      }

      Instruction::Unary { opcode, address } => {
        // The operand value before this instruction touches it.
        let value = memory.get(address);
        match opcode {
          Opcode::Load  => {
            self.acc = value;
            format!("ACC <- {} ({})", address, value)
          }
          Opcode::Add   => {
            let old  = self.acc;
            self.acc = old.wrapping_add(value);
            format!("ACC <- ACC ({}) + {} ({}) = {}", old, address, value, self.acc)
          }
          Opcode::Sub   => {
            let old  = self.acc;
            self.acc = old.wrapping_sub(value);
            format!("ACC <- ACC ({}) - {} ({}) = {}", old, address, value, self.acc)
          }
          Opcode::Store => {
            memory.set(address, self.acc);
            format!("{} <- ACC ({}), was {}", address, self.acc, value)
          }
          Opcode::Jmp   => {
            next_pc = address.idx();
            format!("PC <- {}", address.idx())
          }
          Opcode::Jz    => {
            match self.z {
              true  => {
                next_pc = address.idx();
                format!("Z set, PC <- {}", address.idx())
              }
              false => format!("Z clear, continue at {}", next_pc)
            }
          }
          _             => unreachable!("{} decoded with an operand", opcode)
        }
      }

    }; // end match on instruction

    if opcode.sets_zero_flag() {
      self.z = self.acc == 0;
    }
    self.pc = next_pc;

    Ok(self.record(pc, code, Some(instruction), description, output))
  }

  fn record(
      &self,
      pc          : Address,
      code        : Word,
      instruction : Option<Instruction>,
      description : String,
      output      : Option<Word>
    ) -> StepRecord
  {
    StepRecord {
      pc          : pc.idx(),
      code,
      opcode      : instruction.map(|i| i.opcode()),
      operand     : instruction.and_then(|i| i.address()),
      acc         : self.acc,
      z           : self.z,
      description,
      output,
    }
  }

  /// Starts a run over `memory`. Nothing executes until the returned iterator is advanced.
  pub fn run<'m>(&'m mut self, memory: &'m mut Memory, config: RunConfig) -> Run<'m> {
    Run {
      machine     : self,
      memory,
      max_steps   : config.max_steps,
      steps       : 0,
      termination : None,
    }
  }

  // endregion

  // region Display methods

  /// Registers next to memory, with the cell at PC marked.
  pub fn make_state_table(&self, memory: &Memory) -> Table {
    let mut register_table = Table::new();

    register_table.set_format(*TABLE_DISPLAY_FORMAT);
    register_table.set_titles(row![ubr->"Register", ubl->"Contents"]);
    register_table.add_row(row![r->"PC =", self.pc]);
    register_table.add_row(row![r->"ACC =", self.acc]);
    register_table.add_row(row![r->"Z =", self.z as u8]);

    let mut combined_table = table!([register_table, memory.make_table(Some(self.pc))]);

    combined_table.set_titles(row![ub->"Registers", ub->"Memory"]);
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);
    combined_table
  }

  // endregion

}

impl Default for Machine {
  fn default() -> Self {
    Self::new()
  }
}

impl Display for Machine {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let state = match &self.state {
      State::Running              => "running".to_string(),
      State::Halted               => "halted".to_string(),
      State::AbortedFatal(error)  => format!("aborted ({})", error),
      State::StoppedUnknownOpcode => "stopped".to_string(),
    };
    write!(f, "PC: {} | ACC: {} | Z: {} | {}", self.pc, self.acc, self.z as u8, state)
  }
}

/**
  A run in progress: a lazy, finite sequence of step records.

  The sequence ends when the machine halts, meets an unknown instruction, aborts on a bad address,
  or reaches the step guard. A run cannot be resumed once it ends; to see the steps again, load
  the program and run it again.
*/
pub struct Run<'m> {
  machine     : &'m mut Machine,
  memory      : &'m mut Memory,
  max_steps   : usize,
  steps       : usize,
  termination : Option<Termination>,
}

impl<'m> Run<'m> {
  /// How the run ended, once it has.
  pub fn termination(&self) -> Option<&Termination> {
    self.termination.as_ref()
  }

  /**
    Drives the run to its end. `on_step` sees each record as soon as it is produced, which is
    where an interactive caller can pause between steps. It cannot alter the trace.
  */
  pub fn finish<F>(mut self, mut on_step: F) -> RunReport
    where F: FnMut(&StepRecord)
  {
    let mut trace = Vec::new();
    while let Some(record) = self.next() {
      on_step(&record);
      trace.push(record);
    }

    RunReport {
      trace,
      // `next` only returns `None` once the termination is known.
      termination : self.termination.take().unwrap_or(Termination::GuardExpired),
      memory      : self.memory.snapshot(),
    }
  }
}

impl<'m> Iterator for Run<'m> {
  type Item = StepRecord;

  fn next(&mut self) -> Option<StepRecord> {
    if self.termination.is_some() {
      return None;
    }
    if let Some(termination) = self.machine.termination() {
      self.termination = Some(termination);
      return None;
    }
    if self.steps >= self.max_steps {
      self.termination = Some(Termination::GuardExpired);
      return None;
    }

    match self.machine.step(self.memory) {
      Ok(record) => {
        self.steps += 1;
        Some(record)
      }
      Err(error) => {
        self.termination = Some(Termination::AbortedFatal(error));
        None
      }
    }
  }
}
