//! The single error type of the machine. Everything that can go wrong while loading or running a
//! program is one of these variants.

use crate::bytecode::Opcode;
use crate::memory::{Word, MEM_SIZE};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Clone, Debug, Eq, PartialEq)]
pub enum Error {
  /// An address outside of `[0, MEM_SIZE)`. Fatal when met by the execution engine.
  #[error("address {address} is out of range (memory has {size} cells)", size = MEM_SIZE)]
  OutOfRangeAddress { address: i64 },

  #[error("{opcode} needs {needed} cells at address {cursor}, but memory is full")]
  MemoryFull { opcode: Opcode, cursor: usize, needed: usize },

  #[error("{0} requires an address operand, e.g. `{0} 8`")]
  MissingOperand(Opcode),

  #[error("{0} does not take an operand")]
  UnexpectedOperand(Opcode),

  #[error("`{0}` is not an instruction; type `isa` for the instruction set")]
  UnrecognizedMnemonic(String),

  #[error("cannot understand `{0}`; type `help` for the list of commands")]
  UnrecognizedCommand(String),

  #[error("unknown example `{0}`")]
  UnknownExample(String),

  #[error("{0} is not an opcode")]
  UnknownOpcode(Word),

  #[error("machine is halted")]
  MachineHalted,
}

impl Error {
  /// Only a bad address ends a run non-recoverably. Every other condition leaves the machine and
  /// memory exactly as they were.
  pub fn is_fatal(&self) -> bool {
    match self {
      Error::OutOfRangeAddress { .. } => true,
      _                               => false
    }
  }
}
