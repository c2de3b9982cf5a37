use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::{Display as StrumDisplay, EnumIter, EnumString, IntoStaticStr};

use crate::address::Address;
use crate::error::{Error, Result};
use crate::memory::Word;

/**
  Opcodes of the machine.

  The discriminant of each variant is the numeric code stored in memory, and the `strum`
  serialization is its mnemonic. Mnemonics are matched exactly, so `load` is not `LOAD`.
  Codes live in memory next to data, so renumbering an opcode changes the meaning of every
  stored program.
*/
#[derive(
  StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,          Eq,         PartialEq, Debug,            Hash
)]
#[repr(u8)]
pub enum Opcode {
  #[strum(serialize = "HALT")]
  Halt  = 0,    // halt
  #[strum(serialize = "LOAD")]
  Load  = 1,    // load( address )
  #[strum(serialize = "ADD")]
  Add   = 2,    // add( address )
  #[strum(serialize = "STORE")]
  Store = 3,    // store( address )
  #[strum(serialize = "PRINT")]
  Print = 4,    // print
  #[strum(serialize = "SUB")]
  Sub   = 5,    // sub( address )
  #[strum(serialize = "JMP")]
  Jmp   = 6,    // jmp( address )
  #[strum(serialize = "JZ")]
  Jz    = 7,    // jz( address )
  #[strum(serialize = "NOP")]
  Nop   = 8,    // nop
}

impl Opcode {
  pub fn code(&self) -> Word {
    Into::<u8>::into(*self) as Word
  }

  /// Looks up the opcode stored in a cell.
  pub fn decode(code: Word) -> Result<Opcode> {
    u8::try_from(code)
      .ok()
      .and_then(|byte| Opcode::try_from(byte).ok())
      .ok_or(Error::UnknownOpcode(code))
  }

  /// Looks up the opcode for a mnemonic.
  pub fn encode(mnemonic: &str) -> Result<Opcode> {
    Opcode::from_str(mnemonic).map_err(|_| Error::UnrecognizedMnemonic(mnemonic.to_string()))
  }

  /// The number of operand cells following the opcode.
  pub fn arity(&self) -> usize {
    match self {
      | Opcode::Halt
      | Opcode::Print
      | Opcode::Nop   => 0,
      _               => 1
    }
  }

  /// The number of cells the instruction occupies.
  pub fn len(&self) -> usize {
    1 + self.arity()
  }

  /// Whether the opcode recomputes the zero flag.
  pub fn sets_zero_flag(&self) -> bool {
    match self {
      | Opcode::Load
      | Opcode::Add
      | Opcode::Sub => true,
      _             => false
    }
  }

  /// Register transfer semantics, for the instruction set reference.
  pub fn semantics(&self) -> &'static str {
    match self {
      Opcode::Halt  => "stop execution",
      Opcode::Load  => "ACC <- mem[a]; Z <- ACC == 0",
      Opcode::Add   => "ACC <- ACC + mem[a]; Z <- ACC == 0",
      Opcode::Store => "mem[a] <- ACC",
      Opcode::Print => "output ACC",
      Opcode::Sub   => "ACC <- ACC - mem[a]; Z <- ACC == 0",
      Opcode::Jmp   => "PC <- a",
      Opcode::Jz    => "if Z then PC <- a",
      Opcode::Nop   => "do nothing",
    }
  }
}

/// Holds the unencoded components of an instruction. The operand of a unary instruction is
/// always an address, never an immediate value.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Instruction {
  /// [Opcode][Address]
  Unary {
    opcode  : Opcode,
    address : Address
  },
  /// [Opcode]
  Nullary(Opcode),
}

impl Instruction {
  pub fn opcode(&self) -> Opcode {
    match self {
      Instruction::Unary { opcode, .. } => *opcode,
      Instruction::Nullary(opcode)      => *opcode
    }
  }

  pub fn address(&self) -> Option<Address> {
    match self {
      Instruction::Unary { address, .. } => Some(*address),
      Instruction::Nullary(_)            => None
    }
  }
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {

      Instruction::Unary { opcode, address } => {
        write!(f, "{} {}", opcode, address.idx())
      }

      Instruction::Nullary(opcode) => {
        write!(f, "{}", opcode)
      }

    }
  }
}
