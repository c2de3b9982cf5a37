/*!
  This module is responsible for the encoding and decoding of instructions to and from memory
  cells.

*/
use super::{Instruction, Opcode};
use crate::address::Address;
use crate::error::Result;
use crate::memory::{Memory, Word};

/// An `Either` type for an encoded instruction, allowing the instruction to be
/// either one cell or two.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EncodedInstruction {
  Word(Word),
  DoubleWord(Word, Word)
}

impl EncodedInstruction {
  pub fn words(&self) -> Vec<Word> {
    match self {
      EncodedInstruction::Word(word)              => vec![*word],
      EncodedInstruction::DoubleWord(low, high)   => vec![*low, *high]
    }
  }
}

pub fn encode_instruction(instruction: Instruction) -> EncodedInstruction {
  match instruction {

    Instruction::Unary { opcode, address } => {
      // [Opcode][Address]
      EncodedInstruction::DoubleWord(opcode.code(), address.to_word())
    }

    Instruction::Nullary(opcode) => {
      // [Opcode]
      EncodedInstruction::Word(opcode.code())
    }

  }
}

/**
  Decodes the instruction starting at `pc`. Fails with `UnknownOpcode` if the cell at `pc` does
  not hold an opcode, and with `OutOfRangeAddress` if the operand cell lies past the end of
  memory or does not hold a valid address.
*/
pub fn try_decode_instruction(memory: &Memory, pc: Address) -> Result<Instruction> {
  let opcode = Opcode::decode(memory.get(pc))?;

  let instruction =
    match opcode.arity() {
      0 => Instruction::Nullary(opcode),
      _ => {
        let operand_cell = pc.offset(1)?;
        Instruction::Unary {
          opcode,
          address: Address::from_word(memory.get(operand_cell))?
        }
      }
    };

  Ok(instruction)
}
