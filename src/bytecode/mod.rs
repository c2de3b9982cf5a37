/*!

  The machine uses a single flat memory of integer cells for both code and data. Instructions are
  either one or two cells long:

    [Opcode]               HALT, PRINT, NOP
    [Opcode][Address]      LOAD, ADD, SUB, STORE, JMP, JZ

  The second cell of a two cell instruction always holds an address, never an immediate value.
  To work with the number 2, a program stores 2 somewhere in memory and refers to that cell. The
  engine dereferences the operand cell exactly once.

  Because instructions and data share the same cells, nothing prevents a program from reading,
  overwriting, or jumping into its own code. That is the point of the machine.

*/

mod binary;
mod instruction;
mod assembly;

pub use assembly::{parse_command, parse_script, Command};
pub use binary::{encode_instruction, try_decode_instruction, EncodedInstruction};
pub use instruction::{Instruction, Opcode};

use prettytable::Table;
use strum::IntoEnumIterator;

use crate::memory::TABLE_DISPLAY_FORMAT;

/// The instruction set reference, one row per opcode.
pub fn isa_table() -> Table {
  let mut table = Table::new();

  table.set_format(*TABLE_DISPLAY_FORMAT);
  table.set_titles(row![ubr->"Code", ubl->"Mnemonic", ubr->"Cells", ubl->"Semantics"]);

  for opcode in Opcode::iter() {
    let mnemonic = match opcode.arity() {
      0 => opcode.to_string(),
      _ => format!("{} a", opcode)
    };
    table.add_row(row![r->opcode.code(), mnemonic, r->opcode.len(), opcode.semantics()]);
  }
  table
}
