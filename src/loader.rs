/*!
  Puts programs into memory. Instructions are appended one after another at a write cursor, the
  way a programmer would key them into the front panel. Data and labels are written by address
  and never move the cursor.

  Every load error is recoverable: a rejected command leaves memory and the cursor untouched.
*/

use crate::address::{Address, AddressNumberType};
use crate::bytecode::{EncodedInstruction, Opcode};
use crate::catalog::{self, Example};
use crate::error::{Error, Result};
use crate::memory::{Memory, Word, MEM_SIZE};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Loader {
  /// Address of the next appended instruction, a cursor.
  cursor: AddressNumberType,
}

impl Loader {

  pub fn new() -> Loader {
    Loader { cursor: 0 }
  }

  pub fn cursor(&self) -> AddressNumberType {
    self.cursor
  }

  pub fn reset(&mut self) {
    self.cursor = 0;
  }

  /**
    Appends an instruction at the cursor and returns the address it was written to.

    The operand is stored as written. Whether it is a valid address is only checked when the
    instruction executes, so a program may be loaded before the data it refers to is in place.
  */
  pub fn append(&mut self, memory: &mut Memory, mnemonic: &str, operand: Option<Word>)
    -> Result<Address>
  {
    let opcode = Opcode::encode(mnemonic)?;
    self.append_opcode(memory, opcode, operand)
  }

  fn append_opcode(&mut self, memory: &mut Memory, opcode: Opcode, operand: Option<Word>)
    -> Result<Address>
  {
    let encoded = match (opcode.arity(), operand) {
      (0, None)          => EncodedInstruction::Word(opcode.code()),
      (0, Some(_))       => return Err(Error::UnexpectedOperand(opcode)),
      (_, Some(operand)) => EncodedInstruction::DoubleWord(opcode.code(), operand),
      (_, None)          => return Err(Error::MissingOperand(opcode)),
    };
    let words = encoded.words();

    if self.cursor + words.len() > MEM_SIZE {
      return Err(Error::MemoryFull { opcode, cursor: self.cursor, needed: words.len() });
    }

    let start = Address::from_idx(self.cursor)?;
    for (i, word) in words.into_iter().enumerate() {
      memory.write(self.cursor + i, word)?;
    }
    self.cursor += opcode.len();

    #[cfg(feature = "trace_computation")]
    println!("append: {} at {}, cursor now {}", opcode, start, self.cursor);

    Ok(start)
  }

  /// Writes a value directly into a cell. Code and data alike may be overwritten.
  pub fn write_raw(&mut self, memory: &mut Memory, address: Word, value: Word) -> Result<()> {
    let address = Address::from_word(address)?;
    memory.set(address, value);

    #[cfg(feature = "trace_computation")]
    println!("write: {} <- {}", address, value);

    Ok(())
  }

  pub fn label(&mut self, memory: &mut Memory, address: Word, name: &str) -> Result<()> {
    let address = Address::from_word(address)?;
    memory.set_label(address.idx(), name)
  }

  /// Replaces the contents of memory with one of the canned programs. The cursor is left just past
  /// the program's last instruction, so more instructions can be appended to it.
  pub fn load_example(&mut self, memory: &mut Memory, name: &str) -> Result<&'static Example> {
    let example = catalog::find(name).ok_or_else(|| Error::UnknownExample(name.to_string()))?;

    memory.clear();
    self.reset();

    for &(opcode, operand) in example.code {
      self.append_opcode(memory, opcode, operand)?;
    }
    for &(address, value) in example.data {
      memory.write(address, value)?;
    }
    for &(address, name) in example.labels {
      memory.set_label(address, name)?;
    }
    Ok(example)
  }

}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn appended_instructions_are_laid_out_consecutively() {
    let mut memory = Memory::new();
    let mut loader = Loader::new();

    assert_eq!(loader.append(&mut memory, "LOAD", Some(8)).map(|a| a.idx()), Ok(0));
    assert_eq!(loader.append(&mut memory, "PRINT", None).map(|a| a.idx()), Ok(2));
    assert_eq!(&memory.cells()[0..4], &[Opcode::Load.code(), 8, Opcode::Print.code(), 0]);
    assert_eq!(loader.cursor(), 3);
  }

  #[test]
  fn rejected_appends_change_nothing() {
    let mut memory = Memory::new();
    let mut loader = Loader::new();
    loader.append(&mut memory, "NOP", None).unwrap();
    let before = memory.clone();

    assert_eq!(loader.append(&mut memory, "ADD", None), Err(Error::MissingOperand(Opcode::Add)));
    assert_eq!(
      loader.append(&mut memory, "HALT", Some(3)),
      Err(Error::UnexpectedOperand(Opcode::Halt))
    );
    assert_eq!(
      loader.append(&mut memory, "add", Some(3)),
      Err(Error::UnrecognizedMnemonic("add".to_string()))
    );
    assert_eq!(memory, before);
    assert_eq!(loader.cursor(), 1);
  }

  #[test]
  fn memory_full_leaves_the_last_cell_free() {
    let mut memory = Memory::new();
    let mut loader = Loader::new();
    for _ in 0..MEM_SIZE - 1 {
      loader.append(&mut memory, "NOP", None).unwrap();
    }
    let before = memory.clone();

    assert_eq!(
      loader.append(&mut memory, "JMP", Some(0)),
      Err(Error::MemoryFull { opcode: Opcode::Jmp, cursor: MEM_SIZE - 1, needed: 2 })
    );
    assert_eq!(memory, before);
    assert_eq!(loader.cursor(), MEM_SIZE - 1);

    loader.append(&mut memory, "HALT", None).unwrap();
    assert_eq!(loader.cursor(), MEM_SIZE);
    assert!(matches!(loader.append(&mut memory, "HALT", None), Err(Error::MemoryFull { .. })));
  }

  #[test]
  fn raw_writes_do_not_move_the_cursor() {
    let mut memory = Memory::new();
    let mut loader = Loader::new();
    loader.append(&mut memory, "LOAD", Some(8)).unwrap();
    loader.write_raw(&mut memory, 0, Opcode::Sub.code()).unwrap();
    loader.write_raw(&mut memory, 8, 7).unwrap();

    assert_eq!(memory.read(0), Ok(Opcode::Sub.code()));
    assert_eq!(memory.read(8), Ok(7));
    assert_eq!(loader.cursor(), 2);
  }

  #[test]
  fn out_of_range_loads_are_rejected_without_mutation() {
    let mut memory = Memory::new();
    let mut loader = Loader::new();
    assert_eq!(
      loader.write_raw(&mut memory, MEM_SIZE as Word, 1),
      Err(Error::OutOfRangeAddress { address: MEM_SIZE as i64 })
    );
    assert_eq!(loader.label(&mut memory, -2, "x"), Err(Error::OutOfRangeAddress { address: -2 }));
    assert_eq!(memory, Memory::new());
  }

  #[test]
  fn labels_sit_on_code_or_data() {
    let mut memory = Memory::new();
    let mut loader = Loader::new();
    loader.append(&mut memory, "JMP", Some(0)).unwrap();
    loader.label(&mut memory, 0, "start").unwrap();
    loader.label(&mut memory, 0, "top").unwrap();
    assert_eq!(memory.label(0), Some("top"));
    assert_eq!(memory.read(0), Ok(Opcode::Jmp.code()));
  }

  #[test]
  fn examples_replace_memory() {
    let mut memory = Memory::new();
    let mut loader = Loader::new();
    loader.write_raw(&mut memory, 12, 99).unwrap();
    loader.label(&mut memory, 12, "junk").unwrap();

    let example = loader.load_example(&mut memory, "suma").unwrap();
    assert_eq!(example.name, "suma");
    assert_eq!(
      memory.cells(),
      &[1, 8, 2, 9, 3, 10, 4, 0, 2, 2, 0, 0, 0, 0, 0, 0]
    );
    assert_eq!(memory.label(12), None);
    assert_eq!(memory.label(10), Some("result"));
    assert_eq!(loader.cursor(), 8);
  }

  #[test]
  fn unknown_examples_change_nothing() {
    let mut memory = Memory::new();
    let mut loader = Loader::new();
    loader.append(&mut memory, "PRINT", None).unwrap();
    assert_eq!(
      loader.load_example(&mut memory, "multiplica").map(|e| e.name),
      Err(Error::UnknownExample("multiplica".to_string()))
    );
    assert_eq!(memory.read(0), Ok(Opcode::Print.code()));
    assert_eq!(loader.cursor(), 1);
  }

  #[test]
  fn unknown_example_message_names_only_the_request() {
    assert_eq!(
      Error::UnknownExample("multiplica".to_string()).to_string(),
      "unknown example `multiplica`"
    );
  }
}
