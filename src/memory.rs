//! The memory store: a single flat array of cells shared by instructions and data, plus an
//! optional human readable label for each address.
//!
//! Labels are purely cosmetic. They are interned like every other string in this codebase and
//! never influence execution.

use std::fmt::{Display, Formatter};

use prettytable::{format as TableFormat, Table};
use string_cache::DefaultAtom;

use crate::address::{Address, AddressNumberType};
use crate::error::Result;

/// The contents of a single memory cell.
pub type Word = i32;
/// A label attached to an address.
pub type Label = DefaultAtom;

/// Number of cells in the memory store.
pub const MEM_SIZE: usize = 16;

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Memory {
  cells  : Vec<Word>,
  labels : Vec<Option<Label>>,
}

/// An owned copy of the memory store, taken at the end of a run before memory is wiped.
pub type Snapshot = Memory;

impl Memory {

  pub fn new() -> Memory {
    Memory {
      cells  : vec![0; MEM_SIZE],
      labels : vec![None; MEM_SIZE],
    }
  }

  // region Range checked access

  pub fn read(&self, idx: AddressNumberType) -> Result<Word> {
    Ok(self.get(Address::from_idx(idx)?))
  }

  pub fn write(&mut self, idx: AddressNumberType, value: Word) -> Result<()> {
    self.set(Address::from_idx(idx)?, value);
    Ok(())
  }

  /// Attaches `name` to the address, replacing whatever label was there before.
  pub fn set_label(&mut self, idx: AddressNumberType, name: &str) -> Result<()> {
    let address = Address::from_idx(idx)?;
    self.labels[address.idx()] = Some(Label::from(name));
    Ok(())
  }

  // endregion

  // region Access through validated addresses

  /// Performs one step of dereferencing. An `Address` is always in range.
  pub fn get(&self, address: Address) -> Word {
    self.cells[address.idx()]
  }

  pub fn set(&mut self, address: Address, value: Word) {
    self.cells[address.idx()] = value;
  }

  pub fn label(&self, idx: AddressNumberType) -> Option<&str> {
    self.labels.get(idx).and_then(|label| label.as_deref())
  }

  // endregion

  /// Zeroes every cell and forgets every label.
  pub fn clear(&mut self) {
    for cell in self.cells.iter_mut() {
      *cell = 0;
    }
    for label in self.labels.iter_mut() {
      *label = None;
    }
  }

  pub fn cells(&self) -> &[Word] {
    &self.cells
  }

  /// The labelled addresses in increasing order.
  pub fn labels(&self) -> impl Iterator<Item = (AddressNumberType, &str)> + '_ {
    self.labels
        .iter()
        .enumerate()
        .filter_map(|(i, label)| label.as_deref().map(|name| (i, name)))
  }

  pub fn snapshot(&self) -> Snapshot {
    self.clone()
  }

  // region Display methods

  /// One row per cell. The row for `highlight`, usually the program counter, is marked.
  pub fn make_table(&self, highlight: Option<AddressNumberType>) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ubl->"Label", ubl->"Contents"]);

    for (i, cell) in self.cells.iter().enumerate() {
      let label = self.label(i).unwrap_or("");
      match Some(i) == highlight {

        true  => {
          table.add_row(row![r->format!("* --> mem[{}] =", i), label, cell]);
        }

        false => {
          table.add_row(row![r->format!("mem[{}] =", i), label, cell]);
        }

      } // end match on highlight
    } // end for
    table
  }

  // endregion

}

impl Default for Memory {
  fn default() -> Self {
    Self::new()
  }
}

impl Display for Memory {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.make_table(None))
  }
}


lazy_static! {
  pub(crate) static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}
