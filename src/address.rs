//! A validated index into the memory store, with some convenience functions. An `Address` can only
//! be constructed through a range check, so holding one is proof that it points inside memory.

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use crate::error::{Error, Result};
use crate::memory::{Word, MEM_SIZE};

// `AddressNumberType` is `usize`, as it is naturally an index into a memory store.
pub type AddressNumberType = usize;

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct Address(AddressNumberType);

impl Address {
  /// Converts the address to an index into the memory store.
  pub fn idx(&self) -> AddressNumberType {
    self.0
  }

  /// Range checks an index into the memory store.
  pub fn from_idx(idx: AddressNumberType) -> Result<Address> {
    match idx < MEM_SIZE {
      true  => Ok(Address(idx)),
      false => {
        let address = i64::try_from(idx).unwrap_or(i64::MAX);
        Err(Error::OutOfRangeAddress { address })
      }
    }
  }

  /// Interprets the contents of a cell as an address. This is the operand indirection step:
  /// a negative or too large value is not an address.
  pub fn from_word(word: Word) -> Result<Address> {
    match AddressNumberType::try_from(word) {
      Ok(idx) => Address::from_idx(idx),
      Err(_)  => Err(Error::OutOfRangeAddress { address: i64::from(word) })
    }
  }

  /// The address `offset` cells further on. Running off the end of memory is an error, not a
  /// wrap-around.
  pub fn offset(&self, offset: AddressNumberType) -> Result<Address> {
    Address::from_idx(self.0.saturating_add(offset))
  }

  /// The cell contents that refer to this address.
  pub fn to_word(&self) -> Word {
    self.0 as Word
  }
}

impl Display for Address {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "mem[{}]", self.0)
  }
}

impl TryFrom<Word> for Address {
  type Error = Error;

  fn try_from(word: Word) -> Result<Address> {
    Address::from_word(word)
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_every_cell_of_memory() {
    for idx in 0..MEM_SIZE {
      assert_eq!(Address::from_idx(idx).map(|a| a.idx()), Ok(idx));
    }
  }

  #[test]
  fn rejects_negative_and_large_words() {
    assert_eq!(Address::from_word(-1), Err(Error::OutOfRangeAddress { address: -1 }));
    assert_eq!(
      Address::from_word(MEM_SIZE as Word),
      Err(Error::OutOfRangeAddress { address: MEM_SIZE as i64 })
    );
  }

  #[test]
  fn offset_stops_at_the_end_of_memory() {
    let last = Address::from_idx(MEM_SIZE - 1).unwrap();
    assert!(last.offset(1).is_err());
    assert_eq!(Address::from_idx(3).unwrap().offset(1).unwrap().idx(), 4);
  }

  #[test]
  fn huge_indices_are_reported_without_wrapping() {
    assert_eq!(
      Address::from_idx(usize::MAX),
      Err(Error::OutOfRangeAddress { address: i64::MAX })
    );
    assert!(Address::from_idx(0).unwrap().offset(usize::MAX).is_err());
  }

  #[test]
  fn displays_as_memory_reference() {
    assert_eq!(Address::from_idx(10).unwrap().to_string(), "mem[10]");
  }
}
