//! The canned example programs. Each one is a short stored program followed by its data, with
//! labels on the data cells.

use crate::bytecode::Opcode;
use crate::memory::Word;

/// A canned program, described cell by cell.
pub struct Example {
  pub name        : &'static str,
  pub description : &'static str,
  /// Instructions, appended from address 0.
  pub code        : &'static [(Opcode, Option<Word>)],
  /// Data cells as `(address, value)`.
  pub data        : &'static [(usize, Word)],
  pub labels      : &'static [(usize, &'static str)],
}

pub static EXAMPLES: [Example; 3] = [
  Example {
    name        : "suma",
    description : "2 + 2, result in mem[10]",
    code        : &[
      (Opcode::Load,  Some(8)),   // 0
      (Opcode::Add,   Some(9)),   // 2
      (Opcode::Store, Some(10)),  // 4
      (Opcode::Print, None),      // 6
      (Opcode::Halt,  None),      // 7
    ],
    data        : &[(8, 2), (9, 2), (10, 0)],
    labels      : &[(8, "a"), (9, "b"), (10, "result")],
  },
  Example {
    name        : "resta",
    description : "10 - 5, result in mem[10]",
    code        : &[
      (Opcode::Load,  Some(8)),   // 0
      (Opcode::Sub,   Some(9)),   // 2
      (Opcode::Store, Some(10)),  // 4
      (Opcode::Print, None),      // 6
      (Opcode::Halt,  None),      // 7
    ],
    data        : &[(8, 10), (9, 5), (10, 0)],
    labels      : &[(8, "minuend"), (9, "subtrahend"), (10, "result")],
  },
  Example {
    name        : "bucle",
    description : "count down from 3 to 0",
    code        : &[
      (Opcode::Load,  Some(15)),  // 0
      (Opcode::Print, None),      // 2  loop:
      (Opcode::Jz,    Some(11)),  // 3
      (Opcode::Sub,   Some(14)),  // 5
      (Opcode::Store, Some(15)),  // 7
      (Opcode::Jmp,   Some(2)),   // 9
      (Opcode::Halt,  None),      // 11 done:
    ],
    data        : &[(14, 1), (15, 3)],
    labels      : &[(14, "one"), (15, "counter")],
  },
];

pub fn find(name: &str) -> Option<&'static Example> {
  EXAMPLES.iter().find(|example| example.name == name)
}

pub fn names() -> impl Iterator<Item = &'static str> {
  EXAMPLES.iter().map(|example| example.name)
}
