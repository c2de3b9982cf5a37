/*!
  A stored-program accumulator machine for teaching the von Neumann architecture.

  Code and data share one small memory. A program is keyed in one instruction at a time (or
  loaded from a handful of examples), then run to completion while every fetch-decode-execute
  step is recorded. The machine has one register, the accumulator, and one flag, Z.

  ```text
  Session ──> Loader ──> Memory <──> Machine ──> StepRecord*
  ```

  Enable the `trace_computation` feature to print the machine state at every instruction.
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod address;
pub mod bytecode;
pub mod catalog;
pub mod error;
pub mod loader;
pub mod machine;
pub mod memory;
pub mod session;
pub mod trace;

pub use address::Address;
pub use bytecode::{parse_command, parse_script, Command, Instruction, Opcode};
pub use error::{Error, Result};
pub use loader::Loader;
pub use machine::{Machine, Run, RunConfig, State, DEFAULT_MAX_STEPS};
pub use memory::{Memory, Word, MEM_SIZE};
pub use session::{Response, Session};
pub use trace::{RunReport, StepRecord, Termination};
