/*!
  A session is one sitting at the machine: a memory store, a loader, and the settings for runs.
  The shell talks only to a `Session`.

  Memory does not outlive a run. As soon as a run ends, however it ends, memory is wiped and the
  load cursor returns to 0. What the program left behind is only available through the snapshot
  in the `RunReport`.
*/

use prettytable::Table;

use crate::address::Address;
use crate::bytecode::{isa_table, try_decode_instruction, Command};
use crate::error::Result;
use crate::loader::Loader;
use crate::machine::{Machine, RunConfig};
use crate::memory::{Memory, Word, MEM_SIZE, TABLE_DISPLAY_FORMAT};
use crate::trace::{RunReport, StepRecord};

/// The result of a successful command, for the shell to render.
#[derive(Clone, Debug)]
pub enum Response {
  /// Memory changed; the message says how.
  Loaded(String),
  Ran(RunReport),
  Show(Table),
}

#[derive(Clone, Debug, Default)]
pub struct Session {
  memory : Memory,
  loader : Loader,
  config : RunConfig,
}

impl Session {

  pub fn new(config: RunConfig) -> Session {
    Session {
      memory : Memory::new(),
      loader : Loader::new(),
      config,
    }
  }

  pub fn memory(&self) -> &Memory {
    &self.memory
  }

  pub fn cursor(&self) -> usize {
    self.loader.cursor()
  }

  pub fn config(&self) -> RunConfig {
    self.config
  }

  // region Load surface

  pub fn append(&mut self, mnemonic: &str, operand: Option<Word>) -> Result<Address> {
    self.loader.append(&mut self.memory, mnemonic, operand)
  }

  pub fn write_raw(&mut self, address: Word, value: Word) -> Result<()> {
    self.loader.write_raw(&mut self.memory, address, value)
  }

  pub fn label(&mut self, address: Word, name: &str) -> Result<()> {
    self.loader.label(&mut self.memory, address, name)
  }

  pub fn load_example(&mut self, name: &str) -> Result<()> {
    self.loader.load_example(&mut self.memory, name).map(|_| ())
  }

  pub fn clear(&mut self) {
    self.memory.clear();
    self.loader.reset();
  }

  // endregion

  // region Run surface

  pub fn run(&mut self) -> RunReport {
    self.run_with(|_| {})
  }

  /// Runs the program in memory from address 0, handing each record to `on_step` as it is
  /// produced, then wipes memory.
  pub fn run_with<F>(&mut self, on_step: F) -> RunReport
    where F: FnMut(&StepRecord)
  {
    let mut machine = Machine::new();
    let report = machine.run(&mut self.memory, self.config).finish(on_step);
    self.clear();
    report
  }

  // endregion

  /**
    Disassembles memory. Cells below the load cursor are read as instructions, the rest as data,
    since a cell holding 0 is equally a `HALT` and a zero.
  */
  pub fn listing(&self) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ubl->"Label", ubl->"Contents"]);

    let mut idx = 0;
    while idx < MEM_SIZE {
      let label = self.memory.label(idx).unwrap_or("");
      let instruction = match idx < self.loader.cursor() {
        true  => {
          Address::from_idx(idx)
            .and_then(|pc| try_decode_instruction(&self.memory, pc))
            .ok()
        }
        false => None
      };

      match instruction {

        Some(instruction) => {
          table.add_row(row![r->idx, label, instruction]);
          idx += instruction.opcode().len();
        }

        None => {
          table.add_row(row![r->idx, label, self.memory.cells()[idx]]);
          idx += 1;
        }

      }
    }
    table
  }

  /// Executes one shell command. `on_step` only sees records if the command is a run.
  pub fn execute<F>(&mut self, command: Command, on_step: F) -> Result<Response>
    where F: FnMut(&StepRecord)
  {
    let response = match command {

      Command::Append { mnemonic, operand } => {
        let address = self.append(&mnemonic, operand)?;
        let text = match operand {
          Some(operand) => format!("{} {}", mnemonic, operand),
          None          => mnemonic
        };
        Response::Loaded(format!("{}: {}", address.idx(), text))
      }

      Command::Write { address, value } => {
        self.write_raw(address, value)?;
        Response::Loaded(format!("mem[{}] = {}", address, value))
      }

      Command::Label { address, name } => {
        self.label(address, &name)?;
        Response::Loaded(format!("mem[{}] is now labelled {}", address, name))
      }

      Command::Example(name) => {
        self.load_example(&name)?;
        Response::Loaded(format!("example {} loaded", name))
      }

      Command::Clear  => {
        self.clear();
        Response::Loaded("memory cleared".to_string())
      }

      Command::Run    => Response::Ran(self.run_with(on_step)),
      Command::Memory => Response::Show(self.memory.make_table(Some(self.loader.cursor()))),
      Command::List   => Response::Show(self.listing()),
      Command::Isa    => Response::Show(isa_table()),

    };
    Ok(response)
  }

}
