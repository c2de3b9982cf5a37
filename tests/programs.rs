// Whole-program runs through the public API: the example catalog, hand-keyed programs, and the
// lifecycle of memory across runs.

use vonneumann::{
  parse_script, Error, Opcode, RunConfig, RunReport, Session, Termination, Word, MEM_SIZE
};

fn run_example(name: &str) -> RunReport {
  let mut session = Session::default();
  session.load_example(name).unwrap();
  session.run()
}

fn accumulator(report: &RunReport) -> Vec<Word> {
  report.trace.iter().map(|record| record.acc).collect()
}

fn opcodes(report: &RunReport) -> Vec<Opcode> {
  report.trace.iter().filter_map(|record| record.opcode).collect()
}

#[test]
fn suma_adds_two_and_two() {
  let report = run_example("suma");

  assert_eq!(
    opcodes(&report),
    vec![Opcode::Load, Opcode::Add, Opcode::Store, Opcode::Print, Opcode::Halt]
  );
  assert_eq!(accumulator(&report), vec![2, 4, 4, 4, 4]);
  assert_eq!(report.output(), vec![4]);
  assert_eq!(report.memory.read(10), Ok(4));
  assert_eq!(report.memory.label(10), Some("result"));
  assert_eq!(report.termination, Termination::Halted);
}

#[test]
fn run_summary_renders_trace_and_memory() {
  let text = run_example("suma").to_string();
  assert!(text.contains("LOAD"));
  assert!(text.contains("HALT"));
  assert!(text.contains("result"));
}

#[test]
fn resta_subtracts_five_from_ten() {
  let report = run_example("resta");

  assert_eq!(&accumulator(&report)[0..2], &[10, 5]);
  assert_eq!(report.output(), vec![5]);
  assert_eq!(report.memory.read(10), Ok(5));
  assert_eq!(report.termination, Termination::Halted);
}

#[test]
fn bucle_counts_down_to_zero() {
  let report = run_example("bucle");
  let printed = report.output();

  assert_eq!(printed, vec![3, 2, 1, 0]);
  assert!(printed.windows(2).all(|pair| pair[0] > pair[1]));
  assert!(printed.iter().all(|&value| value >= 0));
  assert_eq!(report.termination, Termination::Halted);
  assert!(report.trace.len() < RunConfig::default().max_steps);
  assert_eq!(report.memory.read(15), Ok(0));
}

#[test]
fn bucle_is_cut_short_by_a_small_guard() {
  let mut session = Session::new(RunConfig::default().with_max_steps(7));
  session.load_example("bucle").unwrap();
  let report = session.run();

  assert_eq!(report.trace.len(), 7);
  assert_eq!(report.termination, Termination::GuardExpired);
  assert_eq!(report.output(), vec![3, 2]);
}

#[test]
fn appended_code_is_readable_by_address() {
  let mut session = Session::default();
  session.append("LOAD", Some(8)).unwrap();
  session.append("PRINT", None).unwrap();

  let memory = session.memory();
  assert_eq!(memory.read(0), Ok(Opcode::Load.code()));
  assert_eq!(memory.read(1), Ok(8));
  assert_eq!(memory.read(2), Ok(Opcode::Print.code()));
}

#[test]
fn jump_past_memory_aborts_the_run() {
  let mut session = Session::default();
  session.write_raw(12, 6).unwrap();
  session.append("LOAD", Some(12)).unwrap();
  session.append("PRINT", None).unwrap();
  session.append("JMP", Some(MEM_SIZE as Word)).unwrap();
  session.append("PRINT", None).unwrap();
  session.append("HALT", None).unwrap();

  let report = session.run();
  assert!(report.is_fatal());
  assert_eq!(
    report.fatal_error(),
    Some(&Error::OutOfRangeAddress { address: MEM_SIZE as i64 })
  );
  // The trace ends with the step before the jump.
  assert_eq!(report.trace.len(), 2);
  assert_eq!(report.trace.last().and_then(|record| record.opcode), Some(Opcode::Print));
  assert_eq!(report.output(), vec![6]);
}

#[test]
fn zero_flag_is_kept_by_store_and_print() {
  let mut session = Session::default();
  session.append("LOAD", Some(13)).unwrap();
  session.append("STORE", Some(14)).unwrap();
  session.append("PRINT", None).unwrap();
  session.append("HALT", None).unwrap();

  let report = session.run();
  let flags: Vec<bool> = report.trace.iter().map(|record| record.z).collect();
  assert_eq!(flags, vec![true, true, true, true]);
}

#[test]
fn self_modifying_code_runs_what_it_wrote() {
  // The program stores the code of HALT over the `PRINT` at address 6 before reaching it.
  let script = "
    LOAD 13       # ACC <- 0, the code of HALT
    STORE 6
    NOP
    NOP
    PRINT
    HALT
    13 0
    13 halt_code
  ";
  let mut session = Session::default();
  for (line, command) in parse_script(script) {
    session.execute(command.unwrap(), |_| {}).unwrap_or_else(|e| panic!("line {}: {}", line, e));
  }

  let report = session.run();
  assert_eq!(report.output(), Vec::<Word>::new());
  assert_eq!(report.trace.last().map(|record| record.pc), Some(6));
  assert_eq!(report.termination, Termination::Halted);
}

#[test]
fn unknown_opcode_ends_the_run_gracefully() {
  let mut session = Session::default();
  session.append("NOP", None).unwrap();
  session.write_raw(1, -4).unwrap();

  let report = session.run();
  assert_eq!(report.termination, Termination::StoppedUnknownOpcode);
  assert_eq!(report.trace.len(), 2);
  assert_eq!(report.trace[1].code, -4);
  assert_eq!(report.trace[1].description, "unknown instruction");
}

#[test]
fn nothing_survives_a_run() {
  let mut session = Session::default();
  session.load_example("resta").unwrap();
  session.run();

  assert!(session.memory().cells().iter().all(|&cell| cell == 0));
  assert_eq!(session.memory().labels().count(), 0);
  assert_eq!(session.cursor(), 0);

  // An empty memory is all HALT instructions.
  let report = session.run();
  assert_eq!(report.trace.len(), 1);
  assert_eq!(report.termination, Termination::Halted);
}

#[test]
fn reruns_produce_identical_traces() {
  let first = run_example("bucle");
  let second = run_example("bucle");
  assert_eq!(first, second);
}
