#[macro_use]
extern crate prettytable;
#[macro_use]
extern crate lazy_static;
extern crate strum;
#[macro_use]
extern crate strum_macros;

mod device;
mod isa;
mod stream;
mod transaction;
mod wire;

use std::time::Duration;

use crate::device::AluSim;
use crate::isa::{Instruction, Mnemonic};
use crate::transaction::run_transaction;

fn main() {
  #[cfg(feature = "trace_exchanges")]
  println!("Exchange Tracing ENABLED");

  // The reference flow: compute 5 + 10 through the execution unit.
  let program = vec![
    Instruction::RegisterImmediate { mnemonic: Mnemonic::Addi, rd: 1, rs1: 0, imm: 5 },
    Instruction::RegisterImmediate { mnemonic: Mnemonic::Addi, rd: 2, rs1: 0, imm: 10 },
    Instruction::RegisterRegister { mnemonic: Mnemonic::Add, rd: 3, rs1: 1, rs2: 2 },
  ];

  let mut device = AluSim::new();

  match run_transaction(&mut device, &program, Duration::from_millis(250)) {
    Ok(report) => {
      println!("\n{}", report);
      println!("Summary of {} exchange(s):", report.len());
      for (instruction, exchange) in program.iter().zip(report.exchanges()) {
        match exchange.result {
          Some(byte) => println!("  {:<18} => {}", instruction.to_string(), byte),
          None => println!("  {:<18} => no response", instruction.to_string()),
        }
      }
    }

    Err(error) => {
      eprintln!("Transaction failed: {}", error);
      std::process::exit(1);
    }
  }
}
