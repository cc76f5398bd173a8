/*!
  An in-memory stand-in for the hardware execution unit.

  The real peer is an FPGA soft ALU sitting behind a serial link: it shifts in
  a 4 byte frame, decodes the word, executes the operation against a 32 entry
  register file, and shifts back the low byte of the destination register. The
  simulator reproduces that behavior bytewise so the transaction runner and the
  bundled demo can be exercised without hardware.

*/
use std::collections::VecDeque;
use std::io;

use crate::isa::{OPCODE_ITYPE, OPCODE_RTYPE};
use crate::stream::ByteStream;
use crate::wire::{Word, FRAME_SIZE};

pub struct AluSim {
  registers: [u32; 32],
  /// Bytes of the frame currently being shifted in.
  frame: Vec<u8>,
  /// Result bytes queued for the read side.
  responses: VecDeque<u8>,
  muted: bool,
}

impl AluSim {
  pub fn new() -> AluSim {
    AluSim {
      registers: [0; 32],
      frame: Vec::with_capacity(FRAME_SIZE),
      responses: VecDeque::new(),
      muted: false,
    }
  }

  /// A muted device keeps executing frames but never answers. Exercises the
  /// runner's timeout path.
  #[allow(dead_code)]
  pub fn mute(&mut self) {
    self.muted = true;
  }

  #[allow(dead_code)]
  pub fn register(&self, index: usize) -> u32 {
    self.registers[index]
  }

  fn execute(&mut self, word: Word) {
    let opcode = word & 0x7F;
    let rd = ((word >> 7) & 0x1F) as usize;
    let funct3 = (word >> 12) & 0x07;
    let rs1 = ((word >> 15) & 0x1F) as usize;
    let a = self.registers[rs1];

    let value = match opcode {
      OPCODE_ITYPE => {
        // The immediate occupies the top 12 bits; an arithmetic shift of the
        // whole word sign-extends it.
        let imm = ((word as i32) >> 20) as u32;
        match funct3 {
          0b000 => a.wrapping_add(imm),
          0b111 => a & imm,
          0b110 => a | imm,
          0b100 => a ^ imm,
          _ => return, // Unimplemented operation: the hardware stays silent.
        }
      }

      OPCODE_RTYPE => {
        let rs2 = ((word >> 20) & 0x1F) as usize;
        let funct7 = (word >> 25) & 0x7F;
        let b = self.registers[rs2];
        match (funct7, funct3) {
          (0b0000000, 0b000) => a.wrapping_add(b),
          (0b0100000, 0b000) => a.wrapping_sub(b),
          (0b0000000, 0b111) => a & b,
          (0b0000000, 0b110) => a | b,
          (0b0000000, 0b100) => a ^ b,
          (0b0000000, 0b101) => a >> (b & 0x1F),
          (0b0100000, 0b101) => ((a as i32) >> (b & 0x1F)) as u32,
          _ => return,
        }
      }

      _ => return,
    };

    // x0 is hard-wired to zero.
    if rd != 0 {
      self.registers[rd] = value;
    }

    if !self.muted {
      self.responses.push_back(self.registers[rd] as u8);
    }
  }
}

impl ByteStream for AluSim {
  fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
    self.frame.extend_from_slice(bytes);
    while self.frame.len() >= FRAME_SIZE {
      let rest = self.frame.split_off(FRAME_SIZE);
      let mut raw = [0u8; FRAME_SIZE];
      raw.copy_from_slice(&self.frame);
      self.frame = rest;
      self.execute(Word::from_le_bytes(raw));
    }
    Ok(())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }

  fn bytes_available(&self) -> usize {
    self.responses.len()
  }

  fn read_byte(&mut self) -> Option<u8> {
    self.responses.pop_front()
  }
}
