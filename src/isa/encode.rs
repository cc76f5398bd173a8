/*!
  This module is responsible for packing instructions into 32 bit words.

*/
use std::fmt::{Display, Formatter};

use super::instruction::{Encoding, Format, Instruction, Mnemonic, Register, ENCODINGS};
use crate::wire::Word;

// Field widths and positions. Both formats share the low-order layout
// (opcode, rd, funct3, rs1), so a single packing helper serves both.
const OPCODE_MASK: u32 = 0x7F;
const REGISTER_MASK: u32 = 0x1F;
const FUNCT3_MASK: u32 = 0x07;
const FUNCT7_MASK: u32 = 0x7F;
const IMM12_MASK: u32 = 0xFFF;

const RD_SHIFT: u32 = 7;
const FUNCT3_SHIFT: u32 = 12;
const RS1_SHIFT: u32 = 15;
const RS2_SHIFT: u32 = 20;
const IMM_SHIFT: u32 = 20;
const FUNCT7_SHIFT: u32 = 25;

/// Why an instruction could not be turned into a word. Either failure aborts
/// the sequence it belongs to; see `transaction::run_transaction`.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum EncodeError {
  /// The mnemonic has no encoding in the requested format, e.g. `addi`
  /// handed to the register-register encoder.
  UnknownMnemonic { mnemonic: Mnemonic, format: Format },
  /// A register operand lies outside x0–x31. Register fields are validated,
  /// never silently masked.
  RegisterOutOfRange { field: &'static str, value: Register },
}

impl Display for EncodeError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      EncodeError::UnknownMnemonic { mnemonic, format } => {
        write!(f, "`{}` has no {} encoding", mnemonic, format)
      }

      EncodeError::RegisterOutOfRange { field, value } => {
        write!(f, "register operand {} is x{}, outside x0-x31", field, value)
      }
    }
  }
}

impl std::error::Error for EncodeError {}

fn lookup(mnemonic: Mnemonic, format: Format) -> Result<Encoding, EncodeError> {
  match ENCODINGS.get(&mnemonic) {
    Some(encoding) if encoding.format == format => Ok(*encoding),
    _ => Err(EncodeError::UnknownMnemonic { mnemonic, format }),
  }
}

fn require_register(field: &'static str, value: Register) -> Result<u32, EncodeError> {
  match value <= 31 {
    true => Ok(value as u32),
    false => Err(EncodeError::RegisterOutOfRange { field, value }),
  }
}

/// Packs the fields common to both formats. Every field is masked to its
/// declared width before placement so that an oversized value can never bleed
/// into a neighboring field.
fn pack_common(opcode: u32, rd: u32, funct3: u32, rs1: u32) -> Word {
  (opcode & OPCODE_MASK)
    | ((rd & REGISTER_MASK) << RD_SHIFT)
    | ((funct3 & FUNCT3_MASK) << FUNCT3_SHIFT)
    | ((rs1 & REGISTER_MASK) << RS1_SHIFT)
}

/**
  Encodes a register-immediate instruction:

    [imm:12][rs1:5][funct3:3][rd:5][opcode:7]

  The immediate is reduced to its low 12 bits by two's-complement wraparound,
  matching the hardware field width. Values outside [-2048, 2047] wrap rather
  than saturate or error.
*/
pub fn encode_itype(
  mnemonic: Mnemonic,
  rd: Register,
  rs1: Register,
  imm: i32,
) -> Result<Word, EncodeError> {
  let encoding = lookup(mnemonic, Format::RegisterImmediate)?;
  let rd = require_register("rd", rd)?;
  let rs1 = require_register("rs1", rs1)?;
  let imm12 = (imm as u32) & IMM12_MASK;

  Ok(pack_common(encoding.opcode, rd, encoding.funct3, rs1) | (imm12 << IMM_SHIFT))
}

/**
  Encodes a register-register instruction:

    [funct7:7][rs2:5][rs1:5][funct3:3][rd:5][opcode:7]

  funct7 and funct3 jointly select the operation.
*/
pub fn encode_rtype(
  mnemonic: Mnemonic,
  rd: Register,
  rs1: Register,
  rs2: Register,
) -> Result<Word, EncodeError> {
  let encoding = lookup(mnemonic, Format::RegisterRegister)?;
  let rd = require_register("rd", rd)?;
  let rs1 = require_register("rs1", rs1)?;
  let rs2 = require_register("rs2", rs2)?;
  let funct7 = encoding.funct7.unwrap_or(0);

  Ok(
    pack_common(encoding.opcode, rd, encoding.funct3, rs1)
      | ((rs2 & REGISTER_MASK) << RS2_SHIFT)
      | ((funct7 & FUNCT7_MASK) << FUNCT7_SHIFT),
  )
}

/// Encodes any supported instruction. This is the primitive the transaction
/// runner drives, dispatching on the operand shape.
pub fn encode(instruction: &Instruction) -> Result<Word, EncodeError> {
  match *instruction {
    Instruction::RegisterImmediate { mnemonic, rd, rs1, imm } => {
      encode_itype(mnemonic, rd, rs1, imm)
    }

    Instruction::RegisterRegister { mnemonic, rd, rs1, rs2 } => {
      encode_rtype(mnemonic, rd, rs1, rs2)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::isa::{OPCODE_ITYPE, OPCODE_RTYPE};

  // Field extractors used to check round trips.
  fn opcode_of(word: Word) -> u32 { word & 0x7F }
  fn rd_of(word: Word) -> u32 { (word >> 7) & 0x1F }
  fn funct3_of(word: Word) -> u32 { (word >> 12) & 0x07 }
  fn rs1_of(word: Word) -> u32 { (word >> 15) & 0x1F }
  fn rs2_of(word: Word) -> u32 { (word >> 20) & 0x1F }
  fn funct7_of(word: Word) -> u32 { (word >> 25) & 0x7F }
  fn imm_of(word: Word) -> u32 { word >> 20 }

  #[test]
  fn known_words() {
    // addi x1, x0, 5
    assert_eq!(encode_itype(Mnemonic::Addi, 1, 0, 5), Ok(0x0050_0093));
    // addi x2, x0, 10
    assert_eq!(encode_itype(Mnemonic::Addi, 2, 0, 10), Ok(0x00A0_0113));
    // add x3, x1, x2
    assert_eq!(encode_rtype(Mnemonic::Add, 3, 1, 2), Ok(0x0020_81B3));
  }

  #[test]
  fn itype_fields_round_trip() {
    let word = encode_itype(Mnemonic::Xori, 7, 19, -2048).unwrap();
    assert_eq!(opcode_of(word), OPCODE_ITYPE);
    assert_eq!(rd_of(word), 7);
    assert_eq!(funct3_of(word), 0b100);
    assert_eq!(rs1_of(word), 19);
    assert_eq!(imm_of(word), (-2048i32 as u32) & 0xFFF);
  }

  #[test]
  fn rtype_fields_round_trip() {
    let word = encode_rtype(Mnemonic::Sra, 31, 30, 29).unwrap();
    assert_eq!(opcode_of(word), OPCODE_RTYPE);
    assert_eq!(rd_of(word), 31);
    assert_eq!(funct3_of(word), 0b101);
    assert_eq!(rs1_of(word), 30);
    assert_eq!(rs2_of(word), 29);
    assert_eq!(funct7_of(word), 0b0100000);
  }

  #[test]
  fn immediate_wraps_to_twelve_bits() {
    let narrow = encode_itype(Mnemonic::Addi, 1, 0, 5).unwrap();
    let wrapped = encode_itype(Mnemonic::Addi, 1, 0, 5 - 4096).unwrap();
    assert_eq!(narrow, wrapped);
  }

  #[test]
  fn register_out_of_range_is_rejected() {
    assert_eq!(
      encode_itype(Mnemonic::Addi, 32, 0, 1),
      Err(EncodeError::RegisterOutOfRange { field: "rd", value: 32 })
    );
    assert_eq!(
      encode_rtype(Mnemonic::Add, 0, 1, 255),
      Err(EncodeError::RegisterOutOfRange { field: "rs2", value: 255 })
    );
  }

  #[test]
  fn wrong_format_mnemonic_is_unknown() {
    assert_eq!(
      encode_rtype(Mnemonic::Addi, 1, 2, 3),
      Err(EncodeError::UnknownMnemonic {
        mnemonic: Mnemonic::Addi,
        format: Format::RegisterRegister
      })
    );
    assert_eq!(
      encode_itype(Mnemonic::Sub, 1, 2, 3),
      Err(EncodeError::UnknownMnemonic {
        mnemonic: Mnemonic::Sub,
        format: Format::RegisterImmediate
      })
    );
  }
}
