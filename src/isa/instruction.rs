
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use strum_macros::{Display as StrumDisplay, IntoStaticStr};

/// Index of one of the 32 architectural registers. Valid values are 0–31;
/// the encoder rejects anything larger rather than masking it away.
pub type Register = u8;

/// Primary opcode shared by all register-immediate operations.
pub const OPCODE_ITYPE: u32 = 0b0010011;
/// Primary opcode shared by all register-register operations.
pub const OPCODE_RTYPE: u32 = 0b0110011;

/**
  Operation names understood by the execution unit.

  The set is closed: a mnemonic is never constructed dynamically, only parsed
  from its lower-case text form or named directly. Which of the two formats a
  mnemonic belongs to is a property of the mnemonic itself, recorded in the
  `ENCODINGS` table below.
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumString,
Clone,        Copy,          Eq, PartialEq, Debug, Hash
)]
#[strum(serialize_all = "lowercase")]
pub enum Mnemonic {
  // Register-register operations //
  Add,
  Sub,
  And,
  Or,
  Xor,
  Srl,
  Sra,

  // Register-immediate operations //
  Addi,
  Andi,
  Ori,
  Xori,
}

/// The two instruction formats, distinguished on the wire by primary opcode.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum Format {
  RegisterImmediate,
  RegisterRegister,
}

impl Display for Format {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Format::RegisterImmediate => {
        write!(f, "register-immediate")
      }
      Format::RegisterRegister => {
        write!(f, "register-register")
      }
    }
  }
}

/// The fixed bit-field values associated with one mnemonic.
#[derive(Clone, Copy, Debug)]
pub struct Encoding {
  pub format: Format,
  pub opcode: u32,
  pub funct3: u32,
  /// Only the register-register format carries a funct7 field.
  pub funct7: Option<u32>,
}

impl Encoding {
  fn itype(funct3: u32) -> Encoding {
    Encoding {
      format: Format::RegisterImmediate,
      opcode: OPCODE_ITYPE,
      funct3,
      funct7: None,
    }
  }

  fn rtype(funct7: u32, funct3: u32) -> Encoding {
    Encoding {
      format: Format::RegisterRegister,
      opcode: OPCODE_RTYPE,
      funct3,
      funct7: Some(funct7),
    }
  }
}

lazy_static! {
  /// Static mnemonic → bit-field table, built once and never mutated.
  pub static ref ENCODINGS: HashMap<Mnemonic, Encoding> = {
    use Mnemonic::*;

    let mut table = HashMap::new();

    table.insert(Add,  Encoding::rtype(0b0000000, 0b000));
    table.insert(Sub,  Encoding::rtype(0b0100000, 0b000));
    table.insert(And,  Encoding::rtype(0b0000000, 0b111));
    table.insert(Or,   Encoding::rtype(0b0000000, 0b110));
    table.insert(Xor,  Encoding::rtype(0b0000000, 0b100));
    table.insert(Srl,  Encoding::rtype(0b0000000, 0b101));
    table.insert(Sra,  Encoding::rtype(0b0100000, 0b101));

    table.insert(Addi, Encoding::itype(0b000));
    table.insert(Andi, Encoding::itype(0b111));
    table.insert(Ori,  Encoding::itype(0b110));
    table.insert(Xori, Encoding::itype(0b100));

    table
  };
}

/// Holds the unencoded components of an instruction. As such, it enumerates
/// the two supported operand shapes.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum Instruction {
  /// [imm:12][rs1:5][funct3:3][rd:5][opcode:7]
  RegisterImmediate {
    mnemonic: Mnemonic,
    rd: Register,
    rs1: Register,
    imm: i32,
  },
  /// [funct7:7][rs2:5][rs1:5][funct3:3][rd:5][opcode:7]
  RegisterRegister {
    mnemonic: Mnemonic,
    rd: Register,
    rs1: Register,
    rs2: Register,
  },
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Instruction::RegisterImmediate { mnemonic, rd, rs1, imm } => {
        write!(f, "{} x{}, x{}, {}", mnemonic, rd, rs1, imm)
      }

      Instruction::RegisterRegister { mnemonic, rd, rs1, rs2 } => {
        write!(f, "{} x{}, x{}, x{}", mnemonic, rd, rs1, rs2)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn mnemonic_from_text() {
    assert_eq!(Mnemonic::from_str("addi"), Ok(Mnemonic::Addi));
    assert_eq!(Mnemonic::from_str("sra"), Ok(Mnemonic::Sra));
    assert!(Mnemonic::from_str("mul").is_err());
    assert!(Mnemonic::from_str("ADDI").is_err());
  }

  #[test]
  fn every_mnemonic_has_an_encoding() {
    use Mnemonic::*;

    for mnemonic in [Add, Sub, And, Or, Xor, Srl, Sra].iter() {
      let encoding = &ENCODINGS[mnemonic];
      assert_eq!(encoding.format, Format::RegisterRegister);
      assert_eq!(encoding.opcode, OPCODE_RTYPE);
      assert!(encoding.funct7.is_some());
    }

    for mnemonic in [Addi, Andi, Ori, Xori].iter() {
      let encoding = &ENCODINGS[mnemonic];
      assert_eq!(encoding.format, Format::RegisterImmediate);
      assert_eq!(encoding.opcode, OPCODE_ITYPE);
      assert!(encoding.funct7.is_none());
    }
  }

  #[test]
  fn display_renders_assembly_text() {
    let addi = Instruction::RegisterImmediate {
      mnemonic: Mnemonic::Addi,
      rd: 1,
      rs1: 0,
      imm: 5,
    };
    assert_eq!(format!("{}", addi), "addi x1, x0, 5");

    let add = Instruction::RegisterRegister {
      mnemonic: Mnemonic::Add,
      rd: 3,
      rs1: 1,
      rs2: 2,
    };
    assert_eq!(format!("{}", add), "add x3, x1, x2");
  }
}
