/*!

  The subset of RV32I the execution unit implements: seven register-register
  operations and four register-immediate operations, all 32 bits wide. The two
  formats share their low-order layout:

    opcode: bits  0–6
    rd:     bits  7–11
    funct3: bits 12–14
    rs1:    bits 15–19

  The register-immediate format places a 12 bit immediate in bits 20–31; the
  register-register format places rs2 in bits 20–24 and funct7 in bits 25–31.
  funct3 (and funct7, where present) disambiguate operations sharing a primary
  opcode.

  Mnemonics form a closed set fixed at compile time. Each is associated with a
  small immutable record of (format, opcode, funct3, funct7) through a static
  table; there is no runtime registration.

*/

mod encode;
mod instruction;

pub use encode::{encode, encode_itype, encode_rtype, EncodeError};
pub use instruction::{Format, Instruction, Mnemonic, OPCODE_ITYPE, OPCODE_RTYPE};
