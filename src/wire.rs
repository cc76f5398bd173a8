/*!
  The wire format shared with the execution unit. Each instruction travels as
  exactly 4 bytes, the 32 bit word in little-endian order, with no header,
  checksum, or length prefix; framing is purely by fixed size. The peer answers
  each frame with exactly one result byte.

*/

/// A fully encoded 32 bit instruction. Once encoded, the word is opaque: the
/// transport layer carries it without interpreting any field.
pub type Word = u32;

/// Size in bytes of one outbound instruction frame.
pub const FRAME_SIZE: usize = 4;

/// Serializes a word for transmission. The byte order is a contract with the
/// receiving hardware and is deliberately not configurable; byte[0] carries
/// bits 0–7 and byte[3] carries bits 24–31.
pub fn serialize(word: Word) -> [u8; FRAME_SIZE] {
  word.to_le_bytes()
}

/// A result is the single received byte, verbatim. No sign extension and no
/// multi-byte assembly happen at this layer.
pub fn deserialize_result(byte: u8) -> u8 {
  byte
}
