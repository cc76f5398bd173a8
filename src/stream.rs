/*!
  The minimal byte-stream capability set the transaction runner depends on.

  The expected production implementation is an asynchronous serial link (8 data
  bits, no parity, 1 stop bit, fixed baud rate) opened and configured by the
  caller; the bundled `AluSim` device and the test doubles implement the same
  trait in memory. The stream handle is always passed explicitly into the
  runner, never held as process-wide state.

*/
use std::io;

pub trait ByteStream {
  /// Writes the whole buffer or fails. A partial write is a failure.
  fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

  /// Forces any internally buffered outbound bytes out to the peer.
  fn flush(&mut self) -> io::Result<()>;

  /// Number of inbound bytes ready to be read without blocking.
  fn bytes_available(&self) -> usize;

  /// Consumes and returns exactly one inbound byte, if one is ready.
  fn read_byte(&mut self) -> Option<u8>;
}
