/*!
  Drives a sequence of encode → send → await-result exchanges over a byte
  stream, strictly one instruction at a time, and accumulates the outcomes into
  an ordered report.

  A result that never arrives is recorded as absent and the sequence continues:
  a missing answer for one instruction is independently informative and must
  not hide the answers for the instructions after it. Encoding and write
  failures, by contrast, abort the remaining sequence immediately, since a
  malformed instruction or a partial frame desynchronizes the protocol.

*/
use std::fmt::{Display, Formatter};
use std::io;
use std::thread;
use std::time::{Duration, Instant};

use prettytable::{format as TableFormat, Table};

use crate::isa::{encode, EncodeError, Instruction};
use crate::stream::ByteStream;
use crate::wire::{self, Word};

/// How long the polling read sleeps between checks for an inbound byte.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// One sent word paired with its result byte. `None` means the peer did not
/// answer within the deadline.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Exchange {
  pub word: Word,
  pub result: Option<u8>,
}

/// Ordered outcome of a transaction, one entry per submitted instruction.
/// Immutable once returned by `run_transaction`.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TransactionReport {
  exchanges: Vec<Exchange>,
}

impl TransactionReport {
  pub fn exchanges(&self) -> &[Exchange] {
    &self.exchanges
  }

  pub fn len(&self) -> usize {
    self.exchanges.len()
  }
}

lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl Display for TransactionReport {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let mut table = Table::new();
    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"#", ub->"Word", ubl->"Result"]);

    for (index, exchange) in self.exchanges.iter().enumerate() {
      match exchange.result {
        Some(byte) => {
          table.add_row(row![r->index, format!("{:#010X}", exchange.word), l->byte]);
        }

        None => {
          table.add_row(row![r->index, format!("{:#010X}", exchange.word), l->"timed out"]);
        }
      }
    }

    write!(f, "{}", table)
  }
}

/// A failure that stopped the sequence. Both variants carry the zero-based
/// index of the instruction that failed; nothing was attempted after it.
#[derive(Debug)]
pub enum TransactionError {
  Encode { index: usize, source: EncodeError },
  Write { index: usize, source: io::Error },
}

impl Display for TransactionError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      TransactionError::Encode { index, source } => {
        write!(f, "instruction {} failed to encode: {}", index, source)
      }

      TransactionError::Write { index, source } => {
        write!(f, "frame for instruction {} failed to send: {}", index, source)
      }
    }
  }
}

impl std::error::Error for TransactionError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      TransactionError::Encode { source, .. } => Some(source),
      TransactionError::Write { source, .. } => Some(source),
    }
  }
}

/**
  Sends each instruction in order and awaits its one-byte result.

  Per instruction: encode, write the 4 byte frame, flush so the peer sees the
  complete frame before anything else is written, then poll for one inbound
  byte until `per_result_timeout` elapses. A timeout records an absent result
  and the sequence continues; there is no automatic resend. Instructions are
  never reordered and never overlap on the stream.
*/
pub fn run_transaction<S: ByteStream>(
  stream: &mut S,
  instructions: &[Instruction],
  per_result_timeout: Duration,
) -> Result<TransactionReport, TransactionError> {
  let mut exchanges = Vec::with_capacity(instructions.len());

  for (index, instruction) in instructions.iter().enumerate() {
    let word =
      encode(instruction).map_err(|source| TransactionError::Encode { index, source })?;

    let frame = wire::serialize(word);
    stream
      .write_all(&frame)
      .and_then(|_| stream.flush())
      .map_err(|source| TransactionError::Write { index, source })?;

    #[cfg(feature = "trace_exchanges")]
    println!("TX [{}] {}  ({:#010X})", index, instruction, word);

    let result = await_result(stream, per_result_timeout);

    #[cfg(feature = "trace_exchanges")]
    match result {
      Some(byte) => println!("RX [{}] {}", index, byte),
      None => println!("RX [{}] timed out", index),
    }

    exchanges.push(Exchange { word, result });
  }

  Ok(TransactionReport { exchanges })
}

/// Polls for a single inbound byte until the deadline passes, sleeping
/// `POLL_INTERVAL` between checks. Consumes exactly one byte on arrival;
/// surplus buffered bytes are left for the next exchange.
fn await_result<S: ByteStream>(stream: &mut S, timeout: Duration) -> Option<u8> {
  let deadline = Instant::now() + timeout;

  loop {
    if stream.bytes_available() > 0 {
      if let Some(byte) = stream.read_byte() {
        return Some(wire::deserialize_result(byte));
      }
    }

    if Instant::now() >= deadline {
      return None;
    }

    thread::sleep(POLL_INTERVAL);
  }
}
