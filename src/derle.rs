use crate::format::decode_status;
use crate::{Error, RecordKind, Result, MAX_RECORD_LEN};
use std::io;

/// Where the decoder is inside the current record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DecodePhase {
    /// Next byte is a status byte.
    AwaitingStatus,
    /// Next byte is repeated `length` times.
    ReadingRunByte { length: usize },
    /// `remaining` literal bytes still expected.
    ReadingBlockBytes { remaining: usize },
}

/// Online decoder. Writes reconstructed bytes to the wrapped writer.
pub struct Decompressor<W> {
    phase: DecodePhase,
    writer: W,
}

impl<W: io::Write> Decompressor<W> {
    pub fn new(writer: W) -> Decompressor<W> {
        Decompressor {
            phase: DecodePhase::AwaitingStatus,
            writer,
        }
    }

    pub fn phase(&self) -> DecodePhase {
        self.phase
    }

    pub fn is_at_record_boundary(&self) -> bool {
        self.phase == DecodePhase::AwaitingStatus
    }

    #[inline(always)]
    pub fn process_byte(&mut self, byte: u8) -> Result<()> {
        trace!("update byte 0x{byte:02X}, phase: {:?}", self.phase);
        match self.phase {
            DecodePhase::AwaitingStatus => {
                self.phase = match decode_status(byte) {
                    // an empty run still owns its content byte
                    (RecordKind::RunLength, length) => DecodePhase::ReadingRunByte { length },
                    (RecordKind::Literal, 0) => {
                        trace!("empty literal, skipped");
                        DecodePhase::AwaitingStatus
                    }
                    (RecordKind::Literal, remaining) => {
                        DecodePhase::ReadingBlockBytes { remaining }
                    }
                };
                trace!("transit to {:?}", self.phase);
            }
            DecodePhase::ReadingRunByte { length } => {
                debug!("decode run: 0x{byte:02X} x {length}");
                let run = [byte; MAX_RECORD_LEN];
                self.writer
                    .write_all(&run[..length])
                    .map_err(Error::Write)?;
                self.phase = DecodePhase::AwaitingStatus;
            }
            DecodePhase::ReadingBlockBytes { remaining } => {
                self.writer.write_all(&[byte]).map_err(Error::Write)?;
                self.phase = match remaining - 1 {
                    0 => DecodePhase::AwaitingStatus,
                    remaining => DecodePhase::ReadingBlockBytes { remaining },
                };
            }
        }
        Ok(())
    }

    /// Feeds a chunk. Literal payloads are copied through in one write.
    pub fn process(&mut self, mut buf: &[u8]) -> Result<()> {
        while let Some((&byte, rest)) = buf.split_first() {
            match self.phase {
                DecodePhase::ReadingBlockBytes { remaining } => {
                    let take = remaining.min(buf.len());
                    trace!("decode literal: {}", hex::encode(&buf[..take]));
                    self.writer
                        .write_all(&buf[..take])
                        .map_err(Error::Write)?;
                    self.phase = match remaining - take {
                        0 => DecodePhase::AwaitingStatus,
                        remaining => DecodePhase::ReadingBlockBytes { remaining },
                    };
                    buf = &buf[take..];
                }
                _ => {
                    self.process_byte(byte)?;
                    buf = rest;
                }
            }
        }
        Ok(())
    }

    /// Checks the stream ended on a record boundary, flushes and hands back
    /// the writer.
    pub fn finalize(mut self) -> Result<W> {
        let (kind, missing) = match self.phase {
            DecodePhase::AwaitingStatus => {
                self.writer.flush().map_err(Error::Write)?;
                return Ok(self.writer);
            }
            DecodePhase::ReadingRunByte { .. } => (RecordKind::RunLength, 1),
            DecodePhase::ReadingBlockBytes { remaining } => (RecordKind::Literal, remaining),
        };
        warn!("input ended inside a {kind} record, {missing} byte(s) missing");
        Err(Error::TruncatedStream { kind, missing })
    }
}

impl<W: io::Write> io::Write for Decompressor<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.process(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
