use crate::{Error, Result, LENGTH_MASK, MAX_RECORD_LEN, RUN_FLAG};
use std::{fmt, io};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RecordKind {
    /// One content byte repeated `length` times.
    RunLength,
    /// `length` raw bytes.
    Literal,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::RunLength => f.write_str("run"),
            RecordKind::Literal => f.write_str("literal"),
        }
    }
}

/// Packs a record kind and length into a status byte.
///
/// `length` must be in `1..=127`.
#[inline(always)]
pub fn encode_status(kind: RecordKind, length: usize) -> u8 {
    debug_assert!(length >= 1);
    debug_assert!(length <= MAX_RECORD_LEN);
    let status = length as u8 & LENGTH_MASK;
    match kind {
        RecordKind::RunLength => status | RUN_FLAG,
        RecordKind::Literal => status,
    }
}

/// Splits a status byte into its record kind and length.
///
/// The length may be 0 for hand-crafted streams, the encoder never emits it.
#[inline(always)]
pub fn decode_status(status: u8) -> (RecordKind, usize) {
    let kind = if status & RUN_FLAG != 0 {
        RecordKind::RunLength
    } else {
        RecordKind::Literal
    };
    (kind, (status & LENGTH_MASK) as usize)
}

pub(crate) fn write_run<W: io::Write>(writer: &mut W, byte: u8, count: usize) -> Result<()> {
    debug_assert!(count >= 2);
    debug!("emit run: 0x{byte:02X} x {count}");
    writer
        .write_all(&[encode_status(RecordKind::RunLength, count), byte])
        .map_err(Error::Write)
}

pub(crate) fn write_literal<W: io::Write>(writer: &mut W, block: &[u8]) -> Result<()> {
    debug!("emit literal: len={}, {}", block.len(), hex::encode(block));
    writer
        .write_all(&[encode_status(RecordKind::Literal, block.len())])
        .map_err(Error::Write)?;
    writer.write_all(block).map_err(Error::Write)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Broken;

    #[test]
    fn test_status_byte() {
        assert_eq!(encode_status(RecordKind::RunLength, 127), 0xFF);
        assert_eq!(encode_status(RecordKind::RunLength, 73), 0xC9);
        assert_eq!(encode_status(RecordKind::Literal, 1), 0x01);
        assert_eq!(encode_status(RecordKind::Literal, 127), 0x7F);

        assert_eq!(decode_status(0x82), (RecordKind::RunLength, 2));
        assert_eq!(decode_status(0x80), (RecordKind::RunLength, 0));
        assert_eq!(decode_status(0x00), (RecordKind::Literal, 0));
        assert_eq!(decode_status(0x7F), (RecordKind::Literal, 127));
    }

    #[test]
    fn test_write_records() {
        let mut out = vec![];
        write_run(&mut out, 0x41, 200 - 127).unwrap();
        write_literal(&mut out, &[1, 2, 3]).unwrap();
        assert_eq!(out, hex::decode("c94103010203").unwrap());
    }

    #[test]
    fn test_write_fault() {
        assert!(matches!(write_run(&mut Broken, 0, 2), Err(Error::Write(_))));
        assert!(matches!(
            write_literal(&mut Broken, &[0]),
            Err(Error::Write(_))
        ));
    }
}
