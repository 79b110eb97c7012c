use crate::format::{write_literal, write_run};
use crate::{Result, MAX_RECORD_LEN};
use std::fmt::Debug;
use std::{fmt, io};

/// Online encoder. Wraps a writer and emits records as soon as they close.
pub struct Compressor<W> {
    status: CompressStatus,
    block: [u8; MAX_RECORD_LEN],
    writer: W,
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum CompressStatus {
    /// Collecting raw bytes in `block[..len]`. The last collected byte is the
    /// candidate for a run.
    Block { len: usize },
    /// Counting a run of `byte`, always at least 2 long.
    Run { byte: u8, counter: usize },
}

impl<W: io::Write> Compressor<W> {
    pub fn new(writer: W) -> Self {
        Compressor {
            status: CompressStatus::Block { len: 0 },
            block: [0; MAX_RECORD_LEN],
            writer,
        }
    }

    #[inline(always)]
    pub fn process_byte(&mut self, byte: u8) -> Result<()> {
        trace!("update byte 0x{byte:02X}, current status {:?}", self.status);
        match self.status {
            CompressStatus::Block { len } if len > 0 && self.block[len - 1] == byte => {
                // the repeated byte leaves the block and opens the run
                let literal_len = len - 1;
                if literal_len > 0 {
                    write_literal(&mut self.writer, &self.block[..literal_len])?;
                }
                self.status = CompressStatus::Run { byte, counter: 2 };
                trace!("transit to {:?}", self.status);
            }
            CompressStatus::Block { len } => {
                self.block[len] = byte;
                let len = len + 1;
                if len == MAX_RECORD_LEN {
                    write_literal(&mut self.writer, &self.block)?;
                    self.status = CompressStatus::Block { len: 0 };
                    trace!("block full, transit to {:?}", self.status);
                } else {
                    self.status = CompressStatus::Block { len };
                }
            }
            CompressStatus::Run { byte: run, counter } if run == byte => {
                let counter = counter + 1;
                if counter == MAX_RECORD_LEN {
                    write_run(&mut self.writer, run, counter)?;
                    self.status = CompressStatus::Block { len: 0 };
                    trace!("run full, transit to {:?}", self.status);
                } else {
                    self.status = CompressStatus::Run { byte, counter };
                }
            }
            CompressStatus::Run { byte: run, counter } => {
                write_run(&mut self.writer, run, counter)?;
                self.block[0] = byte;
                self.status = CompressStatus::Block { len: 1 };
                trace!("transit to {:?}", self.status);
            }
        }
        Ok(())
    }

    pub fn process(&mut self, buf: &[u8]) -> Result<()> {
        buf.iter().try_for_each(|&byte| self.process_byte(byte))
    }

    /// Bytes held back waiting for the current record to close.
    pub fn pending(&self) -> usize {
        match self.status {
            CompressStatus::Block { len } => len,
            CompressStatus::Run { counter, .. } => counter,
        }
    }

    /// Emits the open record, flushes and hands back the writer.
    pub fn finalize(mut self) -> Result<W> {
        trace!("last record: {:?}", self.status);
        match self.status {
            CompressStatus::Run { byte, counter } => write_run(&mut self.writer, byte, counter)?,
            CompressStatus::Block { len } if len > 0 => {
                write_literal(&mut self.writer, &self.block[..len])?
            }
            CompressStatus::Block { .. } => {}
        }
        self.writer.flush().map_err(crate::Error::Write)?;
        Ok(self.writer)
    }
}

impl Debug for CompressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressStatus::Block { len } => f.debug_struct("Block").field("len", len).finish(),
            CompressStatus::Run { byte, counter } => f
                .debug_struct("Run")
                .field("byte", &format!("0x{byte:02X}"))
                .field("counter", counter)
                .finish(),
        }
    }
}

impl<W: io::Write> io::Write for Compressor<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.process(buf)?;
        Ok(buf.len())
    }

    /// Flushes the inner writer. The open record stays buffered until
    /// [`Compressor::finalize`].
    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::Compressor;
    use crate::testing::{records, setup, Broken};
    use crate::{Error, RecordKind, MAX_RECORD_LEN};
    use std::io::Write;

    const TEST_VECTOR: [(&str, &str); 14] = [
        ("", ""),
        ("41", "0141"),
        ("4141", "8241"),
        ("010203", "03010203"),
        ("050509", "82050109"),
        ("414142", "82410142"),
        ("01020303", "0201028203"),
        ("0101010202", "83018202"),
        ("0102010201", "050102010201"),
        ("0102020203", "010183020103"),
        ("00000000ff00", "840002ff00"),
        ("f0f0f0f0f0f0f0f00f0f0f0f", "88f0840f"),
        ("f0f00ff0f00f", "82f0010f82f0010f"),
        ("abcdcdcdcdef", "01ab84cd01ef"),
    ];

    #[test]
    fn test_rle_encode() {
        setup();
        for (input, expected) in TEST_VECTOR.into_iter() {
            let input = hex::decode(input).unwrap();
            let expected = hex::decode(expected).unwrap();
            let mut out = vec![];
            let mut rle = Compressor::new(&mut out);
            rle.write_all(&input).unwrap();
            rle.finalize().unwrap();
            assert_eq!(expected, out);
        }
    }

    #[test]
    fn test_long_run_splits() {
        setup();
        let mut rle = Compressor::new(vec![]);
        rle.process(&[0x41; 200]).unwrap();
        let out = rle.finalize().unwrap();
        assert_eq!(out, hex::decode("ff41c941").unwrap());

        // a full run leaves an empty block, a trailing single byte is a literal
        let mut rle = Compressor::new(vec![]);
        rle.process(&[0xAA; 128]).unwrap();
        assert_eq!(rle.finalize().unwrap(), hex::decode("ffaa01aa").unwrap());

        let mut rle = Compressor::new(vec![]);
        rle.process(&[0xAA; 129]).unwrap();
        assert_eq!(rle.finalize().unwrap(), hex::decode("ffaa82aa").unwrap());
    }

    #[test]
    fn test_full_block_splits() {
        setup();
        let input: Vec<u8> = (0..MAX_RECORD_LEN as u8).collect();
        let mut rle = Compressor::new(vec![]);
        rle.process(&input).unwrap();
        assert_eq!(rle.pending(), 0);
        // equal to the last byte of the flushed block, must not open a run
        rle.process_byte(126).unwrap();
        let out = rle.finalize().unwrap();

        let mut expected = vec![0x7F];
        expected.extend_from_slice(&input);
        expected.extend_from_slice(&[0x01, 126]);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_maximal_runs() {
        setup();
        for k in [2usize, 3, 126, 127, 200, 254, 256, 300, 1000] {
            let mut input = vec![0x11];
            input.extend(std::iter::repeat(0x22).take(k));
            input.push(0x33);
            let mut rle = Compressor::new(vec![]);
            rle.process(&input).unwrap();
            let out = rle.finalize().unwrap();

            let runs: Vec<_> = records(&out)
                .into_iter()
                .filter(|(kind, _, _)| *kind == RecordKind::RunLength)
                .collect();
            assert_eq!(runs.len(), k.div_ceil(MAX_RECORD_LEN), "k={k}");
            assert_eq!(runs.iter().map(|(_, len, _)| len).sum::<usize>(), k);
            assert!(runs.iter().all(|(_, _, payload)| payload == &[0x22]));
        }
    }

    #[test]
    fn test_pending() {
        let mut rle = Compressor::new(vec![]);
        assert_eq!(rle.pending(), 0);
        rle.process(&[1, 2, 3]).unwrap();
        assert_eq!(rle.pending(), 3);
        rle.process_byte(3).unwrap();
        assert_eq!(rle.pending(), 2);
        rle.process_byte(3).unwrap();
        assert_eq!(rle.pending(), 3);
    }

    #[test]
    fn test_write_fault() {
        let mut rle = Compressor::new(Broken);
        // nothing is emitted until a record closes
        rle.process(&[1, 2]).unwrap();
        assert!(matches!(rle.process(&[2, 3]), Err(Error::Write(_))));
    }
}
