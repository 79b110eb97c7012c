use crate::{Compressor, Decompressor, Error, Result, MAX_RECORD_LEN, READ_BUF_SIZE};
use std::io::{self, Read, Write};

/// Direction of a session.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Compress,
    Decompress,
}

impl Mode {
    /// Any argument equal to `-d` selects decompression.
    pub fn from_args<I, S>(args: I) -> Mode
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if args.into_iter().any(|arg| arg.as_ref() == "-d") {
            Mode::Decompress
        } else {
            Mode::Compress
        }
    }
}

/// One encode or decode pass, chosen once at start.
pub enum Session<W> {
    Compress(Compressor<W>),
    Decompress(Decompressor<W>),
}

impl<W: Write> Session<W> {
    pub fn new(mode: Mode, writer: W) -> Self {
        match mode {
            Mode::Compress => Session::Compress(Compressor::new(writer)),
            Mode::Decompress => Session::Decompress(Decompressor::new(writer)),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Session::Compress(_) => Mode::Compress,
            Session::Decompress(_) => Mode::Decompress,
        }
    }

    pub fn process_byte(&mut self, byte: u8) -> Result<()> {
        match self {
            Session::Compress(rle) => rle.process_byte(byte),
            Session::Decompress(derle) => derle.process_byte(byte),
        }
    }

    pub fn process(&mut self, buf: &[u8]) -> Result<()> {
        match self {
            Session::Compress(rle) => rle.process(buf),
            Session::Decompress(derle) => derle.process(buf),
        }
    }

    pub fn finalize(self) -> Result<W> {
        match self {
            Session::Compress(rle) => rle.finalize(),
            Session::Decompress(derle) => derle.finalize(),
        }
    }
}

/// Pumps `input` through a fresh session until end of input, then finalizes.
pub fn run<R: Read, W: Write>(mode: Mode, mut input: R, output: W) -> Result<W> {
    let mut session = Session::new(mode, CountingWriter::new(output));
    let mut buf = [0u8; READ_BUF_SIZE];
    let mut read_total = 0u64;
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Read(e)),
        };
        read_total += n as u64;
        session.process(&buf[..n])?;
    }
    let output = session.finalize()?;
    debug!(
        "{mode:?} done: {read_total} bytes in, {} bytes out",
        output.written
    );
    Ok(output.inner)
}

pub fn compress_bytes(input: &[u8]) -> Vec<u8> {
    let mut rle = Compressor::new(Vec::with_capacity(input.len() + input.len() / MAX_RECORD_LEN + 1));
    // writing to a Vec cannot fail
    match rle.process(input).and_then(|_| rle.finalize()) {
        Ok(out) => out,
        Err(e) => unreachable!("in-memory compression failed: {e}"),
    }
}

pub fn decompress_bytes(input: &[u8]) -> Result<Vec<u8>> {
    let mut derle = Decompressor::new(Vec::with_capacity(input.len()));
    derle.process(input)?;
    derle.finalize()
}

struct CountingWriter<W> {
    inner: W,
    written: u64,
}

impl<W> CountingWriter<W> {
    fn new(inner: W) -> Self {
        CountingWriter { inner, written: 0 }
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
