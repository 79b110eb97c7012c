use crate::RecordKind;
use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("error while reading from input")]
    Read(#[source] io::Error),

    #[error("error while writing to output")]
    Write(#[source] io::Error),

    /// Input ended inside a record.
    #[error("bad format: stream ended inside a {kind} record, {missing} byte(s) missing")]
    TruncatedStream { kind: RecordKind, missing: usize },
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Read(e) | Error::Write(e) => e,
            e @ Error::TruncatedStream { .. } => io::Error::new(io::ErrorKind::InvalidData, e),
        }
    }
}
