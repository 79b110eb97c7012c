//! # Encoding Scheme
//!
//! The stream is a concatenation of records. Every record starts with a
//! status byte:
//!
//! ```text
//!         MSB      LSB
//!          │        │
//!          ▼        ▼
//!         KLLL LLLL
//!         ▲
//!  KIND───┘
//! ```
//!
//! `K = 1` marks a run: the status byte is followed by a single content byte
//! which is repeated `L` times.
//!
//! `K = 0` marks a literal block: the status byte is followed by `L` raw bytes.
//!
//! `L` is in `1..=127`. The encoder only opens a run after two equal bytes,
//! so runs are always at least 2 long; a lone byte is cheaper inside a block.
//!
//! In worst case (no two adjacent bytes equal) every 127 bytes cost one extra
//! status byte. In best case 2 bytes encode 127.
//!
//! # Streaming
//!
//! Both directions are online state machines consuming one byte at a time,
//! with at most 127 bytes buffered. There is no header, trailer or checksum.
//! The end of a compressed stream MUST coincide with a record boundary,
//! otherwise the decoder reports [`Error::TruncatedStream`].
//!
//! ```
//! let packed = honk::compress_bytes(b"AAAAAAAAB");
//! assert_eq!(packed, [0x88, b'A', 0x01, b'B']);
//! assert_eq!(honk::decompress_bytes(&packed).unwrap(), b"AAAAAAAAB");
//! ```

#[macro_use]
extern crate log;

mod derle;
mod error;
mod format;
mod rle;
mod session;

pub use derle::{DecodePhase, Decompressor};
pub use error::{Error, Result};
pub use format::{decode_status, encode_status, RecordKind};
pub use rle::Compressor;
pub use session::{compress_bytes, decompress_bytes, run, Mode, Session};

/// Longest run or literal block a single record can carry.
pub const MAX_RECORD_LEN: usize = 0x7F;
/// Status bit marking a run record.
const RUN_FLAG: u8 = 0x80;
/// Status bits holding the record length.
const LENGTH_MASK: u8 = 0x7F;
/// Block size used when pulling bytes from a reader.
const READ_BUF_SIZE: usize = 4096;
