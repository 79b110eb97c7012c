#[macro_use]
extern crate log;

use anyhow::Context;
use honk::{run, Mode};
use std::io::{self, BufWriter};

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let mode = Mode::from_args(std::env::args().skip(1));
    info!("honk: {mode:?}");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let output = BufWriter::new(stdout.lock());
    run(mode, stdin.lock(), output).with_context(|| match mode {
        Mode::Compress => "error while compressing",
        Mode::Decompress => "error while decompressing",
    })?;
    Ok(())
}
