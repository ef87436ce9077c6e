//! Reader-based feeder implementation.
//!
//! _Requires Cargo feature `std`._

use std::io::{ErrorKind, Read};

use thiserror::Error;

use super::{Analyzer, FromFrames, feed};

extern crate std;

/// Errors occurring while decoding from a reader.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The analyzer has no verified template.
    #[error("The analyzer has not been verified.")]
    NotReady,
}

/// Push bytes from a reader through an analyzer until end of input,
/// publishing each frame to a receiver as its last byte arrives.
///
/// Returns the number of frames completed. This method is also re-exported
/// as `bitgram::avec::decode_reader`.
///
/// _Requires Cargo feature `std`._
pub fn decode(
    r: &mut impl Read,
    a: &mut Analyzer,
    o: &mut impl FromFrames,
) -> Result<usize, Error> {
    if !a.is_ready() {
        Err(Error::NotReady)?;
    }

    let mut buf = [0; 256];
    let mut frames = 0;

    loop {
        let n = match r.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => Err(e)?,
        };

        for &b in &buf[..n] {
            if feed(a, b, o) {
                frames += 1;
            }
        }
    }

    Ok(frames)
}
