//! Slice-based feeder implementation.

use thiserror::Error;

use super::{Analyzer, FromFrames, feed};

/// Errors occurring while decoding from a slice.
#[derive(Debug, Error)]
pub enum Error {
    /// The analyzer has no verified template.
    #[error("The analyzer has not been verified.")]
    NotReady,
}

/// Push a slice of stream bytes through an analyzer, publishing each frame to
/// a receiver as its last byte arrives.
///
/// Returns the number of frames completed. This method is also re-exported
/// as `bitgram::avec::decode_slice`.
pub fn decode(r: &[u8], a: &mut Analyzer, o: &mut impl FromFrames) -> Result<usize, Error> {
    if !a.is_ready() {
        Err(Error::NotReady)?;
    }

    let mut frames = 0;
    for &b in r {
        if feed(a, b, o) {
            frames += 1;
        }
    }

    Ok(frames)
}
