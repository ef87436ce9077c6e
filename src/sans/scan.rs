//! Backward search of the backlog for the most recent complete frame.

use alloc::{vec, vec::Vec};

use super::{
    buffer::StreamBuffer,
    template::{FrameTemplate, Slot},
};

/// Frames of backlog retained by a scanner.
pub const BUFFER_FRAMES: usize = 3;

/// Where a matched frame lies in the backlog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Bytes received after the frame's last byte. Zero when the frame was
    /// completed by the most recent byte.
    pub lag: usize,
}

/// The bytes of the most recently matched frame, one per slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    bytes: Vec<u8>,
}

impl CapturedFrame {
    fn new(len: usize) -> Self {
        Self { bytes: vec![0; len] }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Buffers stream bytes and locates frames matching a template.
#[derive(Debug, Clone)]
pub struct FrameScanner {
    template: FrameTemplate,
    buffer: StreamBuffer,
    captured: CapturedFrame,
    staged: Vec<u8>,
}

impl FrameScanner {
    /// Create a scanner retaining [`BUFFER_FRAMES`] frames of backlog.
    pub fn new(template: FrameTemplate) -> Self {
        let len = template.len();

        Self {
            buffer: StreamBuffer::new(BUFFER_FRAMES * len),
            captured: CapturedFrame::new(len),
            staged: vec![0; len],
            template,
        }
    }

    pub fn push(&mut self, b: u8) {
        self.buffer.push(b);
    }

    /// Search the backlog, newest byte first, for a run whose marker bytes all
    /// agree with the template.
    ///
    /// Candidates are anchored on the template's last marker slot and the
    /// nearest one wins. On a match the run replaces the captured frame;
    /// otherwise the captured frame keeps its previous contents.
    pub fn scan(&mut self) -> Option<Match> {
        let len = self.template.len() as isize;
        let first = self.template.first_fixed() as isize;
        let last = self.template.last_fixed() as isize;
        let anchor = self.template.anchor();
        let count = self.buffer.len() as isize;

        for o in (-count..=-1).rev() {
            // The run must fit within the buffered history.
            if first > o + count || len - last > -o {
                continue;
            }
            if self.buffer.get(o) != Some(anchor) {
                continue;
            }
            if self.stage(o - last) {
                self.captured.bytes.copy_from_slice(&self.staged);
                return Some(Match {
                    lag: (-o - (len - last)) as usize,
                });
            }
        }

        None
    }

    /// Copy the run starting at `start` into the staging area, failing on the
    /// first disagreeing marker byte or a byte no longer retained.
    fn stage(&mut self, start: isize) -> bool {
        for (i, slot) in self.template.slots().iter().enumerate() {
            let Some(b) = self.buffer.get(start + i as isize) else {
                return false;
            };
            if let Slot::Fixed(expected) = slot {
                if *expected != b {
                    return false;
                }
            }
            self.staged[i] = b;
        }

        true
    }

    pub fn template(&self) -> &FrameTemplate {
        &self.template
    }

    pub fn buffer(&self) -> &StreamBuffer {
        &self.buffer
    }

    pub fn captured(&self) -> &CapturedFrame {
        &self.captured
    }
}
