//! Decoding stages, usable without the [`crate::avec::Analyzer`].
//!
//! This module is intended for applications that need control over how
//! the stages are wired together, for example to share one template across
//! several streams or to inspect the buffered backlog.
//!
//! # Architecture
//!
//! Configuration flows leaf-first:
//!
//! - A [`spec::FieldSpec`] is validated on construction. Every violated
//! constraint is collected into a single [`spec::ConfigurationError`].
//!
//! - A slice of field specifications is compiled into a
//! [`template::FrameTemplate`], one [`template::Slot`] per byte of the
//! frame. Fixed fields contribute marker slots, appended in declaration
//! order; variable fields only extend the frame to cover their bytes.
//!
//! - A [`scan::FrameScanner`] owns the template, a [`buffer::StreamBuffer`]
//! sized to three frames, and the bytes of the last matched frame.
//!
//! Bytes are pushed into the scanner as they arrive. Each call to
//! [`scan::FrameScanner::scan`] walks the backlog from the newest byte
//! toward the oldest, anchoring on the last marker slot of the template,
//! and stops at the first run whose markers all agree. The captured run is
//! then sliced per field and handed to [`extract::Extraction::new`], which
//! aligns the field's bits and reinterprets them as its [`kind::Kind`].
//!
//! Some concerns are not handled here and must be arranged by the caller:
//!
//! - Deduplication. Scanning again without new bytes reports the same frame
//! again. [`scan::Match::lag`] tells how many bytes arrived after the
//! matched frame ended.
//!
//! - Extraction. Scanning only captures bytes; decoding each field is a
//! separate step.

pub mod buffer;
pub mod extract;
pub mod kind;
pub mod scan;
pub mod spec;
pub mod template;
