#![no_std]

//! A marker-synchronised bit-field decoder for unframed serial byte streams.
//!
//! Bitgram recovers named, typed values from a stream that carries no
//! framing of its own. The operator describes the frame as a sequence of
//! fields, each with a bit offset, a bit width and a numeric kind; at least
//! one field holds a fixed "marker" value. Bitgram compiles these into a
//! byte template, buffers the incoming stream, searches backward for the
//! most recent run whose marker bytes agree with the template, and
//! extracts every field from it, including fields that straddle byte
//! boundaries.
//!
//! Most users should begin with the [`avec::Analyzer`] and the feeders and
//! derive macro in the [`avec`] module. The individual stages (validation,
//! template compilation, buffering, scanning and extraction) are exposed in
//! the [`sans`] module.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable derive macros (default).
//! - `std`: enable reader-based feeder (default).

extern crate alloc;

pub mod avec;
pub mod sans;
