//! Convenience interfaces for common decoding patterns.
//!
//! An [`Analyzer`] accumulates field specifications, verifies them into a
//! frame template, and decodes the most recent frame found in the bytes
//! pushed into it. The feeders in this module drive an analyzer over a slice
//! or a reader, publishing each completed frame to the [`FromFrames`] and
//! [`FromFields`] traits.
//!
//! In many cases (when frames are of a known shape), [`FromFields`] can be
//! derived. See the [`FromFields`](macro@FromFields) macro for details.

use alloc::vec::Vec;

use crate::sans::kind::Value;

pub mod analyzer;
#[cfg(feature = "std")]
pub mod reader;
pub mod slice;

pub use analyzer::{Analyzer, Field};
#[cfg(feature = "std")]
pub use reader::decode as decode_reader;
pub use slice::decode as decode_slice;

/// Produce field receivers for completed frames.
///
/// Implemented for `Vec<T>`, collecting every frame, and for `Option<T>`,
/// keeping only the latest.
pub trait FromFrames {
    /// Retrieve a receiver for a newly completed frame, if one exists.
    fn add_frame(&mut self) -> Option<&mut dyn FromFields>;
}

impl<T: FromFields + Default> FromFrames for Vec<T> {
    fn add_frame(&mut self) -> Option<&mut dyn FromFields> {
        self.push(Default::default());
        self.last_mut().map(|f| f as _)
    }
}

impl<T: FromFields + Default> FromFrames for Option<T> {
    fn add_frame(&mut self) -> Option<&mut dyn FromFields> {
        Some(self.insert(Default::default()))
    }
}

/// Derive [`FromFields`] for a struct representing a single frame.
///
/// _Requires Cargo feature `derive`._
///
/// # Examples
///
/// To receive a field's value, add the `field("name")` attribute to an
/// `Option<T>` struct member, where `name` is the field's configured name
/// and `T` is the primitive of its kind. Values from later frames replace
/// earlier ones.
///
/// ```
/// #[derive(Debug, Default, FromFields)]
/// struct Telemetry {
///     #[field("level")]
///     level: Option<u16>,
///     #[field("temp")]
///     temperature: Option<i16>,
/// }
/// ```
///
/// To receive into arbitrary types, supply an accumulator closure. Since the
/// primitive cannot be inferred, the second argument must be typed.
///
/// ```
/// #[derive(Debug, Default, FromFields)]
/// struct Telemetry {
///     #[field("tag", |v, c: char| v.push(c))]
///     tags: String,
/// }
/// ```
#[cfg(feature = "derive")]
pub use bitgram_derive::FromFields;

/// Receive decoded field values for a frame.
///
/// The default implementation of each method ignores received values.
///
/// See the [`FromFields`](macro@FromFields) derive macro for an automatic
/// implementation of this trait.
#[allow(unused_variables)]
pub trait FromFields {
    /// Add a `char` for a field to the frame.
    fn add_char(&mut self, field: &str, _: char) {}
    /// Add a `u8` for a field to the frame.
    fn add_u8(&mut self, field: &str, _: u8) {}
    /// Add a `u16` for a field to the frame.
    fn add_u16(&mut self, field: &str, _: u16) {}
    /// Add a `u32` for a field to the frame.
    fn add_u32(&mut self, field: &str, _: u32) {}
    /// Add a `u64` for a field to the frame.
    fn add_u64(&mut self, field: &str, _: u64) {}

    /// Add a `i8` for a field to the frame.
    fn add_i8(&mut self, field: &str, _: i8) {}
    /// Add a `i16` for a field to the frame.
    fn add_i16(&mut self, field: &str, _: i16) {}
    /// Add a `i32` for a field to the frame.
    fn add_i32(&mut self, field: &str, _: i32) {}
    /// Add a `i64` for a field to the frame.
    fn add_i64(&mut self, field: &str, _: i64) {}

    /// Add a `f32` for a field to the frame.
    fn add_f32(&mut self, field: &str, _: f32) {}
    /// Add a `f64` for a field to the frame.
    fn add_f64(&mut self, field: &str, _: f64) {}
}

/// Send a value to the receiver method matching its kind.
pub(crate) fn publish(o: &mut (impl FromFields + ?Sized), field: &str, value: Value) {
    match value {
        Value::Char(v) => o.add_char(field, v),
        Value::U8(v) => o.add_u8(field, v),
        Value::U16(v) => o.add_u16(field, v),
        Value::U32(v) => o.add_u32(field, v),
        Value::U64(v) => o.add_u64(field, v),

        Value::I8(v) => o.add_i8(field, v),
        Value::I16(v) => o.add_i16(field, v),
        Value::I32(v) => o.add_i32(field, v),
        Value::I64(v) => o.add_i64(field, v),

        Value::F32(v) => o.add_f32(field, v),
        Value::F64(v) => o.add_f64(field, v),
    }
}

/// Push a byte and poll, publishing the frame if this byte completed one.
///
/// Frames found further back in the backlog were already published when
/// their own last byte arrived, so only a zero-lag match counts.
fn feed(a: &mut Analyzer, b: u8, o: &mut impl FromFrames) -> bool {
    a.push(b);

    if !a.poll() || a.latest().is_none_or(|m| m.lag != 0) {
        return false;
    }
    if let Some(o) = o.add_frame() {
        a.publish(o);
    }

    true
}
