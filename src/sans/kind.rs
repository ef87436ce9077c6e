//! Numeric kinds and the values decoded from them.

use alloc::string::{String, ToString};
use core::{fmt, str::FromStr};

use thiserror::Error;
use zerocopy::byteorder::little_endian;

/// Width of the widest kind, in bytes.
pub const MAX_WIDTH: usize = 8;

/// Read the first `$n` bytes of a padded buffer as a little-endian `$t`.
macro_rules! le {
    ($b:ident, $t:ident, $n:literal) => {{
        let x: little_endian::$t = zerocopy::transmute!(prefix::<$n>($b));
        x.get()
    }};
}

/// A primitive that a field's bits are reinterpreted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A single byte, shown as a Latin-1 character.
    Char,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

impl Kind {
    /// Every kind, narrowest first.
    pub const ALL: [Kind; 11] = [
        Kind::Char,
        Kind::U8,
        Kind::I8,
        Kind::U16,
        Kind::I16,
        Kind::U32,
        Kind::I32,
        Kind::U64,
        Kind::I64,
        Kind::F32,
        Kind::F64,
    ];

    /// Size of the kind in bytes.
    pub const fn width(self) -> usize {
        match self {
            Kind::Char | Kind::U8 | Kind::I8 => 1,
            Kind::U16 | Kind::I16 => 2,
            Kind::U32 | Kind::I32 | Kind::F32 => 4,
            Kind::U64 | Kind::I64 | Kind::F64 => 8,
        }
    }

    /// Name of the corresponding Rust primitive.
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Char => "char",
            Kind::U8 => "u8",
            Kind::I8 => "i8",
            Kind::U16 => "u16",
            Kind::I16 => "i16",
            Kind::U32 => "u32",
            Kind::I32 => "i32",
            Kind::U64 => "u64",
            Kind::I64 => "i64",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
        }
    }

    /// Reinterpret little-endian bytes as this kind.
    ///
    /// Missing high bytes read as zero, so narrow fields are zero-extended
    /// (signed kinds included). Bytes past the kind's width are ignored.
    pub fn decode(self, r: &[u8]) -> Value {
        let mut b = [0; MAX_WIDTH];
        let n = r.len().min(MAX_WIDTH);
        b[..n].copy_from_slice(&r[..n]);

        match self {
            Kind::Char => Value::Char(char::from(b[0])),
            Kind::U8 => Value::U8(b[0]),
            Kind::I8 => Value::I8(i8::from_le_bytes([b[0]])),
            Kind::U16 => Value::U16(le!(b, U16, 2)),
            Kind::I16 => Value::I16(le!(b, I16, 2)),
            Kind::U32 => Value::U32(le!(b, U32, 4)),
            Kind::I32 => Value::I32(le!(b, I32, 4)),
            Kind::U64 => Value::U64(le!(b, U64, 8)),
            Kind::I64 => Value::I64(le!(b, I64, 8)),
            Kind::F32 => Value::F32(le!(b, F32, 4)),
            Kind::F64 => Value::F64(le!(b, F64, 8)),
        }
    }

    /// The value a field holds before any frame has been decoded.
    pub fn zero(self) -> Value {
        self.decode(&[])
    }
}

fn prefix<const N: usize>(b: [u8; MAX_WIDTH]) -> [u8; N] {
    let mut r = [0; N];
    r.copy_from_slice(&b[..N]);
    r
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An unrecognised kind name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown kind `{0}`.")]
pub struct UnknownKind(pub String);

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// A decoded field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Char(char),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl Value {
    /// The kind this value was decoded as.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Char(_) => Kind::Char,
            Value::U8(_) => Kind::U8,
            Value::I8(_) => Kind::I8,
            Value::U16(_) => Kind::U16,
            Value::I16(_) => Kind::I16,
            Value::U32(_) => Kind::U32,
            Value::I32(_) => Kind::I32,
            Value::U64(_) => Kind::U64,
            Value::I64(_) => Kind::I64,
            Value::F32(_) => Kind::F32,
            Value::F64(_) => Kind::F64,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Char(v) => fmt::Display::fmt(v, f),
            Value::U8(v) => fmt::Display::fmt(v, f),
            Value::I8(v) => fmt::Display::fmt(v, f),
            Value::U16(v) => fmt::Display::fmt(v, f),
            Value::I16(v) => fmt::Display::fmt(v, f),
            Value::U32(v) => fmt::Display::fmt(v, f),
            Value::I32(v) => fmt::Display::fmt(v, f),
            Value::U64(v) => fmt::Display::fmt(v, f),
            Value::I64(v) => fmt::Display::fmt(v, f),
            Value::F32(v) => fmt::Display::fmt(v, f),
            Value::F64(v) => fmt::Display::fmt(v, f),
        }
    }
}
