//! Field specifications and configuration errors.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::{fmt, ops::RangeInclusive};

use either::Either::{self, Left, Right};
use thiserror::Error;

use super::kind::Kind;

/// Longest frame a configuration may describe, in bytes.
pub const MAX_FRAME_LEN: usize = 1 << 16;

/// The part of a configuration a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Kind,
    Name,
    BitWidth,
    BitOffset,
    FixedValue,
    /// The compiled frame as a whole.
    Template,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Attribute::Kind => "kind",
            Attribute::Name => "name",
            Attribute::BitWidth => "bit_width",
            Attribute::BitOffset => "bit_offset",
            Attribute::FixedValue => "fixed_value",
            Attribute::Template => "template",
        })
    }
}

/// A constraint a configuration failed to meet.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// No kind was selected.
    #[error("Kind must be selected.")]
    MissingKind,
    /// The name is empty.
    #[error("Name must not be empty.")]
    EmptyName,
    /// The bit width is zero.
    #[error("Size must be more than 0.")]
    ZeroWidth,
    /// The bit width does not fit the kind.
    #[error("Size of {width} bits exceeds the {kind} type size.")]
    WidthExceedsKind { width: usize, kind: Kind },
    /// The fixed value is empty or holds a non-hexadecimal character.
    #[error("Do not enter anything other than 0~9 and A~F.")]
    NotHex,
    /// The fixed value has the wrong number of digits for the kind.
    #[error("The number of hexadecimal digits ({found}) does not match the type size ({expected}).")]
    DigitCount { expected: usize, found: usize },
    /// A fixed field's bit width is not a whole number of bytes.
    #[error("Size of a fixed value field must be a multiple of 8.")]
    UnalignedFixedWidth,
    /// A fixed field does not start on a byte boundary.
    #[error("Offset of a fixed value field must be a multiple of 8. Add padding fields.")]
    UnalignedFixedOffset,
    /// The field ends past the longest frame allowed.
    #[error("Field must end within the first {limit} bytes of the frame.")]
    PastFrameLimit { limit: usize },
    /// The compiled frame is longer than allowed.
    #[error("Frame of {len} bytes exceeds the limit of {limit} bytes.")]
    FrameTooLong { len: usize, limit: usize },
    /// No field holds a fixed value to synchronise on.
    #[error("One or more fixed value fields must be specified as a sync anchor.")]
    NoSyncAnchor,
    /// A field reaches past the last byte of the compiled frame.
    #[error("Bytes {from}..={until} lie beyond the {len}-byte frame.")]
    BeyondFrame {
        from: usize,
        until: usize,
        len: usize,
    },
}

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Name of the offending field, empty for template-wide violations.
    pub field: String,
    pub attribute: Attribute,
    pub constraint: Constraint,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.field.is_empty() {
            write!(f, "`{}` ", self.field)?;
        }
        write!(f, "{}: {}", self.attribute, self.constraint)
    }
}

/// A rejected configuration, listing every violated constraint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid configuration:\n{}", Lines(.violations))]
pub struct ConfigurationError {
    pub violations: Vec<Violation>,
}

impl ConfigurationError {
    pub(crate) fn new(
        field: &str,
        broken: impl IntoIterator<Item = (Attribute, Constraint)>,
    ) -> Self {
        let violations = broken
            .into_iter()
            .map(|(attribute, constraint)| Violation {
                field: field.to_string(),
                attribute,
                constraint,
            })
            .collect();

        Self { violations }
    }

    /// Whether any violation is of the given constraint.
    pub fn violates(&self, constraint: &Constraint) -> bool {
        self.violations.iter().any(|v| &v.constraint == constraint)
    }
}

struct Lines<'a>(&'a [Violation]);

impl fmt::Display for Lines<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in self.0 {
            writeln!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A validated description of one named field of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    kind: Kind,
    bit_width: usize,
    bit_offset: usize,
    fixed: Option<Vec<u8>>,
}

impl FieldSpec {
    /// Validate and build a field.
    ///
    /// A field is fixed when `fixed` holds a hexadecimal string of its marker
    /// bytes in stream order, two digits per byte. Every violated constraint
    /// is reported in the returned error, not only the first.
    pub fn new(
        name: impl Into<String>,
        kind: Option<Kind>,
        bit_width: usize,
        bit_offset: usize,
        fixed: Option<&str>,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        let mut broken = Vec::new();

        if kind.is_none() {
            broken.push((Attribute::Kind, Constraint::MissingKind));
        }
        if name.is_empty() {
            broken.push((Attribute::Name, Constraint::EmptyName));
        }
        if bit_width == 0 {
            broken.push((Attribute::BitWidth, Constraint::ZeroWidth));
        }
        if let Some(kind) = kind {
            if bit_width > kind.width() * 8 {
                broken.push((
                    Attribute::BitWidth,
                    Constraint::WidthExceedsKind {
                        width: bit_width,
                        kind,
                    },
                ));
            }
        }
        if bit_offset
            .checked_add(bit_width)
            .is_none_or(|end| end > MAX_FRAME_LEN * 8)
        {
            broken.push((
                Attribute::BitOffset,
                Constraint::PastFrameLimit {
                    limit: MAX_FRAME_LEN,
                },
            ));
        }

        if let Some(digits) = fixed {
            if digits.is_empty() || !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
                broken.push((Attribute::FixedValue, Constraint::NotHex));
            } else if let Some(kind) = kind {
                if digits.len() != kind.width() * 2 {
                    broken.push((
                        Attribute::FixedValue,
                        Constraint::DigitCount {
                            expected: kind.width() * 2,
                            found: digits.len(),
                        },
                    ));
                }
            }
            if bit_width % 8 != 0 {
                broken.push((Attribute::BitWidth, Constraint::UnalignedFixedWidth));
            }
            if bit_offset % 8 != 0 {
                broken.push((Attribute::BitOffset, Constraint::UnalignedFixedOffset));
            }
        }

        let Some(kind) = kind.filter(|_| broken.is_empty()) else {
            Err(ConfigurationError::new(&name, broken))?
        };

        let fixed = fixed.map(hex::decode).transpose().map_err(|_| {
            ConfigurationError::new(&name, [(Attribute::FixedValue, Constraint::NotHex)])
        })?;

        Ok(Self {
            name,
            kind,
            bit_width,
            bit_offset,
            fixed,
        })
    }

    /// Validate and build a field whose value varies from frame to frame.
    pub fn variable(
        name: impl Into<String>,
        kind: Kind,
        bit_width: usize,
        bit_offset: usize,
    ) -> Result<Self, ConfigurationError> {
        Self::new(name, Some(kind), bit_width, bit_offset, None)
    }

    /// Validate and build a marker field holding a fixed value.
    pub fn fixed(
        name: impl Into<String>,
        kind: Kind,
        bit_width: usize,
        bit_offset: usize,
        hex: &str,
    ) -> Result<Self, ConfigurationError> {
        Self::new(name, Some(kind), bit_width, bit_offset, Some(hex))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn bit_width(&self) -> usize {
        self.bit_width
    }

    /// Offset of the first bit, from the start of the frame.
    pub fn bit_offset(&self) -> usize {
        self.bit_offset
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed.is_some()
    }

    /// Marker bytes in stream order, empty for variable fields.
    pub fn fixed_bytes(&self) -> &[u8] {
        self.fixed.as_deref().unwrap_or_default()
    }

    /// Index of the frame byte holding the first bit.
    pub fn byte_from(&self) -> usize {
        self.bit_offset / 8
    }

    /// Index of the frame byte holding the last bit.
    pub fn byte_until(&self) -> usize {
        (self.bit_offset + self.bit_width - 1) / 8
    }

    pub fn byte_span(&self) -> RangeInclusive<usize> {
        self.byte_from()..=self.byte_until()
    }

    /// Number of frame bytes the field's bits touch.
    pub fn byte_len(&self) -> usize {
        self.byte_until() - self.byte_from() + 1
    }

    /// Number of bytes the field occupies once aligned.
    pub fn aligned_len(&self) -> usize {
        self.bit_width.div_ceil(8)
    }

    /// The field's contribution to a frame template.
    ///
    /// Returns the index of the last byte covered by a variable field, or the
    /// marker bytes of a fixed field.
    pub fn layout(&self) -> Either<usize, &[u8]> {
        match &self.fixed {
            Some(bytes) => Right(bytes.as_slice()),
            None => Left(self.byte_until()),
        }
    }
}
