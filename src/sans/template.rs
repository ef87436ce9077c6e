//! Compilation of field specifications into a byte template.

use alloc::{string::ToString, vec::Vec};

use either::Either::{Left, Right};

use super::spec::{Attribute, ConfigurationError, Constraint, FieldSpec, MAX_FRAME_LEN, Violation};

/// One byte position of a compiled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// A marker byte the stream must repeat exactly.
    Fixed(u8),
    /// A byte whose value varies from frame to frame.
    Variable,
}

impl Slot {
    pub fn is_fixed(&self) -> bool {
        matches!(self, Slot::Fixed(_))
    }
}

/// The byte layout of a frame, with the positions of its marker bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTemplate {
    slots: Vec<Slot>,
    first_fixed: usize,
    last_fixed: usize,
}

impl FrameTemplate {
    /// Compile field specifications, in declaration order, into a template.
    ///
    /// A variable field extends the frame to cover its last byte. A fixed
    /// field appends its marker bytes at the current end of the frame,
    /// whatever its declared bit offset, so marker placement follows
    /// declaration order alone.
    ///
    /// Fails if no field is fixed, if a field's declared bytes lie beyond the
    /// compiled frame, or if the frame is longer than [`MAX_FRAME_LEN`].
    pub fn compile(specs: &[FieldSpec]) -> Result<Self, ConfigurationError> {
        let mut slots = Vec::new();

        for spec in specs {
            match spec.layout() {
                Left(until) => {
                    if slots.len() <= until {
                        slots.resize(until + 1, Slot::Variable);
                    }
                }
                Right(bytes) => slots.extend(bytes.iter().map(|&b| Slot::Fixed(b))),
            }
        }

        let anchors = slots
            .iter()
            .position(Slot::is_fixed)
            .zip(slots.iter().rposition(Slot::is_fixed));

        let mut violations = Vec::new();

        if anchors.is_none() {
            violations.push(Violation {
                field: Default::default(),
                attribute: Attribute::Template,
                constraint: Constraint::NoSyncAnchor,
            });
        }

        if slots.len() > MAX_FRAME_LEN {
            violations.push(Violation {
                field: Default::default(),
                attribute: Attribute::Template,
                constraint: Constraint::FrameTooLong {
                    len: slots.len(),
                    limit: MAX_FRAME_LEN,
                },
            });
        }

        violations.extend(
            specs
                .iter()
                .filter(|spec| spec.byte_until() >= slots.len())
                .map(|spec| Violation {
                    field: spec.name().to_string(),
                    attribute: Attribute::BitOffset,
                    constraint: Constraint::BeyondFrame {
                        from: spec.byte_from(),
                        until: spec.byte_until(),
                        len: slots.len(),
                    },
                }),
        );

        match anchors {
            Some((first_fixed, last_fixed)) if violations.is_empty() => Ok(Self {
                slots,
                first_fixed,
                last_fixed,
            }),
            _ => Err(ConfigurationError { violations }),
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Length of the frame in bytes.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Index of the first marker slot.
    pub fn first_fixed(&self) -> usize {
        self.first_fixed
    }

    /// Index of the last marker slot, which scanning anchors on.
    pub fn last_fixed(&self) -> usize {
        self.last_fixed
    }

    /// Expected value of the last marker slot.
    pub fn anchor(&self) -> u8 {
        match self.slots[self.last_fixed] {
            Slot::Fixed(b) => b,
            Slot::Variable => unreachable!(),
        }
    }
}
