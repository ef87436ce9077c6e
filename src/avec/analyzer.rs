//! Field accumulation, verification and polling in a single aggregate.

use alloc::vec::Vec;
use core::fmt;

use log::{debug, trace, warn};

use crate::sans::{
    extract::Extraction,
    kind::Value,
    scan::{FrameScanner, Match},
    spec::{ConfigurationError, FieldSpec},
    template::FrameTemplate,
};

use super::{FromFields, publish};

/// Decodes named fields from the most recent frame in a byte stream.
///
/// Fields are added first, then [verified](Analyzer::verify) into a frame
/// template. Once ready, bytes [pushed](Analyzer::push) into the analyzer
/// are buffered, and each [poll](Analyzer::poll) decodes every field from
/// the latest frame found.
#[derive(Debug, Default)]
pub struct Analyzer {
    specs: Vec<FieldSpec>,
    extractions: Vec<Extraction>,
    scanner: Option<FrameScanner>,
    latest: Option<Match>,
    updated: bool,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field to the configuration.
    ///
    /// Any verified template is discarded; the analyzer must be verified
    /// again before it accepts bytes.
    pub fn add_field(&mut self, spec: FieldSpec) {
        self.reset();
        self.extractions.push(Extraction::empty(&spec));
        self.specs.push(spec);
    }

    /// Remove every field and any buffered bytes.
    pub fn clear(&mut self) {
        self.reset();
        self.specs.clear();
        self.extractions.clear();
    }

    fn reset(&mut self) {
        self.scanner = None;
        self.latest = None;
        self.updated = false;
    }

    /// Compile the configured fields into a frame template and allocate the
    /// stream buffer.
    ///
    /// On failure the analyzer is left unverified. Decoded values are reset
    /// either way.
    pub fn verify(&mut self) -> Result<(), ConfigurationError> {
        self.reset();
        self.extractions = self.specs.iter().map(Extraction::empty).collect();

        let template = FrameTemplate::compile(&self.specs)
            .inspect_err(|e| warn!("Rejected frame configuration. {e}"))?;
        let scanner = FrameScanner::new(template);

        debug!(
            "Verified {} fields into a {}-byte frame ({} markers from slot {} to {}), buffering {} bytes.",
            self.specs.len(),
            scanner.template().len(),
            scanner.template().slots().iter().filter(|s| s.is_fixed()).count(),
            scanner.template().first_fixed(),
            scanner.template().last_fixed(),
            scanner.buffer().capacity(),
        );
        for field in self.fields() {
            trace!("{field}");
        }

        self.scanner = Some(scanner);
        Ok(())
    }

    /// Whether the configuration has been verified.
    pub fn is_ready(&self) -> bool {
        self.scanner.is_some()
    }

    /// Whether the last poll found a frame.
    pub fn is_updated(&self) -> bool {
        self.updated
    }

    /// Read and clear the updated flag.
    pub fn take_updated(&mut self) -> bool {
        core::mem::take(&mut self.updated)
    }

    /// Where the last poll found its frame, if it found one.
    pub fn latest(&self) -> Option<Match> {
        self.latest
    }

    /// Buffer a received byte. Bytes pushed before verification are dropped.
    pub fn push(&mut self, b: u8) {
        if let Some(scanner) = &mut self.scanner {
            scanner.push(b);
        }
    }

    /// Buffer a burst of received bytes.
    pub fn extend_from_slice(&mut self, r: &[u8]) {
        for &b in r {
            self.push(b);
        }
    }

    /// Search the backlog for the most recent frame and decode every field
    /// from it.
    ///
    /// Returns whether a frame was found. When none is, fields keep the
    /// values of the last frame decoded. Polling again without new bytes
    /// finds the same frame again.
    pub fn poll(&mut self) -> bool {
        let Some(scanner) = &mut self.scanner else {
            return false;
        };

        self.latest = scanner.scan();
        self.updated = self.latest.is_some();

        if let Some(Match { lag }) = self.latest {
            trace!("Matched a frame ending {lag} bytes behind the head.");

            let bytes = scanner.captured().bytes();
            for (spec, extraction) in self.specs.iter().zip(&mut self.extractions) {
                *extraction = Extraction::new(spec, &bytes[spec.byte_span()]);
                trace!("{}", Field { spec, extraction });
            }
        }

        self.updated
    }

    /// Configured fields with their current values, in declaration order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = Field<'_>> {
        self.specs
            .iter()
            .zip(&self.extractions)
            .map(|(spec, extraction)| Field { spec, extraction })
    }

    /// The first field configured with a name.
    pub fn field(&self, name: &str) -> Option<Field<'_>> {
        self.fields().find(|f| f.spec.name() == name)
    }

    pub fn specs(&self) -> &[FieldSpec] {
        &self.specs
    }

    /// The scanner built by the last successful verification.
    pub fn scanner(&self) -> Option<&FrameScanner> {
        self.scanner.as_ref()
    }

    /// Send every field's current value to a receiver.
    pub fn publish(&self, o: &mut (impl FromFields + ?Sized)) {
        for field in self.fields() {
            publish(o, field.spec.name(), field.value());
        }
    }
}

impl FromIterator<FieldSpec> for Analyzer {
    fn from_iter<I: IntoIterator<Item = FieldSpec>>(iter: I) -> Self {
        let mut analyzer = Self::new();
        for spec in iter {
            analyzer.add_field(spec);
        }
        analyzer
    }
}

/// One line per field, see [`Field`].
impl fmt::Display for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in self.fields() {
            writeln!(f, "{field}")?;
        }
        Ok(())
    }
}

/// A configured field and its current value.
///
/// Displays as `name -> value / kind index:<bit offset> size:<bit width>bit
/// Hex:<bytes>`, listing the marker bytes of a fixed field or the aligned
/// bytes of a variable one.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    spec: &'a FieldSpec,
    extraction: &'a Extraction,
}

impl<'a> Field<'a> {
    pub fn spec(&self) -> &'a FieldSpec {
        self.spec
    }

    pub fn extraction(&self) -> &'a Extraction {
        self.extraction
    }

    pub fn name(&self) -> &'a str {
        self.spec.name()
    }

    pub fn value(&self) -> Value {
        self.extraction.value()
    }
}

impl fmt::Display for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spec = self.spec;
        write!(
            f,
            "{} -> {} / {} index:{} size:{}bit Hex:",
            spec.name(),
            self.value(),
            spec.kind(),
            spec.bit_offset(),
            spec.bit_width(),
        )?;

        let bytes = if spec.is_fixed() {
            spec.fixed_bytes()
        } else {
            self.extraction.aligned()
        };
        for b in bytes {
            write!(f, "{b:02X} ")?;
        }

        Ok(())
    }
}
