#![cfg(feature = "std")]

use std::path::Path;

use bitgram::{
    avec::{Analyzer, FromFields, FromFrames},
    sans::spec::FieldSpec,
};
use csv::ReaderBuilder;

const PATH: &str = "fixtures/telemetry.hex";

#[test]
fn decode_slice_telemetry() {
    let data = read_stream(PATH);
    let (mut analyzer, mut validator) = Validator::new(PATH);
    let frames = bitgram::avec::decode_slice(&data, &mut analyzer, &mut validator).unwrap();
    assert_eq!(frames, 2);
    validator.finish();
}

#[test]
fn decode_reader_telemetry() {
    let data = read_stream(PATH);
    let (mut analyzer, mut validator) = Validator::new(PATH);
    let frames =
        bitgram::avec::decode_reader(&mut data.as_slice(), &mut analyzer, &mut validator).unwrap();
    assert_eq!(frames, 2);
    validator.finish();
}

#[test]
fn decode_slice_telemetry_in_bursts() {
    let data = read_stream(PATH);
    let (mut analyzer, mut validator) = Validator::new(PATH);
    let mut frames = 0;
    for burst in data.chunks(5) {
        frames += bitgram::avec::decode_slice(burst, &mut analyzer, &mut validator).unwrap();
    }
    assert_eq!(frames, 2);
    validator.finish();
}

#[test]
fn decode_unverified() {
    let data = read_stream(PATH);
    let (_, mut validator) = Validator::new(PATH);
    let mut analyzer = Analyzer::new();

    assert!(bitgram::avec::decode_slice(&data, &mut analyzer, &mut validator).is_err());
    assert!(
        bitgram::avec::decode_reader(&mut data.as_slice(), &mut analyzer, &mut validator)
            .is_err()
    );
}

fn read_stream(path: impl AsRef<Path>) -> Vec<u8> {
    let text = std::fs::read_to_string(path).unwrap();
    let digits: String = text.split_whitespace().collect();
    hex::decode(digits).unwrap()
}

/// Checks published frames against rows of expected values, one row per frame
/// with a column per field in declaration order.
struct Validator {
    names: Vec<String>,
    current: Vec<String>,
    expected: Vec<Vec<String>>,
    field: usize,
}

impl Validator {
    fn new(path: impl AsRef<Path>) -> (Analyzer, Self) {
        let fields = path.as_ref().with_extension("fields.csv");
        let mut reader = ReaderBuilder::new().from_path(fields).unwrap();

        let specs: Vec<FieldSpec> = reader
            .records()
            .map(|r| {
                let r = r.unwrap();
                let fixed = Some(&r[4]).filter(|f| !f.is_empty());
                FieldSpec::new(
                    &r[0],
                    Some(r[1].parse().unwrap()),
                    r[2].parse().unwrap(),
                    r[3].parse().unwrap(),
                    fixed,
                )
                .unwrap()
            })
            .collect();

        let names = specs.iter().map(|s| s.name().to_string()).collect();
        let mut analyzer: Analyzer = specs.into_iter().collect();
        analyzer.verify().unwrap();

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .from_path(path.as_ref().with_extension("csv"))
            .unwrap();

        let expected = reader
            .records()
            .map(|r| r.unwrap().iter().map(|f| f.to_string()).collect())
            .collect();

        let validator = Self {
            names,
            current: vec![],
            expected,
            field: 0,
        };

        (analyzer, validator)
    }

    fn validate(&mut self, field: &str, value: impl ToString) {
        assert_eq!(field, self.names[self.field]);
        assert_eq!(self.current.remove(0), value.to_string(), "field `{field}`");
        self.field += 1;
    }

    fn finish(&self) {
        assert!(self.current.is_empty());
        assert!(self.expected.is_empty());
    }
}

impl FromFrames for Validator {
    fn add_frame(&mut self) -> Option<&mut dyn FromFields> {
        assert!(self.current.is_empty());
        self.current = self.expected.remove(0);
        self.field = 0;
        Some(self)
    }
}

impl FromFields for Validator {
    fn add_char(&mut self, field: &str, value: char) {
        self.validate(field, value);
    }
    fn add_u8(&mut self, field: &str, value: u8) {
        self.validate(field, value);
    }
    fn add_u16(&mut self, field: &str, value: u16) {
        self.validate(field, value);
    }
    fn add_u32(&mut self, field: &str, value: u32) {
        self.validate(field, value);
    }
    fn add_u64(&mut self, field: &str, value: u64) {
        self.validate(field, value);
    }
    fn add_i8(&mut self, field: &str, value: i8) {
        self.validate(field, value);
    }
    fn add_i16(&mut self, field: &str, value: i16) {
        self.validate(field, value);
    }
    fn add_i32(&mut self, field: &str, value: i32) {
        self.validate(field, value);
    }
    fn add_i64(&mut self, field: &str, value: i64) {
        self.validate(field, value);
    }
    fn add_f32(&mut self, field: &str, value: f32) {
        self.validate(field, value);
    }
    fn add_f64(&mut self, field: &str, value: f64) {
        self.validate(field, value);
    }
}
