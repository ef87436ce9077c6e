use bitgram::sans::{
    extract::{Extraction, align},
    kind::{Kind, Value},
    spec::FieldSpec,
};
use tartan_bitfield::bitfield;

#[test]
fn nibble_at_bit_twelve() {
    let spec = FieldSpec::variable("n", Kind::U8, 4, 12).unwrap();

    for (frame, expected) in [
        ([0x00, 0xA5], 0x0A),
        ([0xFF, 0xF0], 0x0F),
        ([0xFF, 0x0F], 0x00),
    ] {
        let extraction = Extraction::new(&spec, &frame[spec.byte_span()]);
        assert_eq!(extraction.value(), Value::U8(expected));
        assert_eq!(extraction.raw(), &frame[1..]);
    }
}

#[test]
fn straddling_nibble() {
    assert_eq!(align(&[0b1100_0000, 0b0000_0011], 6, 4).as_slice(), [0x0F]);
    assert_eq!(align(&[0x40, 0x02], 6, 4).as_slice(), [0x09]);
    // Bits beyond the field in the second byte are cleared.
    assert_eq!(align(&[0x40, 0xFE], 6, 4).as_slice(), [0x09]);
}

#[test]
fn unaligned_twelve_bits() {
    let spec = FieldSpec::variable("v", Kind::U16, 12, 4).unwrap();
    let extraction = Extraction::new(&spec, &[0x30, 0x12]);

    assert_eq!(extraction.aligned(), [0x23, 0x01]);
    assert_eq!(extraction.value(), Value::U16(0x0123));
}

#[test]
fn unaligned_sixteen_bits_over_three_bytes() {
    let spec = FieldSpec::variable("v", Kind::U16, 16, 4).unwrap();
    assert_eq!(spec.byte_len(), 3);

    let extraction = Extraction::new(&spec, &[0x40, 0x23, 0x01]);
    assert_eq!(extraction.aligned(), [0x34, 0x12]);
    assert_eq!(extraction.value(), Value::U16(0x1234));
}

#[test]
fn aligned_field_is_unchanged() {
    let bytes = 0xDEADBEEF_u32.to_le_bytes();
    assert_eq!(align(&bytes, 64, 32).as_slice(), bytes);
}

#[test]
fn narrow_signed_fields_are_zero_extended() {
    let spec = FieldSpec::variable("v", Kind::I8, 4, 0).unwrap();
    assert_eq!(Extraction::new(&spec, &[0xFF]).value(), Value::I8(15));

    let spec = FieldSpec::variable("v", Kind::I16, 12, 0).unwrap();
    assert_eq!(
        Extraction::new(&spec, &[0xFF, 0xFF]).value(),
        Value::I16(4095)
    );
}

#[test]
fn every_kind_from_le_bytes() {
    let cases = [
        (Kind::Char, vec![0x41], Value::Char('A')),
        (Kind::U8, vec![0xFE], Value::U8(254)),
        (Kind::I8, vec![0xFE], Value::I8(-2)),
        (Kind::U16, 0xBEEF_u16.to_le_bytes().to_vec(), Value::U16(0xBEEF)),
        (Kind::I16, (-300_i16).to_le_bytes().to_vec(), Value::I16(-300)),
        (Kind::U32, 123456_u32.to_le_bytes().to_vec(), Value::U32(123456)),
        (Kind::I32, (-70000_i32).to_le_bytes().to_vec(), Value::I32(-70000)),
        (Kind::U64, u64::MAX.to_le_bytes().to_vec(), Value::U64(u64::MAX)),
        (Kind::I64, i64::MIN.to_le_bytes().to_vec(), Value::I64(i64::MIN)),
        (Kind::F32, 1.5_f32.to_le_bytes().to_vec(), Value::F32(1.5)),
        (Kind::F64, (-0.125_f64).to_le_bytes().to_vec(), Value::F64(-0.125)),
    ];

    for (kind, bytes, expected) in cases {
        let spec = FieldSpec::variable("v", kind, kind.width() * 8, 8).unwrap();
        let extraction = Extraction::new(&spec, &bytes);
        assert_eq!(extraction.value(), expected);
        assert_eq!(extraction.value().kind(), kind);
    }
}

#[test]
fn char_is_latin1() {
    assert_eq!(Kind::Char.decode(&[0xE9]), Value::Char('é'));
    assert_eq!(Value::Char('Z').to_string(), "Z");
}

#[test]
fn empty_extraction() {
    let spec = FieldSpec::variable("v", Kind::F32, 20, 6).unwrap();
    let extraction = Extraction::empty(&spec);

    assert_eq!(extraction.value(), Value::F32(0.0));
    assert_eq!(extraction.raw(), [0, 0, 0, 0]);
    assert_eq!(extraction.aligned(), [0, 0, 0]);
}

#[test]
#[should_panic]
fn span_mismatch() {
    let spec = FieldSpec::variable("v", Kind::U16, 16, 4).unwrap();
    Extraction::new(&spec, &[0x00, 0x00]);
}

#[test]
fn agrees_with_bitfield() {
    bitfield! {
        struct Telemetry(u64) {
            [16..20] mode: u8,
            [20..24] flags: u8,
            [24..36] level: u16,
            [36..40] nibble: u8,
            [40..56] temp: u16,
            [58..63] odd: u8,
        }
    }

    let frames = [
        [0xAA, 0x55, 0xA3, 0x23, 0x71, 0xD4, 0xFE, 0x40],
        [0xAA, 0x55, 0x21, 0xFF, 0x0F, 0x19, 0x00, 0x07],
        [0x00, 0x00, 0x5C, 0x9E, 0x3B, 0x81, 0x66, 0xF7],
    ];

    for frame in frames {
        let bits = Telemetry(u64::from_le_bytes(frame));

        for (offset, width, expected) in [
            (16, 4, u64::from(bits.mode())),
            (20, 4, u64::from(bits.flags())),
            (24, 12, u64::from(bits.level())),
            (36, 4, u64::from(bits.nibble())),
            (40, 16, u64::from(bits.temp())),
            (58, 5, u64::from(bits.odd())),
        ] {
            let spec = FieldSpec::variable("v", Kind::U64, width, offset).unwrap();
            let extraction = Extraction::new(&spec, &frame[spec.byte_span()]);
            assert_eq!(extraction.value(), Value::U64(expected), "bits {offset}+{width}");
        }
    }
}
