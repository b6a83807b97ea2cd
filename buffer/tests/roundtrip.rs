use buffer::{BufError, ByteReader, ByteWriter};

#[test]
fn writer_roundtrip_integers() {
    let mut writer = ByteWriter::new();
    writer.write_u8(0xAB);
    writer.write_i8(-5);
    writer.write_u16(0xBEEF);
    writer.write_i32(-123_456);
    writer.write_i64(i64::MIN);
    writer.write_u64(u64::MAX);
    let bytes = writer.finish();

    let mut reader = ByteReader::new(&bytes);
    assert_eq!(reader.read_u8().unwrap(), 0xAB);
    assert_eq!(reader.read_i8().unwrap(), -5);
    assert_eq!(reader.read_u16().unwrap(), 0xBEEF);
    assert_eq!(reader.read_i32().unwrap(), -123_456);
    assert_eq!(reader.read_i64().unwrap(), i64::MIN);
    assert_eq!(reader.read_u64().unwrap(), u64::MAX);
    assert!(reader.is_empty());
}

#[test]
fn writer_roundtrip_varints() {
    let mut writer = ByteWriter::new();
    writer.write_var_u32(u32::MAX);
    writer.write_var_i32(i32::MIN);
    writer.write_var_u64(u64::MAX);
    writer.write_var_i64(-42);
    let bytes = writer.finish();

    let mut reader = ByteReader::new(&bytes);
    assert_eq!(reader.read_var_u32().unwrap(), u32::MAX);
    assert_eq!(reader.read_var_i32().unwrap(), i32::MIN);
    assert_eq!(reader.read_var_u64().unwrap(), u64::MAX);
    assert_eq!(reader.read_var_i64().unwrap(), -42);
    assert!(reader.is_empty());
}

#[test]
fn floats_keep_their_bits() {
    let mut writer = ByteWriter::new();
    writer.write_f32(f32::NAN);
    writer.write_f64(-0.0);
    let bytes = writer.finish();

    let mut reader = ByteReader::new(&bytes);
    assert!(reader.read_f32().unwrap().is_nan());
    let zero = reader.read_f64().unwrap();
    assert_eq!(zero.to_bits(), (-0.0f64).to_bits());
}

#[test]
fn strings_and_byte_arrays_are_borrowed() {
    let mut writer = ByteWriter::new();
    writer.write_str("minecraft:stone");
    writer.write_byte_array(&[1, 2, 3]);
    let bytes = writer.finish();

    let mut reader = ByteReader::new(&bytes);
    let name = reader.read_str(64).unwrap();
    assert_eq!(name, "minecraft:stone");
    assert!(std::ptr::eq(name.as_ptr(), bytes[1..].as_ptr()));
    assert_eq!(reader.read_byte_array(3).unwrap(), &[1, 2, 3]);
}

#[test]
fn string_exactly_at_bound_is_accepted() {
    let mut writer = ByteWriter::new();
    writer.write_str("abcd");
    let bytes = writer.finish();

    assert_eq!(ByteReader::new(&bytes).read_str(4).unwrap(), "abcd");
    assert_eq!(
        ByteReader::new(&bytes).read_str(3).unwrap_err(),
        BufError::LengthExceeded { length: 4, max: 3 }
    );
}

#[test]
fn fixed_bitset_roundtrip() {
    let mut writer = ByteWriter::new();
    writer.write_fixed_bitset(0xFF, 8);
    writer.write_fixed_bitset(0b1_0000_0001, 9);
    let bytes = writer.finish();
    assert_eq!(bytes.len(), 3);

    let mut reader = ByteReader::new(&bytes);
    assert_eq!(reader.read_fixed_bitset(8).unwrap(), 0xFF);
    assert_eq!(reader.read_fixed_bitset(9).unwrap(), 0b1_0000_0001);
}

#[test]
fn truncated_fixed_width_reports_available() {
    let mut reader = ByteReader::new(&[0x00, 0x01, 0x02]);
    let err = reader.read_i64().unwrap_err();
    assert_eq!(
        err,
        BufError::UnexpectedEof {
            requested: 8,
            available: 3
        }
    );
    // A failed read does not consume anything.
    assert_eq!(reader.position(), 0);
}
