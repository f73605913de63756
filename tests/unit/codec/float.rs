use super::*;

fn same_bits(a: f32, b: f32) -> bool {
    a.to_bits() == b.to_bits()
}

#[test]
fn sign_lives_in_top_bit_of_first_byte() {
    assert_eq!(encode(-0.0), [0x80, 0, 0, 0]);
    assert_eq!(encode(0.0), [0, 0, 0, 0]);
    assert_eq!(encode(-1.0)[0] & 0x80, 0x80);
}

#[test]
fn exponent_spans_first_and_second_byte() {
    // 1.0 has biased exponent 127 = 0b0111_1111.
    assert_eq!(encode(1.0), [0x3f, 0x80, 0, 0]);
    // 2.0 has biased exponent 128; its low exponent bit is zero.
    assert_eq!(encode(2.0), [0x40, 0x00, 0, 0]);
}

#[test]
fn special_values_roundtrip() {
    for v in [
        0.0f32,
        -0.0,
        f32::INFINITY,
        f32::NEG_INFINITY,
        f32::MIN_POSITIVE,
        f32::MIN_POSITIVE / 4.0,
        -f32::from_bits(1),
        f32::MAX,
        f32::MIN,
        3.3333,
    ] {
        assert!(same_bits(decode(encode(v)), v), "{v:e}");
    }
}

#[test]
fn nan_payload_survives() {
    let nan = f32::from_bits(0x7fc0_1234);
    let back = decode(encode(nan));
    assert!(back.is_nan());
    assert_eq!(back.to_bits(), 0x7fc0_1234);
}

#[test]
fn wide_values_saturate_and_flush() {
    assert_eq!(decode(encode_f64(1e300)), f32::INFINITY);
    assert_eq!(decode(encode_f64(-1e300)), f32::NEG_INFINITY);
    let tiny = decode(encode_f64(1e-300));
    assert!(tiny == 0.0 && tiny.is_sign_positive());
    let neg_tiny = decode(encode_f64(-1e-300));
    assert!(neg_tiny == 0.0 && neg_tiny.is_sign_negative());
    assert_eq!(decode(encode_f64(0.5)), 0.5);
}

#[test]
fn bulk_helpers_keep_order() {
    let values = [1.0f32, -2.5, 0.0, 3.3333, -0.0];
    let bytes = encode_into(&values);
    assert_eq!(bytes.len(), values.len() * ENCODED_LEN);
    assert_eq!(&bytes[4..8], &encode(-2.5));
    let back = decode_from(&bytes).unwrap();
    assert!(back.iter().zip(values.iter()).all(|(a, b)| same_bits(*a, *b)));
}

#[test]
fn decode_from_rejects_ragged_input() {
    assert!(decode_from(&[0, 1, 2]).is_none());
    assert_eq!(decode_from(&[]).unwrap(), Vec::<f32>::new());
}

#[test]
fn every_byte_survives_unorm_channel() {
    for b in 0..=255u8 {
        assert_eq!(unorm_roundtrip(b), b);
    }
}
