use super::*;

#[test]
fn native_texels_are_little_endian_floats() {
    let bytes = pack_texels(TransferMode::NativeFloat, &[1.0, -2.5]);
    assert_eq!(&bytes[0..4], &1.0f32.to_le_bytes());
    assert_eq!(&bytes[4..8], &(-2.5f32).to_le_bytes());
}

#[test]
fn packed_texels_use_codec_layout() {
    let bytes = pack_texels(TransferMode::PackedByte, &[1.0]);
    assert_eq!(bytes, vec![0x3f, 0x80, 0, 0]);
}

#[test]
fn both_modes_decode_what_they_encode() {
    let values = [1.0f32, -2.5, 0.0, 3.3333, -0.0, f32::INFINITY];
    for mode in [TransferMode::NativeFloat, TransferMode::PackedByte] {
        let back = unpack_texels(mode, &pack_texels(mode, &values)).unwrap();
        let bits: Vec<u32> = back.iter().map(|v| v.to_bits()).collect();
        let want: Vec<u32> = values.iter().map(|v| v.to_bits()).collect();
        assert_eq!(bits, want, "{mode}");
    }
}

#[test]
fn ragged_read_back_is_rejected() {
    let err = unpack_texels(TransferMode::NativeFloat, &[0; 6]).unwrap_err();
    assert!(err.to_string().contains("not a multiple of 4"));
}

#[test]
fn small_rows_are_padded_to_copy_alignment() {
    assert_eq!(bytes_per_row(2).unwrap(), 8);
    assert_eq!(padded_bytes_per_row(2).unwrap(), 256);
    assert_eq!(padded_bytes_per_row(64).unwrap(), 256);
    assert_eq!(padded_bytes_per_row(128).unwrap(), 512);
}

#[test]
fn strip_row_padding_keeps_row_major_order() {
    let side = 2;
    let padded = padded_bytes_per_row(side).unwrap();
    let mut mapped = vec![0xAAu8; (padded * side) as usize];
    mapped[0..8].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
    let second = padded as usize;
    mapped[second..second + 8].copy_from_slice(&[9, 10, 11, 12, 13, 14, 15, 16]);

    let tight = strip_row_padding(&mapped, side, padded).unwrap();
    assert_eq!(tight, (1..=16).collect::<Vec<u8>>());
}

#[test]
fn strip_row_padding_rejects_short_buffers() {
    assert!(strip_row_padding(&[0; 8], 2, 256).is_err());
}
