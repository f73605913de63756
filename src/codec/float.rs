//! Bit-exact packing of IEEE-754 single-precision floats into four bytes.
//!
//! Byte 0 holds the sign bit and the top seven exponent bits, byte 1 the last
//! exponent bit and the top seven mantissa bits, bytes 2 and 3 the remaining
//! mantissa. This is the layout the packed-byte shaders reassemble with
//! `bitcast`, so both sides agree without any arithmetic reconstruction.

/// Number of bytes one encoded value occupies.
pub const ENCODED_LEN: usize = 4;

/// Encode one float. Every bit pattern (NaN payloads, signed zero,
/// subnormals, infinities) is preserved.
#[inline]
pub fn encode(value: f32) -> [u8; ENCODED_LEN] {
    value.to_bits().to_be_bytes()
}

/// Decode four bytes produced by [`encode`].
#[inline]
pub fn decode(bytes: [u8; ENCODED_LEN]) -> f32 {
    f32::from_bits(u32::from_be_bytes(bytes))
}

/// Encode a double, narrowing with round-to-nearest first.
///
/// Magnitudes beyond `f32::MAX` saturate to a signed infinity and magnitudes
/// below the smallest subnormal flush to a signed zero.
#[inline]
pub fn encode_f64(value: f64) -> [u8; ENCODED_LEN] {
    encode(value as f32)
}

/// Encode a slice into a tightly packed byte vector.
pub fn encode_into(values: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * ENCODED_LEN);
    for &v in values {
        out.extend_from_slice(&encode(v));
    }
    out
}

/// Decode a tightly packed byte slice. Returns `None` when the length is not
/// a multiple of [`ENCODED_LEN`].
pub fn decode_from(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.len() % ENCODED_LEN != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(ENCODED_LEN)
            .map(|c| decode([c[0], c[1], c[2], c[3]]))
            .collect(),
    )
}

/// CPU model of a byte going through an 8-bit unorm channel: sampled as
/// `byte / 255`, scaled back and rounded by the shader.
#[inline]
pub fn unorm_roundtrip(byte: u8) -> u8 {
    let sampled = f32::from(byte) / 255.0;
    (sampled * 255.0).round() as u8
}

/// WGSL helpers implementing the same layout on the GPU.
///
/// `unpack_texel` turns a sampled `Rgba8Unorm` texel back into the float it
/// carries; `pack_texel` produces the texel a `Rgba8Unorm` target must store.
pub const WGSL_CODEC: &str = r#"fn unpack_texel(texel: vec4<f32>) -> f32 {
    let b = vec4<u32>(round(clamp(texel, vec4<f32>(0.0), vec4<f32>(1.0)) * 255.0));
    return bitcast<f32>((b.x << 24u) | (b.y << 16u) | (b.z << 8u) | b.w);
}

fn pack_texel(value: f32) -> vec4<f32> {
    let bits = bitcast<u32>(value);
    let b = vec4<u32>(bits >> 24u, (bits >> 16u) & 0xffu, (bits >> 8u) & 0xffu, bits & 0xffu);
    return vec4<f32>(b) / 255.0;
}
"#;

#[cfg(test)]
#[path = "../../tests/unit/codec/float.rs"]
mod tests;
