//! Host-side texel layout: element order, byte encoding and row padding.
//!
//! Element `i` lives at texel `(i % side, i / side)`; rows are tightly packed
//! on upload and padded to `COPY_BYTES_PER_ROW_ALIGNMENT` on read-back.

use crate::{
    codec::float,
    foundation::error::{ComputeError, ComputeResult},
    transfer::mode::TransferMode,
};

/// Encode element values into texel bytes for `mode`.
pub fn pack_texels(mode: TransferMode, values: &[f32]) -> Vec<u8> {
    match mode {
        TransferMode::NativeFloat => bytemuck::cast_slice::<f32, u8>(values).to_vec(),
        TransferMode::PackedByte => float::encode_into(values),
    }
}

/// Decode texel bytes read back from a `mode` texture.
pub fn unpack_texels(mode: TransferMode, bytes: &[u8]) -> ComputeResult<Vec<f32>> {
    let texel = TransferMode::BYTES_PER_TEXEL as usize;
    if bytes.len() % texel != 0 {
        return Err(ComputeError::execution(format!(
            "read-back length {} is not a multiple of {texel} bytes",
            bytes.len()
        )));
    }
    match mode {
        TransferMode::NativeFloat => Ok(bytes
            .chunks_exact(texel)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()),
        TransferMode::PackedByte => float::decode_from(bytes)
            .ok_or_else(|| ComputeError::execution("packed read-back is not 4-byte aligned")),
    }
}

/// Tight row size for a `side`-wide texture.
pub fn bytes_per_row(side: u32) -> ComputeResult<u32> {
    side.checked_mul(TransferMode::BYTES_PER_TEXEL)
        .ok_or_else(|| ComputeError::execution("texture row size overflow"))
}

/// Row size of a read-back staging buffer, aligned for texture copies.
pub fn padded_bytes_per_row(side: u32) -> ComputeResult<u32> {
    Ok(align_to(
        bytes_per_row(side)?,
        wgpu::COPY_BYTES_PER_ROW_ALIGNMENT,
    ))
}

/// Drop the per-row padding of a mapped read-back buffer.
pub fn strip_row_padding(mapped: &[u8], side: u32, padded_row_bytes: u32) -> ComputeResult<Vec<u8>> {
    let row_bytes = bytes_per_row(side)? as usize;
    let padded = padded_row_bytes as usize;
    let rows = side as usize;
    if padded < row_bytes || mapped.len() < padded * rows.saturating_sub(1) + row_bytes {
        return Err(ComputeError::execution(format!(
            "read-back buffer of {} bytes is too small for {side}x{side} texels",
            mapped.len()
        )));
    }
    let mut out = Vec::with_capacity(row_bytes * rows);
    for row in 0..rows {
        let start = row * padded;
        out.extend_from_slice(&mapped[start..start + row_bytes]);
    }
    Ok(out)
}

fn align_to(value: u32, alignment: u32) -> u32 {
    let mask = alignment - 1;
    (value + mask) & !mask
}

#[cfg(test)]
#[path = "../../tests/unit/transfer/texels.rs"]
mod tests;
