use crate::{
    foundation::error::{ComputeError, ComputeResult},
    gpu::device::Device,
    transfer::mode::TransferMode,
    transfer::texels::{bytes_per_row, padded_bytes_per_row, strip_row_padding},
};

/// A square texture plus its default view.
pub(crate) struct SquareTexture {
    pub(crate) side: u32,
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
}

fn extent(side: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: side,
        height: side,
        depth_or_array_layers: 1,
    }
}

fn create_square(device: &Device, side: u32, label: &str, usage: wgpu::TextureUsages) -> SquareTexture {
    let texture = device.device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: extent(side),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: device.transfer_mode().texture_format(),
        usage,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    SquareTexture {
        side,
        texture,
        view,
    }
}

/// Check that `texels` holds exactly one row-major `side x side` image.
pub(crate) fn check_input_len(side: u32, texels: &[u8]) -> ComputeResult<()> {
    let expected = bytes_per_row(side)? as usize * side as usize;
    if texels.len() != expected {
        return Err(ComputeError::execution(format!(
            "input holds {} bytes, a {side}x{side} texture needs {expected}",
            texels.len()
        )));
    }
    Ok(())
}

/// Upload tightly packed texel bytes into a new sampled texture. The length
/// must have passed [`check_input_len`].
pub(crate) fn upload_input(device: &Device, side: u32, texels: &[u8]) -> SquareTexture {
    let input = create_square(
        device,
        side,
        "texcompute_input",
        wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
    );
    device.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &input.texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        texels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(side * TransferMode::BYTES_PER_TEXEL),
            rows_per_image: Some(side),
        },
        extent(side),
    );
    input
}

/// Allocate the render target. wgpu zero-initializes new textures.
pub(crate) fn create_output(device: &Device, side: u32) -> SquareTexture {
    create_square(
        device,
        side,
        "texcompute_output",
        wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
    )
}

/// Copy the whole texture into a staging buffer and return its texels,
/// row padding removed.
pub(crate) fn read_back(device: &Device, target: &SquareTexture) -> ComputeResult<Vec<u8>> {
    let side = target.side;
    let padded_row = padded_bytes_per_row(side)?;
    let size = (padded_row as u64)
        .checked_mul(side as u64)
        .ok_or_else(|| ComputeError::execution("read-back buffer size overflow"))?;

    let staging = device.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("texcompute_readback"),
        size,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = device
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("texcompute_readback_encoder"),
        });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: &target.texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_row),
                rows_per_image: Some(side),
            },
        },
        extent(side),
    );
    device.queue.submit(Some(encoder.finish()));

    let slice = staging.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |res| {
        let _ = tx.send(res);
    });
    device
        .device
        .poll(wgpu::PollType::wait_indefinitely())
        .map_err(|e| ComputeError::execution(format!("wgpu poll failed: {e:?}")))?;
    rx.recv()
        .map_err(|_| ComputeError::execution("read-back channel closed"))?
        .map_err(|e| ComputeError::execution(format!("read-back map failed: {e:?}")))?;

    let mapped = slice.get_mapped_range();
    let out = strip_row_padding(&mapped, side, padded_row);
    drop(mapped);
    staging.unmap();
    out
}
