use std::fmt;

/// Process-wide choice of how element values travel through textures.
///
/// Resolved once when the [`Device`](crate::Device) is created; every upload,
/// read-back and kernel preamble of that device uses the same mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransferMode {
    /// One `R32Float` texel per element, holding the raw float.
    NativeFloat,
    /// One `Rgba8Unorm` texel per element, holding the four codec bytes.
    PackedByte,
}

impl TransferMode {
    /// Bytes per texel in both modes.
    pub const BYTES_PER_TEXEL: u32 = 4;

    /// Texture format for input and output textures.
    pub fn texture_format(self) -> wgpu::TextureFormat {
        match self {
            Self::NativeFloat => wgpu::TextureFormat::R32Float,
            Self::PackedByte => wgpu::TextureFormat::Rgba8Unorm,
        }
    }

    /// Whether values go through the float codec.
    pub fn is_packed(self) -> bool {
        matches!(self, Self::PackedByte)
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NativeFloat => "native-float",
            Self::PackedByte => "packed-byte",
        })
    }
}
