use crate::foundation::error::{ComputeError, ComputeResult};

/// Largest logical length [`alloc`](crate::alloc) accepts.
pub const MAX_ELEMENTS: usize = 16_777_216;

/// Elements stored per texel. Both transfer modes keep one element per texel
/// so kernels see a single scalar per invocation.
pub const ELEMENTS_PER_TEXEL: usize = 1;

/// Square texture geometry backing a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapacityPlan {
    /// Texture width and height, always a power of two.
    pub side: u32,
    /// Physical element count, `side * side * ELEMENTS_PER_TEXEL`.
    pub capacity: usize,
}

impl CapacityPlan {
    /// Smallest power-of-two square covering `length` elements.
    pub fn for_length(length: usize) -> ComputeResult<Self> {
        if length == 0 || length > MAX_ELEMENTS {
            return Err(ComputeError::CapacityExceeded {
                requested: length,
                max: MAX_ELEMENTS,
            });
        }
        let texels = length.div_ceil(ELEMENTS_PER_TEXEL);
        let mut side = 1usize;
        while side * side < texels {
            side <<= 1;
        }
        let side_u32 = u32::try_from(side).map_err(|_| ComputeError::CapacityExceeded {
            requested: length,
            max: MAX_ELEMENTS,
        })?;
        Ok(Self {
            side: side_u32,
            capacity: side * side * ELEMENTS_PER_TEXEL,
        })
    }

    /// Texel count of the square.
    pub fn texels(&self) -> usize {
        self.side as usize * self.side as usize
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/capacity.rs"]
mod tests;
