use crate::{
    buffer::capacity::CapacityPlan,
    foundation::error::{ComputeError, ComputeResult},
};

/// Caller-visible array backed by a square texture's worth of storage.
///
/// Only the first [`len`](Self::len) elements are ever exposed; the padding
/// up to [`capacity`](Self::capacity) is owned by the dispatch engine.
#[derive(Clone, Debug, PartialEq)]
pub struct LogicalBuffer {
    length: usize,
    plan: CapacityPlan,
    storage: Vec<f32>,
}

/// Allocate a zero-filled buffer exposing `length` elements.
///
/// Fails with [`ComputeError::CapacityExceeded`] outside `1..=MAX_ELEMENTS`.
pub fn alloc(length: usize) -> ComputeResult<LogicalBuffer> {
    LogicalBuffer::new(length)
}

impl LogicalBuffer {
    /// See [`alloc`].
    pub fn new(length: usize) -> ComputeResult<Self> {
        let plan = CapacityPlan::for_length(length)?;
        Ok(Self {
            length,
            plan,
            storage: vec![0.0; plan.capacity],
        })
    }

    /// Logical length requested at allocation time.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Always false; buffers hold at least one element.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Physical element count of the backing storage.
    pub fn capacity(&self) -> usize {
        self.plan.capacity
    }

    /// Side length of the square texture this buffer maps onto.
    pub fn side(&self) -> u32 {
        self.plan.side
    }

    /// Geometry chosen at allocation time.
    pub fn plan(&self) -> CapacityPlan {
        self.plan
    }

    /// The first `len()` elements.
    pub fn as_slice(&self) -> &[f32] {
        &self.storage[..self.length]
    }

    /// Mutable view of the first `len()` elements, for filling before a run.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.storage[..self.length]
    }

    /// Owned copy of the exposed elements.
    pub fn to_vec(&self) -> Vec<f32> {
        self.as_slice().to_vec()
    }

    /// Copy `values` into the front of the buffer, leaving the rest as is.
    ///
    /// Fails with [`ComputeError::FillOverflow`] when `values` is longer
    /// than [`len`](Self::len).
    pub fn fill_from(&mut self, values: &[f32]) -> ComputeResult<()> {
        if values.len() > self.length {
            return Err(ComputeError::FillOverflow {
                given: values.len(),
                length: self.length,
            });
        }
        self.storage[..values.len()].copy_from_slice(values);
        Ok(())
    }

    /// Whole backing store, padding included, in texel order.
    pub(crate) fn storage(&self) -> &[f32] {
        &self.storage
    }

    /// Replace the whole backing store with a read-back result.
    pub(crate) fn commit_storage(&mut self, values: &[f32]) -> ComputeResult<()> {
        if values.len() != self.storage.len() {
            return Err(ComputeError::execution(format!(
                "read-back produced {} elements, buffer capacity is {}",
                values.len(),
                self.storage.len()
            )));
        }
        self.storage.copy_from_slice(values);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/logical.rs"]
mod tests;
