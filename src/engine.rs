use crate::{
    buffer::logical::LogicalBuffer,
    dispatch::run::execute_run,
    foundation::{config::DeviceOptions, error::ComputeResult},
    gpu::{backend::GpuBackend, device::Device},
    transfer::mode::TransferMode,
};

/// Caller-facing entry point: allocate buffers and run kernels over them.
///
/// ```no_run
/// let engine = texcompute::Engine::new(&texcompute::DeviceOptions::default())?;
/// let mut buf = engine.alloc(5)?;
/// buf.fill_from(&[1.0, -2.5, 0.0, 3.3333, -0.0])?;
/// let doubled = engine.run(&mut buf, "commit(read() * 2.0);")?;
/// assert_eq!(doubled.len(), 5);
/// # Ok::<(), texcompute::ComputeError>(())
/// ```
#[derive(Debug)]
pub struct Engine {
    device: Device,
}

impl Engine {
    /// Create a device with `opts` and wrap it.
    pub fn new(opts: &DeviceOptions) -> ComputeResult<Self> {
        Ok(Self::from_device(Device::new(opts)?))
    }

    /// Wrap an existing device.
    pub fn from_device(device: Device) -> Self {
        Self { device }
    }

    /// The underlying device.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Mode the device resolved at creation.
    pub fn transfer_mode(&self) -> TransferMode {
        self.device.transfer_mode()
    }

    /// Same as [`alloc`](crate::alloc); buffers are not tied to a device.
    pub fn alloc(&self, length: usize) -> ComputeResult<LogicalBuffer> {
        LogicalBuffer::new(length)
    }

    /// Run a kernel body over `buffer`, blocking until the result is back.
    ///
    /// The body is WGSL statements using `read()` and `commit(value)`. On
    /// error the buffer keeps its previous contents.
    #[tracing::instrument(skip(self, buffer, kernel), fields(length = buffer.len(), side = buffer.side(), mode = %self.transfer_mode()))]
    pub fn run<'b>(
        &self,
        buffer: &'b mut LogicalBuffer,
        kernel: &str,
    ) -> ComputeResult<&'b [f32]> {
        let mut backend = GpuBackend::new(&self.device);
        execute_run(&mut backend, buffer, kernel)
    }
}
