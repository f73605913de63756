//! texcompute runs small numeric kernels over flat `f32` arrays by drawing a
//! full-screen quad into a texture: every output texel is one fragment-stage
//! invocation, and every texel holds one array element.
//!
//! # Pipeline overview
//!
//! 1. **Allocate**: [`alloc`] picks the smallest power-of-two square texture
//!    covering the requested length and returns a zeroed [`LogicalBuffer`].
//! 2. **Compile**: the kernel body is spliced into a fixed WGSL preamble
//!    providing `read()` and `commit(value)` ([`KernelSource`]), validated by
//!    naga and linked against a shared vertex stage.
//! 3. **Upload**: the buffer is written into an input texture, either as raw
//!    `R32Float` texels or, on devices without float render targets, as four
//!    codec bytes per `Rgba8Unorm` texel ([`TransferMode`]).
//! 4. **Render / read back**: one draw call fills the output texture, which
//!    is copied back, decoded and truncated to the requested length.
//!
//! Runs are synchronous and single-threaded; a [`Device`] is built once and
//! shared by all runs.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod buffer;
mod codec;
mod dispatch;
mod engine;
mod foundation;
mod gpu;
mod kernel;
mod transfer;

pub use buffer::logical::{LogicalBuffer, alloc};
pub use buffer::capacity::{CapacityPlan, ELEMENTS_PER_TEXEL, MAX_ELEMENTS};
pub use codec::float::{
    ENCODED_LEN, WGSL_CODEC, decode, decode_from, encode, encode_f64, encode_into,
    unorm_roundtrip,
};
pub use dispatch::run::{KernelBackend, execute_run};
pub use dispatch::stage::DispatchStage;
pub use engine::Engine;
pub use foundation::config::{
    DeviceOptions, ENV_FORCE_FALLBACK_ADAPTER, ENV_TRANSFER_MODE, PowerPreference,
    TransferModePreference,
};
pub use foundation::error::{ComputeError, ComputeResult};
pub use gpu::device::{Device, TARGET_USAGES, resolve_transfer_mode};
pub use kernel::source::{FRAGMENT_ENTRY, KernelSource, VERTEX_ENTRY, VERTEX_WGSL};
pub use kernel::validate::{check_kernel, check_vertex_stage, check_wgsl};
pub use transfer::mode::TransferMode;
pub use transfer::texels::{pack_texels, unpack_texels};
