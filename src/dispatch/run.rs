//! The per-run state machine: compile, upload, render, read back.

use crate::{
    buffer::{capacity::CapacityPlan, logical::LogicalBuffer},
    dispatch::stage::DispatchStage,
    foundation::error::{ComputeError, ComputeResult},
    kernel::source::KernelSource,
    transfer::{
        mode::TransferMode,
        texels::{pack_texels, unpack_texels},
    },
};

/// Device-side steps of a run. [`execute_run`] calls them in stage order and
/// drops whatever they returned once the run is over.
pub trait KernelBackend {
    /// Compiled and linked program.
    type Program;
    /// Input texture plus render target for one run.
    type Targets;

    /// Mode every texel passed in or returned is encoded with.
    fn transfer_mode(&self) -> TransferMode;

    /// Check that the device can render a `plan`-sized target in the
    /// current mode. Runs before [`compile`](Self::compile), so a target the
    /// device rejects is never reported as a link failure.
    fn check_target(&mut self, plan: CapacityPlan) -> ComputeResult<()>;

    /// Build the fragment stage and link it.
    fn compile(&mut self, kernel: &KernelSource) -> ComputeResult<Self::Program>;

    /// Upload `texels` (row-major, tightly packed) and allocate a zeroed
    /// output of the same size.
    fn upload(&mut self, plan: CapacityPlan, texels: &[u8]) -> ComputeResult<Self::Targets>;

    /// Draw the quad once, producing one output texel per fragment.
    fn render(&mut self, program: &Self::Program, targets: &Self::Targets) -> ComputeResult<()>;

    /// Tightly packed texels of the whole render target.
    fn read_back(&mut self, targets: &Self::Targets) -> ComputeResult<Vec<u8>>;
}

/// Run `body` over `buffer` and return its first `len()` elements.
///
/// The buffer is only written once the read-back has been decoded and its
/// size checked, so an error at any stage leaves it as it was.
pub fn execute_run<'b, B: KernelBackend>(
    backend: &mut B,
    buffer: &'b mut LogicalBuffer,
    body: &str,
) -> ComputeResult<&'b [f32]> {
    let mut stage = DispatchStage::Compiling;
    match drive(backend, buffer, body, &mut stage) {
        Ok(()) => {
            advance(&mut stage);
            Ok(buffer.as_slice())
        }
        Err(err) => {
            tracing::warn!(from = %stage, to = %DispatchStage::Failed, error = %err, "kernel run failed");
            Err(err)
        }
    }
}

fn advance(stage: &mut DispatchStage) {
    let next = stage.next();
    tracing::debug!(from = %stage, to = %next, "dispatch stage");
    *stage = next;
}

fn drive<B: KernelBackend>(
    backend: &mut B,
    buffer: &mut LogicalBuffer,
    body: &str,
    stage: &mut DispatchStage,
) -> ComputeResult<()> {
    let mode = backend.transfer_mode();
    let plan = buffer.plan();
    backend.check_target(plan)?;

    let kernel = KernelSource::assemble(mode, body);
    let program = backend.compile(&kernel)?;

    advance(stage);
    if buffer.storage().len() != plan.texels() {
        return Err(ComputeError::execution(format!(
            "buffer storage holds {} elements but its {}x{} texture has {} texels",
            buffer.storage().len(),
            plan.side,
            plan.side,
            plan.texels()
        )));
    }
    let texels = pack_texels(mode, buffer.storage());
    let targets = backend.upload(plan, &texels)?;

    advance(stage);
    backend.render(&program, &targets)?;

    advance(stage);
    let bytes = backend.read_back(&targets)?;
    let values = unpack_texels(mode, &bytes)?;
    buffer.commit_storage(&values)
}

#[cfg(test)]
#[path = "../../tests/unit/dispatch/run.rs"]
mod tests;
