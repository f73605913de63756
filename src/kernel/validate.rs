//! Front-end compilation of WGSL through naga, without touching a GPU.

use crate::{
    foundation::error::{ComputeError, ComputeResult},
    kernel::source::{KernelSource, VERTEX_WGSL},
};

/// Parse and validate a WGSL module, returning diagnostics on failure.
pub fn check_wgsl(source: &str) -> Result<naga::Module, String> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))?;
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    );
    validator
        .validate(&module)
        .map_err(|e| e.emit_to_string(source))?;
    Ok(module)
}

/// Compile an assembled kernel's fragment stage.
pub fn check_kernel(kernel: &KernelSource) -> ComputeResult<()> {
    check_wgsl(kernel.wgsl())
        .map(|_| ())
        .map_err(|diagnostics| ComputeError::KernelCompile {
            listing: kernel.listing(),
            diagnostics,
        })
}

/// Compile the fixed vertex stage. A failure here is never the caller's fault.
pub fn check_vertex_stage() -> ComputeResult<()> {
    check_wgsl(VERTEX_WGSL).map(|_| ()).map_err(|log| {
        ComputeError::initialization(format!(
            "could not build internal vertex stage\n--- code ---\n{VERTEX_WGSL}\n--- log ---\n{log}"
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/validate.rs"]
mod tests;
