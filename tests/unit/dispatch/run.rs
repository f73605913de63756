use super::*;
use crate::{buffer::logical::alloc, kernel::validate::check_kernel};

/// CPU stand-in for a device: compiles with naga and applies a Rust closure
/// per texel in place of the fragment stage.
struct MockBackend {
    mode: TransferMode,
    kernel: fn(f32) -> f32,
    calls: Vec<&'static str>,
    renderable: bool,
    fail_upload: bool,
    short_read_back: bool,
}

struct MockTargets {
    input: Vec<u8>,
    output: std::cell::RefCell<Vec<u8>>,
}

impl MockBackend {
    fn new(mode: TransferMode, kernel: fn(f32) -> f32) -> Self {
        Self {
            mode,
            kernel,
            calls: Vec::new(),
            renderable: true,
            fail_upload: false,
            short_read_back: false,
        }
    }
}

impl KernelBackend for MockBackend {
    type Program = fn(f32) -> f32;
    type Targets = MockTargets;

    fn transfer_mode(&self) -> TransferMode {
        self.mode
    }

    fn check_target(&mut self, plan: CapacityPlan) -> ComputeResult<()> {
        self.calls.push("check_target");
        if !self.renderable {
            return Err(ComputeError::device_incompatible(format!(
                "{:?} is not renderable at side {}",
                self.mode.texture_format(),
                plan.side
            )));
        }
        Ok(())
    }

    fn compile(&mut self, kernel: &KernelSource) -> ComputeResult<Self::Program> {
        self.calls.push("compile");
        assert_eq!(kernel.mode(), self.mode);
        check_kernel(kernel)?;
        Ok(self.kernel)
    }

    fn upload(&mut self, plan: CapacityPlan, texels: &[u8]) -> ComputeResult<MockTargets> {
        self.calls.push("upload");
        if self.fail_upload {
            return Err(ComputeError::device_incompatible("attachment incomplete"));
        }
        assert_eq!(texels.len(), plan.texels() * 4);
        Ok(MockTargets {
            input: texels.to_vec(),
            output: std::cell::RefCell::new(vec![0; texels.len()]),
        })
    }

    fn render(&mut self, program: &Self::Program, targets: &MockTargets) -> ComputeResult<()> {
        self.calls.push("render");
        let values = unpack_texels(self.mode, &targets.input)?;
        let out: Vec<f32> = values.into_iter().map(program).collect();
        *targets.output.borrow_mut() = pack_texels(self.mode, &out);
        Ok(())
    }

    fn read_back(&mut self, targets: &MockTargets) -> ComputeResult<Vec<u8>> {
        self.calls.push("read_back");
        let mut bytes = targets.output.borrow().clone();
        if self.short_read_back {
            bytes.truncate(bytes.len() - 4);
        }
        Ok(bytes)
    }
}

const MODES: [TransferMode; 2] = [TransferMode::NativeFloat, TransferMode::PackedByte];

#[test]
fn stages_run_in_order() {
    let mut backend = MockBackend::new(TransferMode::NativeFloat, |x| x);
    let mut buf = alloc(3).unwrap();
    execute_run(&mut backend, &mut buf, "commit(read());").unwrap();
    assert_eq!(
        backend.calls,
        vec!["check_target", "compile", "upload", "render", "read_back"]
    );
}

#[test]
fn identity_kernel_preserves_values() {
    let input = [1.0f32, -2.5, 0.0, 3.3333, -0.0];
    for mode in MODES {
        let mut backend = MockBackend::new(mode, |x| x);
        let mut buf = alloc(input.len()).unwrap();
        buf.fill_from(&input).unwrap();
        let out = execute_run(&mut backend, &mut buf, "commit(read());").unwrap();
        let bits: Vec<u32> = out.iter().map(|v| v.to_bits()).collect();
        let want: Vec<u32> = input.iter().map(|v| v.to_bits()).collect();
        assert_eq!(bits, want, "{mode}");
    }
}

#[test]
fn result_is_truncated_to_logical_length() {
    let mut backend = MockBackend::new(TransferMode::PackedByte, |x| x + 1.0);
    let mut buf = alloc(7).unwrap();
    assert_eq!(buf.capacity(), 16);
    let out = execute_run(&mut backend, &mut buf, "commit(read() + 1.0);").unwrap();
    assert_eq!(out, &[1.0; 7]);
    // Padding texels were processed too but stay hidden.
    assert_eq!(buf.storage()[15], 1.0);
}

#[test]
fn compile_failure_leaves_buffer_untouched_and_is_retryable() {
    let mut backend = MockBackend::new(TransferMode::NativeFloat, |x| x * 2.0);
    let mut buf = alloc(4).unwrap();
    buf.fill_from(&[1.0, 2.0, 3.0, 4.0]).unwrap();

    let err = execute_run(&mut backend, &mut buf, "commit(read( * 2.0;").unwrap_err();
    assert!(matches!(err, ComputeError::KernelCompile { .. }));
    assert_eq!(buf.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(backend.calls, vec!["check_target", "compile"]);

    let out = execute_run(&mut backend, &mut buf, "commit(read() * 2.0);").unwrap();
    assert_eq!(out, &[2.0, 4.0, 6.0, 8.0]);
}

#[test]
fn incompatible_render_target_is_reported_distinctly() {
    let mut backend = MockBackend::new(TransferMode::NativeFloat, |x| x);
    backend.fail_upload = true;
    let mut buf = alloc(2).unwrap();
    buf.fill_from(&[5.0, 6.0]).unwrap();
    let err = execute_run(&mut backend, &mut buf, "commit(read());").unwrap_err();
    assert!(matches!(err, ComputeError::DeviceIncompatible { .. }));
    assert_eq!(buf.as_slice(), &[5.0, 6.0]);
    assert_eq!(backend.calls, vec!["check_target", "compile", "upload"]);
}

#[test]
fn unrenderable_target_is_not_a_kernel_error() {
    for body in ["commit(read());", "commit(read( * 2.0;"] {
        let mut backend = MockBackend::new(TransferMode::NativeFloat, |x| x);
        backend.renderable = false;
        let mut buf = alloc(3).unwrap();
        buf.fill_from(&[1.0, 2.0, 3.0]).unwrap();
        let err = execute_run(&mut backend, &mut buf, body).unwrap_err();
        assert!(
            matches!(err, ComputeError::DeviceIncompatible { .. }),
            "{body}: {err}"
        );
        assert_eq!(buf.as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(backend.calls, vec!["check_target"]);
    }
}

#[test]
fn short_read_back_never_reaches_the_buffer() {
    let mut backend = MockBackend::new(TransferMode::PackedByte, |_| 9.0);
    backend.short_read_back = true;
    let mut buf = alloc(4).unwrap();
    let err = execute_run(&mut backend, &mut buf, "commit(9.0);").unwrap_err();
    assert!(matches!(err, ComputeError::Execution(_)));
    assert_eq!(buf.as_slice(), &[0.0; 4]);
}

#[test]
fn stage_order_ends_in_done() {
    let mut stage = DispatchStage::Compiling;
    let mut seen = vec![stage];
    while !stage.is_terminal() {
        stage = stage.next();
        seen.push(stage);
    }
    assert_eq!(
        seen,
        vec![
            DispatchStage::Compiling,
            DispatchStage::Uploading,
            DispatchStage::Rendering,
            DispatchStage::ReadingBack,
            DispatchStage::Done,
        ]
    );
    assert_eq!(DispatchStage::Failed.next(), DispatchStage::Failed);
    assert_eq!(DispatchStage::ReadingBack.to_string(), "reading-back");
}
