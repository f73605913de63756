use crate::{
    buffer::capacity::CapacityPlan,
    dispatch::run::KernelBackend,
    foundation::error::{ComputeError, ComputeResult},
    gpu::{
        device::{Device, QUAD_INDEX_COUNT},
        program::KernelProgram,
        texture::{self, SquareTexture},
    },
    kernel::source::KernelSource,
    transfer::mode::TransferMode,
};

/// Input texture, render target and the bind group tying the input to the
/// kernel's sampler uniform.
pub(crate) struct RunTargets {
    input: SquareTexture,
    output: SquareTexture,
    bind_group: wgpu::BindGroup,
}

/// [`KernelBackend`] executing on a wgpu [`Device`].
pub(crate) struct GpuBackend<'d> {
    device: &'d Device,
}

impl<'d> GpuBackend<'d> {
    /// Borrow `device` for the duration of a run.
    pub(crate) fn new(device: &'d Device) -> Self {
        Self { device }
    }
}

impl KernelBackend for GpuBackend<'_> {
    type Program = KernelProgram;
    type Targets = RunTargets;

    fn transfer_mode(&self) -> TransferMode {
        self.device.transfer_mode()
    }

    fn check_target(&mut self, plan: CapacityPlan) -> ComputeResult<()> {
        self.device.check_render_target(plan.side)
    }

    fn compile(&mut self, kernel: &KernelSource) -> ComputeResult<KernelProgram> {
        KernelProgram::build(self.device, kernel)
    }

    fn upload(&mut self, plan: CapacityPlan, texels: &[u8]) -> ComputeResult<RunTargets> {
        texture::check_input_len(plan.side, texels)?;

        let gpu = &self.device.device;
        gpu.push_error_scope(wgpu::ErrorFilter::Validation);
        let input = texture::upload_input(self.device, plan.side, texels);
        let output = texture::create_output(self.device, plan.side);
        let bind_group = gpu.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texcompute_bg"),
            layout: &self.device.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&input.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.device.sampler),
                },
            ],
        });
        if let Some(err) = pollster::block_on(gpu.pop_error_scope()) {
            return Err(ComputeError::device_incompatible(format!(
                "render target setup rejected: {err}"
            )));
        }

        Ok(RunTargets {
            input,
            output,
            bind_group,
        })
    }

    fn render(&mut self, program: &KernelProgram, targets: &RunTargets) -> ComputeResult<()> {
        let gpu = &self.device.device;
        let side = targets.output.side as f32;

        gpu.push_error_scope(wgpu::ErrorFilter::Validation);
        let mut encoder = gpu.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("texcompute_render_encoder"),
        });
        {
            let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("texcompute_rp"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &targets.output.view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rp.set_viewport(0.0, 0.0, side, side, 0.0, 1.0);
            rp.set_pipeline(&program.pipeline);
            rp.set_bind_group(0, &targets.bind_group, &[]);
            rp.set_vertex_buffer(0, self.device.quad.positions.slice(..));
            rp.set_vertex_buffer(1, self.device.quad.texcoords.slice(..));
            rp.set_index_buffer(
                self.device.quad.indices.slice(..),
                wgpu::IndexFormat::Uint16,
            );
            rp.draw_indexed(0..QUAD_INDEX_COUNT, 0, 0..1);
        }
        self.device.queue.submit(Some(encoder.finish()));

        if let Some(err) = pollster::block_on(gpu.pop_error_scope()) {
            return Err(ComputeError::execution(format!("render pass rejected: {err}")));
        }
        tracing::trace!(input = ?targets.input.texture.size(), "draw submitted");
        Ok(())
    }

    fn read_back(&mut self, targets: &RunTargets) -> ComputeResult<Vec<u8>> {
        texture::read_back(self.device, &targets.output)
    }
}
