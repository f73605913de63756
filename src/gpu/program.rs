use crate::{
    foundation::error::{ComputeError, ComputeResult},
    gpu::device::Device,
    kernel::{
        source::{FRAGMENT_ENTRY, KernelSource, VERTEX_ENTRY},
        validate::check_kernel,
    },
};

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x2,
    offset: 0,
    shader_location: 0,
}];

const TEXCOORD_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x2,
    offset: 0,
    shader_location: 1,
}];

const VEC2_STRIDE: wgpu::BufferAddress = (2 * std::mem::size_of::<f32>()) as wgpu::BufferAddress;

/// Fragment stage and linked pipeline for one run. Dropped when the run ends.
pub(crate) struct KernelProgram {
    pub(crate) pipeline: wgpu::RenderPipeline,
}

impl KernelProgram {
    /// Compile `kernel` and link it against the shared vertex stage.
    pub(crate) fn build(device: &Device, kernel: &KernelSource) -> ComputeResult<Self> {
        check_kernel(kernel)?;

        let gpu = &device.device;
        gpu.push_error_scope(wgpu::ErrorFilter::Validation);
        let fragment = gpu.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("texcompute_kernel"),
            source: wgpu::ShaderSource::Wgsl(kernel.wgsl().into()),
        });
        if let Some(err) = pollster::block_on(gpu.pop_error_scope()) {
            return Err(ComputeError::KernelCompile {
                listing: kernel.listing(),
                diagnostics: err.to_string(),
            });
        }

        gpu.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = gpu.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("texcompute_pipeline"),
            layout: Some(&device.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &device.vertex_module,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: VEC2_STRIDE,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &POSITION_ATTRIBUTES,
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: VEC2_STRIDE,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &TEXCOORD_ATTRIBUTES,
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: device.transfer_mode().texture_format(),
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(gpu.pop_error_scope()) {
            return Err(ComputeError::KernelLink {
                listing: kernel.listing(),
                diagnostics: err.to_string(),
            });
        }

        Ok(Self { pipeline })
    }
}
