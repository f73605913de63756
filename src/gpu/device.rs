use wgpu::util::DeviceExt as _;

use crate::{
    foundation::{
        config::{DeviceOptions, TransferModePreference},
        error::{ComputeError, ComputeResult},
    },
    kernel::{
        source::{VERTEX_ENTRY, VERTEX_WGSL},
        validate::check_vertex_stage,
    },
    transfer::mode::TransferMode,
};

/// Texture usages a format must support to serve as kernel input and output.
pub const TARGET_USAGES: wgpu::TextureUsages = wgpu::TextureUsages::RENDER_ATTACHMENT
    .union(wgpu::TextureUsages::TEXTURE_BINDING)
    .union(wgpu::TextureUsages::COPY_SRC)
    .union(wgpu::TextureUsages::COPY_DST);

const QUAD_POSITIONS: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0, 1.0];
// Texture rows grow downwards while clip space grows upwards.
const QUAD_TEXCOORDS: [f32; 8] = [0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
const QUAD_INDICES: [u16; 6] = [1, 2, 0, 3, 0, 2];

/// Number of indices drawn per dispatch.
pub const QUAD_INDEX_COUNT: u32 = QUAD_INDICES.len() as u32;

/// Full-screen quad shared by every dispatch.
pub(crate) struct QuadGeometry {
    pub(crate) positions: wgpu::Buffer,
    pub(crate) texcoords: wgpu::Buffer,
    pub(crate) indices: wgpu::Buffer,
}

/// GPU context plus everything that is built once and shared by all runs:
/// the transfer mode, the fixed vertex stage, the quad geometry, the sampler
/// and the binding layout.
///
/// A `Device` is meant for one caller at a time. Nothing inside it changes
/// after construction, and each run creates and drops its own textures and
/// pipeline.
pub struct Device {
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    adapter_info: wgpu::AdapterInfo,
    mode: TransferMode,
    native_targets: bool,
    packed_targets: bool,
    max_side: u32,
    pub(crate) vertex_module: wgpu::ShaderModule,
    pub(crate) bind_group_layout: wgpu::BindGroupLayout,
    pub(crate) pipeline_layout: wgpu::PipelineLayout,
    pub(crate) sampler: wgpu::Sampler,
    pub(crate) quad: QuadGeometry,
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("adapter", &self.adapter_info.name)
            .field("backend", &self.adapter_info.backend)
            .field("mode", &self.mode)
            .field("max_side", &self.max_side)
            .finish_non_exhaustive()
    }
}

/// Pick the transfer mode from the configured preference and whether the
/// adapter can render into `R32Float`.
pub fn resolve_transfer_mode(preference: TransferModePreference, native_ok: bool) -> TransferMode {
    match preference {
        TransferModePreference::NativeFloat => TransferMode::NativeFloat,
        TransferModePreference::PackedByte => TransferMode::PackedByte,
        TransferModePreference::Auto if native_ok => TransferMode::NativeFloat,
        TransferModePreference::Auto => TransferMode::PackedByte,
    }
}

impl Device {
    /// Acquire an adapter and device and build the shared resources.
    #[tracing::instrument(skip(opts))]
    pub fn new(opts: &DeviceOptions) -> ComputeResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: opts.power_preference.into(),
            compatible_surface: None,
            force_fallback_adapter: opts.force_fallback_adapter,
        }))
        .map_err(|e| match e {
            wgpu::RequestAdapterError::NotFound { .. } => {
                ComputeError::initialization("no gpu adapter available")
            }
            other => ComputeError::initialization(format!(
                "wgpu request_adapter failed: {other:?}"
            )),
        })?;

        let (device, queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
                label: Some(opts.label.as_deref().unwrap_or("texcompute_device")),
                required_features: wgpu::Features::empty(),
                required_limits: adapter.limits(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            }))
            .map_err(|e| ComputeError::initialization(format!("wgpu request_device failed: {e:?}")))?;

        Self::from_parts(&adapter, device, queue, opts.transfer_mode)
    }

    /// Build on a device the embedding application already owns.
    pub fn from_parts(
        adapter: &wgpu::Adapter,
        device: wgpu::Device,
        queue: wgpu::Queue,
        preference: TransferModePreference,
    ) -> ComputeResult<Self> {
        check_vertex_stage()?;

        let supports = |format: wgpu::TextureFormat| {
            adapter
                .get_texture_format_features(format)
                .allowed_usages
                .contains(TARGET_USAGES)
        };
        let native_targets = supports(TransferMode::NativeFloat.texture_format());
        let packed_targets = supports(TransferMode::PackedByte.texture_format());
        let mode = resolve_transfer_mode(preference, native_targets);
        let adapter_info = adapter.get_info();
        let max_side = device.limits().max_texture_dimension_2d;

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("texcompute_vertex"),
            source: wgpu::ShaderSource::Wgsl(VERTEX_WGSL.into()),
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(ComputeError::initialization(format!(
                "could not build internal vertex stage ({VERTEX_ENTRY}): {err}"
            )));
        }

        let quad = QuadGeometry {
            positions: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("texcompute_quad_positions"),
                contents: bytemuck::cast_slice(&QUAD_POSITIONS),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            texcoords: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("texcompute_quad_texcoords"),
                contents: bytemuck::cast_slice(&QUAD_TEXCOORDS),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            indices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("texcompute_quad_indices"),
                contents: bytemuck::cast_slice(&QUAD_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            }),
        };

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texcompute_input_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texcompute_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("texcompute_pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        tracing::info!(
            adapter = %adapter_info.name,
            backend = ?adapter_info.backend,
            mode = %mode,
            native_targets,
            max_side,
            "texcompute device ready"
        );

        Ok(Self {
            device,
            queue,
            adapter_info,
            mode,
            native_targets,
            packed_targets,
            max_side,
            vertex_module,
            bind_group_layout,
            pipeline_layout,
            sampler,
            quad,
        })
    }

    /// Transfer mode fixed at construction.
    pub fn transfer_mode(&self) -> TransferMode {
        self.mode
    }

    /// Adapter this device was created on.
    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Largest texture side the device accepts.
    pub fn max_side(&self) -> u32 {
        self.max_side
    }

    /// Whether the adapter can render into, sample and copy `mode` textures.
    pub fn supports_targets(&self, mode: TransferMode) -> bool {
        match mode {
            TransferMode::NativeFloat => self.native_targets,
            TransferMode::PackedByte => self.packed_targets,
        }
    }

    /// Whether a `side x side` render target in the current mode is usable.
    pub fn check_render_target(&self, side: u32) -> ComputeResult<()> {
        if !self.supports_targets(self.mode) {
            return Err(ComputeError::device_incompatible(format!(
                "{:?} textures cannot be attached as render targets on '{}'; use the packed-byte transfer mode",
                self.mode.texture_format(),
                self.adapter_info.name
            )));
        }
        if side > self.max_side {
            return Err(ComputeError::device_incompatible(format!(
                "texture side {side} exceeds the device limit of {}",
                self.max_side
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gpu/device.rs"]
mod tests;
