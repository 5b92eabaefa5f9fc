//! wgpu renderer for the image quad, drawn through an egui paint callback.
//!
//! [`WgpuBackend`] implements the inspector's [`RenderBackend`]: it creates
//! the texture, bind groups and vertex buffer for a loaded image, holds them
//! until the load commits, then parks them in egui-wgpu's callback
//! resources. [`ImageCallback`] uploads the frame's [`RenderParams`] and quad
//! and draws with the active pipeline.

mod shaders;

use std::collections::HashMap;

use ddsview_core::decode::{can_decode, decode_subresource};
use ddsview_core::error::{DdsViewError, Result};
use ddsview_core::format::DxgiFormat;
use ddsview_core::inspector::{DisplayMetrics, RenderBackend, RenderParams, ShaderVariant, Vertex};
use ddsview_core::scratch::ScratchImage;
use ddsview_core::texture::{TexDimension, TexMetadata};
use egui_wgpu::wgpu;
use egui_wgpu::wgpu::util::DeviceExt;

/// Per-variant pipelines and the shared uniform buffer. Created once.
struct Pipelines {
    layouts: HashMap<ShaderVariant, wgpu::BindGroupLayout>,
    pipelines: HashMap<ShaderVariant, wgpu::RenderPipeline>,
    params: wgpu::Buffer,
}

/// GPU resources of the loaded image.
struct ImageResources {
    _texture: wgpu::Texture,
    bind_groups: HashMap<ShaderVariant, wgpu::BindGroup>,
    vertices: wgpu::Buffer,
    variant: ShaderVariant,
}

/// How a DXGI format reaches the GPU.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Upload {
    /// Bytes are copied as stored.
    Native(wgpu::TextureFormat),
    /// Texels are decoded on the CPU to RGBA `f32`.
    Decoded,
}

fn native_format(format: DxgiFormat) -> Option<wgpu::TextureFormat> {
    use wgpu::TextureFormat as T;
    let native = match format {
        DxgiFormat::R32G32B32A32_FLOAT => T::Rgba32Float,
        DxgiFormat::R16G16B16A16_FLOAT => T::Rgba16Float,
        DxgiFormat::R32G32_FLOAT => T::Rg32Float,
        DxgiFormat::R10G10B10A2_UNORM => T::Rgb10a2Unorm,
        DxgiFormat::R8G8B8A8_UNORM | DxgiFormat::R8G8B8A8_UNORM_SRGB => T::Rgba8Unorm,
        DxgiFormat::R8G8B8A8_SNORM => T::Rgba8Snorm,
        DxgiFormat::R16G16_FLOAT => T::Rg16Float,
        DxgiFormat::R32_FLOAT | DxgiFormat::D32_FLOAT => T::R32Float,
        DxgiFormat::R8G8_UNORM => T::Rg8Unorm,
        DxgiFormat::R8G8_SNORM => T::Rg8Snorm,
        DxgiFormat::R16_FLOAT => T::R16Float,
        DxgiFormat::R8_UNORM => T::R8Unorm,
        DxgiFormat::R8_UINT => T::R8Uint,
        DxgiFormat::R8_SNORM => T::R8Snorm,
        DxgiFormat::R9G9B9E5_SHAREDEXP => T::Rgb9e5Ufloat,
        DxgiFormat::B8G8R8A8_UNORM | DxgiFormat::B8G8R8A8_UNORM_SRGB => T::Bgra8Unorm,
        DxgiFormat::BC1_UNORM | DxgiFormat::BC1_UNORM_SRGB => T::Bc1RgbaUnorm,
        DxgiFormat::BC2_UNORM | DxgiFormat::BC2_UNORM_SRGB => T::Bc2RgbaUnorm,
        DxgiFormat::BC3_UNORM | DxgiFormat::BC3_UNORM_SRGB => T::Bc3RgbaUnorm,
        DxgiFormat::BC4_UNORM => T::Bc4RUnorm,
        DxgiFormat::BC4_SNORM => T::Bc4RSnorm,
        DxgiFormat::BC5_UNORM => T::Bc5RgUnorm,
        DxgiFormat::BC5_SNORM => T::Bc5RgSnorm,
        DxgiFormat::BC6H_UF16 => T::Bc6hRgbUfloat,
        DxgiFormat::BC6H_SF16 => T::Bc6hRgbFloat,
        DxgiFormat::BC7_UNORM | DxgiFormat::BC7_UNORM_SRGB => T::Bc7RgbaUnorm,
        _ => return None,
    };
    Some(native)
}

fn view_dimension(variant: ShaderVariant) -> wgpu::TextureViewDimension {
    match variant {
        ShaderVariant::Tex1D | ShaderVariant::Tex2D | ShaderVariant::Tex2DR8Uint => {
            wgpu::TextureViewDimension::D2
        }
        ShaderVariant::Tex1DArray
        | ShaderVariant::Tex2DArray
        | ShaderVariant::Cube
        | ShaderVariant::Stencil => wgpu::TextureViewDimension::D2Array,
        ShaderVariant::Tex3D => wgpu::TextureViewDimension::D3,
    }
}

fn sample_type(variant: ShaderVariant) -> wgpu::TextureSampleType {
    match variant {
        ShaderVariant::Tex2DR8Uint => wgpu::TextureSampleType::Uint,
        _ => wgpu::TextureSampleType::Float { filterable: false },
    }
}

/// True when the session is displayed over RDP or SSH.
pub fn detect_remote_session() -> bool {
    let rdp = std::env::var("SESSIONNAME").is_ok_and(|name| name.starts_with("RDP-"));
    rdp || std::env::var_os("SSH_CONNECTION").is_some()
}

pub struct WgpuBackend {
    render_state: egui_wgpu::RenderState,
    /// Built by `prepare`, not yet on screen.
    prepared: Option<ImageResources>,
    screen: Option<[u32; 2]>,
    remote_session: bool,
}

impl WgpuBackend {
    pub fn new(render_state: &egui_wgpu::RenderState) -> Self {
        let pipelines = create_pipelines(&render_state.device, render_state.target_format);
        render_state
            .renderer
            .write()
            .callback_resources
            .insert(pipelines);

        let info = render_state.adapter.get_info();
        tracing::info!("Rendering with {} ({:?})", info.name, info.backend);

        Self {
            render_state: render_state.clone(),
            prepared: None,
            screen: None,
            remote_session: detect_remote_session(),
        }
    }

    /// Record the monitor size reported by the windowing layer.
    pub fn set_screen(&mut self, screen: Option<[u32; 2]>) {
        self.screen = screen;
    }

    fn upload(&self, format: DxgiFormat) -> Option<Upload> {
        match native_format(format) {
            Some(native) if native.is_compressed() => self
                .render_state
                .device
                .features()
                .contains(wgpu::Features::TEXTURE_COMPRESSION_BC)
                .then_some(Upload::Native(native)),
            Some(native) => Some(Upload::Native(native)),
            None => can_decode(format).then_some(Upload::Decoded),
        }
    }

    fn check_extent(&self, metadata: &TexMetadata, upload: Upload) -> Result<()> {
        let limits = self.render_state.device.limits();
        let (max_extent, max_layers) = match metadata.dimension {
            TexDimension::Texture3D => (
                limits.max_texture_dimension_3d,
                limits.max_texture_dimension_3d,
            ),
            _ => (limits.max_texture_dimension_2d, limits.max_texture_array_layers),
        };
        let layers = match metadata.dimension {
            TexDimension::Texture3D => metadata.depth,
            _ => metadata.array_size,
        };
        if metadata.width > max_extent || metadata.height > max_extent || layers > max_layers {
            return Err(DdsViewError::Backend(format!(
                "{}x{}x{} exceeds the device limit of {max_extent} texels and {max_layers} layers",
                metadata.width, metadata.height, layers
            )));
        }

        if let Upload::Native(native) = upload {
            let (block_w, block_h) = native.block_dimensions();
            if metadata.width % block_w != 0 || metadata.height % block_h != 0 {
                return Err(DdsViewError::Backend(format!(
                    "{}x{} is not a multiple of the {block_w}x{block_h} block size",
                    metadata.width, metadata.height
                )));
            }
        }
        Ok(())
    }

    /// Top mip of every array item (or every depth slice) in layer order.
    fn texture_data(image: &ScratchImage, upload: Upload) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        for sub in image.subresources().iter().filter(|s| s.mip == 0) {
            match upload {
                Upload::Native(_) => data.extend_from_slice(image.image(sub.item, 0, sub.slice)?),
                Upload::Decoded => {
                    let texels = decode_subresource(image, sub)?;
                    let (texels, _) = texels.into_raw_vec_and_offset();
                    data.extend_from_slice(bytemuck::cast_slice(&texels));
                }
            }
        }
        Ok(data)
    }
}

impl RenderBackend for WgpuBackend {
    fn supports_format(&self, format: DxgiFormat, dimension: TexDimension) -> bool {
        match self.upload(format) {
            Some(Upload::Native(native)) if native.is_compressed() => {
                dimension != TexDimension::Texture3D
            }
            Some(_) => true,
            None => false,
        }
    }

    fn display_metrics(&self) -> DisplayMetrics {
        DisplayMetrics {
            screen: self.screen,
            remote_session: self.remote_session,
        }
    }

    fn prepare(
        &mut self,
        image: &ScratchImage,
        metadata: &TexMetadata,
        variant: ShaderVariant,
        vertices: &[Vertex; 4],
    ) -> Result<()> {
        self.prepared = None;
        let upload = self.upload(metadata.format).ok_or_else(|| {
            DdsViewError::UnsupportedFormat(format!("no GPU upload path for {}", metadata.format))
        })?;
        self.check_extent(metadata, upload)?;

        let (format, dimension, layers) = match (upload, metadata.dimension) {
            (Upload::Native(native), TexDimension::Texture3D) => {
                (native, wgpu::TextureDimension::D3, metadata.depth)
            }
            (Upload::Decoded, TexDimension::Texture3D) => (
                wgpu::TextureFormat::Rgba32Float,
                wgpu::TextureDimension::D3,
                metadata.depth,
            ),
            (Upload::Native(native), _) => {
                (native, wgpu::TextureDimension::D2, metadata.array_size)
            }
            (Upload::Decoded, _) => (
                wgpu::TextureFormat::Rgba32Float,
                wgpu::TextureDimension::D2,
                metadata.array_size,
            ),
        };

        let data = Self::texture_data(image, upload)?;
        let device = &self.render_state.device;
        let texture = device.create_texture_with_data(
            &self.render_state.queue,
            &wgpu::TextureDescriptor {
                label: Some("dds image"),
                size: wgpu::Extent3d {
                    width: metadata.width,
                    height: metadata.height,
                    depth_or_array_layers: layers,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &data,
        );

        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("image quad"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let renderer = self.render_state.renderer.read();
        let pipelines = renderer
            .callback_resources
            .get::<Pipelines>()
            .ok_or_else(|| DdsViewError::Backend("render pipelines not initialized".into()))?;

        let mut variants = vec![variant];
        if metadata.format.has_stencil() && variant != ShaderVariant::Stencil {
            variants.push(ShaderVariant::Stencil);
        }
        let bind_groups = variants
            .into_iter()
            .filter_map(|v| {
                let layout = pipelines.layouts.get(&v)?;
                let view = texture.create_view(&wgpu::TextureViewDescriptor {
                    dimension: Some(view_dimension(v)),
                    ..Default::default()
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("dds image"),
                    layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: pipelines.params.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(&view),
                        },
                    ],
                });
                Some((v, bind_group))
            })
            .collect();

        self.prepared = Some(ImageResources {
            _texture: texture,
            bind_groups,
            vertices,
            variant,
        });
        Ok(())
    }

    fn commit(&mut self) {
        let Some(image) = self.prepared.take() else {
            return;
        };
        let mut renderer = self.render_state.renderer.write();
        renderer.callback_resources.remove::<ImageResources>();
        renderer.callback_resources.insert(image);
    }
}

fn create_pipelines(device: &wgpu::Device, target_format: wgpu::TextureFormat) -> Pipelines {
    let params = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("render params"),
        size: std::mem::size_of::<RenderParams>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let vertex_attributes = wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x4];
    let vertex_layout = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &vertex_attributes,
    };

    let mut layouts = HashMap::new();
    let mut pipelines = HashMap::new();
    for variant in ShaderVariant::ALL {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("dds image"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<RenderParams>() as u64,
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: sample_type(variant),
                        view_dimension: view_dimension(variant),
                        multisampled: false,
                    },
                    count: None,
                },
            ],
        });

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("dds image"),
            source: wgpu::ShaderSource::Wgsl(shaders::source(variant).into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("dds image"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("dds image"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout.clone()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        layouts.insert(variant, layout);
        pipelines.insert(variant, pipeline);
    }

    Pipelines {
        layouts,
        pipelines,
        params,
    }
}

/// Paint callback that draws the loaded image with this frame's parameters.
pub struct ImageCallback {
    pub params: RenderParams,
    /// Variant to draw with; falls back to the committed one.
    pub variant: Option<ShaderVariant>,
    /// Quad for the painted rect, replacing the one built at load time.
    pub quad: Option<[Vertex; 4]>,
}

impl egui_wgpu::CallbackTrait for ImageCallback {
    fn prepare(
        &self,
        _device: &wgpu::Device,
        queue: &wgpu::Queue,
        _screen_descriptor: &egui_wgpu::ScreenDescriptor,
        _egui_encoder: &mut wgpu::CommandEncoder,
        resources: &mut egui_wgpu::CallbackResources,
    ) -> Vec<wgpu::CommandBuffer> {
        if let Some(pipelines) = resources.get::<Pipelines>() {
            queue.write_buffer(&pipelines.params, 0, bytemuck::bytes_of(&self.params));
        }
        if let (Some(image), Some(quad)) = (resources.get::<ImageResources>(), &self.quad) {
            queue.write_buffer(&image.vertices, 0, bytemuck::cast_slice(quad));
        }
        Vec::new()
    }

    fn paint(
        &self,
        _info: egui::PaintCallbackInfo,
        render_pass: &mut wgpu::RenderPass<'static>,
        resources: &egui_wgpu::CallbackResources,
    ) {
        let (Some(pipelines), Some(image)) = (
            resources.get::<Pipelines>(),
            resources.get::<ImageResources>(),
        ) else {
            return;
        };

        let variant = self
            .variant
            .filter(|v| image.bind_groups.contains_key(v))
            .unwrap_or(image.variant);
        let (Some(pipeline), Some(bind_group)) = (
            pipelines.pipelines.get(&variant),
            image.bind_groups.get(&variant),
        ) else {
            return;
        };

        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, bind_group, &[]);
        render_pass.set_vertex_buffer(0, image.vertices.slice(..));
        render_pass.draw(0..4, 0..1);
    }
}
