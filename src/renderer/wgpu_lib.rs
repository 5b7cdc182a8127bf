//! WGPU render context.
//!
//! [`WgpuContext`] implements [`Canvas`] on top of a window surface. A frame is
//! recorded on the CPU: [`Canvas::clear`] stores the clear color and resets the
//! quad list, every [`Canvas::copy`] appends one textured quad, and
//! [`Canvas::present`] uploads all quads in a single vertex buffer, runs one
//! render pass and presents the surface texture.

use crate::config::Config;
use crate::error::{InitError, InitResult};
use crate::renderer::backend::{Canvas, Color, Rect};
use crate::renderer::font_atlas::FontAtlas;
use crate::renderer::pipeline_builder::{BindGroupLayoutBuilder, PipelineBuilder};
use crate::renderer::vertex::{GlyphVertex, glyph_quad};
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, info, warn};
use wgpu::util::DeviceExt;
use winit::window::Window;

const GLYPH_SHADER: &str = include_str!("shaders/glyph.wgsl");

/// Font atlas uploaded to the GPU, ready to be sampled by the glyph pipeline.
pub struct GlyphTexture {
    texture: wgpu::Texture,
    bind_group: Arc<wgpu::BindGroup>,
    width: u32,
    height: u32,
}

impl GlyphTexture {
    /// Size of the uploaded atlas in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for GlyphTexture {
    fn drop(&mut self) {
        self.texture.destroy();
    }
}

/// Consecutive quads sampling the same texture.
struct DrawBatch {
    bind_group: Arc<wgpu::BindGroup>,
    vertices: Range<u32>,
}

/// Render context bound to one window surface.
pub struct WgpuContext {
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    clear_color: wgpu::Color,
    vertices: Vec<GlyphVertex>,
    batches: Vec<DrawBatch>,
}

impl WgpuContext {
    /// Creates a surface for `window` and the device, pipeline and sampler used
    /// to draw glyphs onto it.
    ///
    /// # Errors
    /// Returns [`InitError::SurfaceOrContext`] when the surface, adapter, device
    /// or pipeline cannot be created.
    pub fn new(instance: &wgpu::Instance, window: Arc<Window>, config: &Config) -> InitResult<Self> {
        let surface = instance
            .create_surface(window)
            .map_err(|err| InitError::SurfaceOrContext(err.to_string()))?;

        let adapter = pollster::block_on(Self::create_adapter(instance, &surface))?;
        let (device, queue) = pollster::block_on(Self::create_device(&adapter))?;
        let surface_config = Self::create_surface_config(
            &surface,
            &adapter,
            config.screen_width,
            config.screen_height,
        )?;
        surface.configure(&device, &surface_config);

        let bind_group_layout = BindGroupLayoutBuilder::new(&device)
            .with_label("Glyph Bind Group Layout")
            .with_texture(0, wgpu::ShaderStages::FRAGMENT)
            .with_sampler(1, wgpu::ShaderStages::FRAGMENT)
            .build();

        let pipeline = PipelineBuilder::new(&device, surface_config.format)
            .with_label("Glyph Pipeline")
            .with_shader(GLYPH_SHADER)
            .with_vertex_buffer(GlyphVertex::desc())
            .with_bind_group_layout(&bind_group_layout)
            .with_alpha_blending()
            .with_no_culling()
            .build()?;

        // Glyphs are pixel art: no filtering between texels.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Glyph Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        info!(
            adapter = %adapter.get_info().name,
            format = ?surface_config.format,
            "Render context created"
        );

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            pipeline,
            bind_group_layout,
            sampler,
            clear_color: wgpu::Color::BLACK,
            vertices: Vec::new(),
            batches: Vec::new(),
        })
    }

    async fn create_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'static>,
    ) -> InitResult<wgpu::Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(surface),
            })
            .await
            .ok_or_else(|| {
                InitError::SurfaceOrContext("no graphics adapter can present to the window".to_string())
            })
    }

    async fn create_device(adapter: &wgpu::Adapter) -> InitResult<(wgpu::Device, wgpu::Queue)> {
        adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Glyph Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|err| InitError::SurfaceOrContext(err.to_string()))
    }

    fn create_surface_config(
        surface: &wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> InitResult<wgpu::SurfaceConfiguration> {
        let capabilities = surface.get_capabilities(adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| capabilities.formats.first().copied())
            .ok_or_else(|| {
                InitError::SurfaceOrContext("surface reports no supported formats".to_string())
            })?;

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            // Frame pacing is done by the frame limiter, not by vsync.
            present_mode: wgpu::PresentMode::AutoNoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode: capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        })
    }

    fn acquire_frame(&mut self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(frame) => Some(frame),
            Err(err @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                warn!(%err, "Surface needs reconfiguring, skipping frame");
                self.surface.configure(&self.device, &self.surface_config);
                None
            }
            Err(err) => {
                warn!(%err, "Failed to acquire surface texture, skipping frame");
                None
            }
        }
    }
}

impl Canvas for WgpuContext {
    type Texture = GlyphTexture;

    fn create_texture(&mut self, atlas: &FontAtlas) -> InitResult<GlyphTexture> {
        let (width, height) = (atlas.width(), atlas.height());
        let max = self.device.limits().max_texture_dimension_2d;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(InitError::FontConversion(format!(
                "atlas is {width}x{height}, textures must be between 1 and {max} pixels per side"
            )));
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Font Atlas"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            atlas.rgba(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Font Atlas Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        debug!(width, height, "Font atlas uploaded");
        Ok(GlyphTexture {
            texture,
            bind_group: Arc::new(bind_group),
            width,
            height,
        })
    }

    fn clear(&mut self, color: Color) {
        let [r, g, b, a] = if self.surface_config.format.is_srgb() {
            color.to_linear_f64_array()
        } else {
            color.to_f64_array()
        };
        self.clear_color = wgpu::Color { r, g, b, a };
        self.vertices.clear();
        self.batches.clear();
    }

    fn copy(&mut self, texture: &GlyphTexture, src: Rect, dst: Rect) {
        let screen = (self.surface_config.width, self.surface_config.height);
        let start = self.vertices.len() as u32;
        self.vertices
            .extend_from_slice(&glyph_quad(src, dst, texture.size(), screen));
        let end = self.vertices.len() as u32;

        match self.batches.last_mut() {
            Some(batch) if Arc::ptr_eq(&batch.bind_group, &texture.bind_group) => {
                batch.vertices.end = end;
            }
            _ => self.batches.push(DrawBatch {
                bind_group: texture.bind_group.clone(),
                vertices: start..end,
            }),
        }
    }

    fn present(&mut self) {
        let Some(frame) = self.acquire_frame() else {
            return;
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let vertex_buffer = (!self.vertices.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Glyph Vertex Buffer"),
                    contents: bytemuck::cast_slice(&self.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Glyph Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Glyph Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(buffer) = &vertex_buffer {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                for batch in &self.batches {
                    render_pass.set_bind_group(0, &*batch.bind_group, &[]);
                    render_pass.draw(batch.vertices.clone(), 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}

impl Drop for WgpuContext {
    fn drop(&mut self) {
        // Let in-flight frames finish before the surface goes away.
        let _ = self.device.poll(wgpu::Maintain::Wait);
    }
}
