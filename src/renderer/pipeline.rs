//! WebGPU render pipeline for particle quads

use wgpu::util::DeviceExt;

use super::batch::QuadBatch;
use super::vertex::Vertex;
use crate::error::RenderError;
use crate::surface::{DrawSurface, Rgba};

/// GPU state for drawing a [`QuadBatch`]
pub struct QuadRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: Option<wgpu::Buffer>,
    pub vertex_count: u32,
    /// Viewport size in pixels
    pub size: (u32, u32),
}

impl QuadRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("dodging-particles-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad_pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer: None,
            vertex_count: 0,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload the batch and draw it over a cleared frame
    pub fn render(&mut self, batch: &QuadBatch) -> Result<(), wgpu::SurfaceError> {
        let vertices: Vec<Vertex> = batch
            .vertices()
            .into_iter()
            .map(|v| {
                let [x, y] = pixel_to_ndc(v.position, self.size);
                Vertex::new(x, y, v.color)
            })
            .collect();

        self.vertex_count = vertices.len() as u32;
        self.vertex_buffer = (!vertices.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("quad_vertex_buffer"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("quad_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quad_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(buffer) = &self.vertex_buffer {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Map surface pixels (origin top-left, y down) to normalized device coordinates
pub fn pixel_to_ndc(position: [f32; 2], size: (u32, u32)) -> [f32; 2] {
    let (w, h) = (size.0.max(1) as f32, size.1.max(1) as f32);
    [position[0] / w * 2.0 - 1.0, 1.0 - position[1] / h * 2.0]
}

/// Drawing surface backed by WebGPU.
///
/// Draw calls are staged in a [`QuadBatch`]; `present` pushes them to the GPU.
pub struct GpuSurface {
    batch: QuadBatch,
    state: QuadRenderState,
}

impl GpuSurface {
    pub fn new(state: QuadRenderState) -> Self {
        let (w, h) = state.size;
        Self {
            batch: QuadBatch::new(w, h),
            state,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.state.resize(width, height);
        self.batch.resize(width, height);
    }
}

impl DrawSurface for GpuSurface {
    fn size(&self) -> (u32, u32) {
        self.batch.size()
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.batch.clear_rect(x, y, width, height);
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.batch.set_fill_color(color);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.batch.fill_rect(x, y, width, height);
    }

    fn present(&mut self) {
        match self.state.render(&self.batch) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) => {
                let (w, h) = self.state.size;
                self.state.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_ndc_corners() {
        assert_eq!(pixel_to_ndc([0.0, 0.0], (200, 100)), [-1.0, 1.0]);
        assert_eq!(pixel_to_ndc([200.0, 100.0], (200, 100)), [1.0, -1.0]);
        assert_eq!(pixel_to_ndc([100.0, 50.0], (200, 100)), [0.0, 0.0]);
    }
}
