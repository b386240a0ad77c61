//! WebGPU render pipeline setup

use std::collections::VecDeque;

use glam::{Mat4, Vec3};
use thiserror::Error;
use wgpu::util::DeviceExt;

use super::shapes::{BoxInstance, platform_box, player_box, scene_vertices};
use super::vertex::{Globals, Vertex};
use crate::consts::{CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR};
use crate::scene::SceneSink;
use crate::sim::{Camera, Platform, Player};

/// Direction toward the directional light
const LIGHT_DIR: Vec3 = Vec3::new(8.0, 3.0, 0.0);
const AMBIENT: f32 = 0.3;
const DIFFUSE: f32 = 0.5;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to acquire GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Perspective projection times look-at view for `camera`
pub fn view_proj(camera: &Camera, aspect: f32) -> Mat4 {
    let proj = Mat4::perspective_rh(CAMERA_FOV_DEG.to_radians(), aspect, CAMERA_NEAR, CAMERA_FAR);
    let view = Mat4::look_at_rh(camera.position, camera.look_at, Vec3::Y);
    proj * view
}

/// Renders the platform window and the player as lit boxes
///
/// Keeps its own mirror of the scene, updated through `SceneSink`.
pub struct BoxRenderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    /// Viewport size in pixels
    pub size: (u32, u32),
    clear_color: wgpu::Color,
    platforms: VecDeque<Platform>,
    player: Option<Player>,
    camera: Camera,
}

impl BoxRenderer {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        clear_color: [f32; 4],
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tap-jump-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        // Colors are authored as sRGB hex strings; write them untouched
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurfaceFormat)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("box_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals_buffer"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("box_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("box_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("box_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        // No depth buffer: boxes arrive sorted back to front and
        // back faces are culled
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("box_pipeline"),
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
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let [r, g, b, a] = clear_color.map(f64::from);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            bind_group,
            size: (width, height),
            clear_color: wgpu::Color { r, g, b, a },
            platforms: VecDeque::new(),
            player: None,
            camera: Camera::looking_at(Vec3::ZERO),
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

    fn boxes(&self) -> Vec<BoxInstance> {
        let mut boxes: Vec<BoxInstance> = self.platforms.iter().map(platform_box).collect();
        if let Some(player) = &self.player {
            boxes.push(player_box(player));
        }
        boxes
    }

    /// Upload the scene and draw one frame
    pub fn draw(&mut self) -> Result<(), wgpu::SurfaceError> {
        let aspect = self.size.0 as f32 / self.size.1.max(1) as f32;
        let globals = Globals {
            view_proj: view_proj(&self.camera, aspect).to_cols_array_2d(),
            light_dir: LIGHT_DIR.normalize().extend(0.0).to_array(),
            light: [AMBIENT, DIFFUSE, 0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let vertices = scene_vertices(self.boxes(), self.camera.position);
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("vertex_buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if !vertices.is_empty() {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.bind_group, &[]);
                render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                render_pass.draw(0..vertices.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl SceneSink for BoxRenderer {
    fn add_platform(&mut self, platform: &Platform) {
        self.platforms.push_back(platform.clone());
    }

    fn remove_oldest_platform(&mut self) {
        self.platforms.pop_front();
    }

    fn clear(&mut self) {
        self.platforms.clear();
        self.player = None;
    }

    fn update_player(&mut self, player: &Player) {
        self.player = Some(player.clone());
    }

    fn update_camera(&mut self, camera: &Camera) {
        self.camera = *camera;
    }

    fn render(&mut self) {
        match self.draw() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.resize(self.size.0, self.size.1);
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
    use crate::consts::CAMERA_OFFSET;

    fn ndc(m: Mat4, p: Vec3) -> Vec3 {
        let clip = m * p.extend(1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn test_look_at_projects_to_center() {
        let target = Vec3::new(-3.5, 0.0, -1.0);
        let camera = Camera::looking_at(target);
        let p = ndc(view_proj(&camera, 16.0 / 9.0), target);
        assert!(p.x.abs() < 1e-4);
        assert!(p.y.abs() < 1e-4);
        assert!(p.z > 0.0 && p.z < 1.0);
    }

    #[test]
    fn test_platforms_fit_narrow_view() {
        // Both starting platforms stay on screen at the default framing
        let camera = Camera::looking_at(Vec3::new(-4.0, 0.0, -1.0));
        let m = view_proj(&camera, 1.0);
        for corner in [Vec3::new(2.0, 1.0, 2.0), Vec3::new(-8.0, 1.0, -2.0)] {
            let p = ndc(m, corner);
            assert!(p.x.abs() <= 1.0, "{:?} off screen", corner);
            assert!(p.y.abs() <= 1.0, "{:?} off screen", corner);
        }
    }

    #[test]
    fn test_up_is_up() {
        let camera = Camera::looking_at(Vec3::ZERO);
        let m = view_proj(&camera, 1.0);
        assert!(ndc(m, Vec3::Y).y > 0.0);
        assert!(camera.position - camera.look_at == CAMERA_OFFSET);
    }
}
