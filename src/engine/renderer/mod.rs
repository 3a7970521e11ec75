// Rendering manager built on wgpu

pub mod camera;
pub mod mesh;
pub mod settings;

pub use camera::{Camera, CameraUniform};
pub use mesh::MeshRenderer;
pub use settings::RenderSettings;

use crate::core::color::Color;
use crate::engine::error::EngineError;
use crate::engine::objects::ObjectManager;
use log::info;
use std::sync::Arc;
use winit::window::Window;

/// Owns the GPU device and surface and draws one frame per render call
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    mesh_renderer: MeshRenderer,
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
    samples: u32,
}

impl Renderer {
    /// Create a renderer for the given window
    pub async fn new(
        window: Arc<Window>,
        settings: &RenderSettings,
        log_adapter_info: bool,
    ) -> Result<Self, EngineError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(EngineError::AdapterNotFound)?;

        let adapter_info = adapter.get_info();
        info!("Using GPU: {}", adapter_info.name);
        if log_adapter_info {
            info!("Backend: {:?}", adapter_info.backend);
            info!("Driver: {} {}", adapter_info.driver, adapter_info.driver_info);
        }

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: settings.present_mode(),
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let samples = settings.msaa_samples();
        let (depth_view, msaa_view) = Self::create_targets(&device, &config, samples);
        let mesh_renderer = MeshRenderer::new(&device, surface_format, settings);

        info!(
            "Renderer initialized with {}x{} resolution, {}x MSAA",
            config.width, config.height, samples
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            mesh_renderer,
            depth_view,
            msaa_view,
            samples,
        })
    }

    /// Create the depth buffer and, above one sample, the MSAA color target
    fn create_targets(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        samples: u32,
    ) -> (wgpu::TextureView, Option<wgpu::TextureView>) {
        let extent = wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        };

        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: samples,
            dimension: wgpu::TextureDimension::D2,
            format: mesh::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let msaa_view = (samples > 1).then(|| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some("MSAA Color Texture"),
                    size: extent,
                    mip_level_count: 1,
                    sample_count: samples,
                    dimension: wgpu::TextureDimension::D2,
                    format: config.format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        });

        (depth_view, msaa_view)
    }

    /// Resize the surface and its render targets
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            let (depth_view, msaa_view) =
                Self::create_targets(&self.device, &self.config, self.samples);
            self.depth_view = depth_view;
            self.msaa_view = msaa_view;
            info!("Renderer resized to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Apply pending render settings changes
    pub fn apply_settings(&mut self, settings: &mut RenderSettings) {
        if settings.take_surface_dirty() {
            self.config.present_mode = settings.present_mode();
            self.surface.configure(&self.device, &self.config);
            info!("Present mode set to {:?}", self.config.present_mode);
        }

        if settings.take_pipeline_dirty() {
            self.samples = settings.msaa_samples();
            let (depth_view, msaa_view) =
                Self::create_targets(&self.device, &self.config, self.samples);
            self.depth_view = depth_view;
            self.msaa_view = msaa_view;
            self.mesh_renderer
                .rebuild_pipeline(&self.device, self.config.format, settings);
            info!(
                "Pipeline rebuilt: {}x MSAA, depth test {}, face culling {}",
                self.samples,
                settings.depth_test(),
                settings.face_culling()
            );
        }
    }

    /// Draw one frame: clear to the background color, draw all visible
    /// objects, and present
    pub fn render(
        &mut self,
        camera: &Camera,
        objects: &ObjectManager,
        background: Color,
    ) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.mesh_renderer
            .prepare(&self.device, &self.queue, camera, objects);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            // Render into the MSAA target and resolve, or straight into the
            // surface when multisampling is off
            let (view, resolve_target) = match &self.msaa_view {
                Some(msaa_view) => (msaa_view, Some(&surface_view)),
                None => (&surface_view, None),
            };

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(background.to_wgpu()),
                        store: if self.msaa_view.is_some() {
                            wgpu::StoreOp::Discard
                        } else {
                            wgpu::StoreOp::Store
                        },
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.mesh_renderer.render(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Current surface size
    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.size
    }

    /// Current surface aspect ratio
    pub fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    /// Surface color format
    #[allow(dead_code)]
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// GPU device
    #[allow(dead_code)]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// GPU queue
    #[allow(dead_code)]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}
