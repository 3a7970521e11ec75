// Instanced cuboid mesh rendering

use super::camera::{Camera, CameraUniform};
use super::settings::RenderSettings;
use crate::engine::objects::{GameObject, ObjectManager};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Depth buffer format used by the mesh pass
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const INITIAL_INSTANCE_CAPACITY: usize = 64;

/// Vertex of the shared unit cube mesh
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    const fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    /// Vertex buffer layout descriptor
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Per-instance data: model matrix columns and tint color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceRaw {
    /// Build instance data from a game object
    pub fn from_object(object: &GameObject) -> Self {
        Self {
            model: object.model_matrix().to_cols_array_2d(),
            color: object.color.to_array(),
        }
    }

    /// Instance buffer layout descriptor (shader locations 2..=6)
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const VEC4_SIZE: wgpu::BufferAddress = std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress;
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: VEC4_SIZE,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 2 * VEC4_SIZE,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 3 * VEC4_SIZE,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 4 * VEC4_SIZE,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Unit cube centered at the origin, one quad per face with face normals
#[rustfmt::skip]
pub const CUBE_VERTICES: [Vertex; 24] = [
    // +Z
    Vertex::new([-0.5, -0.5,  0.5], [0.0, 0.0, 1.0]),
    Vertex::new([ 0.5, -0.5,  0.5], [0.0, 0.0, 1.0]),
    Vertex::new([ 0.5,  0.5,  0.5], [0.0, 0.0, 1.0]),
    Vertex::new([-0.5,  0.5,  0.5], [0.0, 0.0, 1.0]),
    // -Z
    Vertex::new([ 0.5, -0.5, -0.5], [0.0, 0.0, -1.0]),
    Vertex::new([-0.5, -0.5, -0.5], [0.0, 0.0, -1.0]),
    Vertex::new([-0.5,  0.5, -0.5], [0.0, 0.0, -1.0]),
    Vertex::new([ 0.5,  0.5, -0.5], [0.0, 0.0, -1.0]),
    // +X
    Vertex::new([ 0.5, -0.5,  0.5], [1.0, 0.0, 0.0]),
    Vertex::new([ 0.5, -0.5, -0.5], [1.0, 0.0, 0.0]),
    Vertex::new([ 0.5,  0.5, -0.5], [1.0, 0.0, 0.0]),
    Vertex::new([ 0.5,  0.5,  0.5], [1.0, 0.0, 0.0]),
    // -X
    Vertex::new([-0.5, -0.5, -0.5], [-1.0, 0.0, 0.0]),
    Vertex::new([-0.5, -0.5,  0.5], [-1.0, 0.0, 0.0]),
    Vertex::new([-0.5,  0.5,  0.5], [-1.0, 0.0, 0.0]),
    Vertex::new([-0.5,  0.5, -0.5], [-1.0, 0.0, 0.0]),
    // +Y
    Vertex::new([-0.5,  0.5,  0.5], [0.0, 1.0, 0.0]),
    Vertex::new([ 0.5,  0.5,  0.5], [0.0, 1.0, 0.0]),
    Vertex::new([ 0.5,  0.5, -0.5], [0.0, 1.0, 0.0]),
    Vertex::new([-0.5,  0.5, -0.5], [0.0, 1.0, 0.0]),
    // -Y
    Vertex::new([-0.5, -0.5, -0.5], [0.0, -1.0, 0.0]),
    Vertex::new([ 0.5, -0.5, -0.5], [0.0, -1.0, 0.0]),
    Vertex::new([ 0.5, -0.5,  0.5], [0.0, -1.0, 0.0]),
    Vertex::new([-0.5, -0.5,  0.5], [0.0, -1.0, 0.0]),
];

/// Two counter-clockwise triangles per face
#[rustfmt::skip]
pub const CUBE_INDICES: [u16; 36] = [
    0, 1, 2, 0, 2, 3,
    4, 5, 6, 4, 6, 7,
    8, 9, 10, 8, 10, 11,
    12, 13, 14, 12, 14, 15,
    16, 17, 18, 16, 18, 19,
    20, 21, 22, 20, 22, 23,
];

/// Draws all visible game objects as instanced, flat-shaded cuboids
pub struct MeshRenderer {
    pipeline: wgpu::RenderPipeline,
    pipeline_layout: wgpu::PipelineLayout,
    shader: wgpu::ShaderModule,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instance_count: u32,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
}

impl MeshRenderer {
    /// Create the mesh renderer and its GPU resources
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        settings: &RenderSettings,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: bytemuck::cast_slice(&CUBE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instance_buffer = Self::create_instance_buffer(device, INITIAL_INSTANCE_CAPACITY);

        let pipeline = Self::build_pipeline(device, &shader, &pipeline_layout, color_format, settings);

        Self {
            pipeline,
            pipeline_layout,
            shader,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
            instance_count: 0,
            camera_buffer,
            camera_bind_group,
        }
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Mesh Instance Buffer"),
            size: (capacity * std::mem::size_of::<InstanceRaw>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn build_pipeline(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        layout: &wgpu::PipelineLayout,
        color_format: wgpu::TextureFormat,
        settings: &RenderSettings,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Render Pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: "vs_main",
                buffers: &[Vertex::desc(), InstanceRaw::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: settings.face_culling().then_some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: settings.depth_test(),
                depth_compare: if settings.depth_test() {
                    wgpu::CompareFunction::Less
                } else {
                    wgpu::CompareFunction::Always
                },
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: settings.msaa_samples(),
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        })
    }

    /// Rebuild the pipeline after a settings change
    pub fn rebuild_pipeline(
        &mut self,
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        settings: &RenderSettings,
    ) {
        self.pipeline =
            Self::build_pipeline(device, &self.shader, &self.pipeline_layout, color_format, settings);
    }

    /// Upload the camera uniform and per-instance data for this frame
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        camera: &Camera,
        objects: &ObjectManager,
    ) {
        let camera_uniform = CameraUniform::new(camera);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[camera_uniform]));

        let instances: Vec<InstanceRaw> = objects
            .iter_visible()
            .map(InstanceRaw::from_object)
            .collect();

        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_buffer = Self::create_instance_buffer(device, self.instance_capacity);
        }

        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }
        self.instance_count = instances.len() as u32;
    }

    /// Record the draw into an open render pass
    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if self.instance_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..CUBE_INDICES.len() as u32, 0, 0..self.instance_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::Color;
    use glam::Vec3;

    #[test]
    fn test_cube_indices_reference_valid_vertices() {
        assert_eq!(CUBE_INDICES.len(), 36);
        for &index in CUBE_INDICES.iter() {
            assert!((index as usize) < CUBE_VERTICES.len());
        }
    }

    #[test]
    fn test_cube_normals_are_unit_axis_vectors() {
        for vertex in CUBE_VERTICES.iter() {
            let normal = Vec3::from_array(vertex.normal);
            assert!((normal.length() - 1.0).abs() < 1e-6);
            assert_eq!(normal.abs().max_element(), 1.0);
        }
    }

    #[test]
    fn test_cube_vertices_lie_on_unit_cube() {
        for vertex in CUBE_VERTICES.iter() {
            for component in vertex.position {
                assert!(component == 0.5 || component == -0.5);
            }
        }
    }

    #[test]
    fn test_instance_from_object() {
        let object = GameObject::with_color(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::splat(2.0),
            Color::RED,
        );
        let instance = InstanceRaw::from_object(&object);
        assert_eq!(instance.color, [1.0, 0.0, 0.0, 1.0]);
        // Translation lands in the fourth column
        assert_eq!(instance.model[3], [1.0, 2.0, 3.0, 1.0]);
        // Scale on the diagonal
        assert_eq!(instance.model[0][0], 2.0);
    }
}
