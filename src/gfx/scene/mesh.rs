//! GPU-resident meshes
//!
//! A [`Mesh`] owns everything needed to draw one shape: the interleaved
//! vertex buffer, its own compiled shader module and render pipeline, and a
//! uniform buffer for the per-frame matrices. Nothing is shared between
//! meshes, even when they run the same shader source.

use log::{debug, error};
use wgpu::util::DeviceExt;

use crate::{
    error::{Result, ViewerError},
    gfx::{
        camera::{camera_utils::convert_matrix4_to_array, orbit_camera::DrawTransforms},
        geometry::GeometryData,
    },
    wgpu_utils::{binding_types, UniformBuffer},
};

use super::vertex::Vertex3D;

/// WGSL source every mesh compiles unless given another one.
pub const SHADER_SOURCE: &str = include_str!("../shaders/phong.wgsl");

/// Eye-space light direction. Normalized in the shader, not here.
pub const LIGHT_DIRECTION: [f32; 3] = [0.0, 1.0, 8.0];

/// Which fragment entry point a mesh uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadingModel {
    /// Diffuse + specular highlight.
    #[default]
    Phong,
    /// Diffuse only.
    Diffuse,
}

impl ShadingModel {
    pub fn fragment_entry_point(self) -> &'static str {
        match self {
            ShadingModel::Phong => "fs_phong",
            ShadingModel::Diffuse => "fs_diffuse",
        }
    }
}

/// Per-mesh lighting options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshOptions {
    pub shading: ShadingModel,
    pub light_direction: [f32; 3],
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            shading: ShadingModel::Phong,
            light_direction: LIGHT_DIRECTION,
        }
    }
}

/// Color and depth formats a mesh pipeline renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargets {
    pub color_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
}

/// Uniform block layout. MUST match `MeshUniform` in `phong.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniform {
    pub mvp: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub light_direction: [f32; 4],
}

impl MeshUniform {
    pub fn new(transforms: &DrawTransforms, light_direction: [f32; 3]) -> Self {
        let [x, y, z] = light_direction;
        Self {
            mvp: convert_matrix4_to_array(transforms.mvp),
            normal_matrix: convert_matrix4_to_array(transforms.normal_matrix),
            model_view: convert_matrix4_to_array(transforms.model_view),
            light_direction: [x, y, z, 0.0],
        }
    }
}

pub struct Mesh {
    label: String,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    pipeline: wgpu::RenderPipeline,
    uniforms: UniformBuffer<MeshUniform>,
    bind_group: wgpu::BindGroup,
    light_direction: [f32; 3],
}

impl Mesh {
    /// Uploads `geometry` and builds a pipeline from [`SHADER_SOURCE`].
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        geometry: &GeometryData,
        targets: RenderTargets,
        options: MeshOptions,
    ) -> Result<Self> {
        Self::with_shader(device, label, geometry, targets, options, SHADER_SOURCE)
    }

    /// Like [`Mesh::new`] with caller-supplied WGSL. The source must provide
    /// `vs_main` and the fragment entry point of `options.shading`.
    ///
    /// # Errors
    /// [`ViewerError::MalformedGeometry`] before anything touches the GPU, or
    /// [`ViewerError::ShaderCompile`] when the module or pipeline fails
    /// validation.
    pub fn with_shader(
        device: &wgpu::Device,
        label: &str,
        geometry: &GeometryData,
        targets: RenderTargets,
        options: MeshOptions,
        shader_source: &str,
    ) -> Result<Self> {
        let vertices = geometry.to_vertices()?;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{label} Bind Group Layout")),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: binding_types::uniform(),
                count: None,
            }],
        });

        let pipeline = compile_pipeline(
            device,
            label,
            shader_source,
            &bind_group_layout,
            targets,
            options.shading,
        )?;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniforms =
            UniformBuffer::new_with_data(device, label, &MeshUniform::zeroed_with(options));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Bind Group")),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.binding_resource(),
            }],
        });

        debug!(
            "mesh '{label}': {} vertices, {:?} shading",
            vertices.len(),
            options.shading
        );

        Ok(Self {
            label: label.to_string(),
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            pipeline,
            uniforms,
            bind_group,
            light_direction: options.light_direction,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Writes this frame's matrices and records a non-indexed draw of every
    /// vertex into `render_pass`.
    pub fn draw(
        &mut self,
        queue: &wgpu::Queue,
        render_pass: &mut wgpu::RenderPass<'_>,
        transforms: &DrawTransforms,
    ) {
        self.uniforms
            .update_content(queue, MeshUniform::new(transforms, self.light_direction));
        render_pass.draw_mesh(self);
    }
}

impl MeshUniform {
    fn zeroed_with(options: MeshOptions) -> Self {
        let [x, y, z] = options.light_direction;
        Self {
            light_direction: [x, y, z, 0.0],
            ..bytemuck::Zeroable::zeroed()
        }
    }
}

/// Compiles `source` and links it into a triangle-list pipeline, turning
/// validation errors into [`ViewerError::ShaderCompile`].
fn compile_pipeline(
    device: &wgpu::Device,
    label: &str,
    source: &str,
    bind_group_layout: &wgpu::BindGroupLayout,
    targets: RenderTargets,
    shading: ShadingModel,
) -> Result<wgpu::RenderPipeline> {
    let shader_error = |stage: &str, err: wgpu::Error| {
        error!("error compiling shader for '{label}' ({stage}): {err}");
        ViewerError::ShaderCompile {
            label: label.to_string(),
            message: err.to_string(),
        }
    };

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(shader_error("module", err));
    }

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{label} Layout")),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex3D::desc()],
            compilation_options: Default::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // sphere bands mix windings
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
            unclipped_depth: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: targets.depth_format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some(shading.fragment_entry_point()),
            targets: &[Some(wgpu::ColorTargetState {
                format: targets.color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        multiview: None,
        cache: None,
    });
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(shader_error("pipeline", err));
    }

    Ok(pipeline)
}

pub trait DrawMesh {
    fn draw_mesh(&mut self, mesh: &Mesh);
}

impl DrawMesh for wgpu::RenderPass<'_> {
    fn draw_mesh(&mut self, mesh: &Mesh) {
        self.set_pipeline(&mesh.pipeline);
        self.set_bind_group(0, &mesh.bind_group, &[]);
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.draw(0..mesh.vertex_count, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        camera::{orbit_camera::OrbitCamera, ViewSnapshot},
        geometry::{generate_cube, generate_sphere, CubeStyle},
        resources::TextureResource,
    };

    const TARGETS: RenderTargets = RenderTargets {
        color_format: wgpu::TextureFormat::Rgba8Unorm,
        depth_format: TextureResource::DEPTH_FORMAT,
    };

    /// Headless device, or `None` on machines without a usable adapter.
    fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
                .ok()?;
        pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default())).ok()
    }

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<MeshUniform>(), 3 * 64 + 16);

        let frame = OrbitCamera::new().frame_matrices(ViewSnapshot::at_rest(-6.0));
        let uniform = MeshUniform::new(&frame.shared(), LIGHT_DIRECTION);
        assert_eq!(uniform.light_direction, [0.0, 1.0, 8.0, 0.0]);
        assert_eq!(uniform.mvp, convert_matrix4_to_array(frame.mvp));
        // column-major: the view translation lives in the last column
        assert_eq!(uniform.model_view[3][2], frame.view[3][2]);
    }

    #[test]
    fn test_entry_points() {
        assert_eq!(ShadingModel::default().fragment_entry_point(), "fs_phong");
        assert_eq!(ShadingModel::Diffuse.fragment_entry_point(), "fs_diffuse");
        assert!(SHADER_SOURCE.contains("fn fs_phong"));
        assert!(SHADER_SOURCE.contains("fn fs_diffuse"));
        assert!(SHADER_SOURCE.contains("fn vs_main"));
    }

    #[test]
    fn test_mesh_upload() {
        let Some((device, _queue)) = headless_device() else {
            return;
        };

        let cube = Mesh::new(
            &device,
            "cube",
            &generate_cube(CubeStyle::Decorative),
            TARGETS,
            MeshOptions {
                shading: ShadingModel::Diffuse,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(cube.vertex_count(), 36);

        let sphere = Mesh::new(
            &device,
            "sphere",
            &generate_sphere(1.0, 4, 4).unwrap(),
            TARGETS,
            MeshOptions::default(),
        )
        .unwrap();
        assert_eq!(sphere.vertex_count(), 96);
        assert_eq!(sphere.label(), "sphere");
    }

    #[test]
    fn test_broken_shader_is_reported() {
        let Some((device, _queue)) = headless_device() else {
            return;
        };

        let result = Mesh::with_shader(
            &device,
            "broken",
            &generate_cube(CubeStyle::Top),
            TARGETS,
            MeshOptions::default(),
            "@vertex fn vs_main( -> {",
        );
        match result {
            Err(ViewerError::ShaderCompile { label, .. }) => assert_eq!(label, "broken"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("broken shader compiled"),
        }
    }

    #[test]
    fn test_malformed_geometry_rejected_before_upload() {
        let Some((device, _queue)) = headless_device() else {
            return;
        };

        let mut geometry = generate_cube(CubeStyle::Leg);
        geometry.colors.truncate(100);
        let result = Mesh::new(&device, "bad", &geometry, TARGETS, MeshOptions::default());
        assert!(matches!(
            result,
            Err(ViewerError::MalformedGeometry { colors: 100, .. })
        ));
    }
}
