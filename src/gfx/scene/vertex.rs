//! # Vertex Data Structures
//!
//! GPU-compatible vertex format shared by every mesh in the viewer.

/// A vertex with position, color and normal.
///
/// `#[repr(C)]` keeps the field order and packing the pipeline layout in
/// [`Vertex3D::desc`] relies on.
///
/// # Examples
///
/// ```no_run
/// use cueball::gfx::scene::vertex::Vertex3D;
///
/// let vertex = Vertex3D {
///     position: [0.0, 1.0, 0.0],
///     color: [1.0, 1.0, 1.0],
///     normal: [0.0, 1.0, 0.0],
/// };
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    /// 3D position coordinates [x, y, z]
    pub position: [f32; 3],
    /// Vertex color [r, g, b]
    pub color: [f32; 3],
    /// Normal vector [nx, ny, nz], not necessarily unit length
    pub normal: [f32; 3],
}

impl Vertex3D {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];

    /// Returns the vertex buffer layout for wgpu rendering.
    ///
    /// - Attribute 0: position (Float32x3)
    /// - Attribute 1: color (Float32x3)
    /// - Attribute 2: normal (Float32x3)
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}
