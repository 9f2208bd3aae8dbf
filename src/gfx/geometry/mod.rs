//! # Procedural Geometry Generation
//!
//! Generates flat vertex/normal/color arrays for the primitives the viewer
//! draws, so no model files are needed.
//!
//! ## Supported Primitives
//!
//! - **Cube**: 36-vertex cube on the corners `(±1, ±1, ±1)`, one normal per face
//! - **Sphere**: UV sphere with configurable latitude/longitude band counts
//!
//! ## Usage
//!
//! ```rust
//! use cueball::gfx::geometry::{generate_cube, generate_sphere, CubeStyle};
//!
//! let cube = generate_cube(CubeStyle::Decorative);
//! assert_eq!(cube.vertex_count(), 36);
//!
//! let sphere = generate_sphere(1.0, 4, 4).unwrap();
//! assert_eq!(sphere.vertex_count(), 96);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::error::{Result, ViewerError};
use crate::gfx::scene::vertex::Vertex3D;

/// Floats per vertex in each of the three arrays.
pub const COORDS_PER_VERTEX: usize = 3;

/// Floats per triangle (3 vertices × 3 components).
pub const FLOATS_PER_TRIANGLE: usize = 3 * COORDS_PER_VERTEX;

/// Generated geometry ready for GPU upload.
///
/// The three arrays are parallel and laid out as a plain triangle list:
/// vertex `i` is `vertices[3i..3i + 3]`, its normal and color sit at the same
/// offsets in the other two arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<f32>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<f32>,
    /// Vertex colors (r, g, b)
    pub colors: Vec<f32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / COORDS_PER_VERTEX
    }

    /// Number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_TRIANGLE
    }

    /// Checks that the arrays are parallel and hold whole triangles.
    pub fn validate(&self) -> Result<()> {
        let positions = self.vertices.len();
        let consistent = positions == self.normals.len()
            && positions == self.colors.len()
            && positions % FLOATS_PER_TRIANGLE == 0;

        if consistent {
            Ok(())
        } else {
            Err(ViewerError::MalformedGeometry {
                positions,
                normals: self.normals.len(),
                colors: self.colors.len(),
            })
        }
    }

    /// Interleaves the three arrays into the vertex format the pipeline reads.
    pub fn to_vertices(&self) -> Result<Vec<Vertex3D>> {
        self.validate()?;

        let vertices = self
            .vertices
            .chunks_exact(COORDS_PER_VERTEX)
            .zip(self.colors.chunks_exact(COORDS_PER_VERTEX))
            .zip(self.normals.chunks_exact(COORDS_PER_VERTEX))
            .map(|((position, color), normal)| Vertex3D {
                position: [position[0], position[1], position[2]],
                color: [color[0], color[1], color[2]],
                normal: [normal[0], normal[1], normal[2]],
            })
            .collect();

        Ok(vertices)
    }
}
