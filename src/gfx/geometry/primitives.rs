//! # Primitive Shape Generation
//!
//! Cube and UV-sphere generators. Both emit plain triangle lists (no index
//! buffer), two triangles per quad.

use super::{GeometryData, COORDS_PER_VERTEX};
use crate::error::{Result, ViewerError};
use std::f64::consts::PI;

/// The 8 cube corners, named v0..v7.
#[rustfmt::skip]
const CUBE_CORNERS: [[f32; 3]; 8] = [
    [ 1.0,  1.0,  1.0], // v0
    [-1.0,  1.0,  1.0], // v1
    [-1.0, -1.0,  1.0], // v2
    [ 1.0, -1.0,  1.0], // v3
    [ 1.0, -1.0, -1.0], // v4
    [ 1.0,  1.0, -1.0], // v5
    [-1.0,  1.0, -1.0], // v6
    [-1.0, -1.0, -1.0], // v7
];

/// Decorative color for each corner: the matching corner of the RGB cube.
#[rustfmt::skip]
const CUBE_CORNER_COLORS: [[f32; 3]; 8] = [
    [1.0, 1.0, 1.0],
    [1.0, 1.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0],
];

/// Faces as corner quads `[a, b, c, d]`, split into `a-b-c` and `c-d-a`,
/// each with its outward normal.
#[rustfmt::skip]
const CUBE_FACES: [([usize; 4], [f32; 3]); 6] = [
    ([0, 1, 2, 3], [ 0.0,  0.0,  1.0]), // front
    ([0, 3, 4, 5], [ 1.0,  0.0,  0.0]), // right
    ([0, 5, 6, 1], [ 0.0,  1.0,  0.0]), // top
    ([1, 6, 7, 2], [-1.0,  0.0,  0.0]), // left
    ([7, 4, 3, 2], [ 0.0, -1.0,  0.0]), // bottom
    ([4, 7, 6, 5], [ 0.0,  0.0, -1.0]), // back
];

/// Solid color for table tops.
pub const TOP_COLOR: [f32; 3] = [0.05, 0.55, 0.25];

/// Solid color for legs and rails.
pub const LEG_COLOR: [f32; 3] = [0.30, 0.17, 0.07];

/// How a cube is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CubeStyle {
    /// Per-corner RGB colors.
    #[default]
    Decorative,
    /// Uniform highlight color ([`TOP_COLOR`]).
    Top,
    /// Uniform dark color ([`LEG_COLOR`]).
    Leg,
}

impl CubeStyle {
    fn color_of(self, corner: usize) -> [f32; 3] {
        match self {
            CubeStyle::Decorative => CUBE_CORNER_COLORS[corner],
            CubeStyle::Top => TOP_COLOR,
            CubeStyle::Leg => LEG_COLOR,
        }
    }
}

/// Generate the 36-vertex cube spanning `-1..1` on every axis.
///
/// Faces come out in the order front, right, top, left, bottom, back; each
/// face is 6 vertices sharing the face normal. All three arrays are always
/// 108 floats long.
pub fn generate_cube(style: CubeStyle) -> GeometryData {
    let mut data = GeometryData::new();

    for (quad, normal) in CUBE_FACES.iter() {
        let [a, b, c, d] = *quad;
        for corner in [a, b, c, c, d, a] {
            data.vertices.extend_from_slice(&CUBE_CORNERS[corner]);
            data.normals.extend_from_slice(normal);
            data.colors.extend_from_slice(&style.color_of(corner));
        }
    }

    data
}

/// Generate a UV sphere of `lats` latitude bands and `longs` longitude steps.
///
/// Every band/step pair is one quad emitted as two triangles, so the result
/// has `lats * longs * 6` vertices. Positions lie on the unit sphere whatever
/// `_radius` is; callers scale the sphere with their model matrix. Normals are
/// the raw positions and every vertex is colored pure blue.
///
/// # Errors
/// [`ViewerError::InvalidTessellation`] when `lats` or `longs` is not positive.
pub fn generate_sphere(_radius: f64, lats: i32, longs: i32) -> Result<GeometryData> {
    if lats <= 0 || longs <= 0 {
        return Err(ViewerError::InvalidTessellation { lats, longs });
    }

    let quads = lats as usize * longs as usize;
    let mut data = GeometryData {
        vertices: Vec::with_capacity(quads * 18),
        normals: Vec::with_capacity(quads * 18),
        colors: Vec::with_capacity(quads * 18),
    };

    for i in 0..lats {
        let lat0 = PI * (-0.5 + f64::from(i) / f64::from(lats));
        let (z0, zr0) = (lat0.sin(), lat0.cos());

        let lat1 = PI * (-0.5 + f64::from(i + 1) / f64::from(lats));
        let (z1, zr1) = (lat1.sin(), lat1.cos());

        for j in 0..longs {
            let lng0 = 2.0 * PI * f64::from(j - 1) / f64::from(longs);
            let (x0, y0) = (lng0.cos(), lng0.sin());

            let lng1 = 2.0 * PI * f64::from(j) / f64::from(longs);
            let (x1, y1) = (lng1.cos(), lng1.sin());

            let corners = [
                // first triangle
                [x0 * zr0, y0 * zr0, z0],
                [x0 * zr1, y0 * zr1, z1],
                [x1 * zr0, y1 * zr0, z0],
                // second triangle
                [x1 * zr0, y1 * zr0, z0],
                [x0 * zr1, y0 * zr1, z1],
                [x1 * zr1, y1 * zr1, z1],
            ];

            for corner in corners {
                let position = corner.map(|c| c as f32);
                data.vertices.extend_from_slice(&position);
                data.normals.extend_from_slice(&position);
            }
        }
    }

    // Debug coloring: the third float of every vertex slot is lit.
    data.colors = (0..data.vertices.len())
        .map(|k| if k % COORDS_PER_VERTEX == 2 { 1.0 } else { 0.0 })
        .collect();

    Ok(data)
}
