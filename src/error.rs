//! Error types for the viewer core
//!
//! Every variant here is recoverable: the scene logs it and keeps rendering
//! whatever else it can. Fatal setup failures (window, adapter, device) are
//! reported by the application shell through `anyhow`.

use thiserror::Error;

/// Errors raised by geometry generation, mesh construction and the
/// transform pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewerError {
    /// A WGSL module or the pipeline linking it failed validation.
    #[error("shader compile error in '{label}': {message}")]
    ShaderCompile { label: String, message: String },

    /// The sphere generator was asked for a non-positive band count.
    #[error("invalid tessellation: lats={lats}, longs={longs} (both must be > 0)")]
    InvalidTessellation { lats: i32, longs: i32 },

    /// A resize reported a zero-sized surface; the projection was left as is.
    #[error("degenerate viewport {width}x{height}")]
    DegenerateViewport { width: u32, height: u32 },

    /// Position, normal and color arrays disagree in length or are not made
    /// of whole triangles.
    #[error(
        "malformed geometry: {positions} position, {normals} normal and {colors} color floats"
    )]
    MalformedGeometry {
        positions: usize,
        normals: usize,
        colors: usize,
    },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ViewerError>;
