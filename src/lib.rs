// src/lib.rs
//! cueball
//!
//! An interactive 3D viewer built on wgpu and winit: procedural cube and
//! UV-sphere meshes, an orbit camera driven by drag and pinch gestures, and
//! per-vertex Phong lighting.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::CueballApp;
pub use config::ViewerConfig;
pub use error::{Result, ViewerError};
