// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Surface management and frame submission.

pub mod render_engine;

// Re-export main types
pub use render_engine::RenderEngine;
