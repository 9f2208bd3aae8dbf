//! # Graphics Module
//!
//! Everything between generated geometry and pixels on screen.
//!
//! ## Architecture Overview
//!
//! - **Geometry** ([`geometry`]) - procedural cube and UV-sphere arrays
//! - **Camera** ([`camera`]) - shared view state, gesture controller, per-frame matrices
//! - **Scene** ([`scene`]) - object layouts, meshes and the [`SceneHandler`] lifecycle
//! - **Rendering** ([`rendering`]) - surface, device and the main render pass
//! - **Resources** ([`resources`]) - depth texture
//!
//! Data flows one way: input mutates the camera's [`ViewState`], the scene
//! snapshots it once per frame, and each mesh receives its own transforms.
//!
//! [`SceneHandler`]: scene::SceneHandler
//! [`ViewState`]: camera::ViewState

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
