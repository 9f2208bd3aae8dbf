//! # Scene Module
//!
//! Turns a declarative object table into drawable meshes and draws them with
//! the shared camera each frame.
//!
//! ## Key Components
//!
//! - [`Scene`] - owns the camera and the built objects, implements [`SceneHandler`]
//! - [`ObjectSpec`] - one row of a layout: shape, placement and shading
//! - [`Mesh`] - GPU buffers, pipeline and uniforms for a single shape
//! - [`Vertex3D`] - interleaved position, color and normal
//!
//! ## Usage
//!
//! ```
//! use cueball::config::ViewerConfig;
//! use cueball::gfx::scene::{Scene, SceneVariant};
//!
//! let config = ViewerConfig::default().with_variant(SceneVariant::Showcase);
//! let scene = Scene::new(&config);
//! assert_eq!(scene.layout().len(), 2);
//! ```

pub mod layout;
pub mod mesh;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use layout::{ObjectSpec, Placement, SceneVariant, ShapeSpec};
pub use mesh::{DrawMesh, Mesh, MeshOptions, RenderTargets, ShadingModel};
pub use scene::{Scene, SceneHandler, SceneObject};
pub use vertex::Vertex3D;
