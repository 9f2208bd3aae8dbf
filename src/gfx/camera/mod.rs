pub mod camera_controller;
pub mod camera_utils;
pub mod orbit_camera;

// Re-export main types
pub use camera_controller::{GestureConfig, GestureController, GestureState, InputEvent};
pub use camera_utils::{CameraManager, ViewSnapshot, ViewState};
pub use orbit_camera::{DrawTransforms, FrameMatrices, Frustum, OrbitCamera};
