//! Shared view state and matrix helpers
//!
//! [`ViewState`] is the only state the input side and the render side have in
//! common. It is lock-free: every field is an atomic scalar, the gesture
//! controller is the single writer, and the render side takes one
//! [`ViewSnapshot`] per frame. A frame may see an angle one event stale, which
//! is fine for an interactive viewer.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use cgmath::Matrix4;

use super::{
    camera_controller::{GestureController, InputEvent},
    orbit_camera::{FrameMatrices, OrbitCamera},
};
use crate::error::Result;

/// An `f32` stored as its bit pattern in an [`AtomicU32`].
#[derive(Debug, Default)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Acquire))
    }

    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Release);
    }

    /// Applies `f` atomically and returns the new value.
    pub fn update(&self, f: impl Fn(f32) -> f32) -> f32 {
        let mut current = self.0.load(Ordering::Acquire);
        loop {
            let next = f(f32::from_bits(current)).to_bits();
            match self
                .0
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return f32::from_bits(next),
                Err(actual) => current = actual,
            }
        }
    }
}

/// Camera state mutated by input and read by rendering.
///
/// Angles are in degrees and unbounded. `x_angle` spins the scene about the
/// world Y axis and `y_angle` about the world X axis.
#[derive(Debug)]
pub struct ViewState {
    x_angle: AtomicF32,
    y_angle: AtomicF32,
    zoom: AtomicF32,
    dirty: AtomicBool,
}

/// Plain copy of [`ViewState`] taken once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSnapshot {
    pub x_angle: f32,
    pub y_angle: f32,
    pub zoom: f32,
}

impl ViewState {
    /// Creates shared state at rest with the given camera distance. The state
    /// starts dirty so the first frame gets drawn.
    pub fn new(zoom: f32) -> Arc<Self> {
        Arc::new(Self {
            x_angle: AtomicF32::new(0.0),
            y_angle: AtomicF32::new(0.0),
            zoom: AtomicF32::new(zoom),
            dirty: AtomicBool::new(true),
        })
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            x_angle: self.x_angle.load(),
            y_angle: self.y_angle.load(),
            zoom: self.zoom.load(),
        }
    }

    pub fn x_angle(&self) -> f32 {
        self.x_angle.load()
    }

    pub fn y_angle(&self) -> f32 {
        self.y_angle.load()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom.load()
    }

    pub fn add_x_angle(&self, delta: f32) {
        self.x_angle.update(|angle| angle + delta);
        self.mark_dirty();
    }

    pub fn add_y_angle(&self, delta: f32) {
        self.y_angle.update(|angle| angle + delta);
        self.mark_dirty();
    }

    /// Moves the camera by `delta` and clamps it to `[min, max]`. With
    /// inverted bounds the result is `max`.
    pub fn add_zoom(&self, delta: f32, min: f32, max: f32) -> f32 {
        let zoom = self.zoom.update(|zoom| (zoom + delta).max(min).min(max));
        self.mark_dirty();
        zoom
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Returns whether a redraw was requested since the last call and clears
    /// the request.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }
}

impl ViewSnapshot {
    /// Snapshot with no rotation at the given camera distance.
    pub fn at_rest(zoom: f32) -> Self {
        Self {
            x_angle: 0.0,
            y_angle: 0.0,
            zoom,
        }
    }
}

/// Pairs the render-side camera with the input-side controller. Both hold the
/// same [`ViewState`].
pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: GestureController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: GestureController) -> Self {
        Self { camera, controller }
    }

    pub fn process_event(&mut self, event: InputEvent) -> bool {
        self.controller.handle(event)
    }

    /// Updates projection and gesture viewport together. A degenerate size
    /// leaves both untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.camera.resize_projection(width, height)?;
        self.controller.set_viewport(width, height);
        Ok(())
    }

    pub fn view_state(&self) -> &Arc<ViewState> {
        self.controller.view_state()
    }

    /// Shared matrices for the current view state.
    pub fn frame_matrices(&self) -> FrameMatrices {
        self.camera.frame_matrices(self.view_state().snapshot())
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}
