use cgmath::Matrix4;
use log::{error, info, warn};

use crate::{
    config::ViewerConfig,
    error::{Result, ViewerError},
    gfx::camera::{
        CameraManager, DrawTransforms, FrameMatrices, GestureController, InputEvent, OrbitCamera,
        ViewState,
    },
};

use super::{
    layout::{scene_layout, ObjectSpec},
    mesh::{Mesh, MeshOptions, RenderTargets},
};

/// Render-surface lifecycle the application shell drives.
pub trait SceneHandler {
    /// Builds GPU resources. Called once, after the surface exists.
    fn initialize(&mut self, device: &wgpu::Device, targets: RenderTargets, width: u32, height: u32);

    /// Recomputes the projection for a new surface size.
    fn on_resize(&mut self, width: u32, height: u32) -> Result<()>;

    /// Feeds one input event to the gesture controller. Returns `true` when
    /// a redraw is needed.
    fn on_input(&mut self, event: InputEvent) -> bool;

    /// Records this frame's draws into `render_pass`.
    fn on_frame(&mut self, queue: &wgpu::Queue, render_pass: &mut wgpu::RenderPass<'_>);
}

/// A built object: its uploaded mesh plus the constant model matrix.
pub struct SceneObject {
    pub model: Matrix4<f32>,
    pub mesh: Mesh,
}

/// Fixed arrangement of meshes viewed through one orbit camera.
pub struct Scene {
    pub camera_manager: CameraManager,
    layout: Vec<ObjectSpec>,
    light_direction: [f32; 3],
    objects: Vec<SceneObject>,
    failures: Vec<(String, ViewerError)>,
}

impl Scene {
    pub fn new(config: &ViewerConfig) -> Self {
        let view_state = ViewState::new(config.initial_zoom);
        let controller = GestureController::new(view_state, config.gestures);
        let camera_manager = CameraManager::new(OrbitCamera::new(), controller);

        Self {
            camera_manager,
            layout: scene_layout(config.variant, config.sphere_lats, config.sphere_longs),
            light_direction: config.light_direction,
            objects: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn layout(&self) -> &[ObjectSpec] {
        &self.layout
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Objects that could not be built, with the reason.
    pub fn failures(&self) -> &[(String, ViewerError)] {
        &self.failures
    }

    /// Per-object transforms for the current view, in layout order.
    pub fn layout_transforms(&self) -> Vec<DrawTransforms> {
        let frame = self.camera_manager.frame_matrices();
        self.layout
            .iter()
            .map(|spec| frame.for_object(spec.placement.model_matrix()))
            .collect()
    }

    fn build_object(
        &self,
        device: &wgpu::Device,
        targets: RenderTargets,
        spec: &ObjectSpec,
    ) -> Result<SceneObject> {
        let geometry = spec.shape.generate()?;
        let options = MeshOptions {
            shading: spec.shading,
            light_direction: self.light_direction,
        };
        let mesh = Mesh::new(device, &spec.name, &geometry, targets, options)?;

        Ok(SceneObject {
            model: spec.placement.model_matrix(),
            mesh,
        })
    }

    fn draw_objects(
        &mut self,
        frame: &FrameMatrices,
        queue: &wgpu::Queue,
        render_pass: &mut wgpu::RenderPass<'_>,
    ) {
        for object in self.objects.iter_mut() {
            let transforms = frame.for_object(object.model);
            object.mesh.draw(queue, render_pass, &transforms);
        }
    }
}

impl SceneHandler for Scene {
    fn initialize(&mut self, device: &wgpu::Device, targets: RenderTargets, width: u32, height: u32) {
        if let Err(err) = self.on_resize(width, height) {
            warn!("initial size rejected: {err}");
        }

        let mut objects = Vec::with_capacity(self.layout.len());
        let mut failures = Vec::new();
        for spec in &self.layout {
            match self.build_object(device, targets, spec) {
                Ok(object) => objects.push(object),
                Err(err) => {
                    error!("skipping '{}': {err}", spec.name);
                    failures.push((spec.name.clone(), err));
                }
            }
        }

        info!(
            "scene ready: {} of {} objects built",
            objects.len(),
            self.layout.len()
        );
        self.objects = objects;
        self.failures = failures;
    }

    fn on_resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.camera_manager.resize(width, height)?;
        self.camera_manager.view_state().mark_dirty();
        Ok(())
    }

    fn on_input(&mut self, event: InputEvent) -> bool {
        self.camera_manager.process_event(event)
    }

    fn on_frame(&mut self, queue: &wgpu::Queue, render_pass: &mut wgpu::RenderPass<'_>) {
        let frame = self.camera_manager.frame_matrices();
        self.draw_objects(&frame, queue, render_pass);
    }
}
