use cgmath::*;
use log::{debug, warn};

use super::camera_utils::ViewSnapshot;
use crate::error::{Result, ViewerError};

/// Remaps OpenGL clip depth `-w..w` to wgpu's `0..w`: `z' = 0.5z + 0.5w`,
/// `w' = w`. `Matrix4::new` takes its arguments column by column.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Near clip plane distance.
pub const Z_NEAR: f32 = 1.0;
/// Far clip plane distance.
pub const Z_FAR: f32 = 20.0;

/// Off-center perspective frustum bounds at the near plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Frustum {
    /// Frustum spanning `-aspect..aspect` horizontally and `-1..1` vertically.
    pub fn from_aspect(aspect: f32) -> Self {
        Self {
            left: -aspect,
            right: aspect,
            bottom: -1.0,
            top: 1.0,
            near: Z_NEAR,
            far: Z_FAR,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.right
    }

    /// Projection in wgpu clip space (depth `0..1`).
    pub fn projection(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX
            * frustum(
                self.left,
                self.right,
                self.bottom,
                self.top,
                self.near,
                self.far,
            )
    }
}

/// Matrices shared by every object in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatrices {
    pub projection: Matrix4<f32>,
    pub view: Matrix4<f32>,
    /// `projection * view`
    pub projection_view: Matrix4<f32>,
    /// `projection * view * rot_x * rot_y`
    pub mvp: Matrix4<f32>,
    /// `view * rot_x * rot_y`
    pub model_view: Matrix4<f32>,
    /// `transpose(inverse(model_view))`
    pub normal_matrix: Matrix4<f32>,
}

/// The three matrices a mesh draw consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawTransforms {
    pub mvp: Matrix4<f32>,
    pub normal_matrix: Matrix4<f32>,
    pub model_view: Matrix4<f32>,
}

impl FrameMatrices {
    /// Folds an object's local model matrix into the MVP only.
    ///
    /// Model-view and normal matrix stay the shared, unscaled ones, so lighting
    /// on non-uniformly scaled objects is approximate.
    pub fn for_object(&self, model: Matrix4<f32>) -> DrawTransforms {
        DrawTransforms {
            mvp: self.mvp * model,
            normal_matrix: self.normal_matrix,
            model_view: self.model_view,
        }
    }

    /// Transforms for an object drawn without a local model matrix.
    pub fn shared(&self) -> DrawTransforms {
        DrawTransforms {
            mvp: self.mvp,
            normal_matrix: self.normal_matrix,
            model_view: self.model_view,
        }
    }
}

/// `transpose(inverse(model_view))`.
///
/// Falls back to the identity when `model_view` is singular.
pub fn normal_matrix(model_view: Matrix4<f32>) -> Matrix4<f32> {
    match model_view.invert() {
        Some(inverse) => inverse.transpose(),
        None => {
            warn!("model-view matrix is singular, using identity normal matrix");
            Matrix4::identity()
        }
    }
}

/// Camera that orbits the origin from `(0, 0, zoom)`.
///
/// The scene, not the eye, rotates: `x_angle` about world Y and `y_angle`
/// about world X.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    frustum: Frustum,
    projection: Matrix4<f32>,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        let frustum = Frustum::from_aspect(1.0);
        Self {
            target: Point3::origin(),
            up: Vector3::unit_y(),
            projection: frustum.projection(),
            frustum,
        }
    }

    pub fn frustum(&self) -> Frustum {
        self.frustum
    }

    pub fn projection(&self) -> Matrix4<f32> {
        self.projection
    }

    /// Recomputes the projection for a new surface size.
    ///
    /// # Errors
    /// [`ViewerError::DegenerateViewport`] for a zero width or height; the
    /// previous projection is kept.
    pub fn resize_projection(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(ViewerError::DegenerateViewport { width, height });
        }

        let aspect = width as f32 / height as f32;
        self.frustum = Frustum::from_aspect(aspect);
        self.projection = self.frustum.projection();
        debug!("projection resized to {width}x{height} (aspect {aspect})");
        Ok(())
    }

    pub fn view_matrix(&self, zoom: f32) -> Matrix4<f32> {
        let eye = Point3::new(0.0, 0.0, zoom);
        Matrix4::look_at_rh(eye, self.target, self.up)
    }

    /// Rotation applied to the whole scene for the given angles.
    pub fn rotation_matrix(x_angle: f32, y_angle: f32) -> Matrix4<f32> {
        let rot_x = Matrix4::from_angle_y(Deg(x_angle));
        let rot_y = Matrix4::from_angle_x(Deg(y_angle));
        rot_x * rot_y
    }

    /// Composes every shared matrix for one frame.
    pub fn frame_matrices(&self, view_state: ViewSnapshot) -> FrameMatrices {
        let view = self.view_matrix(view_state.zoom);
        let projection_view = self.projection * view;
        let rotation = Self::rotation_matrix(view_state.x_angle, view_state.y_angle);

        let mvp = projection_view * rotation;
        let model_view = view * rotation;

        FrameMatrices {
            projection: self.projection,
            view,
            projection_view,
            mvp,
            model_view,
            normal_matrix: normal_matrix(model_view),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::camera_utils::test_utils::assert_matrix_close;

    #[test]
    fn test_resize_sets_aspect_dependent_frustum() {
        let mut camera = OrbitCamera::new();
        camera.resize_projection(800, 400).unwrap();

        let frustum = camera.frustum();
        assert_eq!(frustum.aspect(), 2.0);
        assert_eq!((frustum.left, frustum.right), (-2.0, 2.0));
        assert_eq!((frustum.bottom, frustum.top), (-1.0, 1.0));
        assert_eq!((frustum.near, frustum.far), (1.0, 20.0));
    }

    #[test]
    fn test_projection_keeps_gl_xy_and_maps_depth_to_unit_range() {
        let frustum = Frustum::from_aspect(1.0);
        let gl = cgmath::frustum(-1.0, 1.0, -1.0, 1.0, Z_NEAR, Z_FAR);

        let point = Vector4::new(0.5, 0.25, -1.5, 1.0);
        let gl_clip = gl * point;
        let clip = frustum.projection() * point;

        assert!((clip.w - gl_clip.w).abs() < 1e-6);
        assert!((clip.x / clip.w - gl_clip.x / gl_clip.w).abs() < 1e-6);
        assert!((clip.y / clip.w - gl_clip.y / gl_clip.w).abs() < 1e-6);

        let gl_depth = gl_clip.z / gl_clip.w;
        let depth = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&depth), "depth {depth} clipped");
        assert!((depth - (0.5 * gl_depth + 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_near_and_far_planes_map_to_depth_bounds() {
        let projection = Frustum::from_aspect(1.5).projection();

        let near = projection * Vector4::new(0.0, 0.0, -Z_NEAR, 1.0);
        let far = projection * Vector4::new(0.0, 0.0, -Z_FAR, 1.0);
        assert!((near.z / near.w).abs() < 1e-6);
        assert!((far.z / far.w - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_resize_keeps_projection() {
        let mut camera = OrbitCamera::new();
        camera.resize_projection(800, 400).unwrap();
        let before = camera.projection();

        assert_eq!(
            camera.resize_projection(800, 0),
            Err(ViewerError::DegenerateViewport {
                width: 800,
                height: 0
            })
        );
        assert!(camera.resize_projection(0, 600).is_err());
        assert_eq!(camera.projection(), before);
        assert_eq!(camera.frustum().aspect(), 2.0);
    }

    #[test]
    fn test_identity_model_view_gives_identity_normal_matrix() {
        assert_matrix_close(
            normal_matrix(Matrix4::identity()),
            Matrix4::identity(),
            0.0,
        );
    }

    #[test]
    fn test_normal_matrix_undoes_non_uniform_scale() {
        let scale = Matrix4::from_nonuniform_scale(1.0, 2.0, 4.0);
        let expected = Matrix4::from_nonuniform_scale(1.0, 0.5, 0.25);
        assert_matrix_close(normal_matrix(scale), expected, 1e-6);
    }

    #[test]
    fn test_normal_matrix_of_rigid_transform_is_its_rotation() {
        let rotation = OrbitCamera::rotation_matrix(30.0, -45.0);
        let rigid = Matrix4::from_translation(Vector3::new(0.0, 0.0, 6.0)) * rotation;
        let normal = normal_matrix(rigid);

        // the translation column moves into the bottom row, the 3x3 stays
        for col in 0..3 {
            for row in 0..3 {
                assert!((normal[col][row] - rotation[col][row]).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_mvp_at_rest_equals_projection_view() {
        let mut camera = OrbitCamera::new();
        camera.resize_projection(1200, 800).unwrap();

        let frame = camera.frame_matrices(ViewSnapshot::at_rest(-6.0));
        assert_eq!(frame.mvp, frame.projection_view);
        assert_eq!(frame.model_view, frame.view);
        assert_eq!(frame.projection_view, frame.projection * frame.view);
    }

    #[test]
    fn test_view_looks_at_origin_from_zoom() {
        let camera = OrbitCamera::new();
        let view = camera.view_matrix(-6.0);

        // the origin ends up 6 units in front of the eye (-z in eye space)
        let origin = view * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!((origin.z + 6.0).abs() < 1e-6);
        assert!(origin.x.abs() < 1e-6 && origin.y.abs() < 1e-6);
    }

    #[test]
    fn test_x_angle_rotates_about_world_y() {
        let rotation = OrbitCamera::rotation_matrix(90.0, 0.0);
        let v = rotation * Vector4::new(0.0, 1.0, 0.0, 0.0);
        assert!((v - Vector4::new(0.0, 1.0, 0.0, 0.0)).magnitude() < 1e-6);

        let rotation = OrbitCamera::rotation_matrix(0.0, 90.0);
        let v = rotation * Vector4::new(1.0, 0.0, 0.0, 0.0);
        assert!((v - Vector4::new(1.0, 0.0, 0.0, 0.0)).magnitude() < 1e-6);
    }

    #[test]
    fn test_frame_recomputes_normal_matrix_each_call() {
        let camera = OrbitCamera::new();
        let a = camera.frame_matrices(ViewSnapshot::at_rest(-6.0));
        let b = camera.frame_matrices(ViewSnapshot {
            x_angle: 40.0,
            y_angle: 10.0,
            zoom: -6.0,
        });
        assert_ne!(a.normal_matrix, b.normal_matrix);
        assert_matrix_close(b.normal_matrix, normal_matrix(b.model_view), 0.0);
    }

    #[test]
    fn test_object_transforms_only_touch_mvp() {
        let camera = OrbitCamera::new();
        let frame = camera.frame_matrices(ViewSnapshot {
            x_angle: 15.0,
            y_angle: 5.0,
            zoom: -8.0,
        });
        let model = Matrix4::from_nonuniform_scale(2.0, 0.1, 1.0)
            * Matrix4::from_translation(Vector3::new(0.0, 1.0, 0.0));

        let transforms = frame.for_object(model);
        assert_eq!(transforms.mvp, frame.mvp * model);
        assert_eq!(transforms.model_view, frame.model_view);
        assert_eq!(transforms.normal_matrix, frame.normal_matrix);
        assert_eq!(frame.shared().mvp, frame.mvp);
    }
}
