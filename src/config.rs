//! Viewer settings

use crate::gfx::{
    camera::GestureConfig,
    scene::{mesh::LIGHT_DIRECTION, SceneVariant},
};

/// Initial camera position along Z.
pub const INITIAL_ZOOM: f32 = -6.0;

/// Everything the application shell needs to open a window and build a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub variant: SceneVariant,
    pub clear_color: wgpu::Color,
    pub sphere_lats: i32,
    pub sphere_longs: i32,
    pub gestures: GestureConfig,
    pub initial_zoom: f32,
    pub light_direction: [f32; 3],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "cueball".to_string(),
            width: 1200,
            height: 800,
            variant: SceneVariant::default(),
            clear_color: wgpu::Color {
                r: 0.3,
                g: 0.3,
                b: 0.3,
                a: 1.0,
            },
            sphere_lats: 20,
            sphere_longs: 40,
            gestures: GestureConfig::default(),
            initial_zoom: INITIAL_ZOOM,
            light_direction: LIGHT_DIRECTION,
        }
    }
}

impl ViewerConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_variant(mut self, variant: SceneVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_clear_color(mut self, r: f64, g: f64, b: f64) -> Self {
        self.clear_color = wgpu::Color { r, g, b, a: 1.0 };
        self
    }

    /// Latitude and longitude band counts for every sphere in the scene.
    pub fn with_sphere_tessellation(mut self, lats: i32, longs: i32) -> Self {
        self.sphere_lats = lats;
        self.sphere_longs = longs;
        self
    }

    pub fn with_touch_scale_factor(mut self, factor: f32) -> Self {
        self.gestures.touch_scale_factor = factor;
        self
    }

    /// Zoom bounds and per-pinch step. Inverted bounds are swapped and the
    /// initial zoom is clamped into the new range.
    pub fn with_zoom(mut self, min: f32, max: f32, step: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.gestures.min_zoom = min;
        self.gestures.max_zoom = max;
        self.gestures.zoom_step = step;
        self.initial_zoom = self.initial_zoom.clamp(min, max);
        self
    }

    pub fn with_light_direction(mut self, direction: [f32; 3]) -> Self {
        self.light_direction = direction;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!((config.width, config.height), (1200, 800));
        assert_eq!(config.variant, SceneVariant::PoolTable);
        assert_eq!(config.initial_zoom, -6.0);
        assert_eq!((config.gestures.min_zoom, config.gestures.max_zoom), (-15.0, -3.0));
        assert_eq!(config.gestures.touch_scale_factor, 180.0 / 320.0);
        assert_eq!(config.light_direction, [0.0, 1.0, 8.0]);
        assert_eq!((config.sphere_lats, config.sphere_longs), (20, 40));
    }

    #[test]
    fn test_builders() {
        let config = ViewerConfig::default()
            .with_title("showcase")
            .with_window_size(640, 480)
            .with_variant(SceneVariant::Showcase)
            .with_sphere_tessellation(8, 16)
            .with_touch_scale_factor(1.0)
            .with_clear_color(0.0, 0.0, 0.0)
            .with_light_direction([0.0, 0.0, 1.0]);

        assert_eq!(config.title, "showcase");
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.variant, SceneVariant::Showcase);
        assert_eq!((config.sphere_lats, config.sphere_longs), (8, 16));
        assert_eq!(config.gestures.touch_scale_factor, 1.0);
        assert_eq!(config.clear_color, wgpu::Color::BLACK);
        assert_eq!(config.light_direction, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_zoom_range_clamps_initial_zoom() {
        let config = ViewerConfig::default().with_zoom(-20.0, -8.0, 0.5);
        assert_eq!(config.initial_zoom, -8.0);
        assert_eq!(config.gestures.zoom_step, 0.5);
    }

    #[test]
    fn test_inverted_zoom_bounds_are_swapped() {
        let config = ViewerConfig::default().with_zoom(-3.0, -15.0, 0.2);
        assert_eq!((config.gestures.min_zoom, config.gestures.max_zoom), (-15.0, -3.0));
        assert_eq!(config.initial_zoom, -6.0);
    }
}
