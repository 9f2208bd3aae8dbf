//! Gesture handling: single-pointer drag rotates the scene, pinch zooms.

use std::sync::Arc;

use log::debug;

use super::camera_utils::ViewState;

/// Degrees of rotation per pixel of drag.
pub const TOUCH_SCALE_FACTOR: f32 = 180.0 / 320.0;
/// Camera distance change per pinch update.
pub const ZOOM_STEP: f32 = 0.2;
/// Farthest camera position.
pub const MIN_ZOOM: f32 = -15.0;
/// Closest camera position.
pub const MAX_ZOOM: f32 = -3.0;

/// Tuning for [`GestureController`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    pub touch_scale_factor: f32,
    pub zoom_step: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            touch_scale_factor: TOUCH_SCALE_FACTOR,
            zoom_step: ZOOM_STEP,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

/// Platform-neutral input, in physical pixels with the origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { id: u64, x: f32, y: f32 },
    PointerMove { id: u64, x: f32, y: f32 },
    PointerUp { id: u64 },
    /// One update from an external pinch detector. `scale_factor > 1` means
    /// the fingers moved apart.
    Pinch { scale_factor: f32 },
    PinchEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging,
    Scaling,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pointer {
    id: u64,
    x: f32,
    y: f32,
}

/// Turns the distance between two pointers into per-move scale factors.
#[derive(Debug, Default)]
struct PinchDetector {
    previous_span: Option<f32>,
}

impl PinchDetector {
    fn begin(&mut self, span: f32) {
        self.previous_span = Some(span);
    }

    /// Returns the span ratio since the last update, or `None` when nothing
    /// changed or the previous span was zero.
    fn update(&mut self, span: f32) -> Option<f32> {
        let previous = self.previous_span?;
        self.previous_span = Some(span);
        if previous <= f32::EPSILON || span == previous {
            return None;
        }
        Some(span / previous)
    }

    fn end(&mut self) {
        self.previous_span = None;
    }
}

fn span(a: &Pointer, b: &Pointer) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Maps pointer input onto the shared [`ViewState`].
///
/// This is the only writer of the view state. While two pointers are down
/// (or an external pinch is in progress) drags are ignored.
pub struct GestureController {
    view_state: Arc<ViewState>,
    config: GestureConfig,
    state: GestureState,
    pointers: Vec<Pointer>,
    pinch: PinchDetector,
    viewport: (f32, f32),
}

impl GestureController {
    pub fn new(view_state: Arc<ViewState>, config: GestureConfig) -> Self {
        Self {
            view_state,
            config,
            state: GestureState::Idle,
            pointers: Vec::with_capacity(2),
            pinch: PinchDetector::default(),
            viewport: (0.0, 0.0),
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn view_state(&self) -> &Arc<ViewState> {
        &self.view_state
    }

    /// Viewport size used for the mid-line direction inversion.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width as f32, height as f32);
    }

    /// Applies one input event. Returns `true` when the view changed and a
    /// redraw should be requested.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { id, x, y } => {
                self.pointer_down(Pointer { id, x, y });
                false
            }
            InputEvent::PointerMove { id, x, y } => self.pointer_move(Pointer { id, x, y }),
            InputEvent::PointerUp { id } => {
                self.pointer_up(id);
                false
            }
            InputEvent::Pinch { scale_factor } => {
                self.state = GestureState::Scaling;
                self.apply_pinch(scale_factor);
                true
            }
            InputEvent::PinchEnd => {
                if self.state == GestureState::Scaling {
                    self.end_pinch();
                }
                false
            }
        }
    }

    fn pointer_down(&mut self, pointer: Pointer) {
        match self.pointers.iter_mut().find(|p| p.id == pointer.id) {
            Some(existing) => *existing = pointer,
            None => self.pointers.push(pointer),
        }

        if self.pointers.len() >= 2 {
            let span = span(&self.pointers[0], &self.pointers[1]);
            self.pinch.begin(span);
            self.state = GestureState::Scaling;
            debug!("pinch started, span {span:.1}px");
        }
    }

    fn pointer_move(&mut self, pointer: Pointer) -> bool {
        let Some(tracked) = self.pointers.iter_mut().find(|p| p.id == pointer.id) else {
            return false;
        };
        let previous = std::mem::replace(tracked, pointer);

        match self.state {
            GestureState::Scaling => {
                if self.pointers.len() < 2 {
                    return false;
                }
                let span = span(&self.pointers[0], &self.pointers[1]);
                match self.pinch.update(span) {
                    Some(scale_factor) => {
                        self.apply_pinch(scale_factor);
                        true
                    }
                    None => false,
                }
            }
            GestureState::Idle | GestureState::Dragging => {
                self.state = GestureState::Dragging;
                self.apply_drag(previous, pointer)
            }
        }
    }

    fn pointer_up(&mut self, id: u64) {
        self.pointers.retain(|p| p.id != id);

        if self.state == GestureState::Scaling && self.pointers.len() < 2 {
            self.end_pinch();
        } else if self.pointers.is_empty() {
            self.state = GestureState::Idle;
        }
    }

    fn end_pinch(&mut self) {
        self.pinch.end();
        self.state = GestureState::Idle;
        debug!("pinch released, zoom {:.1}", self.view_state.zoom());
    }

    /// Rotates along the dominant drag axis. The horizontal delta flips below
    /// the horizontal mid-line and the vertical delta flips left of the
    /// vertical mid-line.
    fn apply_drag(&mut self, from: Pointer, to: Pointer) -> bool {
        let (width, height) = self.viewport;
        let mut dx = to.x - from.x;
        let mut dy = to.y - from.y;

        if to.y > height / 2.0 {
            dx = -dx;
        }
        if to.x < width / 2.0 {
            dy = -dy;
        }

        if dx == 0.0 && dy == 0.0 {
            return false;
        }

        if dx.abs() > dy.abs() {
            self.view_state
                .add_x_angle(dx * self.config.touch_scale_factor);
        } else {
            self.view_state
                .add_y_angle(dy * self.config.touch_scale_factor);
        }
        true
    }

    fn apply_pinch(&mut self, scale_factor: f32) {
        let step = if scale_factor > 1.0 {
            self.config.zoom_step
        } else {
            -self.config.zoom_step
        };
        let zoom = self
            .view_state
            .add_zoom(step, self.config.min_zoom, self.config.max_zoom);
        debug!("pinch x{scale_factor:.3}, zoom {zoom:.1}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_controller() -> GestureController {
        let mut controller = GestureController::new(ViewState::new(-6.0), GestureConfig::default());
        controller.set_viewport(800, 600);
        controller
    }

    fn drag(controller: &mut GestureController, from: (f32, f32), to: (f32, f32)) -> bool {
        controller.handle(InputEvent::PointerDown {
            id: 0,
            x: from.0,
            y: from.1,
        });
        let changed = controller.handle(InputEvent::PointerMove {
            id: 0,
            x: to.0,
            y: to.1,
        });
        controller.handle(InputEvent::PointerUp { id: 0 });
        changed
    }

    #[test]
    fn test_horizontal_drag_in_upper_right_turns_x_angle() {
        let mut controller = new_controller();
        assert!(drag(&mut controller, (500.0, 100.0), (550.0, 100.0)));

        let view = controller.view_state().snapshot();
        assert_eq!(view.x_angle, 28.125);
        assert_eq!(view.y_angle, 0.0);
        assert_eq!(controller.state(), GestureState::Idle);
    }

    #[test]
    fn test_dominant_axis_wins() {
        let mut controller = new_controller();
        drag(&mut controller, (500.0, 100.0), (510.0, 140.0));

        let view = controller.view_state().snapshot();
        assert_eq!(view.x_angle, 0.0);
        assert_eq!(view.y_angle, 40.0 * TOUCH_SCALE_FACTOR);
    }

    #[test]
    fn test_mid_line_inversion() {
        // below the horizontal mid-line, horizontal drags flip
        let mut controller = new_controller();
        drag(&mut controller, (500.0, 500.0), (550.0, 500.0));
        assert_eq!(controller.view_state().x_angle(), -28.125);

        // left of the vertical mid-line, vertical drags flip
        let mut controller = new_controller();
        drag(&mut controller, (100.0, 100.0), (100.0, 132.0));
        assert_eq!(controller.view_state().y_angle(), -18.0);
    }

    #[test]
    fn test_drag_tracks_previous_position() {
        let mut controller = new_controller();
        controller.handle(InputEvent::PointerDown {
            id: 7,
            x: 500.0,
            y: 100.0,
        });
        for x in [510.0, 520.0, 530.0] {
            controller.handle(InputEvent::PointerMove { id: 7, x, y: 100.0 });
        }
        assert_eq!(controller.state(), GestureState::Dragging);
        assert_eq!(controller.view_state().x_angle(), 30.0 * TOUCH_SCALE_FACTOR);
    }

    #[test]
    fn test_move_without_down_is_ignored() {
        let mut controller = new_controller();
        assert!(!controller.handle(InputEvent::PointerMove {
            id: 3,
            x: 10.0,
            y: 10.0
        }));
        assert_eq!(controller.state(), GestureState::Idle);
    }

    #[test]
    fn test_second_pointer_starts_scaling_and_suppresses_drag() {
        let mut controller = new_controller();
        controller.handle(InputEvent::PointerDown {
            id: 0,
            x: 400.0,
            y: 100.0,
        });
        controller.handle(InputEvent::PointerDown {
            id: 1,
            x: 500.0,
            y: 100.0,
        });
        assert_eq!(controller.state(), GestureState::Scaling);

        // fingers move apart: span 100 -> 150
        assert!(controller.handle(InputEvent::PointerMove {
            id: 1,
            x: 550.0,
            y: 100.0
        }));
        let view = controller.view_state().snapshot();
        assert_eq!(view.x_angle, 0.0);
        assert!((view.zoom - -5.8).abs() < 1e-6);

        // fingers move together: span 150 -> 120
        controller.handle(InputEvent::PointerMove {
            id: 0,
            x: 430.0,
            y: 100.0,
        });
        assert!((controller.view_state().zoom() - -6.0).abs() < 1e-6);

        controller.handle(InputEvent::PointerUp { id: 1 });
        assert_eq!(controller.state(), GestureState::Idle);

        // the remaining finger drags again from where it is
        controller.handle(InputEvent::PointerMove {
            id: 0,
            x: 440.0,
            y: 100.0,
        });
        assert_eq!(controller.state(), GestureState::Dragging);
        assert_eq!(controller.view_state().y_angle(), 0.0);
        assert_eq!(controller.view_state().x_angle(), 10.0 * TOUCH_SCALE_FACTOR);
    }

    #[test]
    fn test_external_pinch_steps_zoom() {
        let mut controller = new_controller();
        assert!(controller.handle(InputEvent::Pinch { scale_factor: 1.1 }));
        assert_eq!(controller.state(), GestureState::Scaling);
        assert!((controller.view_state().zoom() - -5.8).abs() < 1e-6);

        controller.handle(InputEvent::Pinch { scale_factor: 0.9 });
        controller.handle(InputEvent::Pinch { scale_factor: 1.0 });
        assert!((controller.view_state().zoom() - -6.2).abs() < 1e-6);

        controller.handle(InputEvent::PinchEnd);
        assert_eq!(controller.state(), GestureState::Idle);
    }

    #[test]
    fn test_zoom_stays_clamped() {
        let mut controller = new_controller();
        let pattern = [3.0, 0.5, 1.5, 1.5, 0.2, 2.0, 2.0, 2.0];

        for i in 0..400 {
            let scale_factor = if i < 200 {
                pattern[i % pattern.len()] * 2.0
            } else {
                0.1
            };
            controller.handle(InputEvent::Pinch { scale_factor });
            let zoom = controller.view_state().zoom();
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&zoom), "zoom {zoom} escaped");
        }
        assert_eq!(controller.view_state().zoom(), MIN_ZOOM);

        for _ in 0..100 {
            controller.handle(InputEvent::Pinch { scale_factor: 4.0 });
        }
        assert_eq!(controller.view_state().zoom(), MAX_ZOOM);
    }

    #[test]
    fn test_pinch_detector_ratio() {
        let mut detector = PinchDetector::default();
        assert_eq!(detector.update(10.0), None);
        detector.begin(100.0);
        assert_eq!(detector.update(100.0), None);
        assert_eq!(detector.update(150.0), Some(1.5));
        detector.end();
        assert_eq!(detector.update(10.0), None);
    }
}
