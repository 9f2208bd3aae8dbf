use std::sync::Arc;

use anyhow::Context;
use log::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::{
    config::ViewerConfig,
    gfx::{
        camera::InputEvent,
        scene::{Scene, SceneHandler},
        RenderEngine,
    },
};

/// Pointer id reserved for the left mouse button.
pub const MOUSE_POINTER_ID: u64 = u64::MAX;

/// Pinch scale factors reported for one wheel notch.
const WHEEL_ZOOM_IN: f32 = 1.1;
const WHEEL_ZOOM_OUT: f32 = 0.9;

pub struct CueballApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    cursor: PhysicalPosition<f64>,
    mouse_down: bool,
    fatal: Option<anyhow::Error>,
}

impl CueballApp {
    pub fn new(config: ViewerConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let scene = Scene::new(&config);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                scene,
                cursor: PhysicalPosition::new(0.0, 0.0),
                mouse_down: false,
                fatal: None,
            },
        })
    }

    /// Run the application (consumes self and blocks until the window closes)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Wait);

        info!("starting '{}' scene", self.app_state.config.variant);
        event_loop
            .run_app(&mut self.app_state)
            .context("event loop failed")?;

        match self.app_state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("failed to create window")?,
        );

        let PhysicalSize { width, height } = window.inner_size();
        let renderer = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            self.config.clear_color,
        ))?;

        self.scene
            .initialize(renderer.device(), renderer.render_targets(), width, height);

        self.window = Some(window);
        self.render_engine = Some(renderer);
        Ok(())
    }

    /// Translates platform input into [`InputEvent`]s for the scene.
    fn input_events(&mut self, event: &WindowEvent) -> Vec<InputEvent> {
        match *event {
            WindowEvent::Touch(touch) => vec![touch_event(
                touch.phase,
                touch.id,
                touch.location.x as f32,
                touch.location.y as f32,
            )],
            WindowEvent::PinchGesture { delta, phase, .. } => {
                pinch_event(delta, phase).into_iter().collect()
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.mouse_down = state == ElementState::Pressed;
                let (x, y) = (self.cursor.x as f32, self.cursor.y as f32);
                if self.mouse_down {
                    vec![InputEvent::PointerDown {
                        id: MOUSE_POINTER_ID,
                        x,
                        y,
                    }]
                } else {
                    vec![InputEvent::PointerUp {
                        id: MOUSE_POINTER_ID,
                    }]
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = position;
                if self.mouse_down {
                    vec![InputEvent::PointerMove {
                        id: MOUSE_POINTER_ID,
                        x: position.x as f32,
                        y: position.y as f32,
                    }]
                } else {
                    Vec::new()
                }
            }
            WindowEvent::MouseWheel { delta, .. } => wheel_events(delta),
            _ => Vec::new(),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        match render_engine.render_frame(&mut self.scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // surface was reconfigured, try again
                self.scene.camera_manager.view_state().mark_dirty();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(err) => warn!("dropped frame: {err}"),
        }
    }
}

/// Maps one touch point update to a pointer event.
fn touch_event(phase: TouchPhase, id: u64, x: f32, y: f32) -> InputEvent {
    match phase {
        TouchPhase::Started => InputEvent::PointerDown { id, x, y },
        TouchPhase::Moved => InputEvent::PointerMove { id, x, y },
        TouchPhase::Ended | TouchPhase::Cancelled => InputEvent::PointerUp { id },
    }
}

/// Trackpad magnification. `delta` is the change in scale since the last
/// update, positive when magnifying. Updates with no change are dropped.
fn pinch_event(delta: f64, phase: TouchPhase) -> Option<InputEvent> {
    match phase {
        TouchPhase::Ended | TouchPhase::Cancelled => Some(InputEvent::PinchEnd),
        TouchPhase::Started | TouchPhase::Moved if delta == 0.0 => None,
        TouchPhase::Started | TouchPhase::Moved => Some(InputEvent::Pinch {
            scale_factor: (1.0 + delta) as f32,
        }),
    }
}

/// One wheel movement is a complete pinch: one update, then release.
fn wheel_events(delta: MouseScrollDelta) -> Vec<InputEvent> {
    let amount = match delta {
        MouseScrollDelta::LineDelta(_, y) => y as f64,
        MouseScrollDelta::PixelDelta(position) => position.y,
    };
    if amount == 0.0 {
        return Vec::new();
    }

    let scale_factor = if amount > 0.0 {
        WHEEL_ZOOM_IN
    } else {
        WHEEL_ZOOM_OUT
    };
    vec![InputEvent::Pinch { scale_factor }, InputEvent::PinchEnd]
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init_graphics(event_loop) {
            error!("failed to initialise graphics: {err:#}");
            self.fatal = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        for input in self.input_events(&event) {
            if self.scene.on_input(input) {
                debug!("view changed by {input:?}");
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            }
            | WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Err(err) = self.scene.on_resize(width, height) {
                    warn!("resize skipped: {err}");
                }
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if self.scene.camera_manager.view_state().take_dirty() {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_phases() {
        assert_eq!(
            touch_event(TouchPhase::Started, 3, 10.0, 20.0),
            InputEvent::PointerDown {
                id: 3,
                x: 10.0,
                y: 20.0
            }
        );
        assert_eq!(
            touch_event(TouchPhase::Moved, 3, 11.0, 20.0),
            InputEvent::PointerMove {
                id: 3,
                x: 11.0,
                y: 20.0
            }
        );
        assert_eq!(
            touch_event(TouchPhase::Cancelled, 3, 0.0, 0.0),
            InputEvent::PointerUp { id: 3 }
        );
    }

    #[test]
    fn test_trackpad_pinch() {
        assert_eq!(
            pinch_event(0.25, TouchPhase::Moved),
            Some(InputEvent::Pinch { scale_factor: 1.25 })
        );
        assert_eq!(
            pinch_event(-0.5, TouchPhase::Started),
            Some(InputEvent::Pinch { scale_factor: 0.5 })
        );
        assert_eq!(pinch_event(0.0, TouchPhase::Started), None);
        assert_eq!(pinch_event(0.0, TouchPhase::Ended), Some(InputEvent::PinchEnd));
    }

    #[test]
    fn test_wheel_becomes_complete_pinch() {
        assert_eq!(
            wheel_events(MouseScrollDelta::LineDelta(0.0, 1.0)),
            vec![
                InputEvent::Pinch {
                    scale_factor: WHEEL_ZOOM_IN
                },
                InputEvent::PinchEnd
            ]
        );
        assert_eq!(
            wheel_events(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -12.0)))[0],
            InputEvent::Pinch {
                scale_factor: WHEEL_ZOOM_OUT
            }
        );
        assert!(wheel_events(MouseScrollDelta::LineDelta(2.0, 0.0)).is_empty());
    }
}
