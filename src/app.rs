//! Winit application shell
//!
//! Owns the event loop, the GPU context, and the simulation. All GPU work is
//! issued from the event-loop thread, so step and resize never overlap.

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::gfx::GpuContext;
use crate::sim::{Scheduler, Simulation, GENERATIONS_PER_SECOND};

pub struct AutomataApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    gfx: Option<GpuContext>,
    simulation: Option<Simulation>,
    scheduler: Scheduler,
}

impl AutomataApp {
    /// Create a new application with default settings
    pub fn new() -> Self {
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                gfx: None,
                simulation: None,
                scheduler: Scheduler::new(GENERATIONS_PER_SECOND),
            },
        }
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .expect("Failed to run event loop");
    }
}

impl Default for AutomataApp {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title("spots")
            .with_inner_size(winit::dpi::LogicalSize::new(1200, 800));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let (width, height) = window.inner_size().into();

        let gfx = match pollster::block_on(GpuContext::new(window.clone(), width, height)) {
            Ok(gfx) => gfx,
            Err(err) => {
                // Fatal: without a GPU context the simulation never
                // constructs its buffers and the scheduler never fires.
                log::error!("GPU initialization failed: {err:#}");
                event_loop.exit();
                return;
            }
        };

        let simulation = Simulation::new(&gfx);

        self.gfx = Some(gfx);
        self.simulation = Some(simulation);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let (Some(gfx), Some(simulation)) = (self.gfx.as_mut(), self.simulation.as_mut()) else {
            if matches!(event, WindowEvent::CloseRequested) {
                event_loop.exit();
            }
            return;
        };

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                // A 0x0 surface (minimized window) cannot be configured.
                if width > 0 && height > 0 {
                    gfx.resize(width, height);
                    simulation.resize(gfx, width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                if self.scheduler.due(now) {
                    self.scheduler.fire(now);
                    simulation.step(gfx);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.simulation.is_none() {
            return;
        }
        let Some(window) = self.window.as_ref() else {
            return;
        };

        if self.scheduler.due(Instant::now()) {
            window.request_redraw();
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(self.scheduler.deadline()));
        }
    }
}
