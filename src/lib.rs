// src/lib.rs
//! Spots Automaton
//!
//! A GPU-resident binary cellular automaton built on wgpu and winit.
//!
//! Two surface-sized textures ping-pong every generation: a rule pass
//! computes the next generation from the 3x3 neighborhood sum of the front
//! buffer into the back buffer, a composite pass maps the result to two
//! display colors on the window surface, then the buffer roles swap. A
//! drift-corrected timer holds the simulation at 60 generations per second.

pub mod app;
pub mod gfx;
pub mod sim;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::AutomataApp;

/// Creates a default application instance
pub fn default() -> AutomataApp {
    AutomataApp::new()
}
