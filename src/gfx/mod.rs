//! # Graphics Module
//!
//! GPU-facing side of the automaton: the wgpu context bound to the window
//! surface, the state textures that hold one generation each, and the two
//! fixed render pipelines (rule step, display composite).

pub mod context;
pub mod pipelines;
pub mod state_buffer;

pub use context::GpuContext;
pub use pipelines::AutomataPipelines;
pub use state_buffer::StateBuffer;
