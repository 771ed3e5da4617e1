//! Step engine
//!
//! Owns the buffer pair and the two pipelines, advances one generation per
//! step, and rebuilds the pair on surface resizes. All work is issued in
//! program order on one queue, which is what serializes the rule pass's
//! write before the composite pass's read of the same buffer.

use std::iter;

use crate::gfx::{AutomataPipelines, GpuContext, StateBuffer};

/// The two generation buffers by role
///
/// `front` holds the most recent committed generation and is only ever
/// sampled; `back` is the target of the in-progress write. Roles exchange by
/// relabeling, never by copying cell data.
struct BufferPair {
    front: StateBuffer,
    back: StateBuffer,
}

impl BufferPair {
    fn swap(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
    }
}

pub struct Simulation {
    pipelines: AutomataPipelines,
    buffers: BufferPair,
    /// Counter behind every `StateBuffer::index`.
    next_index: u32,
    width: u32,
    height: u32,
}

impl Simulation {
    /// Builds the pipelines and both randomly seeded buffers at the
    /// surface's current dimensions
    pub fn new(gfx: &GpuContext) -> Self {
        let width = gfx.config().width;
        let height = gfx.config().height;

        let pipelines =
            AutomataPipelines::new(gfx.device(), gfx.surface_format(), width, height);

        let front = StateBuffer::allocate(gfx.device(), gfx.queue(), width, height, 0);
        let back = StateBuffer::allocate(gfx.device(), gfx.queue(), width, height, 1);
        log::info!("Simulation started at {}x{}", width, height);

        Self {
            pipelines,
            buffers: BufferPair { front, back },
            next_index: 2,
            width,
            height,
        }
    }

    /// Advances exactly one generation and presents it
    ///
    /// Rule pass writes the next generation into the back buffer while
    /// sampling the front buffer, the composite pass presents the back
    /// buffer, then the role labels swap. Nothing here blocks on GPU
    /// completion.
    pub fn step(&mut self, gfx: &GpuContext) {
        debug_assert_eq!(self.buffers.front.width(), self.width);
        debug_assert_eq!(self.buffers.back.height(), self.height);

        let surface_texture = gfx
            .surface()
            .get_current_texture()
            .expect("Failed to get surface texture!");
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gfx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Step Encoder"),
            });

        {
            let bind_group = self
                .pipelines
                .rule_bind_group(gfx.device(), &self.buffers.front);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Rule Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.buffers.back.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_pipeline(self.pipelines.rule_pipeline());
            pass.set_bind_group(0, &bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        {
            let bind_group = self
                .pipelines
                .composite_bind_group(gfx.device(), &self.buffers.back);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Composite Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_pipeline(self.pipelines.composite_pipeline());
            pass.set_bind_group(0, &bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        gfx.queue().submit(iter::once(encoder.finish()));
        surface_texture.present();

        self.buffers.swap();
    }

    /// Replaces both buffers at new surface dimensions
    ///
    /// Each buffer is migrated independently: allocate a new randomly
    /// seeded buffer, run a rule pass over the old grid's extent into it
    /// sampling the old buffer, drop the old one under the same role label.
    /// Texels beyond the old extent keep their fresh random fill and become
    /// neighbor input on the following step. The `canvasSize` uniform is
    /// only updated after both migrations, so those passes still compute
    /// neighbor offsets from the old dimensions. Because migration runs the
    /// stepping rule rather than an identity copy, a resize also advances
    /// the carried state by one extra generation.
    pub fn resize(&mut self, gfx: &GpuContext, width: u32, height: u32) {
        let index = self.bump_index();
        self.buffers.back = migrate(gfx, &self.pipelines, &self.buffers.back, width, height, index);
        let index = self.bump_index();
        self.buffers.front =
            migrate(gfx, &self.pipelines, &self.buffers.front, width, height, index);

        self.pipelines.set_canvas_size(gfx.queue(), width, height);
        self.width = width;
        self.height = height;
        log::debug!("Simulation resized to {}x{}", width, height);
    }

    fn bump_index(&mut self) -> u32 {
        let index = self.next_index;
        self.next_index += 1;
        index
    }
}

fn migrate(
    gfx: &GpuContext,
    pipelines: &AutomataPipelines,
    old: &StateBuffer,
    width: u32,
    height: u32,
    index: u32,
) -> StateBuffer {
    let replacement = StateBuffer::allocate(gfx.device(), gfx.queue(), width, height, index);
    let (keep_width, keep_height) = migration_extent(old.width(), old.height(), width, height);

    let bind_group = pipelines.rule_bind_group(gfx.device(), old);
    let mut encoder = gfx
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Migration Encoder"),
        });
    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Migration Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &replacement.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    // Load, not clear: texels outside the migration extent
                    // must keep their random fill.
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        pass.set_pipeline(pipelines.rule_pipeline());
        pass.set_bind_group(0, &bind_group, &[]);
        // The draw covers only the old grid's extent, so the stepped old
        // cells land 1:1 in the corner of the new buffer.
        pass.set_viewport(0.0, 0.0, keep_width as f32, keep_height as f32, 0.0, 1.0);
        pass.draw(0..3, 0..1);
    }
    gfx.queue().submit(iter::once(encoder.finish()));

    replacement
}

/// Region a migration draw writes: the old grid's extent, clamped to the
/// new attachment because wgpu requires the viewport to stay inside it
fn migration_extent(
    old_width: u32,
    old_height: u32,
    new_width: u32,
    new_height: u32,
) -> (u32, u32) {
    (old_width.min(new_width), old_height.min(new_height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_extent_grow_keeps_old_extent() {
        // Growing 4x4 to 8x8: the migrated cells occupy the 4x4 corner and
        // the texels beyond keep their random fill as future neighbor input.
        assert_eq!(migration_extent(4, 4, 8, 8), (4, 4));
    }

    #[test]
    fn test_migration_extent_shrink_clamps_to_attachment() {
        assert_eq!(migration_extent(8, 8, 4, 6), (4, 6));
    }

    #[test]
    fn test_migration_extent_mixed_resize() {
        assert_eq!(migration_extent(8, 4, 4, 8), (4, 4));
    }
}
