//! The two fixed shader programs of the automaton
//!
//! `rule` advances one generation into a state buffer; `composite` maps a
//! state buffer to the two display colors on the surface. Both draw a single
//! fullscreen triangle and sample exactly one state buffer; the rule program
//! additionally reads the `canvasSize` uniform for its per-pixel neighbor
//! offsets.

use crate::wgpu_utils::{binding_types, UniformBuffer};

use super::state_buffer::{StateBuffer, STATE_FORMAT};

/// Uniform consumed by the rule shader. MUST match the CanvasSize struct in
/// rule.wgsl exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct CanvasSize {
    size: [f32; 2],
    _padding: [f32; 2],
}

unsafe impl bytemuck::Pod for CanvasSize {}
unsafe impl bytemuck::Zeroable for CanvasSize {}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: [width as f32, height as f32],
            _padding: [0.0; 2],
        }
    }
}

pub struct AutomataPipelines {
    rule_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    rule_layout: wgpu::BindGroupLayout,
    composite_layout: wgpu::BindGroupLayout,
    canvas_size: UniformBuffer<CanvasSize>,
}

impl AutomataPipelines {
    /// Compiles and links both programs
    ///
    /// WGSL validation failures surface here through wgpu's default fatal
    /// error handling, with the compiler diagnostic attached.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let rule_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Rule Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("rule.wgsl").into()),
        });
        let composite_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Composite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("composite.wgsl").into()),
        });

        let rule_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Rule Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: binding_types::texture_2d(),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: binding_types::uniform(),
                    count: None,
                },
            ],
        });

        let composite_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Composite Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: binding_types::texture_2d(),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let rule_pipeline = create_fullscreen_pipeline(
            device,
            "Rule Pipeline",
            &rule_shader,
            &rule_layout,
            STATE_FORMAT,
        );
        let composite_pipeline = create_fullscreen_pipeline(
            device,
            "Composite Pipeline",
            &composite_shader,
            &composite_layout,
            surface_format,
        );

        let canvas_size = UniformBuffer::new_with_data(device, &CanvasSize::new(width, height));

        Self {
            rule_pipeline,
            composite_pipeline,
            rule_layout,
            composite_layout,
            canvas_size,
        }
    }

    /// Bind group for one rule draw sampling `source`
    pub fn rule_bind_group(&self, device: &wgpu::Device, source: &StateBuffer) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Rule Bind Group (source {})", source.index)),
            layout: &self.rule_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&source.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&source.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.canvas_size.binding_resource(),
                },
            ],
        })
    }

    /// Bind group for one composite draw sampling `source`
    pub fn composite_bind_group(
        &self,
        device: &wgpu::Device,
        source: &StateBuffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Composite Bind Group (source {})", source.index)),
            layout: &self.composite_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&source.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&source.sampler),
                },
            ],
        })
    }

    /// Points the rule shader's neighbor offsets at new dimensions
    pub fn set_canvas_size(&mut self, queue: &wgpu::Queue, width: u32, height: u32) {
        self.canvas_size
            .update_content(queue, CanvasSize::new(width, height));
    }

    pub fn rule_pipeline(&self) -> &wgpu::RenderPipeline {
        &self.rule_pipeline
    }

    pub fn composite_pipeline(&self) -> &wgpu::RenderPipeline {
        &self.composite_pipeline
    }
}

fn create_fullscreen_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader: &wgpu::ShaderModule,
    bind_group_layout: &wgpu::BindGroupLayout,
    target_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{} Layout", label)),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
            unclipped_depth: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        multiview: None,
        cache: None,
    })
}
