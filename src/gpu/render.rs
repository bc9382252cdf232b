use wgpu::{BindGroup, CommandEncoder, Device, TextureFormat, TextureView};

use crate::gpu::CellBuffers;

/// The one draw of a frame: a fullscreen triangle whose fragments look up
/// cell flags. Bound to a single [`CellBuffers`] for its whole life, since
/// the grid never changes size.
pub struct CellPass {
    pipeline: wgpu::RenderPipeline,
    bind_group: BindGroup,
}

impl CellPass {
    pub fn new(device: &Device, format: TextureFormat, buffers: &CellBuffers) -> Self {
        let shader = device.create_shader_module(wgpu::include_wgsl!("../shaders/render.wgsl"));

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cells-layout"),
            entries: &CellBuffers::layout_entries(),
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cells-bindings"),
            layout: &layout,
            entries: &buffers.bind_group_entries(),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        // No vertex buffers: vs_main derives the triangle from vertex_index
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cells"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: None,
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: None,
                targets: &[Some(format.into())],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group,
        }
    }

    /// Every pixel is covered, so the target is not cleared first.
    pub fn draw(&self, encoder: &mut CommandEncoder, target: &TextureView) {
        let attachment = wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
        };
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("cells"),
            color_attachments: &[Some(attachment)],
            ..Default::default()
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
