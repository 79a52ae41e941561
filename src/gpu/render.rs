use wgpu::{
    BindGroup, BindGroupLayout, Buffer, Device, RenderPass, RenderPipeline, TextureFormat,
    TextureView,
};

use crate::gpu::buffers::{ChartVertex, GpuParticle, SceneBuffers};

/// Page-like background behind both panels
const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.96,
    g: 0.96,
    b: 0.97,
    a: 1.0,
};

/// Pixel rectangle a pipeline draws into
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Split a surface into (particle canvas, chart) side by side
    pub fn split(width: u32, height: u32) -> (Viewport, Viewport) {
        let half = (width / 2).max(1) as f32;
        let height = height.max(1) as f32;
        let left = Viewport { x: 0.0, y: 0.0, width: half, height };
        let right = Viewport {
            x: half,
            y: 0.0,
            width: (width as f32 - half).max(1.0),
            height,
        };
        (left, right)
    }

    fn apply(&self, pass: &mut RenderPass<'_>) {
        pass.set_viewport(self.x, self.y, self.width, self.height, 0.0, 1.0);
    }
}

fn color_target(format: TextureFormat) -> Option<wgpu::ColorTargetState> {
    Some(wgpu::ColorTargetState {
        format,
        blend: Some(wgpu::BlendState::REPLACE),
        write_mask: wgpu::ColorWrites::ALL,
    })
}

/// Instanced disk pipeline for the particle canvas
pub struct ParticlePipeline {
    pipeline: RenderPipeline,
    bind_group_layout: BindGroupLayout,
}

impl ParticlePipeline {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn new(device: &Device, format: TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particle-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/particles.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("particle-bind-group-layout"),
            entries: &[
                // View parameters (uniform)
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("particle-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("particle-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GpuParticle>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &Self::ATTRIBUTES,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[color_target(format)],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group_layout,
        }
    }

    /// Bind the view-params uniform
    pub fn create_bind_group(&self, device: &Device, view_params_buffer: &Buffer) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("particle-bind-group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: view_params_buffer.as_entire_binding(),
            }],
        })
    }

    fn draw(&self, pass: &mut RenderPass<'_>, bind_group: &BindGroup, buffers: &SceneBuffers) {
        let count = buffers.particle_count();
        if count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.set_vertex_buffer(0, buffers.particle_buffer().slice(..));
        pass.draw(0..6, 0..count);
    }
}

/// Line-list pipeline for the concentration chart
pub struct ChartPipeline {
    pipeline: RenderPipeline,
}

impl ChartPipeline {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn new(device: &Device, format: TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("chart-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/chart.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("chart-pipeline-layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("chart-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<ChartVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &Self::ATTRIBUTES,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[color_target(format)],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self { pipeline }
    }

    fn draw(&self, pass: &mut RenderPass<'_>, buffers: &SceneBuffers) {
        let count = buffers.chart_vertex_count();
        if count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, buffers.chart_buffer().slice(..));
        pass.draw(0..count, 0..1);
    }
}

/// Clear the frame, then draw particles on the left and the chart on the right
#[allow(clippy::too_many_arguments)]
pub fn draw_scene(
    encoder: &mut wgpu::CommandEncoder,
    view: &TextureView,
    particles: &ParticlePipeline,
    particle_bind_group: &BindGroup,
    chart: &ChartPipeline,
    buffers: &SceneBuffers,
    canvas: Viewport,
    chart_area: Viewport,
) {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("scene-pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(BACKGROUND),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    canvas.apply(&mut pass);
    particles.draw(&mut pass, particle_bind_group, buffers);

    chart_area.apply(&mut pass);
    chart.draw(&mut pass, buffers);
}
