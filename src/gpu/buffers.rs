use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::config::{AXIS_COLOR, CHART_MARGIN, CHART_Y_MAX, PARTICLE_RADIUS};
use crate::simulation::{ChartSeries, Particle, Species};

/// One particle disk, drawn as an instanced quad (24 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuParticle {
    /// Centre in canvas pixels, origin top-left
    pub center: [f32; 2],
    pub color: [f32; 4],
}

/// Chart line vertex in viewport NDC (24 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ChartVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Canvas parameters for the particle shader (16 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewParams {
    pub canvas_size: [f32; 2],
    pub radius: f32,
    pub _padding: f32,
}

/// Growable vertex buffer; reallocated to the next power of two when an
/// upload does not fit
struct DynamicBuffer {
    label: &'static str,
    buffer: Buffer,
    capacity: usize,
    len: u32,
}

impl DynamicBuffer {
    fn new<T: bytemuck::Pod>(device: &Device, label: &'static str, capacity: usize) -> Self {
        Self {
            label,
            buffer: Self::allocate::<T>(device, label, capacity),
            capacity,
            len: 0,
        }
    }

    fn allocate<T: bytemuck::Pod>(device: &Device, label: &'static str, capacity: usize) -> Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity.max(1) * std::mem::size_of::<T>()) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn upload<T: bytemuck::Pod>(&mut self, device: &Device, queue: &Queue, data: &[T]) {
        if data.len() > self.capacity {
            self.capacity = data.len().next_power_of_two();
            self.buffer = Self::allocate::<T>(device, self.label, self.capacity);
            log::debug!("Grew {} to {} elements", self.label, self.capacity);
        }
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        self.len = data.len() as u32;
    }
}

/// Per-frame GPU data: particle instances, chart vertices, view uniform
pub struct SceneBuffers {
    particles: DynamicBuffer,
    chart: DynamicBuffer,
    /// Uniform buffer for the particle canvas
    pub view_params_buffer: Buffer,
    /// Surface applies sRGB encoding, so colours must be uploaded linear
    linear_colors: bool,
    chart_revision: Option<u64>,
}

impl SceneBuffers {
    pub fn new(device: &Device, particle_capacity: usize, linear_colors: bool) -> Self {
        let view_params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("view-params-buffer"),
            size: std::mem::size_of::<ViewParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            particles: DynamicBuffer::new::<GpuParticle>(device, "particle-buffer", particle_capacity),
            chart: DynamicBuffer::new::<ChartVertex>(device, "chart-buffer", 1024),
            view_params_buffer,
            linear_colors,
            chart_revision: None,
        }
    }

    pub fn particle_buffer(&self) -> &Buffer {
        &self.particles.buffer
    }

    pub fn particle_count(&self) -> u32 {
        self.particles.len
    }

    pub fn chart_buffer(&self) -> &Buffer {
        &self.chart.buffer
    }

    pub fn chart_vertex_count(&self) -> u32 {
        self.chart.len
    }

    /// Upload the current particle pool
    pub fn update_particles(&mut self, device: &Device, queue: &Queue, particles: &[Particle]) {
        let linear = self.linear_colors;
        let instances: Vec<GpuParticle> = particles
            .iter()
            .map(|p| GpuParticle {
                center: [p.position[0] as f32, p.position[1] as f32],
                color: display_color(p.species.color(), linear),
            })
            .collect();
        self.particles.upload(device, queue, &instances);
    }

    /// Rebuild the chart geometry when the series changed since last upload
    pub fn update_chart(&mut self, device: &Device, queue: &Queue, series: &ChartSeries, revision: u64) {
        if self.chart_revision == Some(revision) {
            return;
        }
        let vertices = chart_vertices(series, self.linear_colors);
        self.chart.upload(device, queue, &vertices);
        self.chart_revision = Some(revision);
    }

    /// Update canvas size for the particle shader
    pub fn update_view_params(&self, queue: &Queue, width: f32, height: f32) {
        let params = ViewParams {
            canvas_size: [width, height],
            radius: PARTICLE_RADIUS,
            _padding: 0.0,
        };
        queue.write_buffer(&self.view_params_buffer, 0, bytemuck::bytes_of(&params));
    }
}

/// sRGB to linear transfer, applied when the surface re-encodes on write
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn display_color(rgb: [f32; 3], linear: bool) -> [f32; 4] {
    if linear {
        [srgb_to_linear(rgb[0]), srgb_to_linear(rgb[1]), srgb_to_linear(rgb[2]), 1.0]
    } else {
        [rgb[0], rgb[1], rgb[2], 1.0]
    }
}

/// Map a sample index and concentration into chart-viewport NDC.
/// Samples are evenly spaced by index; values are clipped to [0, CHART_Y_MAX].
fn chart_point(index: usize, count: usize, value: f64) -> [f32; 2] {
    let lo = -1.0 + 2.0 * CHART_MARGIN;
    let span = 2.0 - 4.0 * CHART_MARGIN;
    let fx = if count > 1 {
        index as f32 / (count - 1) as f32
    } else {
        0.0
    };
    let fy = (value.clamp(0.0, CHART_Y_MAX) / CHART_Y_MAX) as f32;
    [lo + span * fx, lo + span * fy]
}

/// Line-list geometry for the chart: two axes, then one polyline per species
pub fn chart_vertices(series: &ChartSeries, linear: bool) -> Vec<ChartVertex> {
    let n = series.len();
    let segments = n.saturating_sub(1);
    let mut vertices = Vec::with_capacity(4 + 3 * 2 * segments);

    let axis = display_color(AXIS_COLOR, linear);
    let origin = chart_point(0, 2, 0.0);
    let x_end = chart_point(1, 2, 0.0);
    let y_end = chart_point(0, 2, CHART_Y_MAX);
    for position in [origin, x_end, origin, y_end] {
        vertices.push(ChartVertex { position, color: axis });
    }

    for (species, values) in [
        (Species::Eta, &series.eta),
        (Species::Enol, &series.enol),
        (Species::Prod, &series.prod),
    ] {
        let color = display_color(species.color(), linear);
        for (i, pair) in values.windows(2).enumerate() {
            vertices.push(ChartVertex { position: chart_point(i, n, pair[0]), color });
            vertices.push(ChartVertex { position: chart_point(i + 1, n, pair[1]), color });
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pod_sizes() {
        assert_eq!(std::mem::size_of::<GpuParticle>(), 24);
        assert_eq!(std::mem::size_of::<ChartVertex>(), 24);
        assert_eq!(std::mem::size_of::<ViewParams>(), 16);
    }

    #[test]
    fn test_empty_chart_has_axes_only() {
        let vertices = chart_vertices(&ChartSeries::default(), false);
        assert_eq!(vertices.len(), 4);
    }

    #[test]
    fn test_chart_segments_per_species() {
        let series = ChartSeries {
            labels: vec!["0.5".into(), "1.0".into(), "1.5".into()],
            eta: vec![0.9, 0.8, 0.7],
            enol: vec![0.05, 0.1, 0.1],
            prod: vec![0.05, 0.1, 0.2],
        };
        let vertices = chart_vertices(&series, false);
        // 4 axis vertices + 3 species * 2 segments * 2 vertices
        assert_eq!(vertices.len(), 16);

        // First EtA segment starts at the left edge of the plot area
        let first = vertices[4];
        assert!((first.position[0] - (-1.0 + 2.0 * CHART_MARGIN)).abs() < 1e-6);
        assert_eq!(first.color, [0.204, 0.596, 0.859, 1.0]);
        // Last vertex sits at the right edge
        let last = vertices[15];
        assert!((last.position[0] - (1.0 - 2.0 * CHART_MARGIN)).abs() < 1e-6);
    }

    #[test]
    fn test_chart_values_clipped_to_axis() {
        let top = chart_point(0, 1, 5.0);
        let bottom = chart_point(0, 1, -1.0);
        assert!((top[1] - (1.0 - 2.0 * CHART_MARGIN)).abs() < 1e-6);
        assert!((bottom[1] - (-1.0 + 2.0 * CHART_MARGIN)).abs() < 1e-6);
    }

    #[test]
    fn test_srgb_to_linear_endpoints() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
        assert!(srgb_to_linear(0.5) < 0.5);
    }
}
