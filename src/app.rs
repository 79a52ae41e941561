use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::{PARTICLE_POOL_SIZE, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::controls::ControlAction;
use crate::error::AppError;
use crate::gpu::{draw_scene, ChartPipeline, GpuContext, ParticlePipeline, SceneBuffers, Viewport};
use crate::simulation::{RunState, Session, Species, TickOutcome};

/// GPU objects that exist once the window does
struct Graphics {
    gpu: GpuContext,
    buffers: SceneBuffers,
    particle_pipeline: ParticlePipeline,
    particle_bind_group: wgpu::BindGroup,
    chart_pipeline: ChartPipeline,
}

impl Graphics {
    fn new(window: Arc<Window>) -> Result<Self, AppError> {
        log::info!("Creating GPU context...");
        let gpu = pollster::block_on(GpuContext::new(window))?;

        let buffers = SceneBuffers::new(&gpu.device, PARTICLE_POOL_SIZE, gpu.format().is_srgb());

        log::info!("Creating render pipelines...");
        let particle_pipeline = ParticlePipeline::new(&gpu.device, gpu.format());
        let particle_bind_group =
            particle_pipeline.create_bind_group(&gpu.device, &buffers.view_params_buffer);
        let chart_pipeline = ChartPipeline::new(&gpu.device, gpu.format());

        Ok(Self {
            gpu,
            buffers,
            particle_pipeline,
            particle_bind_group,
            chart_pipeline,
        })
    }

    fn viewports(&self) -> (Viewport, Viewport) {
        let (width, height) = self.gpu.size();
        Viewport::split(width, height)
    }
}

/// Application state
pub struct App {
    window: Option<Arc<Window>>,
    graphics: Option<Graphics>,
    session: Session,
    fps_counter: FpsCounter,
    fps: f64,
    title: String,
    error: Option<AppError>,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            window: None,
            graphics: None,
            session,
            fps_counter: FpsCounter::new(),
            fps: 0.0,
            title: String::new(),
            error: None,
        }
    }

    /// Start-up failure that ended the event loop, if any
    pub fn take_error(&mut self) -> Option<AppError> {
        self.error.take()
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        log::info!("Initializing Claisen condensation simulator...");

        let window_attrs = Window::default_attributes()
            .with_title("Claisen Condensation - Initializing...")
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let graphics = Graphics::new(window.clone())?;

        // Seed the particle canvas at its real size
        let (canvas, _) = graphics.viewports();
        self.session
            .particles
            .resize(canvas.width as f64, canvas.height as f64);
        self.session.reset();

        log::info!("Initialization complete!");
        log::info!("Legend:");
        for species in Species::ALL {
            let [r, g, b] = species.color().map(|c| (c * 255.0).round() as u8);
            log::info!("  #{:02x}{:02x}{:02x}: {}", r, g, b, species.label());
        }
        log::info!("Controls:");
        log::info!("  Space/Enter: Start (restarts a running simulation)");
        log::info!("  R: Reset");
        log::info!("  Up/Down (or +/-): Adjust forward rate constant");
        log::info!("  Escape: Quit");

        window.request_redraw();
        self.window = Some(window);
        self.graphics = Some(graphics);
        Ok(())
    }

    /// One frame: run the pending tick, then draw
    fn render(&mut self) {
        if let TickOutcome::Finished = self.session.frame() {
            let c = self.session.integrator.concentrations();
            log::info!(
                "Finished: EtA {:.3}, Enol {:.3}, Prod {:.3}, yield {}%",
                c.eta,
                c.enol,
                c.prod,
                self.session.readout.yield_percent
            );
        }

        let Some(graphics) = self.graphics.as_mut() else {
            return;
        };
        let (canvas, chart_area) = graphics.viewports();
        if graphics.gpu.size().0 < 2 {
            return;
        }

        let gpu = &graphics.gpu;
        graphics
            .buffers
            .update_particles(&gpu.device, &gpu.queue, self.session.particles.particles());
        graphics.buffers.update_chart(
            &gpu.device,
            &gpu.queue,
            self.session.chart.series(),
            self.session.chart.revision(),
        );
        graphics
            .buffers
            .update_view_params(&gpu.queue, canvas.width, canvas.height);

        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        draw_scene(
            &mut encoder,
            &view,
            &graphics.particle_pipeline,
            &graphics.particle_bind_group,
            &graphics.chart_pipeline,
            &graphics.buffers,
            canvas,
            chart_area,
        );

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(fps) = self.fps_counter.tick() {
            self.fps = fps;
        }
        self.update_title();
    }

    fn update_title(&mut self) {
        let title = window_title(&self.session, self.fps);
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        if let Some(action) = ControlAction::from_key(key_code) {
            log::debug!("Control action: {:?}", action);
            self.session.handle(action);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            log::error!("Initialization failed: {}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() && !event.repeat {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            event_loop.exit();
                        } else {
                            self.handle_key(key_code);
                        }
                    }
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(graphics) = &mut self.graphics {
                    log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                    graphics.gpu.resize(new_size);
                    let (canvas, _) = graphics.viewports();
                    self.session
                        .particles
                        .resize(canvas.width as f64, canvas.height as f64);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render();
                // Schedule the next frame; the pending tick (if any) runs there
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Window title doubles as the time and yield readout
fn window_title(session: &Session, fps: f64) -> String {
    let state = match session.integrator.state() {
        RunState::Idle => "Ready",
        RunState::Running => "Running",
        RunState::Stopped => "Stopped",
    };
    let hint = if session.controls.start_enabled() {
        " (Space to start)"
    } else {
        ""
    };
    format!(
        "Claisen Condensation - t = {} - yield {}% - k_fwd {:.2} - {}{} - {:.0} FPS",
        session.readout.time,
        session.readout.yield_percent,
        session.controls.forward_rate(),
        state,
        hint,
        fps
    )
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::Controls;
    use crate::simulation::{Integrator, ParticleAnimator};

    fn session() -> Session {
        Session::new(
            Integrator::new(0.1, 1.0),
            Controls::new(0.5),
            ParticleAnimator::new(100.0, 100.0, Some(4)),
        )
    }

    #[test]
    fn test_title_shows_start_hint_only_when_armed() {
        let mut s = session();
        let idle = window_title(&s, 60.0);
        assert_eq!(
            idle,
            "Claisen Condensation - t = 0.0 - yield 0.0% - k_fwd 0.50 - Ready (Space to start) - 60 FPS"
        );

        s.start();
        s.frame();
        let running = window_title(&s, 60.0);
        assert!(running.contains("- Running -"));
        assert!(!running.contains("Space to start"));

        s.run_to_completion();
        let stopped = window_title(&s, 60.0);
        assert!(stopped.contains("Stopped (Space to start)"));
    }

    #[test]
    fn test_fps_counter_waits_a_second() {
        let mut counter = FpsCounter::new();
        assert!(counter.tick().is_none());
        assert_eq!(counter.frame_count, 1);

        counter.last_update = Instant::now() - std::time::Duration::from_secs(2);
        let fps = counter.tick().expect("a second has passed");
        assert!(fps > 0.0 && fps <= 1.0);
        assert_eq!(counter.frame_count, 0);
    }
}
