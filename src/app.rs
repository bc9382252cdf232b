use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use ripple_life::config::{RANDOM_FILL_DENSITY, WINDOW_SIZE};
use ripple_life::simulation::Pattern;
use ripple_life::Simulation;

use crate::gpu::{CellBuffers, CellPass, GpuContext, GpuError};

/// Everything that only exists once a window is up
struct Renderer {
    gpu: GpuContext,
    buffers: CellBuffers,
    pass: CellPass,
}

impl Renderer {
    fn new(window: Arc<Window>, simulation: &Simulation) -> Result<Self, GpuError> {
        let gpu = pollster::block_on(GpuContext::new(window))?;

        let grid = simulation.grid();
        let buffers = CellBuffers::new(&gpu.device, grid.width(), grid.height())?;
        let pass = CellPass::new(&gpu.device, gpu.format(), &buffers);

        Ok(Self { gpu, buffers, pass })
    }
}

/// Drives a [`Simulation`]: steps it on a timer or on demand, applies user
/// edits, and draws whatever the session exposes after each change.
pub struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    simulation: Simulation,
    playing: bool,
    show_queue: bool,
    tick_interval: Duration,
    last_tick: Instant,
    cursor: Option<PhysicalPosition<f64>>,
    /// Grid, queue or render parameters changed since the last upload
    dirty: bool,
    fps_counter: FpsCounter,
}

impl App {
    pub fn new(simulation: Simulation, tick_interval: Duration) -> Self {
        Self {
            window: None,
            renderer: None,
            simulation,
            playing: false,
            show_queue: true,
            tick_interval,
            last_tick: Instant::now(),
            cursor: None,
            dirty: true,
            fps_counter: FpsCounter::new(),
        }
    }

    fn step(&mut self) {
        let report = self.simulation.step();
        self.dirty = true;
        if report.queued == 0 && self.playing {
            self.playing = false;
            log::info!("Fixed point reached at generation {}, pausing", report.generation);
        }
    }

    fn render(&mut self) {
        if self.playing && self.last_tick.elapsed() >= self.tick_interval {
            self.step();
            self.last_tick = Instant::now();
        }

        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        if self.dirty {
            renderer.buffers.upload(&renderer.gpu.queue, &self.simulation);
            renderer.buffers.update_params(&renderer.gpu.queue, self.show_queue);
            self.dirty = false;
        }

        let gpu = &renderer.gpu;
        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                log::log!(surface_error_level(&e), "Surface error, skipping frame: {}", e);
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
        renderer.pass.draw(&mut encoder, &view);
        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(fps) = self.fps_counter.tick() {
            self.update_title(fps);
        }
    }

    fn update_title(&self, fps: f64) {
        let Some(window) = &self.window else {
            return;
        };
        let history = self.simulation.history();
        let state = if self.playing { "" } else { " [paused]" };
        window.set_title(&format!(
            "Ripple Life {} - gen {} - queue {} (peak {}) - {:.0} FPS{}",
            self.simulation.rules(),
            self.simulation.generation(),
            self.simulation.queue_snapshot().len(),
            history.peak().unwrap_or(0),
            fps,
            state
        ));
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        match key_code {
            KeyCode::Space => {
                self.playing = !self.playing;
                self.last_tick = Instant::now();
                log::info!("{}", if self.playing { "Playing" } else { "Paused" });
            }
            KeyCode::KeyN | KeyCode::ArrowRight => {
                self.playing = false;
                self.step();
            }
            KeyCode::KeyC => {
                self.playing = false;
                self.simulation.clear();
                self.dirty = true;
                log::info!("Grid cleared");
            }
            KeyCode::KeyR => {
                match self
                    .simulation
                    .seed_random(&mut rand::thread_rng(), RANDOM_FILL_DENSITY)
                {
                    Ok(()) => self.dirty = true,
                    Err(e) => log::error!("Random seed failed: {}", e),
                }
            }
            KeyCode::KeyH => {
                self.show_queue = !self.show_queue;
                self.dirty = true;
                log::info!("Queue highlight: {}", if self.show_queue { "ON" } else { "OFF" });
            }
            _ => {
                if let Some(pattern) = pattern_for_key(key_code) {
                    let grid = self.simulation.grid();
                    let (cx, cy) = (grid.width() as i64 / 2, grid.height() as i64 / 2);
                    self.simulation.place_pattern(pattern, cx, cy);
                    self.dirty = true;
                }
            }
        }
    }

    /// Grid cell under the pointer, if the pointer is over the window.
    fn cell_under_cursor(&self) -> Option<(i64, i64)> {
        let position = self.cursor?;
        let (width, height) = self.renderer.as_ref()?.gpu.surface_size();
        let grid = self.simulation.grid();
        let x = (position.x / width as f64 * grid.width() as f64).floor() as i64;
        let y = (position.y / height as f64 * grid.height() as f64).floor() as i64;
        Some((x, y))
    }

    fn handle_click(&mut self) {
        if let Some((x, y)) = self.cell_under_cursor() {
            let alive = self.simulation.perturb(x, y);
            log::trace!("Clicked ({}, {}) -> {}", x, y, if alive { "alive" } else { "dead" });
            self.dirty = true;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let grid = self.simulation.grid();
        log::info!(
            "Initializing {}x{} grid with rule {}",
            grid.width(),
            grid.height(),
            self.simulation.rules()
        );

        let window_attrs = Window::default_attributes()
            .with_title("Ripple Life - Initializing...")
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_SIZE, WINDOW_SIZE));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let renderer = match Renderer::new(window.clone(), &self.simulation) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("GPU initialization failed: {}", e);
                event_loop.exit();
                return;
            }
        };

        log::info!("Initialization complete!");
        log::info!("Controls:");
        log::info!("  Space: Play/pause");
        log::info!("  N/Right: Single step");
        log::info!("  Left click: Toggle cell");
        log::info!("  R: Random fill");
        log::info!("  C: Clear");
        log::info!("  H: Toggle queue highlight");
        log::info!(
            "  1-5: Place {}",
            Pattern::ALL.map(|p| p.name()).join(", ")
        );
        log::info!("  Escape: Quit");

        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
        self.dirty = true;
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
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.handle_click();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                    renderer.gpu.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// A timed-out frame is retried on the next redraw; anything else is fatal
/// to presenting.
fn surface_error_level(error: &wgpu::SurfaceError) -> log::Level {
    match error {
        wgpu::SurfaceError::Timeout => log::Level::Warn,
        _ => log::Level::Error,
    }
}

/// Number keys stamp a pattern at the grid centre
fn pattern_for_key(key_code: KeyCode) -> Option<Pattern> {
    match key_code {
        KeyCode::Digit1 => Some(Pattern::Blinker),
        KeyCode::Digit2 => Some(Pattern::Toad),
        KeyCode::Digit3 => Some(Pattern::Beacon),
        KeyCode::Digit4 => Some(Pattern::Glider),
        KeyCode::Digit5 => Some(Pattern::RPentomino),
        _ => None,
    }
}

/// Frames per second, sampled once a second
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

    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed().as_secs_f64();

        if elapsed >= 1.0 {
            let fps = self.frame_count as f64 / elapsed;
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}
