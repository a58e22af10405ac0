use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use grid_caster::frame::FrameDriver;
use grid_caster::player::{InputState, MovementError, PlayerState};
use grid_caster::raycaster::Viewport;
use grid_caster::settings::{SETTINGS_FILE, Settings, SettingsError};
use grid_caster::surface::FrameBuffer;
use grid_caster::world::GridMap;

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Movement(#[from] MovementError),

    #[error("event loop: {0}")]
    EventLoop(#[from] EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] OsError),

    #[error("softbuffer: {0}")]
    Surface(#[from] softbuffer::SoftBufferError),
}

struct App {
    settings: Settings,
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    driver: FrameDriver,

    // Input and pacing
    keys_down: HashSet<KeyCode>,
    last_tick: Instant,
    frame_time: Duration,
    next_frame: Instant,

    // FPS log
    frame_counter: u32,
    last_fps_print: Instant,

    // first fatal error, reported after the loop exits
    error: Option<AppError>,
}

impl App {
    fn new(settings: Settings) -> Result<Self, AppError> {
        let driver = FrameDriver::new(GridMap::default(), PlayerState::default(), &settings)?;
        let now = Instant::now();
        Ok(Self {
            frame_time: Duration::from_secs_f64(1.0 / settings.target_fps as f64),
            settings,
            window: None,
            surface: None,
            driver,

            keys_down: HashSet::new(),
            last_tick: now,
            next_frame: now,

            frame_counter: 0,
            last_fps_print: now,

            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        self.error.get_or_insert(err);
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attributes = Window::default_attributes()
            .with_title(self.settings.title.as_str())
            .with_inner_size(LogicalSize::new(self.settings.width, self.settings.height));

        let window = Rc::new(event_loop.create_window(attributes)?);
        let context = softbuffer::Context::new(window.clone())?;
        let surface = softbuffer::Surface::new(&context, window.clone())?;

        let size = window.inner_size();
        log::info!("window created at {}x{}", size.width, size.height);

        window.request_redraw();
        self.surface = Some(surface);
        self.window = Some(window);
        self.last_tick = Instant::now();
        Ok(())
    }

    fn input(&self) -> InputState {
        InputState {
            forward: self.keys_down.contains(&KeyCode::KeyW),
            backward: self.keys_down.contains(&KeyCode::KeyS),
            rotate_left: self.keys_down.contains(&KeyCode::KeyA),
            rotate_right: self.keys_down.contains(&KeyCode::KeyD),
        }
    }

    fn redraw(&mut self, id: WindowId) -> Result<(), AppError> {
        let input = self.input();
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f32();

        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return Ok(()),
        };
        self.last_tick = now;

        let size = window.inner_size();
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return Ok(()); // Minimized window, skip drawing
        };
        surface.resize(w, h)?;

        let viewport = Viewport {
            width: size.width,
            height: size.height,
        };
        let mut buf = surface.buffer_mut()?;
        {
            let mut fb = FrameBuffer::new(&mut buf, size.width as usize, size.height as usize);
            self.driver.frame(input, dt, viewport, &mut fb);
        }
        buf.present()?;

        self.frame_counter += 1;
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            log::debug!("FPS: {:.1}", self.frame_counter as f32 / elapsed);
            self.frame_counter = 0;
            self.last_fps_print = now;
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.create_window(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested, stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match (code, state) {
                (KeyCode::Escape, ElementState::Pressed) => {
                    log::info!("escape pressed, stopping");
                    event_loop.exit();
                }
                (_, ElementState::Pressed) => {
                    self.keys_down.insert(code);
                }
                (_, ElementState::Released) => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::Focused(false) => self.keys_down.clear(),

            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw(id) {
                    self.fail(event_loop, err);
                }
            }

            WindowEvent::Resized(new_size) => {
                log::info!("resized to {}x{}", new_size.width, new_size.height);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_frame {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
            self.next_frame = now + self.frame_time;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        let p = self.driver.player();
        log::info!(
            "exiting at ({:.2}, {:.2}) facing ({:.2}, {:.2})",
            p.position.x,
            p.position.y,
            p.direction.x,
            p.direction.y
        );
    }
}

fn run() -> Result<(), AppError> {
    let settings = Settings::load_or_default(SETTINGS_FILE)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(settings)?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}
