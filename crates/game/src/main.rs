//! Legacy City: drive a small car around a campus of project zones, run missions, collect gems.

mod achievements;
mod camera;
mod config;
mod hud;
mod interaction;
mod layout;
mod missions;
mod npc;
mod player;
mod save;
mod session;
mod vehicle;
mod world;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::Result;
use engine_core::Time;
use input::InputState;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use config::GameConfig;
use session::Session;

/// Window, session and frame clock.
struct GameState {
    window: Arc<Window>,
    session: Session,
    input: InputState,
    time: Time,
    running: bool,
}

impl GameState {
    fn new(window: Arc<Window>, config: GameConfig) -> Result<Self> {
        let time = Time::with_max_delta(config.max_frame_delta);
        let session = Session::new(config)?;
        window.set_title(&session.window_title());
        Ok(Self {
            window,
            session,
            input: InputState::new(),
            time,
            running: true,
        })
    }

    /// Returns true when the app should exit.
    fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => return true,
            WindowEvent::Focused(false) => self.input.clear(),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if key == KeyCode::Escape && event.state.is_pressed() {
                        self.running = false;
                        return true;
                    }
                    if !event.repeat && self.input.process_keyboard(key, event.state) {
                        log::trace!("{:?} consumed by the game", key);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                self.frame();
                self.window.request_redraw();
            }
            _ => {}
        }
        false
    }

    fn frame(&mut self) {
        self.time.update();
        let dt = self.time.delta_seconds();
        let session = &mut self.session;
        let input = &mut self.input;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| session.frame(input, dt)));
        if outcome.is_err() {
            log::error!("Frame {} failed; continuing", self.time.frame_count());
            self.input.reset_action_flags();
        }
        if self.session.hud.take_refresh() || self.time.frame_count() % 15 == 0 {
            self.window.set_title(&self.session.window_title());
        }
    }
}

struct App {
    config: GameConfig,
    state: Option<GameState>,
}

impl App {
    fn new(config: GameConfig) -> Self {
        Self { config, state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window_attrs = Window::default_attributes()
            .with_title("Legacy City")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match GameState::new(window.clone(), self.config.clone()) {
            Ok(s) => {
                self.state = Some(s);
                window.request_redraw();
            }
            Err(e) => {
                log::error!("Failed to initialize game: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Legacy City");
    println!("  W/S or arrows  accelerate / brake and reverse");
    println!("  A/D or arrows  steer");
    println!("  Space          jump");
    println!("  E              interact");
    println!("  I / H          inventory / help");
    println!("  1-4            buy upgrades while the market is open");
    println!("  1-9            drop an item while the inventory is open");
    println!("  F5 / F9        save / load");
    println!("  Escape         quit");

    let config = GameConfig::load();
    log::info!("Starting Legacy City ({}x{})", config.window_width, config.window_height);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
