//! Rush: a minimal GPU text window
//!
//! Typed characters are laid out on a monospace grid, rasterized into a glyph
//! atlas and drawn with the GLSL text shaders. A solid cell quad marks the
//! cursor.

mod font;
mod gpu;
mod render;
mod watcher;
mod window;

use anyhow::Context;
use rush::{Config, InputAction};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    keyboard::ModifiersState,
    window::WindowId,
};

use font::LoadedFont;
use gpu::SharedGpuState;
use render::render_frame;
use watcher::ConfigWatcher;
use window::WindowState;

/// Events sent into the event loop from other threads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserEvent {
    /// The config file watcher saw a change
    ConfigChanged,
}

struct App {
    config: Config,
    shared_gpu: Option<SharedGpuState>,
    font: Option<LoadedFont>,
    window: Option<WindowState>,
    modifiers: ModifiersState,
    config_watcher: Option<ConfigWatcher>,
    /// Fatal error raised inside the event loop
    error: Option<anyhow::Error>,
}

impl App {
    fn new(proxy: EventLoopProxy<UserEvent>) -> Self {
        // Wake the loop from the watcher thread; it sleeps under ControlFlow::Wait
        let config_watcher = ConfigWatcher::new(move || {
            let _ = proxy.send_event(UserEvent::ConfigChanged);
        });

        Self {
            config: Config::load(),
            shared_gpu: None,
            font: None,
            window: None,
            modifiers: ModifiersState::default(),
            config_watcher,
            error: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        if self.shared_gpu.is_none() {
            self.shared_gpu = Some(SharedGpuState::new()?);
        }
        if self.font.is_none() {
            self.font = Some(font::load_font(&self.config.font)?);
        }

        let (Some(shared), Some(font)) = (self.shared_gpu.as_ref(), self.font.as_ref()) else {
            anyhow::bail!("GPU or font state missing after initialization");
        };

        let state = WindowState::new(event_loop, shared, &self.config, font)
            .context("Failed to set up window")?;
        state.window.request_redraw();
        self.window = Some(state);
        Ok(())
    }

    fn reload_config(&mut self) {
        log::info!("Reloading config...");
        let new_config = Config::load();

        if new_config.font.family != self.config.font.family {
            match font::load_font(&new_config.font) {
                Ok(font) => self.font = Some(font),
                Err(e) => log::warn!("Keeping previous font: {:#}", e),
            }
        }
        self.config = new_config;

        let (Some(state), Some(shared), Some(font)) = (
            self.window.as_mut(),
            self.shared_gpu.as_ref(),
            self.font.as_ref(),
        ) else {
            return;
        };

        if let Err(e) = state.apply_config(shared, &self.config, font) {
            log::warn!("Failed to apply config: {:#}", e);
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler<UserEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let (Some(state), Some(shared)) = (self.window.as_mut(), self.shared_gpu.as_ref()) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window closed");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                state.handle_resize(shared, size.width, size.height);
                state.window.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                state.scale_factor = scale_factor as f32;
                if let Some(font) = self.font.as_ref() {
                    if let Err(e) = state.apply_config(shared, &self.config, font) {
                        log::warn!("Failed to rescale glyphs: {:#}", e);
                    }
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }

            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                let Some(action) = InputAction::from_key(&event.logical_key, self.modifiers) else {
                    return;
                };

                if action == InputAction::Quit {
                    log::info!("Escape pressed, exiting");
                    event_loop.exit();
                    return;
                }

                if action.apply(&mut state.buffer) {
                    state.dirty = true;
                    state.window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                state.dirty = false;
                render_frame(state, shared);
            }

            _ => {}
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::ConfigChanged => {
                let changed = self
                    .config_watcher
                    .as_mut()
                    .is_some_and(|watcher| watcher.poll());
                if changed {
                    self.reload_config();
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.window {
            if state.dirty {
                state.window.request_redraw();
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn,rush=info"))
        .init();

    if std::env::args().skip(1).any(|arg| arg == "--print-config") {
        print!("{}", Config::generate_default_config());
        return Ok(());
    }

    log::info!("Rush starting");

    let event_loop = EventLoop::<UserEvent>::with_user_event()
        .build()
        .context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(event_loop.create_proxy());
    event_loop.run_app(&mut app).context("Event loop failed")?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
