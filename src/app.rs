//! Window host: owns the winit event loop, the renderer and one [`Stage`]

use std::{sync::Arc, time::Duration};
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorIcon, Window, WindowAttributes, WindowId},
};

use crate::{
    frame_loop::{CancelHandle, FrameLoop, FrameTick, SystemClock},
    gfx::{rendering::RenderError, resources::LightRig, scene::Scene, RenderEngine},
    input::WinitInputAdapter,
    interaction::{InteractionController, InteractionEvent},
    scenes::Stage,
};

/// Presentation hook of a stage: per-frame animation and reactions to
/// interaction events
pub trait SceneDriver {
    fn title(&self) -> &str;

    /// Called once per frame, after the camera and pulse have advanced
    fn frame(&mut self, _scene: &mut Scene, _lights: &mut LightRig, _tick: &FrameTick) {}

    fn on_event(
        &mut self,
        _event: &InteractionEvent,
        _scene: &mut Scene,
        _lights: &mut LightRig,
        _now: Duration,
    ) {
    }

    /// Text shown in the window title next to the stage name
    fn status(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("event loop failure: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create the window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background: wgpu::Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "vantage".to_string(),
            width: 1200,
            height: 800,
            background: wgpu::Color::BLACK,
        }
    }
}

impl AppConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

pub struct VantageApp {
    config: AppConfig,
    stage: Stage,
}

struct AppState {
    config: AppConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    lights: LightRig,
    interaction: InteractionController,
    driver: Box<dyn SceneDriver>,
    input: WinitInputAdapter,
    frame_loop: FrameLoop<SystemClock>,
    cancel: CancelHandle,
    last_now: Duration,
    shown_title: String,
    error: Option<AppError>,
}

impl VantageApp {
    /// Window titled after the stage's driver and cleared with its background
    pub fn new(stage: Stage) -> Self {
        let config = AppConfig {
            title: stage.driver.title().to_string(),
            background: stage.background,
            ..AppConfig::default()
        };
        Self { config, stage }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs until the window is closed or Escape is pressed
    pub fn run(self) -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let Stage {
            scene,
            camera,
            targets,
            lights,
            driver,
            ..
        } = self.stage;
        let frame_loop = FrameLoop::default();
        let cancel = frame_loop.cancel_handle();
        let size = (self.config.width, self.config.height);

        let mut state = AppState {
            config: self.config,
            window: None,
            render_engine: None,
            scene,
            lights,
            interaction: InteractionController::new(camera, targets, size),
            driver,
            input: WinitInputAdapter::new(),
            frame_loop,
            cancel,
            last_now: Duration::ZERO,
            shown_title: String::new(),
            error: None,
        };

        event_loop.run_app(&mut state)?;
        match state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        log::error!("{err}");
        self.error = Some(err);
        self.cancel.cancel();
        event_loop.exit();
    }

    fn dispatch(&mut self, event: &WindowEvent) {
        for input in self.input.translate(event) {
            let reactions = self
                .interaction
                .handle_event(&input, &mut self.scene, self.last_now);
            for reaction in reactions {
                if let (InteractionEvent::HoverChanged(hovered), Some(window)) =
                    (&reaction, self.window.as_ref())
                {
                    window.set_cursor(if hovered.is_some() {
                        CursorIcon::Pointer
                    } else {
                        CursorIcon::Default
                    });
                }
                self.driver
                    .on_event(&reaction, &mut self.scene, &mut self.lights, self.last_now);
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(tick) = self.frame_loop.next_tick() else {
            event_loop.exit();
            return;
        };
        self.last_now = tick.now;

        self.interaction.tick(&mut self.scene, &tick);
        self.driver.frame(&mut self.scene, &mut self.lights, &tick);
        self.scene.advance_spins();
        self.refresh_title();

        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };
        let result = render_engine.render_frame(
            &self.scene,
            &self.interaction.camera.camera,
            &self.lights,
            self.config.background,
        );
        if let Err(err) = result {
            self.fail(event_loop, err.into());
        }
    }

    fn refresh_title(&mut self) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let title = match self.driver.status() {
            Some(status) => format!("{} | {status}", self.config.title),
            None => self.config.title.clone(),
        };
        if title != self.shown_title {
            window.set_title(&title);
            self.shown_title = title;
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };

        let (width, height) = window.inner_size().into();
        let window_clone = window.clone();
        let renderer =
            pollster::block_on(async move { RenderEngine::new(window_clone, width, height).await });

        match renderer {
            Ok(renderer) => {
                self.interaction.resize(width, height);
                self.render_engine = Some(renderer);
                self.window = Some(window);
                log::info!("window ready: {width}x{height}");
            }
            Err(err) => self.fail(event_loop, err.into()),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                self.cancel.cancel();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                self.cancel.cancel();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(size.width, size.height);
                }
                self.dispatch(&event);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => self.dispatch(&event),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
