// Engine lifecycle: window creation, manager setup, and the main loop

use super::app::{Application, Context};
use super::display::Display;
use super::error::EngineError;
use super::game_loop::GameLoop;
use super::input::{KeyManager, MouseManager};
use super::objects::ObjectManager;
use super::physics::PhysicsManager;
use super::renderer::{Camera, RenderSettings, Renderer};
use crate::core::color::Color;
use anyhow::Result;
use glam::Vec3;
use log::{error, info, warn};
use std::sync::Arc;
use winit::dpi::LogicalSize;
use winit::event::{DeviceEvent, Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

/// Owns the display, all managers, and the main loop.
///
/// `run` drives everything on the calling thread: the windowing binding
/// requires that window events and GPU work originate from the thread that
/// created the event loop, so there is no separate loop thread to start or
/// join. Shutdown goes through `Context::request_exit` or a window close
/// request.
pub struct CoreEngine {
    title: String,
    width: u32,
    height: u32,
    background: Color,
    log_fps: bool,
    log_adapter_info: bool,
}

impl CoreEngine {
    /// Configure an engine with the given window title and size
    pub fn new(title: &str, width: u32, height: u32) -> Self {
        Self {
            title: title.to_string(),
            width,
            height,
            background: Color::BLACK,
            log_fps: true,
            log_adapter_info: false,
        }
    }

    /// Set the initial background clear color
    pub fn background_color(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Enable or disable the once-per-second FPS log line
    pub fn log_fps(mut self, enabled: bool) -> Self {
        self.log_fps = enabled;
        self
    }

    /// Enable or disable logging of GPU adapter and driver details
    pub fn log_adapter_info(mut self, enabled: bool) -> Self {
        self.log_adapter_info = enabled;
        self
    }

    /// Create the window and managers, initialize the application, and run
    /// the loop until exit
    pub fn run(self, mut app: impl Application + 'static) -> Result<()> {
        let event_loop = EventLoop::new().map_err(EngineError::from)?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(&self.title)
                .with_inner_size(LogicalSize::new(self.width, self.height))
                .with_resizable(true)
                .build(&event_loop)
                .map_err(EngineError::from)?,
        );
        info!("Window created: {} ({}x{})", self.title, self.width, self.height);

        let mut display = Display::new(window.clone());
        display.set_background_color(self.background);

        let mut settings = RenderSettings::new();
        let mut renderer =
            pollster::block_on(Renderer::new(window.clone(), &settings, self.log_adapter_info))?;

        let mut camera = Camera::new(Vec3::new(0.0, 1.5, 0.0), renderer.aspect());
        let mut keys = KeyManager::new();
        let mut mouse = MouseManager::new();
        let mut physics = PhysicsManager::new();
        let mut objects = ObjectManager::new();

        let mut game_loop = GameLoop::new();
        game_loop.set_log_fps(self.log_fps);

        let mut exit_requested = false;

        {
            let mut ctx = Context {
                display: &mut display,
                camera: &mut camera,
                keys: &keys,
                mouse: &mouse,
                physics: &mut physics,
                objects: &mut objects,
                render_settings: &mut settings,
                exit: &mut exit_requested,
            };
            app.init(&mut ctx);
        }
        info!("Application initialized, entering main loop");

        event_loop
            .run(move |event, elwt| match event {
                Event::WindowEvent { event, window_id } if window_id == window.id() => {
                    match event {
                        WindowEvent::CloseRequested => {
                            info!("Close requested, shutting down...");
                            elwt.exit();
                        }
                        WindowEvent::Resized(new_size) => {
                            renderer.resize(new_size);
                            camera.set_aspect(renderer.aspect());
                        }
                        WindowEvent::KeyboardInput { event, .. } => {
                            keys.process_event(&event);
                        }
                        WindowEvent::MouseInput { state, button, .. } => {
                            mouse.process_button(button, state);
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            mouse.process_cursor_moved(position);
                        }
                        WindowEvent::MouseWheel { delta, .. } => {
                            mouse.process_scroll(delta);
                        }
                        WindowEvent::Focused(false) => {
                            // Keys released while unfocused never send events
                            keys.reset();
                            mouse.reset();
                        }
                        WindowEvent::RedrawRequested => {
                            let updates = game_loop.begin_frame();
                            let dt = game_loop.fixed_timestep();

                            for _ in 0..updates {
                                camera.tick(mouse.take_motion());

                                {
                                    let mut ctx = Context {
                                        display: &mut display,
                                        camera: &mut camera,
                                        keys: &keys,
                                        mouse: &mouse,
                                        physics: &mut physics,
                                        objects: &mut objects,
                                        render_settings: &mut settings,
                                        exit: &mut exit_requested,
                                    };
                                    if !app.is_paused() {
                                        app.tick(&mut ctx, dt);
                                    }
                                }

                                physics.step(dt);
                                objects.sync_from_physics(&physics);

                                keys.end_frame();
                                mouse.end_frame();
                            }

                            {
                                let mut ctx = Context {
                                    display: &mut display,
                                    camera: &mut camera,
                                    keys: &keys,
                                    mouse: &mouse,
                                    physics: &mut physics,
                                    objects: &mut objects,
                                    render_settings: &mut settings,
                                    exit: &mut exit_requested,
                                };
                                app.render(&mut ctx);
                            }

                            renderer.apply_settings(&mut settings);
                            match renderer.render(&camera, &objects, display.background_color()) {
                                Ok(()) => {}
                                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                    let size = renderer.size();
                                    renderer.resize(size);
                                }
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    error!("GPU out of memory, shutting down");
                                    elwt.exit();
                                }
                                Err(err) => warn!("Frame dropped: {:?}", err),
                            }

                            if exit_requested {
                                info!("Exit requested, shutting down...");
                                elwt.exit();
                            }
                        }
                        _ => {}
                    }
                }
                Event::DeviceEvent {
                    event: DeviceEvent::MouseMotion { delta },
                    ..
                } => {
                    mouse.process_motion(delta);
                }
                Event::AboutToWait => {
                    window.request_redraw();
                }
                _ => {}
            })
            .map_err(EngineError::from)?;

        Ok(())
    }
}
