//! Native [`Backend`] built on winit and wgpu.
//!
//! winit normally owns the main loop through `run_app`. The frame loop here is
//! a classic poll/draw/sleep loop instead, so the event loop is driven with
//! [`EventLoopExtPumpEvents::pump_app_events`]: each call processes whatever is
//! pending and hands control straight back.

use crate::config::Config;
use crate::error::{InitError, InitResult};
use crate::renderer::backend::{Backend, InputEvent};
use crate::renderer::wgpu_lib::WgpuContext;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

/// Pump rounds to wait for the platform to hand out a window.
const WINDOW_OPEN_ATTEMPTS: u32 = 100;
/// Wait per pump round while opening the window.
const WINDOW_OPEN_TIMEOUT: Duration = Duration::from_millis(10);

/// Windowing and graphics backend for desktop platforms.
pub struct WinitBackend {
    event_loop: Option<EventLoop<()>>,
    instance: Option<wgpu::Instance>,
    started: Instant,
    interrupted: Arc<AtomicBool>,
}

impl Default for WinitBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl WinitBackend {
    /// Creates a backend. Nothing is started until [`Backend::init`].
    pub fn new() -> Self {
        Self {
            event_loop: None,
            instance: None,
            started: Instant::now(),
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    fn event_loop(&mut self) -> InitResult<&mut EventLoop<()>> {
        self.event_loop
            .as_mut()
            .ok_or_else(|| InitError::GraphicsSubsystem("event loop not started".to_string()))
    }

    fn install_interrupt_handler(&self) {
        let interrupted = self.interrupted.clone();
        if let Err(err) = ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst)) {
            warn!(%err, "Interrupt handler not installed, Ctrl-C will not quit cleanly");
        }
    }
}

impl Backend for WinitBackend {
    type Display = Arc<Window>;
    type Context = WgpuContext;

    fn init(&mut self) -> InitResult<()> {
        if self.event_loop.is_some() {
            return Ok(());
        }

        let event_loop =
            EventLoop::new().map_err(|err| InitError::GraphicsSubsystem(err.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        self.event_loop = Some(event_loop);
        self.instance = Some(wgpu::Instance::new(&wgpu::InstanceDescriptor::default()));
        self.started = Instant::now();
        self.install_interrupt_handler();

        debug!("Event loop and graphics instance started");
        Ok(())
    }

    fn create_display(&mut self, config: &Config) -> InitResult<Arc<Window>> {
        let attributes = Window::default_attributes()
            .with_title(config.title.as_str())
            .with_inner_size(PhysicalSize::new(config.screen_width, config.screen_height))
            .with_resizable(false);

        let mut opener = WindowOpener {
            attributes: Some(attributes),
            window: None,
        };
        let event_loop = self.event_loop()?;

        for _ in 0..WINDOW_OPEN_ATTEMPTS {
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(WINDOW_OPEN_TIMEOUT), &mut opener)
            {
                return Err(InitError::SurfaceOrContext(format!(
                    "event loop exited with code {code} before the window opened"
                )));
            }
            if let Some(window) = opener.window.take() {
                let window = Arc::new(window?);
                info!(
                    title = %config.title,
                    width = config.screen_width,
                    height = config.screen_height,
                    "Window created"
                );
                return Ok(window);
            }
        }

        Err(InitError::SurfaceOrContext(
            "platform never resumed the application, no window created".to_string(),
        ))
    }

    fn create_context(&mut self, display: &Arc<Window>, config: &Config) -> InitResult<WgpuContext> {
        let instance = self
            .instance
            .as_ref()
            .ok_or_else(|| InitError::GraphicsSubsystem("graphics instance not started".to_string()))?;
        WgpuContext::new(instance, display.clone(), config)
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut collector = EventCollector::default();

        if self.interrupted.swap(false, Ordering::SeqCst) {
            info!("Interrupt received");
            collector.events.push(InputEvent::Quit);
        }

        if let Some(event_loop) = self.event_loop.as_mut() {
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(Duration::ZERO), &mut collector)
            {
                debug!(code, "Event loop exited");
                collector.events.push(InputEvent::Quit);
            }
        }

        collector.events
    }

    fn ticks(&self) -> u32 {
        // Truncation wraps the counter roughly every 49 days.
        self.started.elapsed().as_millis() as u32
    }

    fn delay(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }

    fn shutdown(&mut self) {
        self.instance = None;
        self.event_loop = None;
        debug!("Event loop and graphics instance stopped");
    }
}

/// Creates the window as soon as the platform allows it.
struct WindowOpener {
    attributes: Option<WindowAttributes>,
    window: Option<InitResult<Window>>,
}

impl ApplicationHandler for WindowOpener {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(attributes) = self.attributes.take() {
            self.window = Some(
                event_loop
                    .create_window(attributes)
                    .map_err(|err| InitError::SurfaceOrContext(err.to_string())),
            );
        }
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}
}

/// Translates window events into [`InputEvent`]s.
#[derive(Default)]
struct EventCollector {
    events: Vec<InputEvent>,
}

impl ApplicationHandler for EventCollector {
    fn resumed(&mut self, _: &ActiveEventLoop) {}

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        self.events.push(match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => InputEvent::Quit,
            _ => InputEvent::Other,
        });
    }
}
