use anyhow::{Context as _, Result};
use std::num::NonZeroU32;
use std::rc::Rc;

use activity_loader::clock::SystemClock;
use activity_loader::config::Config;
use activity_loader::demo::DemoState;
use activity_loader::egui_integration::EguiIntegration;
use activity_loader::ui::{self, UiState};
use glutin::{
    config::{ConfigTemplateBuilder, GlConfig},
    context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext},
    display::{GetGlDisplay, GlDisplay},
    prelude::{GlSurface, NotCurrentGlContext},
    surface::{Surface as GlutinSurface, SurfaceAttributesBuilder, SwapInterval, WindowSurface},
};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

/// Drop order matters: egui's painter releases GL objects while the context is alive.
struct App {
    egui: EguiIntegration,
    gl_surface: GlutinSurface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
    ui_state: UiState,
    demo: DemoState,
}

impl App {
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return;
        }

        let mut actions = Vec::new();
        self.egui.run(&self.window, |ctx| {
            actions = ui::build_ui(ctx, &mut self.ui_state, &mut self.demo);
        });

        for action in actions {
            if self.demo.apply(action) {
                event_loop.exit();
                return;
            }
        }
        self.demo.update();

        self.egui.clear(&self.window);
        self.egui.paint(&self.window);
        if let Err(e) = self.gl_surface.swap_buffers(&self.gl_context) {
            log::error!("Failed to swap buffers: {}", e);
        }

        if self.egui.needs_repaint() || self.demo.overlay_visible() {
            self.window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let response = self.egui.handle_event(&self.window, &event);
        if response.repaint {
            self.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(physical_size) => {
                let (width, height): (u32, u32) = physical_size.into();
                if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
                    self.gl_surface.resize(&self.gl_context, w, h);
                }
                self.window.request_redraw();
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::load();
    let el = EventLoop::new()?;

    let window_attributes = Window::default_attributes()
        .with_inner_size(LogicalSize::new(480.0, 420.0))
        .with_resizable(true)
        .with_title("activity-loader");

    let template = ConfigTemplateBuilder::new().with_alpha_size(8);

    let display_builder = DisplayBuilder::new().with_window_attributes(Some(window_attributes));
    let (window, gl_config) = display_builder
        .build(&el, template, |configs| {
            configs
                .reduce(|accum, config| {
                    if config.num_samples() > accum.num_samples() {
                        config
                    } else {
                        accum
                    }
                })
                .expect("no GL config matches the template")
        })
        .map_err(|e| anyhow::anyhow!("Failed to build GL display: {}", e))?;
    let window = window.context("Could not create window with OpenGL context")?;
    let raw_window_handle = window.window_handle()?.as_raw();

    let context_attributes = ContextAttributesBuilder::new().build(Some(raw_window_handle));
    let fallback_context_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::Gles(None))
        .build(Some(raw_window_handle));

    let display = gl_config.display();
    let not_current_gl_context = unsafe {
        display
            .create_context(&gl_config, &context_attributes)
            .or_else(|_| display.create_context(&gl_config, &fallback_context_attributes))
            .context("Failed to create GL context")?
    };

    let (width, height): (u32, u32) = window.inner_size().into();
    let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
        raw_window_handle,
        NonZeroU32::new(width.max(1)).context("zero window width")?,
        NonZeroU32::new(height.max(1)).context("zero window height")?,
    );
    let gl_surface = unsafe {
        display
            .create_window_surface(&gl_config, &attrs)
            .context("Could not create GL window surface")?
    };
    let gl_context = not_current_gl_context
        .make_current(&gl_surface)
        .context("Could not make GL context current")?;

    if let Err(e) = gl_surface.set_swap_interval(
        &gl_context,
        SwapInterval::Wait(NonZeroU32::MIN),
    ) {
        log::warn!("Failed to enable vsync: {}", e);
    }

    let egui = EguiIntegration::new(&window, &display)?;
    let demo = DemoState::new(config, Rc::new(SystemClock::new()));
    log::info!("Demo window ready");

    let mut app = App {
        egui,
        gl_surface,
        gl_context,
        window,
        ui_state: UiState::default(),
        demo,
    };

    el.run_app(&mut app)?;

    Ok(())
}
