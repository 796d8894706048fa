use anyhow::Result;
use egui_winit::EventResponse;
use glow::HasContext;
use glutin::display::{Display, GlDisplay};
use std::sync::Arc;
use std::time::Duration;

/// egui state for one window: UI context, winit input translation and the
/// glow painter that draws tessellated output into the current framebuffer.
pub struct EguiIntegration {
    pub ctx: egui::Context,
    winit_state: egui_winit::State,
    painter: egui_glow::Painter,
    shapes: Vec<egui::epaint::ClippedShape>,
    textures_delta: egui::TexturesDelta,
    pixels_per_point: f32,
    repaint_delay: Duration,
}

impl EguiIntegration {
    /// The GL context belonging to `display` must be current.
    pub fn new(window: &winit::window::Window, display: &Display) -> Result<Self> {
        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|s| display.get_proc_address(s).cast())
        };

        let painter = egui_glow::Painter::new(Arc::new(gl), "", None, false)?;

        let ctx = egui::Context::default();
        let winit_state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        Ok(Self {
            ctx,
            winit_state,
            painter,
            shapes: Default::default(),
            textures_delta: Default::default(),
            pixels_per_point: window.scale_factor() as f32,
            repaint_delay: Duration::MAX,
        })
    }

    pub fn handle_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> EventResponse {
        self.winit_state.on_window_event(window, event)
    }

    /// Run one UI pass. Output is kept until `paint`.
    pub fn run(&mut self, window: &winit::window::Window, build_ui: impl FnMut(&egui::Context)) {
        let raw_input = self.winit_state.take_egui_input(window);
        let output = self.ctx.run(raw_input, build_ui);

        self.winit_state
            .handle_platform_output(window, output.platform_output);
        self.pixels_per_point = output.pixels_per_point;
        self.shapes = output.shapes;
        self.textures_delta.append(output.textures_delta);
        self.repaint_delay = output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .map(|v| v.repaint_delay)
            .unwrap_or(Duration::MAX);
    }

    /// True when the last pass asked to be repainted straight away,
    /// e.g. because a spinner is animating.
    pub fn needs_repaint(&self) -> bool {
        self.repaint_delay.is_zero()
    }

    /// Clear the framebuffer to the panel fill of the current theme.
    pub fn clear(&self, window: &winit::window::Window) {
        let size = window.inner_size();
        let [r, g, b, a] = self.ctx.style().visuals.panel_fill.to_normalized_gamma_f32();
        let gl = self.painter.gl();
        unsafe {
            gl.viewport(0, 0, size.width as i32, size.height as i32);
            gl.clear_color(r, g, b, a);
            gl.clear(glow::COLOR_BUFFER_BIT);
        }
    }

    /// Tessellate and draw the output of the last `run`.
    pub fn paint(&mut self, window: &winit::window::Window) {
        let shapes = std::mem::take(&mut self.shapes);
        let textures_delta = std::mem::take(&mut self.textures_delta);
        let meshes = self.ctx.tessellate(shapes, self.pixels_per_point);

        let size = window.inner_size();
        self.painter.paint_and_update_textures(
            [size.width, size.height],
            self.pixels_per_point,
            &meshes,
            &textures_delta,
        );
    }
}

impl Drop for EguiIntegration {
    fn drop(&mut self) {
        self.painter.destroy();
    }
}
