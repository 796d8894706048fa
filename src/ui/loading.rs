use std::f32::consts::{FRAC_PI_2, TAU};

use crate::overlay::{ChildView, ViewHost};
use crate::spinner::{ActivityIndicator, SpinnerFrame, STOP_SCALE};

/// Polyline segments used for a full circle.
const CIRCLE_SEGMENTS: f32 = 64.0;

/// Points along the visible part of the spinner's stroke, in screen space.
///
/// The path starts at twelve o'clock and runs clockwise; rotation and the
/// content scale are applied about the frame centre.
pub fn arc_points(frame: &SpinnerFrame) -> Vec<egui::Pos2> {
    let start = frame.stroke_start.clamp(0.0, 1.0);
    let end = frame.stroke_end.clamp(0.0, 1.0);
    if end <= start {
        return Vec::new();
    }

    let center = frame.rect.center();
    let radius = frame.radius * frame.scale;
    let origin = frame.rotation - FRAC_PI_2;
    let segments = ((end - start) * CIRCLE_SEGMENTS).ceil().max(2.0) as usize;

    (0..=segments)
        .map(|i| {
            let fraction = start + (end - start) * i as f32 / segments as f32;
            let angle = origin + TAU * fraction;
            center + radius * egui::vec2(angle.cos(), angle.sin())
        })
        .collect()
}

/// Paint one spinner frame with round caps.
pub fn paint_spinner(painter: &egui::Painter, frame: &SpinnerFrame) {
    if !frame.is_visible() {
        return;
    }

    let points = arc_points(frame);
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return;
    };

    let width = frame.line_width * frame.scale;
    let color = frame.color.gamma_multiply(frame.alpha);
    painter.add(egui::Shape::line(points, egui::Stroke::new(width, color)));
    painter.circle_filled(first, width / 2.0, color);
    painter.circle_filled(last, width / 2.0, color);
}

/// Space a spinner can paint into, including the stroke and the growth of
/// the stop transition.
pub fn spinner_footprint(spinner: &ActivityIndicator) -> egui::Vec2 {
    (spinner.frame().size() + egui::Vec2::splat(spinner.line_width())) * STOP_SCALE
}

/// Lay out, advance and paint a standalone spinner inside a `Ui`.
pub fn spinner_widget(ui: &mut egui::Ui, spinner: &mut ActivityIndicator) -> egui::Response {
    let size = spinner_footprint(spinner);
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::hover());
    spinner.set_center(rect.center());
    spinner.tick();

    if ui.is_rect_visible(rect) {
        paint_spinner(ui.painter(), &spinner.sample());
    }
    if spinner.is_animating() {
        ui.ctx().request_repaint();
    }
    response
}

/// Draw the host's overlay children on top of everything else and swallow
/// pointer input underneath them.
pub fn show_loading_overlay(ctx: &egui::Context, host: &mut ViewHost) {
    host.set_bounds(ctx.screen_rect());
    for (id, event) in host.tick() {
        log::debug!("Overlay child #{} reported {:?}", id, event);
    }

    if host.children().is_empty() {
        return;
    }

    egui::Area::new(egui::Id::from("loading_overlay"))
        .order(egui::Order::Foreground)
        .fixed_pos(egui::pos2(0.0, 0.0))
        .interactable(host.has_overlay())
        .show(ctx, |ui| {
            if host.has_overlay() {
                ui.allocate_rect(host.bounds(), egui::Sense::click_and_drag());
            }

            let painter = ui.painter();
            for child in host.children() {
                match &child.view {
                    ChildView::Panel(panel) => {
                        painter.rect_filled(panel.frame, 0.0, panel.fill());
                    }
                    ChildView::Spinner(spinner) => paint_spinner(painter, &spinner.sample()),
                }
            }
        });

    if host.is_animating() {
        ctx.request_repaint();
    }
}
