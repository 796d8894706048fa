use crate::demo::DemoState;

pub fn show_status_bar(ctx: &egui::Context, demo: &DemoState) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let running = demo.previews.iter().filter(|s| s.is_animating()).count();
            ui.label(format!("Spinners running: {}/{}", running, demo.previews.len()));

            if let Some(remaining) = demo.overlay_remaining() {
                ui.separator();
                ui.colored_label(
                    egui::Color32::from_rgb(66, 133, 244),
                    format!("Loading... {:.1}s", remaining),
                );
            }
        });
    });
}
