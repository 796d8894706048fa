use crate::config::Config;
use crate::spinner::SPINNER_STYLES;
use crate::ui::UiAction;

pub fn show_settings_window(
    ctx: &egui::Context,
    show: &mut bool,
    config: &mut Config,
) -> Vec<UiAction> {
    let mut actions = Vec::new();

    egui::Window::new("Settings")
        .open(show)
        .resizable(false)
        .default_width(300.0)
        .show(ctx, |ui| {
            ui.heading("Overlay");
            ui.separator();

            let mut changed = false;

            ui.horizontal(|ui| {
                ui.label("Spinner colour:");
                changed |= ui
                    .color_edit_button_srgba(&mut config.activity_color)
                    .changed();
            });

            ui.horizontal(|ui| {
                ui.label("Background colour:");
                changed |= ui
                    .color_edit_button_srgba(&mut config.background_color)
                    .changed();
            });

            ui.horizontal(|ui| {
                ui.label("Background opacity:");
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut config.background_alpha)
                            .range(0.0..=1.0)
                            .speed(0.01),
                    )
                    .changed();
            });

            ui.horizontal(|ui| {
                ui.label("Spinner style:");
                egui::ComboBox::from_id_salt("overlay_style")
                    .selected_text(config.overlay_style.to_string())
                    .show_ui(ui, |ui| {
                        for (style, description) in SPINNER_STYLES {
                            changed |= ui
                                .selectable_value(&mut config.overlay_style, *style, style.to_string())
                                .on_hover_text(*description)
                                .changed();
                        }
                    });
            });

            ui.horizontal(|ui| {
                ui.label("Display time:");
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut config.demo_overlay_secs)
                            .range(0.5..=30.0)
                            .speed(0.1)
                            .suffix(" s"),
                    )
                    .changed();
            });

            ui.add_space(8.0);
            if ui.button("Reset to Defaults").clicked() {
                *config = Config::default();
                changed = true;
            }

            if changed {
                actions.push(UiAction::SaveConfig);
            }
        });

    actions
}
