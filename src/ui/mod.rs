pub mod loading;
pub mod settings;
pub mod status_bar;

use crate::demo::DemoState;
use crate::spinner::SPINNER_STYLES;

#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    ShowOverlay,
    HideOverlay,
    StartPreview(usize),
    StopPreview(usize),
    SetPreviewColor(usize, egui::Color32),
    SetHidesWhenStopped(bool),
    SaveConfig,
    Quit,
    None,
}

#[derive(Default)]
pub struct UiState {
    pub show_settings: bool,
}

/// Build the entire egui UI. Returns a list of actions to process.
pub fn build_ui(ctx: &egui::Context, ui_state: &mut UiState, demo: &mut DemoState) -> Vec<UiAction> {
    let mut actions = Vec::new();

    if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::Q)) {
        actions.push(UiAction::Quit);
    }

    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Settings...").clicked() {
                    ui_state.show_settings = true;
                    ui.close_menu();
                }
                ui.separator();
                if ui
                    .add(egui::Button::new("Quit").shortcut_text("Ctrl+Q"))
                    .clicked()
                {
                    actions.push(UiAction::Quit);
                    ui.close_menu();
                }
            });
        });
    });

    // Status bar
    status_bar::show_status_bar(ctx, demo);

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Spinner styles");
        ui.separator();

        for (i, (style, description)) in SPINNER_STYLES.iter().enumerate() {
            let Some(spinner) = demo.previews.get_mut(i) else {
                continue;
            };
            ui.horizontal(|ui| {
                loading::spinner_widget(ui, spinner);
                ui.vertical(|ui| {
                    ui.strong(style.to_string());
                    ui.weak(*description);
                });
                if spinner.is_animating() {
                    if ui.button("Stop").clicked() {
                        actions.push(UiAction::StopPreview(i));
                    }
                } else if ui.button("Start").clicked() {
                    actions.push(UiAction::StartPreview(i));
                }
                let mut color = spinner.color();
                if ui.color_edit_button_srgba(&mut color).changed() {
                    actions.push(UiAction::SetPreviewColor(i, color));
                }
            });
            ui.add_space(8.0);
        }

        let mut hides = demo.config.hides_when_stopped;
        if ui.checkbox(&mut hides, "Hide stroke when stopped").changed() {
            actions.push(UiAction::SetHidesWhenStopped(hides));
        }

        ui.add_space(16.0);
        ui.heading("Loading overlay");
        ui.separator();
        ui.label(format!(
            "Covers the window for {:.1}s and blocks input underneath.",
            demo.config.demo_overlay_secs
        ));
        if ui
            .add_enabled(!demo.overlay_visible(), egui::Button::new("Show overlay"))
            .clicked()
        {
            actions.push(UiAction::ShowOverlay);
        }
    });

    // Settings window
    actions.extend(settings::show_settings_window(
        ctx,
        &mut ui_state.show_settings,
        &mut demo.config,
    ));

    // Loading overlay
    loading::show_loading_overlay(ctx, &mut demo.host);

    actions
}
