use std::rc::Rc;

use crate::clock::Clock;
use crate::config::Config;
use crate::overlay::{self, OverlayHandle, ViewHost};
use crate::spinner::{ActivityIndicator, SPINNER_STYLES};
use crate::ui::UiAction;

struct ActiveOverlay {
    handle: OverlayHandle,
    shown_at: f64,
}

/// Everything the demo window shows: one spinner per style preset and a
/// host that can be covered by the loading overlay.
pub struct DemoState {
    pub config: Config,
    pub host: ViewHost,
    pub previews: Vec<ActivityIndicator>,
    overlay: Option<ActiveOverlay>,
    clock: Rc<dyn Clock>,
}

impl DemoState {
    pub fn new(config: Config, clock: Rc<dyn Clock>) -> Self {
        let previews = SPINNER_STYLES
            .iter()
            .map(|(style, _)| {
                let mut spinner = ActivityIndicator::new(*style).with_clock(clock.clone());
                spinner.set_color(config.activity_color);
                spinner.set_hides_when_stopped(config.hides_when_stopped);
                spinner
            })
            .collect();

        Self {
            config,
            host: ViewHost::with_clock(egui::Rect::ZERO, clock.clone()),
            previews,
            overlay: None,
            clock,
        }
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay.is_some()
    }

    /// Seconds until the overlay is taken down, if it is up.
    pub fn overlay_remaining(&self) -> Option<f64> {
        self.overlay.as_ref().map(|o| {
            (o.shown_at + self.config.demo_overlay_secs - self.clock.now()).max(0.0)
        })
    }

    /// Apply a UI action. Returns true when the demo should exit.
    pub fn apply(&mut self, action: UiAction) -> bool {
        match action {
            UiAction::ShowOverlay => {
                if self.overlay.is_none() {
                    let handle =
                        overlay::start_animating(&mut self.host, self.config.overlay_options());
                    self.overlay = Some(ActiveOverlay {
                        handle,
                        shown_at: self.clock.now(),
                    });
                }
            }
            UiAction::HideOverlay => self.hide_overlay(),
            UiAction::StartPreview(i) => {
                if let Some(spinner) = self.previews.get_mut(i) {
                    spinner.start_animating();
                }
            }
            UiAction::StopPreview(i) => {
                if let Some(spinner) = self.previews.get_mut(i) {
                    spinner.stop_animating();
                }
            }
            UiAction::SetPreviewColor(i, color) => {
                if let Some(spinner) = self.previews.get_mut(i) {
                    spinner.set_color(color);
                }
            }
            UiAction::SetHidesWhenStopped(hides) => {
                self.config.hides_when_stopped = hides;
                for spinner in &mut self.previews {
                    spinner.set_hides_when_stopped(hides);
                }
            }
            UiAction::SaveConfig => self.config.save(),
            UiAction::Quit => return true,
            UiAction::None => {}
        }
        false
    }

    fn hide_overlay(&mut self) {
        if let Some(active) = self.overlay.take() {
            if !overlay::remove_overlay(&mut self.host, active.handle) {
                log::warn!("Overlay was already gone when hiding it");
            }
        }
    }

    /// Take the overlay down once its display time has elapsed.
    pub fn update(&mut self) {
        if self.overlay_remaining() == Some(0.0) {
            log::info!("Loading finished after {:.1}s", self.config.demo_overlay_secs);
            self.hide_overlay();
        }
    }
}
