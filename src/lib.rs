//! Loading-indicator overlay for egui screens: an animated circular spinner
//! and a translucent panel that blocks input while work is in progress.

pub mod clock;
pub mod config;
pub mod demo;
pub mod egui_integration;
pub mod overlay;
pub mod spinner;
pub mod timeline;
pub mod ui;

pub use overlay::{
    remove_overlay, start_animating, stop_animating, OverlayHandle, OverlayOptions, ViewHost,
};
pub use spinner::{ActivityIndicator, SpinnerEvent, SpinnerStyle};
