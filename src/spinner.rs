use std::fmt;
use std::rc::Rc;

use egui::{Color32, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::timeline::{
    Animation, AnimationGroup, BasicAnimation, KeyPath, KeyframeAnimation, Repeat,
};

/// Length of the fade-and-scale transition run by `stop_animating`.
pub const STOP_FADE_SECS: f64 = 0.1;
/// Content scale reached at the end of the stop transition.
pub const STOP_SCALE: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpinnerStyle {
    Small,
    #[default]
    Default,
    Large,
}

impl fmt::Display for SpinnerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpinnerStyle::Small => write!(f, "Small"),
            SpinnerStyle::Default => write!(f, "Default"),
            SpinnerStyle::Large => write!(f, "Large"),
        }
    }
}

/// Canonical list of all spinner styles with descriptions for UI display.
pub const SPINNER_STYLES: &[(SpinnerStyle, &str)] = &[
    (SpinnerStyle::Small, "20 pt, thin stroke"),
    (SpinnerStyle::Default, "30 pt, medium stroke"),
    (SpinnerStyle::Large, "60 pt, heavy stroke, slower cycle"),
];

/// Size, stroke width and cycle duration of a style preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleMetrics {
    pub size: Vec2,
    pub line_width: f32,
    pub duration: f64,
}

impl SpinnerStyle {
    pub fn metrics(&self) -> StyleMetrics {
        match self {
            SpinnerStyle::Small => StyleMetrics {
                size: Vec2::splat(20.0),
                line_width: 2.0,
                duration: 0.8,
            },
            SpinnerStyle::Default => StyleMetrics {
                size: Vec2::splat(30.0),
                line_width: 4.0,
                duration: 0.8,
            },
            SpinnerStyle::Large => StyleMetrics {
                size: Vec2::splat(60.0),
                line_width: 8.0,
                duration: 1.0,
            },
        }
    }
}

/// Cycle length of the rotation animation for a given spinner duration.
pub fn rotation_cycle(duration: f64) -> f64 {
    duration * 1.5
}

/// Delay before the stroke start begins chasing the stroke end.
pub fn stroke_start_delay(duration: f64) -> f64 {
    duration / 1.5
}

/// Cycle length of the stroke start/end group for a given spinner duration.
pub fn stroke_cycle(duration: f64) -> f64 {
    duration + stroke_start_delay(duration)
}

/// Emitted by `ActivityIndicator::tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerEvent {
    /// The stop transition finished and the spinner is idle.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SpinnerState {
    Idle,
    Animating,
    Stopping { began: f64, from_scale: f32, from_alpha: f32 },
}

/// Circular stroke path plus the animations running on it.
struct StrokeShape {
    radius: f32,
    line_width: f32,
    stroke_color: Color32,
    hidden: bool,
    animations: Vec<Animation>,
    animations_added_at: f64,
}

impl StrokeShape {
    fn presentation(&self, key_path: KeyPath, model: f64, now: f64) -> f64 {
        let t = now - self.animations_added_at;
        self.animations
            .iter()
            .find_map(|a| a.value_at(key_path, t))
            .unwrap_or(model)
    }
}

/// Wrapper the stroke shape lives in; the stop transition scales and fades it.
struct ContentView {
    scale: f32,
    alpha: f32,
}

/// Presentation values of a spinner at one instant, ready to paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinnerFrame {
    pub rect: Rect,
    pub radius: f32,
    pub line_width: f32,
    pub color: Color32,
    /// Radians, measured clockwise from twelve o'clock.
    pub rotation: f32,
    pub stroke_start: f32,
    pub stroke_end: f32,
    pub scale: f32,
    pub alpha: f32,
    pub hidden: bool,
}

impl SpinnerFrame {
    pub fn is_visible(&self) -> bool {
        !self.hidden && self.alpha > 0.0 && self.stroke_end > self.stroke_start
    }
}

/// Rotating circular-arc activity indicator.
pub struct ActivityIndicator {
    style: SpinnerStyle,
    frame: Rect,
    duration: f64,
    color: Color32,
    hides_when_stopped: bool,
    state: SpinnerState,
    shape: StrokeShape,
    content: ContentView,
    clock: Rc<dyn Clock>,
}

impl ActivityIndicator {
    /// Spinner sized and timed by a style preset, placed at the origin.
    pub fn new(style: SpinnerStyle) -> Self {
        let metrics = style.metrics();
        let frame = Rect::from_min_size(egui::Pos2::ZERO, metrics.size);
        let mut spinner = Self::with_frame(frame, metrics.line_width, metrics.duration);
        spinner.style = style;
        spinner
    }

    /// Spinner with an explicit frame, stroke width and cycle duration.
    pub fn with_frame(frame: Rect, line_width: f32, duration: f64) -> Self {
        let color = Color32::LIGHT_GRAY;
        Self {
            style: SpinnerStyle::Default,
            frame,
            duration,
            color,
            hides_when_stopped: true,
            state: SpinnerState::Idle,
            shape: StrokeShape {
                radius: frame.width() / 2.0,
                line_width,
                stroke_color: color,
                hidden: true,
                animations: Vec::new(),
                animations_added_at: 0.0,
            },
            content: ContentView {
                scale: 1.0,
                alpha: 1.0,
            },
            clock: Rc::new(SystemClock::new()),
        }
    }

    /// Replace the time source. Hosts share one clock across their spinners.
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn style(&self) -> SpinnerStyle {
        self.style
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn set_center(&mut self, center: egui::Pos2) {
        self.frame = Rect::from_center_size(center, self.frame.size());
    }

    pub fn line_width(&self) -> f32 {
        self.shape.line_width
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Takes effect the next time animation starts.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn set_color(&mut self, color: Color32) {
        self.color = color;
        self.shape.stroke_color = color;
    }

    /// Color the stroke is currently rendered with.
    pub fn stroke_color(&self) -> Color32 {
        self.shape.stroke_color
    }

    pub fn hides_when_stopped(&self) -> bool {
        self.hides_when_stopped
    }

    pub fn set_hides_when_stopped(&mut self, hides: bool) {
        self.hides_when_stopped = hides;
    }

    /// True from `start_animating` until the stop transition has run its
    /// course, whether or not `tick` has observed the completion yet.
    pub fn is_animating(&self) -> bool {
        match self.state {
            SpinnerState::Idle => false,
            SpinnerState::Animating => true,
            SpinnerState::Stopping { .. } => !self.fade_finished(),
        }
    }

    pub fn is_stopping(&self) -> bool {
        matches!(self.state, SpinnerState::Stopping { .. }) && !self.fade_finished()
    }

    fn fade_finished(&self) -> bool {
        match self.state {
            SpinnerState::Stopping { began, .. } => self.clock.now() - began >= STOP_FADE_SECS,
            _ => false,
        }
    }

    /// Apply the stop completion if the fade has elapsed.
    fn settle(&mut self) -> Option<SpinnerEvent> {
        if !self.fade_finished() {
            return None;
        }

        self.state = SpinnerState::Idle;
        self.content.scale = 1.0;
        self.content.alpha = 0.0;
        self.shape.hidden = self.hides_when_stopped;
        self.shape.animations.clear();
        log::debug!("Spinner stopped");
        Some(SpinnerEvent::Stopped)
    }

    pub fn is_shape_hidden(&self) -> bool {
        self.shape.hidden
    }

    /// Number of animations registered on the stroke shape.
    pub fn animation_count(&self) -> usize {
        self.shape.animations.len()
    }

    pub fn start_animating(&mut self) {
        self.settle();
        if self.is_animating() {
            return;
        }

        let now = self.clock.now();
        self.state = SpinnerState::Animating;
        self.content.scale = 1.0;
        self.content.alpha = 1.0;

        let delay = stroke_start_delay(self.duration);
        let stroke_end = KeyframeAnimation::new(KeyPath::StrokeEnd, vec![0.0, 1.0], self.duration);
        let stroke_start =
            KeyframeAnimation::new(KeyPath::StrokeStart, vec![0.0, 0.8, 1.0], self.duration)
                .with_begin_time(delay);
        let group = AnimationGroup {
            animations: vec![stroke_end, stroke_start],
            duration: stroke_cycle(self.duration),
            repeat: Repeat::Forever,
        };
        let rotation = BasicAnimation::rotation(rotation_cycle(self.duration));

        self.shape.animations = vec![Animation::Basic(rotation), Animation::Group(group)];
        self.shape.animations_added_at = now;
        self.shape.hidden = false;

        log::debug!(
            "Spinner started ({}, duration {:.2}s)",
            self.style,
            self.duration
        );
    }

    /// Fade and scale the content out, then go idle. Runs from any state; a
    /// call during an in-flight stop is ignored.
    pub fn stop_animating(&mut self) {
        self.settle();
        if self.is_stopping() {
            return;
        }
        self.state = SpinnerState::Stopping {
            began: self.clock.now(),
            from_scale: self.content.scale,
            from_alpha: self.content.alpha,
        };
        log::debug!("Spinner stopping");
    }

    /// Advance time-driven transitions. Returns `Stopped` once per completed
    /// stop; a completion already applied by a later `start_animating` or
    /// `stop_animating` is not reported again.
    pub fn tick(&mut self) -> Option<SpinnerEvent> {
        self.settle()
    }

    /// Content scale and alpha, including an in-flight stop transition.
    fn content_presentation(&self, now: f64) -> (f32, f32) {
        match self.state {
            SpinnerState::Stopping {
                began,
                from_scale,
                from_alpha,
            } => {
                let t = ((now - began) / STOP_FADE_SECS).clamp(0.0, 1.0) as f32;
                let eased = ease_in_out(t);
                (
                    from_scale + (STOP_SCALE - from_scale) * eased,
                    from_alpha * (1.0 - eased),
                )
            }
            _ => (self.content.scale, self.content.alpha),
        }
    }

    /// Sample presentation values at the current clock time.
    pub fn sample(&self) -> SpinnerFrame {
        let now = self.clock.now();
        let (scale, alpha) = self.content_presentation(now);
        SpinnerFrame {
            rect: self.frame,
            radius: self.shape.radius,
            line_width: self.shape.line_width,
            color: self.shape.stroke_color,
            rotation: self.shape.presentation(KeyPath::RotationZ, 0.0, now) as f32,
            stroke_start: self.shape.presentation(KeyPath::StrokeStart, 0.0, now) as f32,
            stroke_end: self.shape.presentation(KeyPath::StrokeEnd, 1.0, now) as f32,
            scale,
            alpha,
            hidden: self.shape.hidden,
        }
    }
}

fn ease_in_out(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn spinner_with_clock(style: SpinnerStyle) -> (ActivityIndicator, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new());
        let spinner = ActivityIndicator::new(style).with_clock(clock.clone());
        (spinner, clock)
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_style_presets_match_table() {
        let expected = [
            (SpinnerStyle::Small, 20.0, 2.0, 0.8),
            (SpinnerStyle::Default, 30.0, 4.0, 0.8),
            (SpinnerStyle::Large, 60.0, 8.0, 1.0),
        ];
        for (style, size, width, duration) in expected {
            let spinner = ActivityIndicator::new(style);
            assert_eq!(spinner.frame().size(), Vec2::splat(size), "{style}");
            assert_eq!(spinner.line_width(), width, "{style}");
            assert_eq!(spinner.duration(), duration, "{style}");
            assert_eq!(spinner.style(), style);
        }
    }

    #[test]
    fn test_explicit_frame_constructor() {
        let frame = Rect::from_min_size(egui::pos2(5.0, 5.0), Vec2::splat(44.0));
        let spinner = ActivityIndicator::with_frame(frame, 3.0, 1.2);
        assert_eq!(spinner.frame(), frame);
        assert_eq!(spinner.line_width(), 3.0);
        assert_eq!(spinner.duration(), 1.2);
        assert_eq!(spinner.style(), SpinnerStyle::Default);
        assert_eq!(spinner.sample().radius, 22.0);
    }

    #[test]
    fn test_new_spinner_is_idle_and_hidden() {
        let spinner = ActivityIndicator::new(SpinnerStyle::Default);
        assert!(!spinner.is_animating());
        assert!(spinner.is_shape_hidden());
        assert!(spinner.hides_when_stopped());
        assert_eq!(spinner.color(), Color32::LIGHT_GRAY);
        assert_eq!(spinner.animation_count(), 0);
    }

    #[test]
    fn test_start_reveals_shape() {
        let (mut spinner, clock) = spinner_with_clock(SpinnerStyle::Large);
        spinner.start_animating();
        assert!(spinner.is_animating());
        assert!(!spinner.is_shape_hidden());
        assert_eq!(spinner.animation_count(), 2);

        clock.advance(0.3);
        assert!(spinner.sample().is_visible());
    }

    #[test]
    fn test_double_start_does_not_double_register() {
        let (mut spinner, clock) = spinner_with_clock(SpinnerStyle::Default);
        spinner.start_animating();
        clock.advance(0.3);
        let before = spinner.sample();
        spinner.start_animating();
        assert!(spinner.is_animating());
        assert_eq!(spinner.animation_count(), 2);
        // Still on the original timeline.
        assert_eq!(spinner.sample(), before);
    }

    #[test]
    fn test_stop_completes_after_fade() {
        let (mut spinner, clock) = spinner_with_clock(SpinnerStyle::Default);
        spinner.start_animating();
        clock.advance(1.0);
        spinner.stop_animating();
        assert!(spinner.is_animating());
        assert_eq!(spinner.tick(), None);

        clock.advance(0.05);
        let mid = spinner.sample();
        assert!(mid.scale > 1.0 && mid.scale < STOP_SCALE);
        assert!(mid.alpha > 0.0 && mid.alpha < 1.0);
        assert_eq!(spinner.tick(), None);

        clock.advance(0.06);
        assert_eq!(spinner.tick(), Some(SpinnerEvent::Stopped));
        assert!(!spinner.is_animating());
        assert!(spinner.is_shape_hidden());
        assert_eq!(spinner.animation_count(), 0);
        let done = spinner.sample();
        assert_eq!(done.scale, 1.0);
        assert_eq!(done.alpha, 0.0);
        assert_eq!(spinner.tick(), None);
    }

    #[test]
    fn test_stop_without_start_reaches_idle() {
        let (mut spinner, clock) = spinner_with_clock(SpinnerStyle::Small);
        spinner.stop_animating();
        clock.advance(STOP_FADE_SECS);
        assert_eq!(spinner.tick(), Some(SpinnerEvent::Stopped));
        assert!(!spinner.is_animating());
        assert!(spinner.is_shape_hidden());
    }

    #[test]
    fn test_stop_keeps_shape_when_not_hiding() {
        let (mut spinner, clock) = spinner_with_clock(SpinnerStyle::Small);
        spinner.set_hides_when_stopped(false);
        spinner.start_animating();
        spinner.stop_animating();
        clock.advance(0.2);
        spinner.tick();
        assert!(!spinner.is_shape_hidden());
        assert!(!spinner.is_animating());
    }

    #[test]
    fn test_reentrant_stop_fires_once() {
        let (mut spinner, clock) = spinner_with_clock(SpinnerStyle::Default);
        spinner.start_animating();
        spinner.stop_animating();
        clock.advance(0.08);
        spinner.stop_animating();
        clock.advance(0.03);
        assert_eq!(spinner.tick(), Some(SpinnerEvent::Stopped));
        assert_eq!(spinner.tick(), None);
    }

    #[test]
    fn test_stop_when_idle_reruns_sequence() {
        let (mut spinner, clock) = spinner_with_clock(SpinnerStyle::Default);
        spinner.stop_animating();
        clock.advance(0.2);
        assert_eq!(spinner.tick(), Some(SpinnerEvent::Stopped));
        spinner.stop_animating();
        assert!(spinner.is_stopping());
        clock.advance(0.2);
        assert_eq!(spinner.tick(), Some(SpinnerEvent::Stopped));
    }

    #[test]
    fn test_restart_after_unobserved_stop() {
        let (mut spinner, clock) = spinner_with_clock(SpinnerStyle::Default);
        spinner.start_animating();
        spinner.stop_animating();
        clock.advance(5.0);
        assert!(!spinner.is_animating());
        assert!(!spinner.is_stopping());

        spinner.start_animating();
        assert!(spinner.is_animating());
        assert_eq!(spinner.animation_count(), 2);
        assert_eq!(spinner.tick(), None);
        assert!(spinner.is_animating());
        assert!(!spinner.is_shape_hidden());
        assert_eq!(spinner.sample().alpha, 1.0);
    }

    #[test]
    fn test_stop_after_unobserved_stop_starts_new_fade() {
        let (mut spinner, clock) = spinner_with_clock(SpinnerStyle::Default);
        spinner.start_animating();
        spinner.stop_animating();
        clock.advance(1.0);
        spinner.stop_animating();
        assert!(spinner.is_stopping());
        assert_eq!(spinner.tick(), None);
        clock.advance(STOP_FADE_SECS);
        assert_eq!(spinner.tick(), Some(SpinnerEvent::Stopped));
    }

    #[test]
    fn test_restart_after_stop_is_visible_again() {
        let (mut spinner, clock) = spinner_with_clock(SpinnerStyle::Default);
        spinner.start_animating();
        spinner.stop_animating();
        clock.advance(0.2);
        spinner.tick();
        spinner.start_animating();
        let frame = spinner.sample();
        assert_eq!(frame.alpha, 1.0);
        assert_eq!(frame.scale, 1.0);
        assert!(!frame.hidden);
    }

    #[test]
    fn test_color_change_retints_stroke_in_any_state() {
        let (mut spinner, clock) = spinner_with_clock(SpinnerStyle::Default);
        spinner.set_color(Color32::RED);
        assert_eq!(spinner.stroke_color(), Color32::RED);

        spinner.start_animating();
        clock.advance(0.4);
        let before = spinner.sample();
        spinner.set_color(Color32::GREEN);
        let after = spinner.sample();
        assert_eq!(spinner.stroke_color(), Color32::GREEN);
        assert_eq!(after.color, Color32::GREEN);
        assert_eq!(after.rotation, before.rotation);
        assert_eq!(after.stroke_end, before.stroke_end);
        assert!(spinner.is_animating());
    }

    #[test]
    fn test_cycle_lengths_for_every_style() {
        for (style, _) in SPINNER_STYLES {
            let d = style.metrics().duration;
            assert!((rotation_cycle(d) - d * 1.5).abs() < 1e-12);
            assert!((stroke_cycle(d) - (d + d / 1.5)).abs() < 1e-12);

            let (mut spinner, clock) = spinner_with_clock(*style);
            spinner.start_animating();
            let start = spinner.sample();

            clock.set(rotation_cycle(d) / 4.0);
            assert!(close(spinner.sample().rotation, std::f32::consts::FRAC_PI_2));

            clock.set(rotation_cycle(d) * 2.0);
            assert!(close(spinner.sample().rotation, start.rotation));

            clock.set(stroke_cycle(d) * 3.0 + d / 2.0);
            let sampled = spinner.sample();
            assert!(close(sampled.stroke_end, 0.5));
            assert!(close(sampled.stroke_start, 0.0));
        }
    }

    #[test]
    fn test_stroke_start_chases_end() {
        let (mut spinner, clock) = spinner_with_clock(SpinnerStyle::Large);
        spinner.start_animating();

        // duration 1.0: start is delayed by 2/3 s and runs for 1 s.
        clock.set(0.5);
        let frame = spinner.sample();
        assert!(close(frame.stroke_end, 0.5));
        assert!(close(frame.stroke_start, 0.0));

        clock.set(2.0 / 3.0 + 0.5);
        let frame = spinner.sample();
        assert!(close(frame.stroke_end, 1.0));
        assert!(close(frame.stroke_start, 0.8));

        clock.set(2.0 / 3.0 + 0.75);
        assert!(close(spinner.sample().stroke_start, 0.9));
    }
}
