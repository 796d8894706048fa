use std::rc::Rc;

use egui::{Color32, Rect};

use crate::clock::{Clock, SystemClock};
use crate::spinner::{ActivityIndicator, SpinnerEvent, SpinnerStyle};

/// Numeric identifier attached to a child for lookup and removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub i32);

pub const BACKGROUND_TAG: Tag = Tag(4444);
pub const SPINNER_TAG: Tag = Tag(4443);

pub type ChildId = u64;

/// Parameters of `start_animating`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayOptions {
    pub activity_color: Color32,
    pub background_color: Color32,
    pub alpha: f32,
    pub style: SpinnerStyle,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            activity_color: Color32::BLUE,
            background_color: Color32::WHITE,
            alpha: 0.45,
            style: SpinnerStyle::Large,
        }
    }
}

/// Flat translucent panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    pub frame: Rect,
    pub color: Color32,
    pub alpha: f32,
}

impl Panel {
    /// Fill colour with the panel's opacity applied.
    pub fn fill(&self) -> Color32 {
        self.color.gamma_multiply(self.alpha)
    }
}

pub enum ChildView {
    Panel(Panel),
    Spinner(ActivityIndicator),
}

pub struct Child {
    pub id: ChildId,
    pub tag: Option<Tag>,
    pub view: ChildView,
}

impl Child {
    /// Frame in host coordinates, owned by the view itself.
    pub fn frame(&self) -> Rect {
        match &self.view {
            ChildView::Panel(panel) => panel.frame,
            ChildView::Spinner(spinner) => spinner.frame(),
        }
    }

    pub fn spinner(&self) -> Option<&ActivityIndicator> {
        match &self.view {
            ChildView::Spinner(s) => Some(s),
            ChildView::Panel(_) => None,
        }
    }

    fn is_overlay(&self) -> bool {
        self.tag == Some(BACKGROUND_TAG) || self.tag == Some(SPINNER_TAG)
    }
}

/// The two children inserted by one `start_animating` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayHandle {
    pub background: ChildId,
    pub spinner: ChildId,
}

/// Screen-like container with an ordered child list (back to front).
pub struct ViewHost {
    bounds: Rect,
    children: Vec<Child>,
    next_id: ChildId,
    clock: Rc<dyn Clock>,
}

impl ViewHost {
    pub fn new(bounds: Rect) -> Self {
        Self::with_clock(bounds, Rc::new(SystemClock::new()))
    }

    /// Spinners created by the overlay share this clock.
    pub fn with_clock(bounds: Rect, clock: Rc<dyn Clock>) -> Self {
        Self {
            bounds,
            children: Vec::new(),
            next_id: 1,
            clock,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Resize the host. Overlay panels are stretched to the new bounds and
    /// overlay spinners re-centred.
    pub fn set_bounds(&mut self, bounds: Rect) {
        if bounds == self.bounds {
            return;
        }
        self.bounds = bounds;
        let center = bounds.center();
        for child in self.children.iter_mut() {
            match (&mut child.view, child.tag) {
                (ChildView::Panel(panel), Some(BACKGROUND_TAG)) => panel.frame = bounds,
                (ChildView::Spinner(spinner), Some(SPINNER_TAG)) => spinner.set_center(center),
                _ => {}
            }
        }
    }

    pub fn clock(&self) -> Rc<dyn Clock> {
        self.clock.clone()
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn child(&self, id: ChildId) -> Option<&Child> {
        self.children.iter().find(|c| c.id == id)
    }

    pub fn children_with_tag(&self, tag: Tag) -> impl Iterator<Item = &Child> {
        self.children.iter().filter(move |c| c.tag == Some(tag))
    }

    pub fn has_overlay(&self) -> bool {
        self.children.iter().any(Child::is_overlay)
    }

    /// Append a child on top of the existing ones and return its id.
    pub fn add_subview(&mut self, view: ChildView, tag: Option<Tag>) -> ChildId {
        let id = self.next_id;
        self.next_id += 1;
        self.children.push(Child { id, tag, view });
        id
    }

    /// Remove the child with the given id. Returns false if it was not present.
    pub fn remove_child(&mut self, id: ChildId) -> bool {
        let before = self.children.len();
        self.children.retain(|c| c.id != id);
        self.children.len() != before
    }

    /// Advance every hosted spinner.
    pub fn tick(&mut self) -> Vec<(ChildId, SpinnerEvent)> {
        let mut events = Vec::new();
        for child in self.children.iter_mut() {
            if let ChildView::Spinner(spinner) = &mut child.view {
                if let Some(event) = spinner.tick() {
                    events.push((child.id, event));
                }
            }
        }
        events
    }

    /// True while any hosted spinner needs repainting.
    pub fn is_animating(&self) -> bool {
        self.children
            .iter()
            .filter_map(Child::spinner)
            .any(ActivityIndicator::is_animating)
    }
}

/// Cover the host with a translucent panel and a centred, running spinner.
pub fn start_animating(host: &mut ViewHost, options: OverlayOptions) -> OverlayHandle {
    let bounds = host.bounds();
    let panel = Panel {
        frame: bounds,
        color: options.background_color,
        alpha: options.alpha,
    };
    let background = host.add_subview(ChildView::Panel(panel), Some(BACKGROUND_TAG));

    let mut spinner = ActivityIndicator::new(options.style).with_clock(host.clock());
    spinner.set_center(bounds.center());
    spinner.set_color(options.activity_color);
    spinner.start_animating();
    let spinner = host.add_subview(ChildView::Spinner(spinner), Some(SPINNER_TAG));

    log::debug!(
        "Overlay shown over {:?} (background #{}, spinner #{})",
        bounds,
        background,
        spinner
    );

    OverlayHandle {
        background,
        spinner,
    }
}

/// Remove every overlay child from the host in one pass.
pub fn stop_animating(host: &mut ViewHost) {
    let before = host.children.len();
    host.children.retain(|c| !c.is_overlay());
    let removed = before - host.children.len();
    if removed > 0 {
        log::debug!("Removed {} overlay child(ren)", removed);
    }
}

/// Remove exactly the overlay created by one `start_animating` call.
/// Returns false if neither child was still present.
pub fn remove_overlay(host: &mut ViewHost, handle: OverlayHandle) -> bool {
    let removed_background = host.remove_child(handle.background);
    let removed_spinner = host.remove_child(handle.spinner);
    removed_background || removed_spinner
}
