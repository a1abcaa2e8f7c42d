//! Screen ↔ logical canvas coordinates under zoom.
//!
//! The canvas is drawn on screen scaled by `zoom` with its top-left corner
//! at the measured bounding rect. Logical coordinates are the exported
//! document's own pixel space and never change with zoom.

use crate::model::Canvas;

/// On-screen bounding rectangle of the rendered canvas (viewport pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl CanvasRect {
    /// A rect is usable once layout has given it a real, finite size.
    pub fn is_measured(&self) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

/// Allowed zoom interval and the step used by zoom in/out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 1.0,
            step: 0.1,
        }
    }
}

/// Smallest zoom any range may reach; keeps the mapping invertible.
pub const MIN_ZOOM: f32 = 0.01;

impl ZoomRange {
    /// A usable copy: finite bounds in order, `min >= MIN_ZOOM`, and a
    /// positive step. Non-finite values fall back to the defaults.
    pub fn normalized(self) -> Self {
        let fallback = Self::default();
        let finite = |v: f32, d: f32| if v.is_finite() { v } else { d };
        let a = finite(self.min, fallback.min).max(MIN_ZOOM);
        let b = finite(self.max, fallback.max).max(MIN_ZOOM);
        let step = finite(self.step, fallback.step);
        Self {
            min: a.min(b),
            max: a.max(b),
            step: if step > 0.0 { step } else { fallback.step },
        }
    }

    pub fn clamp(&self, zoom: f32) -> f32 {
        if !zoom.is_finite() {
            return self.max;
        }
        zoom.clamp(self.min, self.max)
    }
}

/// Default zoom used when an editor opens.
pub const DEFAULT_ZOOM: f32 = 0.75;

/// Bidirectional pointer ↔ canvas mapping.
#[derive(Debug, Clone)]
pub struct CanvasTransform {
    rect: Option<CanvasRect>,
    zoom: f32,
    range: ZoomRange,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self::new(ZoomRange::default())
    }
}

impl CanvasTransform {
    pub fn new(range: ZoomRange) -> Self {
        let range = range.normalized();
        Self {
            rect: None,
            zoom: range.clamp(DEFAULT_ZOOM),
            range,
        }
    }

    /// Record the canvas's current on-screen rect. Zero-size rects leave
    /// the transform unready.
    pub fn measure(&mut self, rect: CanvasRect) {
        self.rect = rect.is_measured().then_some(rect);
        if self.rect.is_none() {
            log::trace!("canvas rect {rect:?} is not measurable; transform unready");
        }
    }

    /// Forget the measured rect (e.g. the canvas was unmounted).
    pub fn invalidate(&mut self) {
        self.rect = None;
    }

    pub fn is_ready(&self) -> bool {
        self.rect.is_some()
    }

    pub fn rect(&self) -> Option<CanvasRect> {
        self.rect
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn range(&self) -> ZoomRange {
        self.range
    }

    /// Set zoom, clamped to the configured range. Returns the applied value.
    pub fn set_zoom(&mut self, zoom: f32) -> f32 {
        self.zoom = self.range.clamp(zoom);
        self.zoom
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.set_zoom(round_step(self.zoom + self.range.step))
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.set_zoom(round_step(self.zoom - self.range.step))
    }

    /// Largest in-range zoom at which `canvas` fits inside the viewport.
    pub fn fit_zoom(&self, canvas: Canvas, viewport_width: f32, viewport_height: f32) -> f32 {
        if viewport_width <= 0.0 || viewport_height <= 0.0 {
            return self.zoom;
        }
        let fit = (viewport_width / canvas.width).min(viewport_height / canvas.height);
        self.range.clamp(fit)
    }

    /// Viewport point → logical canvas point. `None` until measured.
    pub fn to_logical(&self, screen_x: f32, screen_y: f32) -> Option<(f32, f32)> {
        let rect = self.rect?;
        if !screen_x.is_finite() || !screen_y.is_finite() {
            return None;
        }
        Some((
            (screen_x - rect.left) / self.zoom,
            (screen_y - rect.top) / self.zoom,
        ))
    }

    /// Logical canvas point → viewport point. `None` until measured.
    pub fn to_screen(&self, logical_x: f32, logical_y: f32) -> Option<(f32, f32)> {
        let rect = self.rect?;
        Some((
            logical_x * self.zoom + rect.left,
            logical_y * self.zoom + rect.top,
        ))
    }
}

/// Keep stepped zoom values on clean tenths (0.7, not 0.70000005).
fn round_step(z: f32) -> f32 {
    (z * 100.0).round() / 100.0
}
