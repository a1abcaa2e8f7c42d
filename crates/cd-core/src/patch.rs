//! Typed partial updates for elements.
//!
//! A patch carries `Some` only for the fields it changes. Kind-specific
//! fields live in per-kind patch structs, so a font size can only ever be
//! written to a text element: `KindPatch::Text` applied to a shape is
//! rejected as a whole.

use crate::model::*;

/// Fields shared by every element kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
    pub opacity: Option<f32>,
    pub z_index: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPatch {
    pub content: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub text_align: Option<TextAlign>,
    pub color: Option<Color>,
    pub underline: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImagePatch {
    pub src: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapePatch {
    pub shape_type: Option<ShapeType>,
    pub fill_color: Option<Color>,
    pub border_color: Option<Color>,
    pub border_width: Option<f32>,
    pub border_radius: Option<f32>,
}

/// Kind-specific half of a patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum KindPatch {
    #[default]
    None,
    Text(TextPatch),
    Image(ImagePatch),
    Shape(ShapePatch),
}

/// A partial update for one element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub common: CommonPatch,
    pub kind: KindPatch,
}

impl ElementPatch {
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            common: CommonPatch {
                x: Some(x),
                y: Some(y),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn size(width: f32, height: f32) -> Self {
        Self {
            common: CommonPatch {
                width: Some(width),
                height: Some(height),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn common(common: CommonPatch) -> Self {
        Self {
            common,
            kind: KindPatch::None,
        }
    }

    pub fn text(patch: TextPatch) -> Self {
        Self {
            common: CommonPatch::default(),
            kind: KindPatch::Text(patch),
        }
    }

    pub fn image(patch: ImagePatch) -> Self {
        Self {
            common: CommonPatch::default(),
            kind: KindPatch::Image(patch),
        }
    }

    pub fn shape(patch: ShapePatch) -> Self {
        Self {
            common: CommonPatch::default(),
            kind: KindPatch::Shape(patch),
        }
    }

    /// Whether this patch may be applied to an element of `ty`.
    pub fn fits(&self, ty: ElementType) -> bool {
        match &self.kind {
            KindPatch::None => true,
            KindPatch::Text(_) => ty == ElementType::Text,
            KindPatch::Image(_) => ty == ElementType::Image,
            KindPatch::Shape(_) => ty == ElementType::Shape,
        }
    }

    /// Merge into `el`. Returns `false` (and leaves `el` untouched) when the
    /// kind half targets a different element kind.
    pub fn apply_to(self, el: &mut Element) -> bool {
        if !self.fits(el.element_type()) {
            return false;
        }

        let c = self.common;
        if let Some(x) = c.x.filter(|v| v.is_finite()) {
            el.x = x;
        }
        if let Some(y) = c.y.filter(|v| v.is_finite()) {
            el.y = y;
        }
        if c.width.is_some() || c.height.is_some() {
            el.set_size(c.width.unwrap_or(el.width), c.height.unwrap_or(el.height));
        }
        if let Some(rotation) = c.rotation.filter(|v| v.is_finite()) {
            el.rotation = rotation;
        }
        if let Some(opacity) = c.opacity {
            el.set_opacity(opacity);
        }
        if let Some(z) = c.z_index {
            el.z_index = z;
        }

        match (self.kind, &mut el.kind) {
            (KindPatch::None, _) => {}
            (KindPatch::Text(p), ElementKind::Text(t)) => {
                if let Some(v) = p.content {
                    t.content = v;
                }
                if let Some(v) = p.font_family {
                    t.font_family = v;
                }
                if let Some(v) = p.font_size.filter(|v| v.is_finite()) {
                    t.font_size = v.max(1.0);
                }
                if let Some(v) = p.font_weight {
                    t.font_weight = v;
                }
                if let Some(v) = p.font_style {
                    t.font_style = v;
                }
                if let Some(v) = p.text_align {
                    t.text_align = v;
                }
                if let Some(v) = p.color {
                    t.color = v;
                }
                if let Some(v) = p.underline {
                    t.underline = v;
                }
            }
            (KindPatch::Image(p), ElementKind::Image(img)) => {
                if let Some(v) = p.src {
                    img.src = v;
                }
            }
            (KindPatch::Shape(p), ElementKind::Shape(s)) => {
                if let Some(v) = p.shape_type {
                    s.shape_type = v;
                }
                if let Some(v) = p.fill_color {
                    s.fill_color = v;
                }
                if let Some(v) = p.border_color {
                    s.border_color = v;
                }
                if let Some(v) = p.border_width.filter(|v| v.is_finite()) {
                    s.border_width = v.max(0.0);
                }
                if let Some(v) = p.border_radius.filter(|v| v.is_finite()) {
                    s.border_radius = v.max(0.0);
                }
            }
            // Ruled out by `fits` above.
            _ => return false,
        }
        true
    }
}
