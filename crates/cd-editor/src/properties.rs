//! Property editor: two-way binding between form fields and the model.
//!
//! `read` renders the current selection as display strings; `apply` turns a
//! raw form value into a `Mutation`. Numeric input is coerced totally: any
//! string yields a finite number (the field's default when it does not
//! parse), which is then clamped to the field's valid range.

use crate::session::Mutation;
use cd_core::document::Document;
use cd_core::id::ElementId;
use cd_core::model::*;
use cd_core::patch::{CommonPatch, ElementPatch, ImagePatch, ShapePatch, TextPatch};
use cd_core::style::format_num;
use winnow::combinator::{alt, eof, opt};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

/// Second gradient stop used when switching a solid background to a gradient.
pub const DEFAULT_GRADIENT_TO: Color = Color::rgba(229.0 / 255.0, 231.0 / 255.0, 235.0 / 255.0, 1.0);

// ─── Fields ──────────────────────────────────────────────────────────────

/// Element fields. Names match the JSON payload's field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementField {
    X,
    Y,
    Width,
    Height,
    Rotation,
    /// Shown and edited as a percentage.
    Opacity,
    ZIndex,
    Content,
    FontFamily,
    FontSize,
    FontWeight,
    FontStyle,
    TextAlign,
    TextColor,
    Underline,
    Src,
    ShapeType,
    FillColor,
    BorderColor,
    BorderWidth,
    BorderRadius,
}

impl ElementField {
    pub const COMMON: [ElementField; 7] = [
        Self::X,
        Self::Y,
        Self::Width,
        Self::Height,
        Self::Rotation,
        Self::Opacity,
        Self::ZIndex,
    ];
    pub const TEXT: [ElementField; 8] = [
        Self::Content,
        Self::FontFamily,
        Self::FontSize,
        Self::FontWeight,
        Self::FontStyle,
        Self::TextAlign,
        Self::TextColor,
        Self::Underline,
    ];
    pub const IMAGE: [ElementField; 1] = [Self::Src];
    pub const SHAPE: [ElementField; 5] = [
        Self::ShapeType,
        Self::FillColor,
        Self::BorderColor,
        Self::BorderWidth,
        Self::BorderRadius,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
            Self::Rotation => "rotation",
            Self::Opacity => "opacity",
            Self::ZIndex => "zIndex",
            Self::Content => "content",
            Self::FontFamily => "fontFamily",
            Self::FontSize => "fontSize",
            Self::FontWeight => "fontWeight",
            Self::FontStyle => "fontStyle",
            Self::TextAlign => "textAlign",
            Self::TextColor => "color",
            Self::Underline => "underline",
            Self::Src => "src",
            Self::ShapeType => "shapeType",
            Self::FillColor => "fillColor",
            Self::BorderColor => "borderColor",
            Self::BorderWidth => "borderWidth",
            Self::BorderRadius => "borderRadius",
        }
    }

    /// The element kind this field belongs to; `None` for common fields.
    pub fn kind(self) -> Option<ElementType> {
        if Self::TEXT.contains(&self) {
            Some(ElementType::Text)
        } else if Self::IMAGE.contains(&self) {
            Some(ElementType::Image)
        } else if Self::SHAPE.contains(&self) {
            Some(ElementType::Shape)
        } else {
            None
        }
    }

    /// Fields shown for an element of type `ty`, common ones first.
    pub fn for_type(ty: ElementType) -> Vec<ElementField> {
        let specific: &[ElementField] = match ty {
            ElementType::Text => &Self::TEXT,
            ElementType::Image => &Self::IMAGE,
            ElementType::Shape => &Self::SHAPE,
        };
        Self::COMMON.iter().chain(specific).copied().collect()
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::COMMON
            .iter()
            .chain(&Self::TEXT)
            .chain(&Self::IMAGE)
            .chain(&Self::SHAPE)
            .copied()
            .find(|f| f.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackgroundField {
    /// `color` | `gradient` | `image`.
    Type,
    Color,
    GradientFrom,
    GradientTo,
    Direction,
    Url,
    Size,
    Position,
    Opacity,
}

impl BackgroundField {
    pub const ALL: [BackgroundField; 9] = [
        Self::Type,
        Self::Color,
        Self::GradientFrom,
        Self::GradientTo,
        Self::Direction,
        Self::Url,
        Self::Size,
        Self::Position,
        Self::Opacity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Color => "color",
            Self::GradientFrom => "from",
            Self::GradientTo => "to",
            Self::Direction => "direction",
            Self::Url => "url",
            Self::Size => "size",
            Self::Position => "position",
            Self::Opacity => "opacity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanvasField {
    Width,
    Height,
}

impl CanvasField {
    pub fn name(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
        }
    }
}

/// Any editable field in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Element(ElementField),
    Background(BackgroundField),
    Canvas(CanvasField),
}

impl Field {
    /// Parse a field path: `fontSize`, `background.opacity`, `canvas.width`.
    pub fn parse(path: &str) -> Option<Self> {
        if let Some(name) = path.strip_prefix("background.") {
            return BackgroundField::ALL
                .into_iter()
                .find(|f| f.name() == name)
                .map(Field::Background);
        }
        if let Some(name) = path.strip_prefix("canvas.") {
            return [CanvasField::Width, CanvasField::Height]
                .into_iter()
                .find(|f| f.name() == name)
                .map(Field::Canvas);
        }
        ElementField::parse(path).map(Field::Element)
    }
}

// ─── Reading ─────────────────────────────────────────────────────────────

/// What the panel shows.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelView {
    /// Nothing selected.
    Empty,
    Element {
        id: ElementId,
        element_type: ElementType,
        values: Vec<(ElementField, String)>,
    },
}

impl PanelView {
    pub fn is_empty(&self) -> bool {
        matches!(self, PanelView::Empty)
    }

    pub fn value(&self, field: ElementField) -> Option<&str> {
        match self {
            PanelView::Empty => None,
            PanelView::Element { values, .. } => values
                .iter()
                .find(|(f, _)| *f == field)
                .map(|(_, v)| v.as_str()),
        }
    }
}

/// Render the selected element for the panel.
pub fn read(doc: &Document) -> PanelView {
    let Some(el) = doc.selected() else {
        return PanelView::Empty;
    };
    let values = ElementField::for_type(el.element_type())
        .into_iter()
        .filter_map(|f| display(el, f).map(|v| (f, v)))
        .collect();
    PanelView::Element {
        id: el.id,
        element_type: el.element_type(),
        values,
    }
}

/// Display string for one field, or `None` if the field does not apply.
pub fn display(el: &Element, field: ElementField) -> Option<String> {
    use ElementField as F;
    let common = match field {
        F::X => Some(format_num(el.x)),
        F::Y => Some(format_num(el.y)),
        F::Width => Some(format_num(el.width)),
        F::Height => Some(format_num(el.height)),
        F::Rotation => Some(format_num(el.rotation)),
        F::Opacity => Some(format_num((el.opacity * 100.0).round())),
        F::ZIndex => Some(el.z_index.to_string()),
        _ => None,
    };
    if common.is_some() {
        return common;
    }

    match (&el.kind, field) {
        (ElementKind::Text(t), F::Content) => Some(t.content.clone()),
        (ElementKind::Text(t), F::FontFamily) => Some(t.font_family.clone()),
        (ElementKind::Text(t), F::FontSize) => Some(format_num(t.font_size)),
        (ElementKind::Text(t), F::FontWeight) => Some(t.font_weight.as_str().to_string()),
        (ElementKind::Text(t), F::FontStyle) => Some(t.font_style.as_str().to_string()),
        (ElementKind::Text(t), F::TextAlign) => Some(t.text_align.as_str().to_string()),
        (ElementKind::Text(t), F::TextColor) => Some(t.color.to_hex()),
        (ElementKind::Text(t), F::Underline) => Some(t.underline.to_string()),
        (ElementKind::Image(img), F::Src) => Some(img.src.clone()),
        (ElementKind::Shape(s), F::ShapeType) => Some(s.shape_type.as_str().to_string()),
        (ElementKind::Shape(s), F::FillColor) => Some(s.fill_color.to_hex()),
        (ElementKind::Shape(s), F::BorderColor) => Some(s.border_color.to_hex()),
        (ElementKind::Shape(s), F::BorderWidth) => Some(format_num(s.border_width)),
        (ElementKind::Shape(s), F::BorderRadius) => Some(format_num(s.border_radius)),
        _ => None,
    }
}

/// Background fields relevant to the current fill, as display strings.
pub fn read_background(bg: &Background) -> Vec<(BackgroundField, String)> {
    let mut values = vec![(BackgroundField::Type, bg.fill.type_name().to_string())];
    match &bg.fill {
        BackgroundFill::Color { color } => {
            values.push((BackgroundField::Color, color.to_hex()));
        }
        BackgroundFill::Gradient {
            from,
            to,
            direction,
        } => {
            values.push((BackgroundField::GradientFrom, from.to_hex()));
            values.push((BackgroundField::GradientTo, to.to_hex()));
            values.push((BackgroundField::Direction, direction.to_css()));
        }
        BackgroundFill::Image {
            url,
            size,
            position,
        } => {
            values.push((BackgroundField::Url, url.clone()));
            values.push((BackgroundField::Size, size.as_str().to_string()));
            values.push((BackgroundField::Position, position.as_str().to_string()));
        }
    }
    values.push((
        BackgroundField::Opacity,
        format_num((bg.opacity * 100.0).round()),
    ));
    values
}

pub fn read_canvas(canvas: Canvas) -> [(CanvasField, String); 2] {
    [
        (CanvasField::Width, format_num(canvas.width)),
        (CanvasField::Height, format_num(canvas.height)),
    ]
}

// ─── Writing ─────────────────────────────────────────────────────────────

/// Turn a raw form value into a mutation.
///
/// Returns `None` when nothing should change: no selection, a field of a
/// different element kind, or an unparseable color or keyword. Background
/// edits that leave the background as it was also yield `None`; element
/// and canvas edits are returned even when the value is unchanged.
pub fn apply(doc: &Document, field: Field, raw: &str) -> Option<Mutation> {
    match field {
        Field::Element(f) => {
            let Some(el) = doc.selected() else {
                log::debug!("property {}: nothing selected", f.name());
                return None;
            };
            if let Some(kind) = f.kind()
                && kind != el.element_type()
            {
                log::debug!(
                    "property {} does not apply to {} element {}",
                    f.name(),
                    el.element_type().as_str(),
                    el.id
                );
                return None;
            }
            let patch = element_patch(f, raw)?;
            Some(Mutation::Update { id: el.id, patch })
        }
        Field::Background(f) => {
            let current = doc.background();
            let next = background_with(current, f, raw)?;
            (next != *current).then_some(Mutation::SetBackground(next))
        }
        Field::Canvas(f) => {
            let canvas = doc.canvas();
            let (width, height) = match f {
                CanvasField::Width => (coerce_number(raw, canvas.width), canvas.height),
                CanvasField::Height => (canvas.width, coerce_number(raw, canvas.height)),
            };
            Some(Mutation::SetCanvas { width, height })
        }
    }
}

fn element_patch(field: ElementField, raw: &str) -> Option<ElementPatch> {
    use ElementField as F;
    let num = |default: f32| coerce_number(raw, default);
    let common = |c: CommonPatch| Some(ElementPatch::common(c));

    match field {
        F::X => common(CommonPatch {
            x: Some(num(0.0)),
            ..Default::default()
        }),
        F::Y => common(CommonPatch {
            y: Some(num(0.0)),
            ..Default::default()
        }),
        F::Width => common(CommonPatch {
            width: Some(num(0.0).max(MIN_ELEMENT_SIZE)),
            ..Default::default()
        }),
        F::Height => common(CommonPatch {
            height: Some(num(0.0).max(MIN_ELEMENT_SIZE)),
            ..Default::default()
        }),
        F::Rotation => common(CommonPatch {
            rotation: Some(num(0.0).clamp(-180.0, 180.0)),
            ..Default::default()
        }),
        F::Opacity => common(CommonPatch {
            opacity: Some(percent_to_unit(raw)),
            ..Default::default()
        }),
        F::ZIndex => common(CommonPatch {
            z_index: Some(
                num(0.0)
                    .round()
                    .clamp(-MAX_Z_INDEX as f32, MAX_Z_INDEX as f32) as i32,
            ),
            ..Default::default()
        }),
        F::Content => Some(ElementPatch::text(TextPatch {
            content: Some(raw.to_string()),
            ..Default::default()
        })),
        F::FontFamily => Some(ElementPatch::text(TextPatch {
            font_family: Some(raw.trim().to_string()),
            ..Default::default()
        })),
        F::FontSize => Some(ElementPatch::text(TextPatch {
            font_size: Some(num(0.0).max(1.0)),
            ..Default::default()
        })),
        F::FontWeight => Some(ElementPatch::text(TextPatch {
            font_weight: Some(coerce_font_weight(raw)),
            ..Default::default()
        })),
        F::FontStyle => Some(ElementPatch::text(TextPatch {
            font_style: Some(if raw.trim().eq_ignore_ascii_case("italic") {
                FontStyle::Italic
            } else {
                FontStyle::Normal
            }),
            ..Default::default()
        })),
        F::TextAlign => Some(ElementPatch::text(TextPatch {
            text_align: Some(TextAlign::parse(raw.trim())?),
            ..Default::default()
        })),
        F::TextColor => Some(ElementPatch::text(TextPatch {
            color: Some(Color::from_hex(raw)?),
            ..Default::default()
        })),
        F::Underline => Some(ElementPatch::text(TextPatch {
            underline: Some(coerce_bool(raw)),
            ..Default::default()
        })),
        F::Src => Some(ElementPatch::image(ImagePatch {
            src: Some(raw.trim().to_string()),
        })),
        F::ShapeType => Some(ElementPatch::shape(ShapePatch {
            shape_type: Some(ShapeType::parse(raw.trim())?),
            ..Default::default()
        })),
        F::FillColor => Some(ElementPatch::shape(ShapePatch {
            fill_color: Some(Color::from_hex(raw)?),
            ..Default::default()
        })),
        F::BorderColor => Some(ElementPatch::shape(ShapePatch {
            border_color: Some(Color::from_hex(raw)?),
            ..Default::default()
        })),
        F::BorderWidth => Some(ElementPatch::shape(ShapePatch {
            border_width: Some(num(0.0).max(0.0)),
            ..Default::default()
        })),
        F::BorderRadius => Some(ElementPatch::shape(ShapePatch {
            border_radius: Some(num(0.0).max(0.0)),
            ..Default::default()
        })),
    }
}

fn background_with(bg: &Background, field: BackgroundField, raw: &str) -> Option<Background> {
    let mut next = bg.clone();
    match field {
        BackgroundField::Type => {
            next.fill = switch_fill(&bg.fill, raw.trim())?;
        }
        BackgroundField::Color => {
            let BackgroundFill::Color { color } = &mut next.fill else {
                return None;
            };
            *color = Color::from_hex(raw)?;
        }
        BackgroundField::GradientFrom => {
            let BackgroundFill::Gradient { from, .. } = &mut next.fill else {
                return None;
            };
            *from = Color::from_hex(raw)?;
        }
        BackgroundField::GradientTo => {
            let BackgroundFill::Gradient { to, .. } = &mut next.fill else {
                return None;
            };
            *to = Color::from_hex(raw)?;
        }
        BackgroundField::Direction => {
            let BackgroundFill::Gradient { direction, .. } = &mut next.fill else {
                return None;
            };
            *direction = GradientDirection::parse(raw.trim())?;
        }
        BackgroundField::Url => {
            let BackgroundFill::Image { url, .. } = &mut next.fill else {
                return None;
            };
            *url = raw.trim().to_string();
        }
        BackgroundField::Size => {
            let BackgroundFill::Image { size, .. } = &mut next.fill else {
                return None;
            };
            *size = BackgroundSize::parse(raw.trim())?;
        }
        BackgroundField::Position => {
            let BackgroundFill::Image { position, .. } = &mut next.fill else {
                return None;
            };
            *position = BackgroundPosition::parse(raw.trim())?;
        }
        BackgroundField::Opacity => next.set_opacity(percent_to_unit(raw)),
    }
    Some(next)
}

/// Switch the fill variant, carrying the dominant color across.
fn switch_fill(current: &BackgroundFill, type_name: &str) -> Option<BackgroundFill> {
    if current.type_name() == type_name {
        return Some(current.clone());
    }
    let primary = match current {
        BackgroundFill::Color { color } => *color,
        BackgroundFill::Gradient { from, .. } => *from,
        BackgroundFill::Image { .. } => Color::WHITE,
    };
    match type_name {
        "color" => Some(BackgroundFill::Color { color: primary }),
        "gradient" => Some(BackgroundFill::Gradient {
            from: primary,
            to: DEFAULT_GRADIENT_TO,
            direction: GradientDirection::default(),
        }),
        "image" => Some(BackgroundFill::Image {
            url: String::new(),
            size: BackgroundSize::default(),
            position: BackgroundPosition::default(),
        }),
        _ => None,
    }
}

// ─── Coercion ────────────────────────────────────────────────────────────

/// Coerce form input to a finite number.
///
/// Accepts an optional sign, digits with an optional fraction, and an
/// optional `px`, `deg` or `%` suffix, surrounded by whitespace. Anything
/// else yields `default`.
pub fn coerce_number(raw: &str, default: f32) -> f32 {
    let mut input = raw.trim();
    let parsed = (parse_number, opt(alt(("px", "deg", "%"))), eof)
        .map(|(n, _, _)| n)
        .parse_next(&mut input);
    match parsed {
        Ok(n) if n.is_finite() => n,
        _ => default,
    }
}

/// Percentage input (0–100, empty ⇒ 100) as a 0–1 fraction.
pub fn percent_to_unit(raw: &str) -> f32 {
    coerce_number(raw, 100.0).clamp(0.0, 100.0) / 100.0
}

pub fn coerce_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes" | "underline"
    )
}

fn coerce_font_weight(raw: &str) -> FontWeight {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("bold") || raw.eq_ignore_ascii_case("bolder") {
        return FontWeight::Bold;
    }
    if coerce_number(raw, 400.0) >= 600.0 {
        FontWeight::Bold
    } else {
        FontWeight::Normal
    }
}

fn parse_number(input: &mut &str) -> ModalResult<f32> {
    let start = *input;
    let _ = opt(one_of::<_, _, ErrMode<ContextError>>(['-', '+'])).parse_next(input)?;
    let _ = take_while::<_, _, ErrMode<ContextError>>(0.., |c: char| c.is_ascii_digit())
        .parse_next(input)?;
    if input.starts_with('.') {
        *input = &input[1..];
        let _ = take_while::<_, _, ErrMode<ContextError>>(0.., |c: char| c.is_ascii_digit())
            .parse_next(input)?;
    }
    let matched = &start[..start.len() - input.len()];
    if !matched.bytes().any(|b| b.is_ascii_digit()) {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    matched
        .parse::<f32>()
        .map_err(|_| ErrMode::Backtrack(ContextError::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc_with(ty: ElementType) -> (Document, ElementId) {
        let mut doc = Document::new();
        let id = doc.add(ty);
        (doc, id)
    }

    fn apply_now(doc: &mut Document, path: &str, raw: &str) -> bool {
        let field = Field::parse(path).unwrap();
        match apply(doc, field, raw) {
            Some(Mutation::Update { id, patch }) => doc.update(id, patch),
            Some(Mutation::SetBackground(bg)) => {
                doc.set_background(bg);
                true
            }
            Some(Mutation::SetCanvas { width, height }) => {
                doc.set_canvas(width, height);
                true
            }
            Some(other) => panic!("unexpected {other:?}"),
            None => false,
        }
    }

    #[test]
    fn coerce_number_is_total() {
        assert_eq!(coerce_number("42", 0.0), 42.0);
        assert_eq!(coerce_number(" 12.5px ", 0.0), 12.5);
        assert_eq!(coerce_number("-.5", 0.0), -0.5);
        assert_eq!(coerce_number("+3", 0.0), 3.0);
        assert_eq!(coerce_number("45deg", 0.0), 45.0);
        assert_eq!(coerce_number("", 7.0), 7.0);
        assert_eq!(coerce_number("abc", 7.0), 7.0);
        assert_eq!(coerce_number("12abc", 7.0), 7.0);
        assert_eq!(coerce_number("-", 7.0), 7.0);
        assert_eq!(coerce_number(".", 7.0), 7.0);
    }

    #[test]
    fn empty_selection_reads_empty() {
        let (mut doc, _) = doc_with(ElementType::Text);
        doc.clear_selection();
        assert_eq!(read(&doc), PanelView::Empty);
        assert!(apply(&doc, Field::Element(ElementField::X), "10").is_none());
    }

    #[test]
    fn reads_text_fields() {
        let (doc, id) = doc_with(ElementType::Text);
        let view = read(&doc);
        let PanelView::Element {
            id: shown,
            element_type,
            ..
        } = &view
        else {
            panic!("expected element view");
        };
        assert_eq!(*shown, id);
        assert_eq!(*element_type, ElementType::Text);
        assert_eq!(view.value(ElementField::Opacity), Some("100"));
        assert_eq!(view.value(ElementField::FontWeight), Some("normal"));
        assert_eq!(view.value(ElementField::TextAlign), Some("center"));
        assert_eq!(view.value(ElementField::Content), Some("Double click to edit"));
        assert_eq!(view.value(ElementField::FillColor), None);
    }

    #[test]
    fn invalid_numbers_fall_back_then_clamp() {
        let (mut doc, id) = doc_with(ElementType::Shape);
        assert!(apply_now(&mut doc, "width", "abc"));
        assert_eq!(doc.get(id).unwrap().width, MIN_ELEMENT_SIZE);

        assert!(apply_now(&mut doc, "opacity", ""));
        assert_eq!(doc.get(id).unwrap().opacity, 1.0);

        assert!(apply_now(&mut doc, "opacity", "35"));
        assert!((doc.get(id).unwrap().opacity - 0.35).abs() < 1e-6);

        assert!(apply_now(&mut doc, "opacity", "250"));
        assert_eq!(doc.get(id).unwrap().opacity, 1.0);

        assert!(apply_now(&mut doc, "rotation", "270"));
        assert_eq!(doc.get(id).unwrap().rotation, 180.0);

        assert!(apply_now(&mut doc, "borderWidth", "-4"));
        assert!(apply_now(&mut doc, "x", "nope"));
        let el = doc.get(id).unwrap();
        assert_eq!(el.x, 0.0);
        let ElementKind::Shape(s) = &el.kind else {
            panic!("shape expected");
        };
        assert_eq!(s.border_width, 0.0);
    }

    #[test]
    fn kind_mismatch_and_bad_color_do_nothing() {
        let (mut doc, id) = doc_with(ElementType::Shape);
        let before = doc.get(id).unwrap().clone();
        assert!(!apply_now(&mut doc, "fontSize", "30"));
        assert!(!apply_now(&mut doc, "fillColor", "not-a-color"));
        assert!(!apply_now(&mut doc, "shapeType", "hexagon"));
        assert_eq!(doc.get(id).unwrap(), &before);
    }

    #[test]
    fn text_style_fields() {
        let (mut doc, id) = doc_with(ElementType::Text);
        apply_now(&mut doc, "fontWeight", "bold");
        apply_now(&mut doc, "fontStyle", "italic");
        apply_now(&mut doc, "underline", "true");
        apply_now(&mut doc, "color", "#1a2b3c");
        apply_now(&mut doc, "fontSize", "");
        let ElementKind::Text(t) = &doc.get(id).unwrap().kind else {
            panic!("text expected");
        };
        assert_eq!(t.font_weight, FontWeight::Bold);
        assert_eq!(t.font_style, FontStyle::Italic);
        assert!(t.underline);
        assert_eq!(t.color.to_hex(), "#1A2B3C");
        assert_eq!(t.font_size, 1.0);
    }

    #[test]
    fn background_type_switch_carries_color() {
        let (mut doc, _) = doc_with(ElementType::Text);
        apply_now(&mut doc, "background.color", "#112233");
        assert!(apply_now(&mut doc, "background.type", "gradient"));
        match &doc.background().fill {
            BackgroundFill::Gradient { from, .. } => assert_eq!(from.to_hex(), "#112233"),
            other => panic!("expected gradient, got {other:?}"),
        }
        // Color field does not apply to a gradient.
        assert!(!apply_now(&mut doc, "background.color", "#FFFFFF"));

        assert!(apply_now(&mut doc, "background.opacity", "40"));
        assert!((doc.background().opacity - 0.4).abs() < 1e-6);

        let values = read_background(doc.background());
        assert_eq!(values[0], (BackgroundField::Type, "gradient".to_string()));
        assert_eq!(
            values.last(),
            Some(&(BackgroundField::Opacity, "40".to_string()))
        );
    }

    #[test]
    fn canvas_size_keeps_current_on_garbage() {
        let (mut doc, _) = doc_with(ElementType::Text);
        assert!(apply_now(&mut doc, "canvas.width", "1200"));
        assert!(apply_now(&mut doc, "canvas.height", "tall"));
        assert_eq!(doc.canvas(), Canvas::new(1200.0, 700.0));
    }

    #[test]
    fn field_paths() {
        assert_eq!(
            Field::parse("zIndex"),
            Some(Field::Element(ElementField::ZIndex))
        );
        assert_eq!(
            Field::parse("background.from"),
            Some(Field::Background(BackgroundField::GradientFrom))
        );
        assert_eq!(
            Field::parse("canvas.height"),
            Some(Field::Canvas(CanvasField::Height))
        );
        assert_eq!(Field::parse("canvas.depth"), None);
        assert_eq!(Field::parse("bogus"), None);
    }
}
