//! Core data model for certificate layouts.
//!
//! A layout is a flat list of positioned, layered elements (text, image,
//! shape) drawn over a single background layer, on a canvas with a fixed
//! logical size. Everything here is plain data; the operations live in
//! `document`, the coordinate math in `transform`, and the HTML output in
//! `emitter`.

use crate::id::ElementId;
use crate::style::format_num;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Smallest width/height an element may shrink to.
pub const MIN_ELEMENT_SIZE: f32 = 1.0;

/// Bound on stacking indices entered by hand.
pub const MAX_Z_INDEX: i32 = 1_000_000;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let channels: Vec<u8> = match bytes.len() {
            3 | 4 => bytes
                .iter()
                .map(|&c| hex_val(c).map(|v| v * 17))
                .collect::<Option<_>>()?,
            6 | 8 => bytes
                .chunks(2)
                .map(|pair| Some(hex_val(pair[0])? << 4 | hex_val(pair[1])?))
                .collect::<Option<_>>()?,
            _ => return None,
        };

        let alpha = channels.get(3).copied().unwrap_or(255);
        Some(Self::rgba(
            f32::from(channels[0]) / 255.0,
            f32::from(channels[1]) / 255.0,
            f32::from(channels[2]) / 255.0,
            f32::from(alpha) / 255.0,
        ))
    }

    fn channel(v: f32) -> u8 {
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when translucent.
    pub fn to_hex(&self) -> String {
        let (r, g, b, a) = (
            Self::channel(self.r),
            Self::channel(self.g),
            Self::channel(self.b),
            Self::channel(self.a),
        );
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// CSS color value: hex when opaque, `rgba(...)` otherwise.
    pub fn to_css(&self) -> String {
        if Self::channel(self.a) == 255 {
            return self.to_hex();
        }
        format!(
            "rgba({}, {}, {}, {})",
            Self::channel(self.r),
            Self::channel(self.g),
            Self::channel(self.b),
            format_num(self.a)
        )
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color `{s}`")))
    }
}

// ─── Text ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl FontWeight {
    pub fn as_str(self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

impl FontStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        }
    }
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "left" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" => Some(TextAlign::Right),
            _ => None,
        }
    }
}

/// Payload of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    pub content: String,
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub text_align: TextAlign,
    pub color: Color,
    pub underline: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            content: "Double click to edit".into(),
            font_family: "Arial".into(),
            font_size: 24.0,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            text_align: TextAlign::Center,
            color: Color::BLACK,
            underline: false,
        }
    }
}

// ─── Image ───────────────────────────────────────────────────────────────

/// Payload of an image element. Object-fit is always `contain`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageContent {
    /// URL or `data:` URL. Empty until an image is chosen.
    pub src: String,
}

// ─── Shape ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    #[default]
    Rectangle,
    Circle,
    Line,
}

impl ShapeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeType::Rectangle => "rectangle",
            ShapeType::Circle => "circle",
            ShapeType::Line => "line",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "rectangle" | "rect" => Some(ShapeType::Rectangle),
            "circle" => Some(ShapeType::Circle),
            "line" => Some(ShapeType::Line),
            _ => None,
        }
    }
}

/// Payload of a shape element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeStyle {
    pub shape_type: ShapeType,
    pub fill_color: Color,
    pub border_color: Color,
    pub border_width: f32,
    /// Only meaningful for rectangles.
    pub border_radius: f32,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            shape_type: ShapeType::Rectangle,
            fill_color: Color::rgba(229.0 / 255.0, 231.0 / 255.0, 235.0 / 255.0, 1.0),
            border_color: Color::rgba(55.0 / 255.0, 65.0 / 255.0, 81.0 / 255.0, 1.0),
            border_width: 2.0,
            border_radius: 0.0,
        }
    }
}

// ─── Elements ────────────────────────────────────────────────────────────

/// Kind discriminant, used where a payload isn't needed (e.g. "add text").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Text,
    Image,
    Shape,
}

impl ElementType {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Text => "text",
            ElementType::Image => "image",
            ElementType::Shape => "shape",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "text" => Some(ElementType::Text),
            "image" => Some(ElementType::Image),
            "shape" => Some(ElementType::Shape),
            _ => None,
        }
    }

    /// Default size for a freshly added element of this kind.
    pub fn default_size(self) -> (f32, f32) {
        match self {
            ElementType::Text => (300.0, 50.0),
            ElementType::Image => (200.0, 150.0),
            ElementType::Shape => (150.0, 100.0),
        }
    }

    pub fn default_kind(self) -> ElementKind {
        match self {
            ElementType::Text => ElementKind::Text(TextStyle::default()),
            ElementType::Image => ElementKind::Image(ImageContent::default()),
            ElementType::Shape => ElementKind::Shape(ShapeStyle::default()),
        }
    }
}

/// Kind-specific payload of an element, tagged by `type` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text(TextStyle),
    Image(ImageContent),
    Shape(ShapeStyle),
}

impl ElementKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Text(_) => ElementType::Text,
            ElementKind::Image(_) => ElementType::Image,
            ElementKind::Shape(_) => ElementType::Shape,
        }
    }
}

fn default_opacity() -> f32 {
    1.0
}

/// One positioned, styled unit on the canvas.
///
/// Position and size are in logical canvas pixels. `z_index` orders painting
/// (higher paints later); ties keep insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Degrees, clockwise.
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub z_index: i32,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// A new element of the given type with creation defaults.
    pub fn new(id: ElementId, ty: ElementType, z_index: i32) -> Self {
        let (width, height) = ty.default_size();
        Self {
            id,
            x: 50.0,
            y: 50.0,
            width,
            height,
            rotation: 0.0,
            opacity: 1.0,
            z_index,
            kind: ty.default_kind(),
        }
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Set size, clamping each side to `MIN_ELEMENT_SIZE`.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = clamp_size(width);
        self.height = clamp_size(height);
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Repair values that would break the size/opacity invariants
    /// (used after loading an external payload).
    pub fn normalize(&mut self) {
        self.set_size(self.width, self.height);
        self.set_opacity(self.opacity);
        if !self.x.is_finite() {
            self.x = 0.0;
        }
        if !self.y.is_finite() {
            self.y = 0.0;
        }
        if !self.rotation.is_finite() {
            self.rotation = 0.0;
        }
    }
}

fn clamp_size(v: f32) -> f32 {
    if v.is_finite() {
        v.max(MIN_ELEMENT_SIZE)
    } else {
        MIN_ELEMENT_SIZE
    }
}

// ─── Background ──────────────────────────────────────────────────────────

/// Direction of a two-stop linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GradientDirection {
    #[default]
    ToRight,
    ToLeft,
    ToBottom,
    ToTop,
    ToBottomRight,
    ToTopRight,
    /// Explicit angle in degrees.
    Angle(f32),
}

impl GradientDirection {
    pub fn to_css(self) -> String {
        match self {
            GradientDirection::ToRight => "to right".into(),
            GradientDirection::ToLeft => "to left".into(),
            GradientDirection::ToBottom => "to bottom".into(),
            GradientDirection::ToTop => "to top".into(),
            GradientDirection::ToBottomRight => "to bottom right".into(),
            GradientDirection::ToTopRight => "to top right".into(),
            GradientDirection::Angle(deg) => format!("{}deg", format_num(deg)),
        }
    }

    /// Accepts the CSS keywords above, `"135deg"`, or a bare number.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s {
            "to right" => Some(Self::ToRight),
            "to left" => Some(Self::ToLeft),
            "to bottom" => Some(Self::ToBottom),
            "to top" => Some(Self::ToTop),
            "to bottom right" => Some(Self::ToBottomRight),
            "to top right" => Some(Self::ToTopRight),
            _ => {
                let deg = s.strip_suffix("deg").unwrap_or(s).trim();
                deg.parse::<f32>()
                    .ok()
                    .filter(|d| d.is_finite())
                    .map(Self::Angle)
            }
        }
    }
}

impl Serialize for GradientDirection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for GradientDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        GradientDirection::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid gradient direction `{s}`")))
    }
}

/// `background-size` keyword for image backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundSize {
    #[default]
    Cover,
    Contain,
    Auto,
    /// Fill the canvas ignoring aspect ratio (`100% 100%`).
    Stretch,
}

impl BackgroundSize {
    pub fn as_str(self) -> &'static str {
        match self {
            BackgroundSize::Cover => "cover",
            BackgroundSize::Contain => "contain",
            BackgroundSize::Auto => "auto",
            BackgroundSize::Stretch => "stretch",
        }
    }

    pub fn to_css(self) -> &'static str {
        match self {
            BackgroundSize::Stretch => "100% 100%",
            other => other.as_str(),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "cover" => Some(Self::Cover),
            "contain" => Some(Self::Contain),
            "auto" => Some(Self::Auto),
            "stretch" | "100% 100%" => Some(Self::Stretch),
            _ => None,
        }
    }
}

/// `background-position` keyword for image backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackgroundPosition {
    #[default]
    #[serde(rename = "center")]
    Center,
    #[serde(rename = "top")]
    Top,
    #[serde(rename = "bottom")]
    Bottom,
    #[serde(rename = "left")]
    Left,
    #[serde(rename = "right")]
    Right,
    #[serde(rename = "top left")]
    TopLeft,
    #[serde(rename = "top right")]
    TopRight,
    #[serde(rename = "bottom left")]
    BottomLeft,
    #[serde(rename = "bottom right")]
    BottomRight,
}

impl BackgroundPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
            Self::TopLeft => "top left",
            Self::TopRight => "top right",
            Self::BottomLeft => "bottom left",
            Self::BottomRight => "bottom right",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "center" => Some(Self::Center),
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "top left" => Some(Self::TopLeft),
            "top right" => Some(Self::TopRight),
            "bottom left" => Some(Self::BottomLeft),
            "bottom right" => Some(Self::BottomRight),
            _ => None,
        }
    }
}

/// What the background layer paints, tagged by `type` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackgroundFill {
    Color {
        color: Color,
    },
    Gradient {
        from: Color,
        to: Color,
        #[serde(default)]
        direction: GradientDirection,
    },
    Image {
        url: String,
        #[serde(default)]
        size: BackgroundSize,
        #[serde(default)]
        position: BackgroundPosition,
    },
}

impl BackgroundFill {
    pub fn type_name(&self) -> &'static str {
        match self {
            BackgroundFill::Color { .. } => "color",
            BackgroundFill::Gradient { .. } => "gradient",
            BackgroundFill::Image { .. } => "image",
        }
    }
}

/// The compositing layer beneath all elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    #[serde(flatten)]
    pub fill: BackgroundFill,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            fill: BackgroundFill::Color {
                color: Color::WHITE,
            },
            opacity: 1.0,
        }
    }
}

impl Background {
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
    }
}

// ─── Canvas ──────────────────────────────────────────────────────────────

/// Logical canvas size in pixels: the exported document's dimensions.
/// Independent of on-screen zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 700.0,
        }
    }
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: clamp_size(width),
            height: clamp_size(height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#6C5CE7").unwrap();
        assert_eq!(c.to_hex(), "#6C5CE7");

        let c2 = Color::from_hex("#FF000080").unwrap();
        assert!((c2.a - 128.0 / 255.0).abs() < 0.01);
        assert_eq!(c2.to_hex().len(), 9);
    }

    #[test]
    fn color_short_forms() {
        assert_eq!(Color::from_hex("#fff").unwrap().to_hex(), "#FFFFFF");
        assert_eq!(Color::from_hex("0f08").unwrap().to_hex(), "#00FF0088");
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("#GGGGGG").is_none());
    }

    #[test]
    fn color_css_uses_rgba_when_translucent() {
        assert_eq!(Color::BLACK.to_css(), "#000000");
        let half = Color::rgba(1.0, 0.0, 0.0, 0.5);
        assert_eq!(half.to_css(), "rgba(255, 0, 0, 0.5)");
    }

    #[test]
    fn size_is_clamped() {
        let mut el = Element::new(ElementId::intern("m1"), ElementType::Shape, 1);
        el.set_size(0.0, -20.0);
        assert_eq!(el.width, MIN_ELEMENT_SIZE);
        assert_eq!(el.height, MIN_ELEMENT_SIZE);
        el.set_size(f32::NAN, 40.0);
        assert_eq!(el.width, MIN_ELEMENT_SIZE);
        assert_eq!(el.height, 40.0);
    }

    #[test]
    fn opacity_is_clamped() {
        let mut el = Element::new(ElementId::intern("m2"), ElementType::Text, 1);
        el.set_opacity(1.7);
        assert_eq!(el.opacity, 1.0);
        el.set_opacity(-0.2);
        assert_eq!(el.opacity, 0.0);
    }

    #[test]
    fn element_json_uses_type_tag() {
        let json = r##"{
            "id": "headline", "type": "text",
            "x": 10, "y": 20, "width": 300, "height": 40,
            "zIndex": 3, "content": "Certificate of Completion",
            "fontSize": 32, "fontWeight": "bold", "color": "#1F2937"
        }"##;
        let el: Element = serde_json::from_str(json).unwrap();
        assert_eq!(el.id.as_str(), "headline");
        assert_eq!(el.z_index, 3);
        assert_eq!(el.opacity, 1.0);
        match &el.kind {
            ElementKind::Text(t) => {
                assert_eq!(t.content, "Certificate of Completion");
                assert_eq!(t.font_weight, FontWeight::Bold);
                // Missing fields fall back to defaults.
                assert_eq!(t.font_style, FontStyle::Normal);
                assert_eq!(t.font_family, "Arial");
            }
            _ => panic!("expected text element"),
        }
    }

    #[test]
    fn background_json_variants() {
        let bg: Background = serde_json::from_str(
            r##"{"type":"gradient","from":"#FFF","to":"#000","direction":"135deg","opacity":0.5}"##,
        )
        .unwrap();
        assert_eq!(bg.opacity, 0.5);
        assert_eq!(
            bg.fill,
            BackgroundFill::Gradient {
                from: Color::WHITE,
                to: Color::BLACK,
                direction: GradientDirection::Angle(135.0),
            }
        );

        let img: Background = serde_json::from_str(
            r#"{"type":"image","url":"border.png","position":"top left"}"#,
        )
        .unwrap();
        assert_eq!(img.opacity, 1.0);
        match img.fill {
            BackgroundFill::Image { size, position, .. } => {
                assert_eq!(size, BackgroundSize::Cover);
                assert_eq!(position, BackgroundPosition::TopLeft);
            }
            _ => panic!("expected image background"),
        }
    }

    #[test]
    fn gradient_direction_parse() {
        assert_eq!(
            GradientDirection::parse("to bottom right"),
            Some(GradientDirection::ToBottomRight)
        );
        assert_eq!(
            GradientDirection::parse("45"),
            Some(GradientDirection::Angle(45.0))
        );
        assert_eq!(GradientDirection::parse("sideways"), None);
        assert_eq!(GradientDirection::Angle(90.5).to_css(), "90.5deg");
    }
}
