//! Inline CSS for elements and the background layer.
//!
//! Shared by the HTML emitter and the editor's live preview so both paint
//! an element identically. Every function here is pure and deterministic.

use crate::model::*;
use std::fmt::Write;

/// Compact number formatting: integers without a decimal point, otherwise
/// at most two decimals with trailing zeros trimmed. Non-finite → `0`.
pub fn format_num(n: f32) -> String {
    if !n.is_finite() {
        return "0".to_string();
    }
    if n == n.floor() {
        format!("{}", n as i64)
    } else {
        let s = format!("{n:.2}");
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "-0" { "0".to_string() } else { s.to_string() }
    }
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Font family as a single-quoted CSS string with a generic fallback.
fn font_family_css(family: &str) -> String {
    let clean: String = family
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | ';' | '<' | '>' | '\\' | '{' | '}'))
        .collect();
    let clean = clean.trim();
    if clean.is_empty() {
        "sans-serif".to_string()
    } else {
        format!("'{clean}', sans-serif")
    }
}

/// URL for use inside `url('...')`.
fn css_url(url: &str) -> String {
    url.chars()
        .filter(|c| !matches!(c, '\n' | '\r'))
        .map(|c| match c {
            '\'' => "%27".to_string(),
            '"' => "%22".to_string(),
            '\\' => "%5C".to_string(),
            other => other.to_string(),
        })
        .collect()
}

/// Geometry + layering rules common to every element.
///
/// `position: absolute; left: Xpx; top: Ypx; width: Wpx; height: Hpx;
/// transform: rotate(Ddeg); opacity: O; z-index: I;`
pub fn element_box_css(el: &Element) -> String {
    format!(
        "position: absolute; left: {}px; top: {}px; width: {}px; height: {}px; \
         transform: rotate({}deg); opacity: {}; z-index: {};",
        format_num(el.x),
        format_num(el.y),
        format_num(el.width),
        format_num(el.height),
        format_num(el.rotation),
        format_num(el.opacity),
        el.z_index
    )
}

/// Kind-specific visual rules for the element's own box.
pub fn element_kind_css(el: &Element) -> String {
    let mut css = String::new();
    match &el.kind {
        ElementKind::Text(t) => {
            let justify = match t.text_align {
                TextAlign::Left => "flex-start",
                TextAlign::Center => "center",
                TextAlign::Right => "flex-end",
            };
            let _ = write!(
                css,
                "display: flex; align-items: center; justify-content: {justify}; \
                 text-align: {}; font-family: {}; font-size: {}px; font-weight: {}; \
                 font-style: {}; color: {}; text-decoration: {}; \
                 white-space: pre-wrap; word-break: break-word; line-height: 1.2;",
                t.text_align.as_str(),
                font_family_css(&t.font_family),
                format_num(t.font_size),
                t.font_weight.as_str(),
                t.font_style.as_str(),
                t.color.to_css(),
                if t.underline { "underline" } else { "none" },
            );
        }
        ElementKind::Image(_) => {
            css.push_str("overflow: hidden;");
        }
        ElementKind::Shape(s) => match s.shape_type {
            ShapeType::Rectangle | ShapeType::Circle => {
                let radius = if s.shape_type == ShapeType::Circle {
                    "50%".to_string()
                } else {
                    format!("{}px", format_num(s.border_radius.max(0.0)))
                };
                let _ = write!(
                    css,
                    "box-sizing: border-box; background-color: {}; border: {}px solid {}; \
                     border-radius: {radius};",
                    s.fill_color.to_css(),
                    format_num(s.border_width.max(0.0)),
                    s.border_color.to_css(),
                );
            }
            ShapeType::Line => {
                css.push_str("display: flex; align-items: center;");
            }
        },
    }
    css
}

/// Full inline style for an element block.
pub fn element_css(el: &Element) -> String {
    format!("{} {}", element_box_css(el), element_kind_css(el))
}

/// Style of the bar drawn inside a line shape.
pub fn line_bar_css(s: &ShapeStyle) -> String {
    format!(
        "width: 100%; height: {}px; background-color: {};",
        format_num(s.border_width.max(1.0)),
        s.border_color.to_css()
    )
}

/// Style of the `<img>` inside an image element.
pub const IMAGE_CSS: &str = "display: block; width: 100%; height: 100%; object-fit: contain;";

/// Inline style for the background layer.
pub fn background_css(bg: &Background) -> String {
    let mut css = String::from("position: absolute; left: 0; top: 0; width: 100%; height: 100%; ");
    match &bg.fill {
        BackgroundFill::Color { color } => {
            let _ = write!(css, "background-color: {};", color.to_css());
        }
        BackgroundFill::Gradient {
            from,
            to,
            direction,
        } => {
            let _ = write!(
                css,
                "background: linear-gradient({}, {}, {});",
                direction.to_css(),
                from.to_css(),
                to.to_css()
            );
        }
        BackgroundFill::Image { url, .. } if url.trim().is_empty() => {
            css.push_str("background-color: transparent;");
        }
        BackgroundFill::Image {
            url,
            size,
            position,
        } => {
            let _ = write!(
                css,
                "background-image: url('{}'); background-size: {}; \
                 background-position: {}; background-repeat: no-repeat;",
                css_url(url),
                size.to_css(),
                position.as_str()
            );
        }
    }
    let _ = write!(css, " opacity: {};", format_num(bg.opacity));
    css
}
