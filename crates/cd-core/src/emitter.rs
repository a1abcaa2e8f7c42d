//! Emitter: Document → standalone HTML.
//!
//! The output is a self-contained page: a fixed-size root container at the
//! canvas's logical size, one background layer, then one absolutely
//! positioned block per element in paint order. It depends on nothing from
//! the editor at runtime and is byte-identical for identical input.

use crate::document::Document;
use crate::model::*;
use crate::style::{
    IMAGE_CSS, background_css, element_css, escape_html, format_num, line_bar_css,
};
use std::fmt::Write;

/// Emit the whole document as an HTML page.
#[must_use]
pub fn emit_html(doc: &Document) -> String {
    let canvas = doc.canvas();
    let w = format_num(canvas.width);
    let h = format_num(canvas.height);
    let elements = doc.ordered();

    let mut out = String::with_capacity(2048 + elements.len() * 512);

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str("<title>Certificate</title>\n");
    emit_stylesheet(&mut out, &w, &h);
    out.push_str("</head>\n<body>\n");

    out.push_str("<div class=\"certificate\">\n");
    let _ = writeln!(
        out,
        "  <div class=\"certificate-background\" style=\"{}\"></div>",
        escape_html(&background_css(doc.background()))
    );
    for el in elements {
        out.push_str("  ");
        emit_element_into(&mut out, el);
        out.push('\n');
    }
    out.push_str("</div>\n");

    out.push_str("</body>\n</html>\n");
    out
}

fn emit_stylesheet(out: &mut String, w: &str, h: &str) {
    out.push_str("<style>\n");
    out.push_str("  * { margin: 0; padding: 0; box-sizing: border-box; }\n");
    out.push_str(
        "  body { background: #F3F4F6; padding: 40px; display: flex; justify-content: center; }\n",
    );
    let _ = writeln!(
        out,
        "  .certificate {{ position: relative; width: {w}px; height: {h}px; overflow: hidden; \
         background: #FFFFFF; box-shadow: 0 10px 25px rgba(0, 0, 0, 0.15); }}"
    );
    let _ = writeln!(out, "  @page {{ size: {w}px {h}px; margin: 0; }}");
    out.push_str("  @media print {\n");
    out.push_str("    body { background: none; padding: 0; display: block; }\n");
    out.push_str(
        "    .certificate { box-shadow: none; -webkit-print-color-adjust: exact; \
         print-color-adjust: exact; }\n",
    );
    out.push_str("  }\n");
    out.push_str("</style>\n");
}

/// Emit a single element block. Used by the editor preview as well, so the
/// canvas shows exactly what the export will contain.
#[must_use]
pub fn emit_element(el: &Element) -> String {
    let mut out = String::with_capacity(512);
    emit_element_into(&mut out, el);
    out
}

fn emit_element_into(out: &mut String, el: &Element) {
    let _ = write!(
        out,
        "<div class=\"certificate-element\" data-id=\"{}\" data-type=\"{}\" style=\"{}\">",
        escape_html(el.id.as_str()),
        el.element_type().as_str(),
        escape_html(&element_css(el))
    );
    match &el.kind {
        ElementKind::Text(t) => {
            out.push_str(&escape_html(&t.content));
        }
        ElementKind::Image(img) => {
            if !img.src.is_empty() {
                let _ = write!(
                    out,
                    "<img src=\"{}\" alt=\"\" style=\"{IMAGE_CSS}\">",
                    escape_html(&img.src)
                );
            }
        }
        ElementKind::Shape(s) => {
            if s.shape_type == ShapeType::Line {
                let _ = write!(out, "<div style=\"{}\"></div>", escape_html(&line_bar_css(s)));
            }
        }
    }
    out.push_str("</div>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::{ElementPatch, ImagePatch, TextPatch};

    #[test]
    fn shell_has_fixed_size_root_and_print_rule() {
        let doc = Document::with_canvas(Canvas::new(800.0, 600.0));
        let html = emit_html(&doc);
        assert!(html.starts_with("<!DOCTYPE html>\n"));
        assert!(html.contains(".certificate { position: relative; width: 800px; height: 600px;"));
        assert!(html.contains("@page { size: 800px 600px; margin: 0; }"));
        assert!(html.contains("@media print"));
        assert!(html.contains(".certificate { box-shadow: none;"));
        assert!(html.contains("class=\"certificate-background\""));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn text_content_is_escaped() {
        let mut doc = Document::new();
        let id = doc.add(ElementType::Text);
        doc.update(
            id,
            ElementPatch::text(TextPatch {
                content: Some("Smith & <Sons>".into()),
                ..Default::default()
            }),
        );
        let html = emit_html(&doc);
        assert!(html.contains(">Smith &amp; &lt;Sons&gt;</div>"));
    }

    #[test]
    fn image_uses_contain_and_skips_empty_src() {
        let mut doc = Document::new();
        let id = doc.add(ElementType::Image);
        assert!(!emit_html(&doc).contains("<img"));

        doc.update(
            id,
            ElementPatch::image(ImagePatch {
                src: Some("https://cdn.example.com/seal.png".into()),
            }),
        );
        let block = emit_element(doc.get(id).unwrap());
        assert!(block.contains("<img src=\"https://cdn.example.com/seal.png\""));
        assert!(block.contains("object-fit: contain;"));
    }

    #[test]
    fn line_shape_draws_bar() {
        let mut doc = Document::new();
        let id = doc.add(ElementType::Shape);
        doc.update(
            id,
            ElementPatch::shape(crate::patch::ShapePatch {
                shape_type: Some(ShapeType::Line),
                border_width: Some(3.0),
                ..Default::default()
            }),
        );
        let block = emit_element(doc.get(id).unwrap());
        assert!(block.contains("<div style=\"width: 100%; height: 3px; background-color: #374151;\"></div>"));
        assert!(!block.contains("border-radius"));
    }
}
