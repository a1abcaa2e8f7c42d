//! Hit testing: logical point → element lookup.
//!
//! Walks elements in reverse paint order (topmost first). Hit regions
//! follow each element's rotation, matching what the browser draws.

use crate::document::Document;
use crate::id::ElementId;
use crate::model::Element;

/// Whether the logical point lies inside the element's rotated box.
pub fn element_contains(el: &Element, px: f32, py: f32) -> bool {
    let (cx, cy) = el.center();
    let (dx, dy) = (px - cx, py - cy);

    // Undo the element's rotation around its center.
    let theta = (-el.rotation).to_radians();
    let (sin, cos) = theta.sin_cos();
    let lx = dx * cos - dy * sin;
    let ly = dx * sin + dy * cos;

    lx.abs() <= el.width / 2.0 && ly.abs() <= el.height / 2.0
}

/// Find the topmost element at logical position (px, py).
/// Returns `None` if the point is over the background.
pub fn hit_test(doc: &Document, px: f32, py: f32) -> Option<ElementId> {
    doc.ordered()
        .into_iter()
        .rev()
        .find(|el| element_contains(el, px, py))
        .map(|el| el.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementType;
    use crate::patch::{CommonPatch, ElementPatch};

    fn place(doc: &mut Document, ty: ElementType, x: f32, y: f32, w: f32, h: f32) -> ElementId {
        let id = doc.add(ty);
        doc.update(
            id,
            ElementPatch::common(CommonPatch {
                x: Some(x),
                y: Some(y),
                width: Some(w),
                height: Some(h),
                ..Default::default()
            }),
        );
        id
    }

    #[test]
    fn topmost_wins() {
        let mut doc = Document::new();
        let below = place(&mut doc, ElementType::Shape, 0.0, 0.0, 100.0, 100.0);
        let above = place(&mut doc, ElementType::Text, 50.0, 50.0, 100.0, 100.0);

        assert_eq!(hit_test(&doc, 75.0, 75.0), Some(above));
        assert_eq!(hit_test(&doc, 25.0, 25.0), Some(below));
        assert_eq!(hit_test(&doc, 400.0, 400.0), None);

        doc.send_to_back(above);
        assert_eq!(hit_test(&doc, 75.0, 75.0), Some(below));
    }

    #[test]
    fn rotation_moves_hit_region() {
        let mut doc = Document::new();
        let bar = place(&mut doc, ElementType::Shape, 0.0, 45.0, 100.0, 10.0);
        // Horizontal bar: the far end is hit, a point above the center is not.
        assert_eq!(hit_test(&doc, 95.0, 50.0), Some(bar));
        assert_eq!(hit_test(&doc, 50.0, 10.0), None);

        doc.update(
            bar,
            ElementPatch::common(CommonPatch {
                rotation: Some(90.0),
                ..Default::default()
            }),
        );
        // Vertical now: the reverse.
        assert_eq!(hit_test(&doc, 95.0, 50.0), None);
        assert_eq!(hit_test(&doc, 50.0, 10.0), Some(bar));
    }
}
