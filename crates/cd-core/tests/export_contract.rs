//! Integration tests: document → HTML export contract.
//!
//! Exercises the full `cd-core` pipeline: payload → Document → ordered
//! elements → standalone HTML.

use cd_core::*;
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn place(doc: &mut Document, ty: ElementType, x: f32, y: f32, z: i32) -> ElementId {
    let id = doc.add(ty);
    doc.update(
        id,
        ElementPatch::common(CommonPatch {
            x: Some(x),
            y: Some(y),
            z_index: Some(z),
            ..Default::default()
        }),
    );
    id
}

/// Byte offset of an element's block in the exported HTML.
fn block_offset(html: &str, id: ElementId) -> usize {
    let needle = format!("data-id=\"{}\"", id.as_str());
    html.find(&needle)
        .unwrap_or_else(|| panic!("{needle} missing from export"))
}

// ─── Determinism ────────────────────────────────────────────────────────

#[test]
fn same_state_serializes_identically() {
    init_logging();
    let mut doc = Document::new();
    place(&mut doc, ElementType::Text, 10.0, 10.0, 1);
    place(&mut doc, ElementType::Shape, 40.0, 60.0, 2);
    doc.set_background(Background {
        fill: BackgroundFill::Gradient {
            from: Color::from_hex("#FDF6E3").unwrap(),
            to: Color::from_hex("#EEE8D5").unwrap(),
            direction: GradientDirection::ToBottomRight,
        },
        opacity: 0.9,
    });

    let first = emit_html(&doc);
    let second = emit_html(&doc);
    assert_eq!(first, second);

    let reloaded = Document::from_json(&doc.to_json().unwrap()).unwrap();
    assert_eq!(emit_html(&reloaded), first);
}

#[test]
fn stacking_index_decides_order_not_insertion() {
    let mut doc = Document::new();
    let a = place(&mut doc, ElementType::Text, 0.0, 0.0, 1);
    let b = place(&mut doc, ElementType::Shape, 0.0, 0.0, 2);
    let html = emit_html(&doc);
    assert!(block_offset(&html, a) < block_offset(&html, b));

    // Swap the indices without touching insertion order.
    doc.update(
        a,
        ElementPatch::common(CommonPatch {
            z_index: Some(2),
            ..Default::default()
        }),
    );
    doc.update(
        b,
        ElementPatch::common(CommonPatch {
            z_index: Some(1),
            ..Default::default()
        }),
    );
    let swapped = emit_html(&doc);
    assert_ne!(html, swapped);
    assert!(block_offset(&swapped, b) < block_offset(&swapped, a));
}

#[test]
fn ties_serialize_in_insertion_order() {
    let mut doc = Document::new();
    let ids: Vec<ElementId> = (0..4)
        .map(|i| place(&mut doc, ElementType::Shape, i as f32, 0.0, 7))
        .collect();
    let html = emit_html(&doc);
    let offsets: Vec<usize> = ids.iter().map(|id| block_offset(&html, *id)).collect();
    let mut sorted = offsets.clone();
    sorted.sort();
    assert_eq!(offsets, sorted);
}

#[test]
fn ordering_holds_across_add_and_duplicate() {
    let mut doc = Document::new();
    let a = doc.add(ElementType::Text);
    doc.add(ElementType::Image);
    doc.duplicate(a);
    doc.add(ElementType::Shape);
    let last = doc.elements().last().unwrap().id;
    doc.duplicate(last);

    let z: Vec<i32> = doc.ordered().iter().map(|e| e.z_index).collect();
    assert!(z.windows(2).all(|w| w[0] <= w[1]), "{z:?}");

    let html = emit_html(&doc);
    let offsets: Vec<usize> = doc
        .ordered()
        .iter()
        .map(|e| block_offset(&html, e.id))
        .collect();
    assert!(offsets.windows(2).all(|w| w[0] < w[1]));
}

// ─── Element blocks ─────────────────────────────────────────────────────

#[test]
fn element_block_inline_style() {
    let mut doc = Document::new();
    let id = doc.add(ElementType::Text);
    doc.update(
        id,
        ElementPatch::common(CommonPatch {
            x: Some(100.0),
            y: Some(80.0),
            width: Some(400.0),
            height: Some(60.0),
            rotation: Some(-12.5),
            opacity: Some(0.75),
            z_index: Some(3),
        }),
    );
    let block = emit_element(doc.get(id).unwrap());
    assert!(block.contains(
        "position: absolute; left: 100px; top: 80px; width: 400px; height: 60px; \
         transform: rotate(-12.5deg); opacity: 0.75; z-index: 3;"
    ));
    assert!(block.contains("display: flex; align-items: center; justify-content: center;"));
}

#[test]
fn circle_exports_fully_rounded() {
    let mut doc = Document::new();
    let id = doc.add(ElementType::Shape);
    doc.update(
        id,
        ElementPatch::shape(ShapePatch {
            shape_type: Some(ShapeType::Circle),
            border_radius: Some(5.0),
            ..Default::default()
        }),
    );
    let html = emit_html(&doc);
    assert!(html.contains("border-radius: 50%;"));
    assert!(!html.contains("border-radius: 5px;"));
}

#[test]
fn rectangle_keeps_numeric_radius() {
    let mut doc = Document::new();
    let id = doc.add(ElementType::Shape);
    doc.update(
        id,
        ElementPatch::shape(ShapePatch {
            border_radius: Some(5.0),
            ..Default::default()
        }),
    );
    assert!(emit_html(&doc).contains("border-radius: 5px;"));
}

#[test]
fn duplicate_text_scenario() {
    let mut doc = Document::new();
    let text = doc.add(ElementType::Text);
    doc.update(text, ElementPatch::position(100.0, 100.0));
    doc.add(ElementType::Shape);
    let prior_max = doc.max_z_index();

    let copy = doc.duplicate(text).expect("duplicate of existing element");
    let el = doc.get(copy).unwrap();
    assert_ne!(copy, text);
    assert_eq!((el.x, el.y), (120.0, 120.0));
    assert_eq!(el.z_index, prior_max + 1);
    assert_eq!(doc.selected_id(), Some(copy));
}

// ─── Background layer ───────────────────────────────────────────────────

#[test]
fn background_layer_from_payload() {
    let json = r#"{
        "canvas": { "width": 1123, "height": 794 },
        "background": { "type": "image", "url": "https://cdn.example.com/frame.png", "size": "contain", "position": "top", "opacity": 0.6 },
        "elements": []
    }"#;
    let doc = Document::from_json(json).unwrap();
    let html = emit_html(&doc);
    assert!(html.contains("width: 1123px; height: 794px;"));
    assert!(html.contains(
        "background-image: url(&#39;https://cdn.example.com/frame.png&#39;); \
         background-size: contain; background-position: top; background-repeat: no-repeat; \
         opacity: 0.6;"
    ));
    assert_eq!(html.matches("certificate-background").count(), 1);
}
