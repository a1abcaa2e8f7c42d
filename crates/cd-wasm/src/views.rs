//! JSON views handed to the browser: panel state, render list, key results.
//!
//! Everything here is plain data so it can be exercised without a JS host.

use cd_core::document::Document;
use cd_core::emitter::emit_element;
use cd_core::style::{background_css, element_css};
use cd_editor::properties::{PanelView, read_background, read_canvas};
use cd_editor::shortcuts::{Direction, ShortcutAction};
use serde::Serialize;
use serde_json::{Map, Value};

/// One entry of the canvas render list, in paint order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementView<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub element_type: &'static str,
    pub z_index: i32,
    pub selected: bool,
    /// Inline style shared with the export.
    pub style: String,
    /// Complete element block as exported.
    pub html: String,
}

pub fn element_views(doc: &Document) -> Vec<ElementView<'_>> {
    let selected = doc.selected_id();
    doc.ordered()
        .into_iter()
        .map(|el| ElementView {
            id: el.id.as_str(),
            element_type: el.element_type().as_str(),
            z_index: el.z_index,
            selected: selected == Some(el.id),
            style: element_css(el),
            html: emit_element(el),
        })
        .collect()
}

/// Panel state for the selection: `{}` when nothing is selected.
pub fn panel_value(panel: &PanelView) -> Value {
    let PanelView::Element {
        id,
        element_type,
        values,
    } = panel
    else {
        return Value::Object(Map::new());
    };
    let mut props = Map::new();
    props.insert("id".into(), Value::String(id.as_str().to_string()));
    props.insert("type".into(), element_type.as_str().into());
    for (field, value) in values {
        props.insert(field.name().into(), Value::String(value.clone()));
    }
    Value::Object(props)
}

/// Background and canvas fields, plus the layer's inline style.
pub fn background_value(doc: &Document) -> Value {
    let mut background = Map::new();
    for (field, value) in read_background(doc.background()) {
        background.insert(field.name().into(), Value::String(value));
    }
    background.insert(
        "style".into(),
        Value::String(background_css(doc.background())),
    );

    let mut canvas = Map::new();
    for (field, value) in read_canvas(doc.canvas()) {
        canvas.insert(field.name().into(), Value::String(value));
    }

    serde_json::json!({
        "background": background,
        "canvas": canvas,
    })
}

pub fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::Delete => "delete",
        ShortcutAction::Duplicate => "duplicate",
        ShortcutAction::Nudge { direction, large } => match (direction, large) {
            (Direction::Left, false) => "nudgeLeft",
            (Direction::Right, false) => "nudgeRight",
            (Direction::Up, false) => "nudgeUp",
            (Direction::Down, false) => "nudgeDown",
            (Direction::Left, true) => "nudgeLeftLarge",
            (Direction::Right, true) => "nudgeRightLarge",
            (Direction::Up, true) => "nudgeUpLarge",
            (Direction::Down, true) => "nudgeDownLarge",
        },
        ShortcutAction::ZoomIn => "zoomIn",
        ShortcutAction::ZoomOut => "zoomOut",
        ShortcutAction::ZoomToFit => "zoomToFit",
        ShortcutAction::SendBackward => "sendBackward",
        ShortcutAction::BringForward => "bringForward",
        ShortcutAction::SendToBack => "sendToBack",
        ShortcutAction::BringToFront => "bringToFront",
        ShortcutAction::Deselect => "deselect",
    }
}
