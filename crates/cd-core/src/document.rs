//! The editable layout document: canvas, background, elements, selection.
//!
//! Elements are kept in insertion order. Painting and export order come
//! from [`Document::ordered`], a stable sort on `z_index`, so elements that
//! share an index keep the order in which they were added.

use crate::id::ElementId;
use crate::model::*;
use crate::patch::ElementPatch;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Offset applied to a duplicated element so the copy is visibly distinct.
pub const DUPLICATE_OFFSET: f32 = 20.0;

/// JSON shape of a stored layout (the inbound seed and the state snapshot).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentPayload {
    #[serde(default)]
    pub canvas: Canvas,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// A certificate layout being edited.
#[derive(Debug, Clone, Default)]
pub struct Document {
    canvas: Canvas,
    background: Background,
    elements: Vec<Element>,
    selected: Option<ElementId>,
}

impl Document {
    /// An empty document with the default canvas and a white background.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas(canvas: Canvas) -> Self {
        Self {
            canvas,
            ..Self::default()
        }
    }

    /// Seed a document from a stored payload. Invalid geometry is repaired
    /// and duplicate ids are replaced with fresh ones.
    pub fn from_payload(payload: DocumentPayload) -> Self {
        let mut doc = Self {
            canvas: Canvas::new(payload.canvas.width, payload.canvas.height),
            background: payload.background,
            elements: Vec::with_capacity(payload.elements.len()),
            selected: None,
        };
        doc.background.set_opacity(doc.background.opacity);

        let mut seen = HashSet::new();
        for mut el in payload.elements {
            if !seen.insert(el.id) {
                let fresh = doc.fresh_id(el.element_type());
                log::debug!("duplicate element id {} in payload; renamed to {fresh}", el.id);
                el.id = fresh;
                seen.insert(fresh);
            }
            el.normalize();
            doc.elements.push(el);
        }
        doc
    }

    /// Parse a JSON payload `{ canvas, background, elements }`.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let payload: DocumentPayload =
            serde_json::from_str(json).map_err(|e| format!("Layout payload error: {e}"))?;
        Ok(Self::from_payload(payload))
    }

    /// Snapshot of the current state, in insertion order.
    pub fn to_payload(&self) -> DocumentPayload {
        DocumentPayload {
            canvas: self.canvas,
            background: self.background.clone(),
            elements: self.elements.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(&self.to_payload()).map_err(|e| format!("Layout encode error: {e}"))
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn set_canvas(&mut self, width: f32, height: f32) {
        self.canvas = Canvas::new(width, height);
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn set_background(&mut self, mut background: Background) {
        background.set_opacity(background.opacity);
        self.background = background;
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Elements in paint order: ascending `z_index`, ties by insertion.
    pub fn ordered(&self) -> Vec<&Element> {
        let mut out: Vec<&Element> = self.elements.iter().collect();
        out.sort_by_key(|e| e.z_index);
        out
    }

    pub fn max_z_index(&self) -> i32 {
        self.elements.iter().map(|e| e.z_index).max().unwrap_or(0)
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn selected_id(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Element> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Select an existing element. Unknown ids leave the selection alone.
    pub fn select(&mut self, id: ElementId) -> bool {
        if self.contains(id) {
            self.selected = Some(id);
            true
        } else {
            log::debug!("select: no element {id}");
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    // ─── Element operations ──────────────────────────────────────────────

    /// A kind-prefixed id not used by any element in this document.
    pub fn fresh_id(&self, ty: ElementType) -> ElementId {
        loop {
            let id = ElementId::with_prefix(ty.as_str());
            if !self.contains(id) {
                return id;
            }
        }
    }

    /// Add an element of `ty` with creation defaults on top of the stack
    /// and select it.
    pub fn add(&mut self, ty: ElementType) -> ElementId {
        let id = self.fresh_id(ty);
        let floor = (self.elements.len() as i32).max(self.max_z_index());
        let z_index = self.next_z_index(floor);
        self.elements.push(Element::new(id, ty, z_index));
        self.selected = Some(id);
        log::debug!("added {} element {id} at z {z_index}", ty.as_str());
        id
    }

    /// Merge `patch` into the element `id`. Unknown ids and patches for a
    /// different element kind are no-ops; returns whether anything applied.
    pub fn update(&mut self, id: ElementId, patch: ElementPatch) -> bool {
        let Some(el) = self.elements.iter_mut().find(|e| e.id == id) else {
            log::debug!("update: no element {id}");
            return false;
        };
        let ty = el.element_type();
        let applied = patch.apply_to(el);
        if !applied {
            log::warn!("update: patch does not fit {} element {id}", ty.as_str());
        }
        applied
    }

    /// Remove an element. Clears the selection if it pointed at it.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let pos = self.elements.iter().position(|e| e.id == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        log::debug!("removed element {id}");
        Some(self.elements.remove(pos))
    }

    /// Copy an element, offset by `DUPLICATE_OFFSET`, with a new id and the
    /// top-most stacking index. The copy becomes the selection.
    pub fn duplicate(&mut self, id: ElementId) -> Option<ElementId> {
        let mut copy = self.get(id)?.clone();
        copy.id = self.fresh_id(copy.element_type());
        copy.x += DUPLICATE_OFFSET;
        copy.y += DUPLICATE_OFFSET;
        copy.z_index = self.next_z_index(self.max_z_index());
        let new_id = copy.id;
        self.elements.push(copy);
        self.selected = Some(new_id);
        log::debug!("duplicated {id} as {new_id}");
        Some(new_id)
    }

    /// `floor + 1`, or, when that would overflow, the slot above a stack
    /// freshly renumbered 1..=n.
    fn next_z_index(&mut self, floor: i32) -> i32 {
        if let Some(z) = floor.checked_add(1) {
            return z;
        }
        log::debug!("stacking index overflow; renumbering");
        let order: Vec<ElementId> = self.ordered().iter().map(|e| e.id).collect();
        self.renumber(&order);
        order.len() as i32 + 1
    }

    // ─── Layering ────────────────────────────────────────────────────────

    /// Move one step toward the front (swap with the next element in paint
    /// order). Returns true if the order changed.
    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        self.restack(id, |order, pos| {
            if pos + 1 >= order.len() {
                return false;
            }
            order.swap(pos, pos + 1);
            true
        })
    }

    /// Move one step toward the back.
    pub fn send_backward(&mut self, id: ElementId) -> bool {
        self.restack(id, |order, pos| {
            if pos == 0 {
                return false;
            }
            order.swap(pos, pos - 1);
            true
        })
    }

    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        self.restack(id, |order, pos| {
            if pos + 1 >= order.len() {
                return false;
            }
            let item = order.remove(pos);
            order.push(item);
            true
        })
    }

    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        self.restack(id, |order, pos| {
            if pos == 0 {
                return false;
            }
            let item = order.remove(pos);
            order.insert(0, item);
            true
        })
    }

    /// Reorder the paint sequence with `op`, then renumber `z_index` as
    /// 1..=n so the new order is unambiguous.
    fn restack(
        &mut self,
        id: ElementId,
        op: impl FnOnce(&mut Vec<ElementId>, usize) -> bool,
    ) -> bool {
        let mut order: Vec<ElementId> = self.ordered().iter().map(|e| e.id).collect();
        let Some(pos) = order.iter().position(|&e| e == id) else {
            log::debug!("restack: no element {id}");
            return false;
        };
        if !op(&mut order, pos) {
            return false;
        }
        self.renumber(&order);
        true
    }

    fn renumber(&mut self, order: &[ElementId]) {
        for (i, oid) in order.iter().enumerate() {
            if let Some(el) = self.elements.iter_mut().find(|e| e.id == *oid) {
                el.z_index = i as i32 + 1;
            }
        }
    }
}
