//! Drag interaction: a two-state machine over pointer events.
//!
//! ```text
//!            pointer-down on element
//!   Idle ──────────────────────────────▶ Dragging { id, pointer_id, offset }
//!    ▲                                        │  pointer-move ⇒ MoveTo
//!    └──────── pointer-up / cancel ───────────┘
//! ```
//!
//! Global move/up listeners belong to the `Dragging` state: they are
//! attached on the transition into it and detached on every transition out
//! of it, including teardown. The controller never touches the document; it
//! emits `Mutation`s that the session applies.

use crate::input::InputEvent;
use crate::session::Mutation;
use cd_core::document::Document;
use cd_core::hit::hit_test;
use cd_core::id::ElementId;
use cd_core::transform::CanvasTransform;
use smallvec::{SmallVec, smallvec};

/// Mutations produced by one input event.
pub type Mutations = SmallVec<[Mutation; 2]>;

/// Host-side pointer listeners that must exist only while a drag is live.
///
/// In the browser these are the window-level `pointermove`/`pointerup`
/// handlers; elsewhere they may do nothing.
pub trait GlobalListeners {
    fn attach(&mut self);
    fn detach(&mut self);
}

/// Listener hooks for hosts that deliver every pointer event anyway.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListeners;

impl GlobalListeners for NoopListeners {
    fn attach(&mut self) {}
    fn detach(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        id: ElementId,
        pointer_id: i32,
        /// Pointer position minus element position, in logical pixels.
        offset: (f32, f32),
    },
}

pub struct InteractionController<L: GlobalListeners> {
    state: DragState,
    listeners: L,
}

impl<L: GlobalListeners> InteractionController<L> {
    pub fn new(listeners: L) -> Self {
        Self {
            state: DragState::Idle,
            listeners,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Element being dragged, if any.
    pub fn dragged(&self) -> Option<ElementId> {
        match self.state {
            DragState::Dragging { id, .. } => Some(id),
            DragState::Idle => None,
        }
    }

    pub fn listeners(&self) -> &L {
        &self.listeners
    }

    pub fn listeners_mut(&mut self) -> &mut L {
        &mut self.listeners
    }

    /// Translate one input event into mutations.
    ///
    /// Key events are not handled here. Pointer events are ignored while the
    /// transform is unmeasured, since no logical position can be derived.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        doc: &Document,
        transform: &CanvasTransform,
    ) -> Mutations {
        match *event {
            InputEvent::PointerDown { x, y, pointer_id } => {
                self.pointer_down(x, y, pointer_id, doc, transform)
            }
            InputEvent::PointerMove { x, y, pointer_id } => {
                self.pointer_move(x, y, pointer_id, doc, transform)
            }
            InputEvent::PointerUp { pointer_id, .. }
            | InputEvent::PointerCancel { pointer_id } => {
                if self.owns(pointer_id) {
                    self.transition(DragState::Idle);
                }
                SmallVec::new()
            }
            InputEvent::Key { .. } => SmallVec::new(),
        }
    }

    /// Leave any drag in progress and release the global listeners.
    pub fn teardown(&mut self) {
        self.transition(DragState::Idle);
    }

    fn pointer_down(
        &mut self,
        x: f32,
        y: f32,
        pointer_id: i32,
        doc: &Document,
        transform: &CanvasTransform,
    ) -> Mutations {
        if self.is_dragging() {
            log::trace!("pointer {pointer_id} down during drag, ignored");
            return SmallVec::new();
        }
        let Some((lx, ly)) = transform.to_logical(x, y) else {
            log::trace!("pointer down before canvas measured, ignored");
            return SmallVec::new();
        };

        match hit_test(doc, lx, ly).and_then(|id| doc.get(id)) {
            Some(el) => {
                let offset = (lx - el.x, ly - el.y);
                log::trace!("drag start {} offset {offset:?}", el.id);
                self.transition(DragState::Dragging {
                    id: el.id,
                    pointer_id,
                    offset,
                });
                smallvec![Mutation::Select(Some(el.id))]
            }
            None => smallvec![Mutation::Select(None)],
        }
    }

    fn pointer_move(
        &mut self,
        x: f32,
        y: f32,
        pointer_id: i32,
        doc: &Document,
        transform: &CanvasTransform,
    ) -> Mutations {
        let DragState::Dragging {
            id,
            pointer_id: captured,
            offset: (ox, oy),
        } = self.state
        else {
            return SmallVec::new();
        };
        if captured != pointer_id {
            return SmallVec::new();
        }
        if !doc.contains(id) {
            log::debug!("dragged element {id} vanished, ending drag");
            self.transition(DragState::Idle);
            return SmallVec::new();
        }
        let Some((lx, ly)) = transform.to_logical(x, y) else {
            log::trace!("pointer move with unmeasured canvas, ignored");
            return SmallVec::new();
        };

        smallvec![Mutation::MoveTo {
            id,
            x: (lx - ox).max(0.0),
            y: (ly - oy).max(0.0),
        }]
    }

    fn owns(&self, pointer_id: i32) -> bool {
        matches!(self.state, DragState::Dragging { pointer_id: p, .. } if p == pointer_id)
    }

    /// Single place where the state changes, so listener registration
    /// tracks `Dragging` exactly.
    fn transition(&mut self, next: DragState) {
        let was = self.is_dragging();
        self.state = next;
        match (was, self.is_dragging()) {
            (false, true) => self.listeners.attach(),
            (true, false) => {
                log::trace!("drag end");
                self.listeners.detach();
            }
            _ => {}
        }
    }
}

impl<L: GlobalListeners> Drop for InteractionController<L> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cd_core::model::ElementType;
    use cd_core::patch::{CommonPatch, ElementPatch};
    use cd_core::transform::CanvasRect;

    #[derive(Default)]
    struct Counting {
        attached: u32,
        detached: u32,
    }

    impl GlobalListeners for Counting {
        fn attach(&mut self) {
            self.attached += 1;
        }
        fn detach(&mut self) {
            self.detached += 1;
        }
    }

    fn unit_transform() -> CanvasTransform {
        let mut t = CanvasTransform::default();
        t.set_zoom(1.0);
        t.measure(CanvasRect {
            left: 0.0,
            top: 0.0,
            width: 1000.0,
            height: 700.0,
        });
        t
    }

    fn doc_with_box() -> (Document, ElementId) {
        let mut doc = Document::new();
        let id = doc.add(ElementType::Shape);
        doc.update(
            id,
            ElementPatch::common(CommonPatch {
                x: Some(10.0),
                y: Some(10.0),
                width: Some(50.0),
                height: Some(50.0),
                ..Default::default()
            }),
        );
        doc.clear_selection();
        (doc, id)
    }

    #[test]
    fn down_on_element_starts_drag() {
        let (doc, id) = doc_with_box();
        let t = unit_transform();
        let mut ctl = InteractionController::new(Counting::default());

        let out = ctl.handle(&InputEvent::pointer_down(30.0, 30.0, 1), &doc, &t);
        assert_eq!(out.as_slice(), &[Mutation::Select(Some(id))]);
        assert_eq!(
            ctl.state(),
            DragState::Dragging {
                id,
                pointer_id: 1,
                offset: (20.0, 20.0)
            }
        );
        assert_eq!(ctl.listeners().attached, 1);
    }

    #[test]
    fn down_on_background_clears_selection() {
        let (doc, _) = doc_with_box();
        let t = unit_transform();
        let mut ctl = InteractionController::new(Counting::default());

        let out = ctl.handle(&InputEvent::pointer_down(500.0, 500.0, 1), &doc, &t);
        assert_eq!(out.as_slice(), &[Mutation::Select(None)]);
        assert!(!ctl.is_dragging());
        assert_eq!(ctl.listeners().attached, 0);
    }

    #[test]
    fn second_down_and_foreign_pointer_ignored() {
        let (doc, id) = doc_with_box();
        let t = unit_transform();
        let mut ctl = InteractionController::new(Counting::default());
        ctl.handle(&InputEvent::pointer_down(30.0, 30.0, 1), &doc, &t);

        assert!(
            ctl.handle(&InputEvent::pointer_down(35.0, 35.0, 2), &doc, &t)
                .is_empty()
        );
        assert!(
            ctl.handle(&InputEvent::pointer_move(90.0, 90.0, 2), &doc, &t)
                .is_empty()
        );
        ctl.handle(&InputEvent::pointer_up(90.0, 90.0, 2), &doc, &t);
        assert_eq!(ctl.dragged(), Some(id));
        assert_eq!(ctl.listeners().attached, 1);
        assert_eq!(ctl.listeners().detached, 0);
    }

    #[test]
    fn unmeasured_transform_ignores_pointer() {
        let (doc, _) = doc_with_box();
        let t = CanvasTransform::default();
        let mut ctl = InteractionController::new(Counting::default());
        assert!(
            ctl.handle(&InputEvent::pointer_down(30.0, 30.0, 1), &doc, &t)
                .is_empty()
        );
        assert!(!ctl.is_dragging());
    }

    #[test]
    fn cancel_ends_drag() {
        let (doc, _) = doc_with_box();
        let t = unit_transform();
        let mut ctl = InteractionController::new(Counting::default());
        ctl.handle(&InputEvent::pointer_down(30.0, 30.0, 4), &doc, &t);
        ctl.handle(&InputEvent::PointerCancel { pointer_id: 4 }, &doc, &t);
        assert_eq!(ctl.state(), DragState::Idle);
        assert_eq!(ctl.listeners().detached, 1);
    }

    #[test]
    fn teardown_detaches_once() {
        let (doc, _) = doc_with_box();
        let t = unit_transform();
        let mut ctl = InteractionController::new(Counting::default());
        ctl.handle(&InputEvent::pointer_down(30.0, 30.0, 1), &doc, &t);
        ctl.teardown();
        ctl.teardown();
        assert_eq!(ctl.listeners().attached, 1);
        assert_eq!(ctl.listeners().detached, 1);
    }

    #[test]
    fn vanished_element_ends_drag() {
        let (mut doc, id) = doc_with_box();
        let t = unit_transform();
        let mut ctl = InteractionController::new(Counting::default());
        ctl.handle(&InputEvent::pointer_down(30.0, 30.0, 1), &doc, &t);
        doc.remove(id);
        assert!(
            ctl.handle(&InputEvent::pointer_move(40.0, 40.0, 1), &doc, &t)
                .is_empty()
        );
        assert!(!ctl.is_dragging());
        assert_eq!(ctl.listeners().detached, 1);
    }
}
