//! Editor session: the one place where the layout changes.
//!
//! Controllers, the property panel and shortcuts produce `Mutation`s; the
//! session applies them to its `Document`. It also owns the canvas transform,
//! the drag controller, and the queue of pending image reads.

use crate::input::InputEvent;
use crate::interaction::{GlobalListeners, InteractionController, NoopListeners};
use crate::properties::{self, Field, PanelView};
use crate::shortcuts::{NUDGE_STEP, NUDGE_STEP_LARGE, ShortcutAction, ShortcutMap};
use crate::upload::{self, UploadQueue, UploadTarget, UploadTicket};
use cd_core::document::Document;
use cd_core::emitter::emit_html;
use cd_core::id::ElementId;
use cd_core::model::*;
use cd_core::patch::{ElementPatch, ImagePatch};
use cd_core::transform::{CanvasTransform, ZoomRange};

/// Direction of a stacking change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackMove {
    Forward,
    Backward,
    Front,
    Back,
}

/// A single change to the layout.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Select an element, or clear the selection with `None`.
    Select(Option<ElementId>),
    MoveTo { id: ElementId, x: f32, y: f32 },
    Add(ElementType),
    Update { id: ElementId, patch: ElementPatch },
    Remove(ElementId),
    Duplicate(ElementId),
    Restack { id: ElementId, to: StackMove },
    SetBackground(Background),
    SetCanvas { width: f32, height: f32 },
}

/// Receives the exported markup (e.g. the host's persistence callback).
pub trait SaveSink {
    fn save(&mut self, markup: &str) -> Result<(), String>;
}

impl<F> SaveSink for F
where
    F: FnMut(&str) -> Result<(), String>,
{
    fn save(&mut self, markup: &str) -> Result<(), String> {
        self(markup)
    }
}

pub struct EditorSession<L: GlobalListeners = NoopListeners> {
    doc: Document,
    transform: CanvasTransform,
    controller: InteractionController<L>,
    uploads: UploadQueue,
    /// Visible area available to the canvas, for zoom-to-fit.
    viewport: Option<(f32, f32)>,
}

impl EditorSession<NoopListeners> {
    pub fn headless(doc: Document) -> Self {
        Self::new(doc, NoopListeners)
    }
}

impl<L: GlobalListeners> EditorSession<L> {
    pub fn new(doc: Document, listeners: L) -> Self {
        Self::with_zoom_range(doc, listeners, ZoomRange::default())
    }

    pub fn with_zoom_range(doc: Document, listeners: L, range: ZoomRange) -> Self {
        Self {
            doc,
            transform: CanvasTransform::new(range),
            controller: InteractionController::new(listeners),
            uploads: UploadQueue::new(),
            viewport: None,
        }
    }

    /// Replace the layout with a JSON payload. The current document is kept
    /// if the payload does not parse.
    pub fn load_json(&mut self, json: &str) -> Result<(), String> {
        let doc = Document::from_json(json)?;
        self.controller.teardown();
        self.uploads.clear();
        self.doc = doc;
        log::info!("loaded layout with {} elements", self.doc.len());
        Ok(())
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn transform(&self) -> &CanvasTransform {
        &self.transform
    }

    /// Mutable transform access for measuring and zooming.
    pub fn transform_mut(&mut self) -> &mut CanvasTransform {
        &mut self.transform
    }

    pub fn controller(&self) -> &InteractionController<L> {
        &self.controller
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    /// Host listener hooks, e.g. to install them after construction.
    pub fn listeners_mut(&mut self) -> &mut L {
        self.controller.listeners_mut()
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = (width > 0.0 && height > 0.0).then_some((width, height));
    }

    pub fn pending_uploads(&self) -> usize {
        self.uploads.pending()
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Route an input event. Returns true if the layout or view changed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if let InputEvent::Key { key, modifiers } = event {
            return match ShortcutMap::resolve(
                key,
                modifiers.ctrl,
                modifiers.shift,
                modifiers.alt,
                modifiers.meta,
            ) {
                Some(action) => self.dispatch(action),
                None => false,
            };
        }
        let mutations = self.controller.handle(event, &self.doc, &self.transform);
        self.apply_all(mutations)
    }

    /// Run a shortcut action against the current selection.
    pub fn dispatch(&mut self, action: ShortcutAction) -> bool {
        if !action.needs_selection() {
            return match action {
                ShortcutAction::ZoomIn => {
                    let before = self.transform.zoom();
                    self.transform.zoom_in() != before
                }
                ShortcutAction::ZoomOut => {
                    let before = self.transform.zoom();
                    self.transform.zoom_out() != before
                }
                ShortcutAction::ZoomToFit => self.zoom_to_fit(),
                _ => self.apply(Mutation::Select(None)),
            };
        }

        let Some(id) = self.doc.selected_id() else {
            log::debug!("{action:?}: nothing selected");
            return false;
        };
        let mutation = match action {
            ShortcutAction::Delete => Mutation::Remove(id),
            ShortcutAction::Duplicate => Mutation::Duplicate(id),
            ShortcutAction::SendBackward => Mutation::Restack {
                id,
                to: StackMove::Backward,
            },
            ShortcutAction::BringForward => Mutation::Restack {
                id,
                to: StackMove::Forward,
            },
            ShortcutAction::SendToBack => Mutation::Restack {
                id,
                to: StackMove::Back,
            },
            ShortcutAction::BringToFront => Mutation::Restack {
                id,
                to: StackMove::Front,
            },
            ShortcutAction::Nudge { direction, large } => {
                if self.controller.is_dragging() {
                    return false;
                }
                let Some(el) = self.doc.get(id) else {
                    return false;
                };
                let step = if large { NUDGE_STEP_LARGE } else { NUDGE_STEP };
                let (dx, dy) = direction.delta();
                Mutation::MoveTo {
                    id,
                    x: (el.x + dx * step).max(0.0),
                    y: (el.y + dy * step).max(0.0),
                }
            }
            _ => return false,
        };
        self.apply(mutation)
    }

    /// Largest zoom that shows the whole canvas in the viewport.
    pub fn zoom_to_fit(&mut self) -> bool {
        let Some((vw, vh)) = self.viewport else {
            log::debug!("zoom to fit: viewport unknown");
            return false;
        };
        let before = self.transform.zoom();
        let fit = self.transform.fit_zoom(self.doc.canvas(), vw, vh);
        self.transform.set_zoom(fit) != before
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Apply one mutation. Returns true if the model changed.
    pub fn apply(&mut self, mutation: Mutation) -> bool {
        match mutation {
            Mutation::Select(Some(id)) => {
                self.doc.selected_id() != Some(id) && self.doc.select(id)
            }
            Mutation::Select(None) => {
                let had = self.doc.selected_id().is_some();
                self.doc.clear_selection();
                had
            }
            Mutation::MoveTo { id, x, y } => {
                let Some(el) = self.doc.get(id) else {
                    return false;
                };
                if el.x == x && el.y == y {
                    return false;
                }
                self.doc.update(id, ElementPatch::position(x, y))
            }
            Mutation::Add(ty) => {
                self.add_element(ty);
                true
            }
            Mutation::Update { id, patch } => self.doc.update(id, patch),
            Mutation::Remove(id) => {
                if self.controller.dragged() == Some(id) {
                    self.controller.teardown();
                }
                self.uploads.forget_element(id);
                self.doc.remove(id).is_some()
            }
            Mutation::Duplicate(id) => self.doc.duplicate(id).is_some(),
            Mutation::Restack { id, to } => match to {
                StackMove::Forward => self.doc.bring_forward(id),
                StackMove::Backward => self.doc.send_backward(id),
                StackMove::Front => self.doc.bring_to_front(id),
                StackMove::Back => self.doc.send_to_back(id),
            },
            Mutation::SetBackground(background) => {
                self.doc.set_background(background);
                true
            }
            Mutation::SetCanvas { width, height } => {
                let before = self.doc.canvas();
                self.doc.set_canvas(width, height);
                self.doc.canvas() != before
            }
        }
    }

    /// Apply a batch; true if any of them changed the model.
    pub fn apply_all(&mut self, mutations: impl IntoIterator<Item = Mutation>) -> bool {
        mutations
            .into_iter()
            .fold(false, |changed, m| self.apply(m) | changed)
    }

    /// Add an element with creation defaults; it becomes the selection.
    pub fn add_element(&mut self, ty: ElementType) -> ElementId {
        self.doc.add(ty)
    }

    pub fn duplicate_selected(&mut self) -> Option<ElementId> {
        let id = self.doc.selected_id()?;
        self.apply(Mutation::Duplicate(id))
            .then(|| self.doc.selected_id())
            .flatten()
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.doc.selected_id() {
            Some(id) => self.apply(Mutation::Remove(id)),
            None => false,
        }
    }

    // ─── Property panel ──────────────────────────────────────────────────

    pub fn panel(&self) -> PanelView {
        properties::read(&self.doc)
    }

    /// Write a raw form value. Returns true if the model changed.
    pub fn set_property(&mut self, field: Field, raw: &str) -> bool {
        match properties::apply(&self.doc, field, raw) {
            Some(mutation) => self.apply(mutation),
            None => false,
        }
    }

    // ─── Uploads ─────────────────────────────────────────────────────────

    pub fn begin_upload(&mut self, target: UploadTarget) -> UploadTicket {
        self.uploads.begin(target)
    }

    /// Finish a read. Only a successful, usable result for a target that
    /// still accepts an image touches the model.
    pub fn complete_upload(&mut self, ticket: UploadTicket, result: Result<String, String>) -> bool {
        let Some(target) = self.uploads.finish(ticket) else {
            return false;
        };
        let src = match result {
            Ok(src) if upload::is_usable_source(&src) => src,
            Ok(_) => {
                log::warn!("upload {} produced no image data", ticket.raw());
                return false;
            }
            Err(e) => {
                log::warn!("upload {} failed: {e}", ticket.raw());
                return false;
            }
        };

        match target {
            UploadTarget::ElementImage(id) => {
                if self.doc.get(id).map(Element::element_type) != Some(ElementType::Image) {
                    log::debug!("upload {}: {id} is no longer an image", ticket.raw());
                    return false;
                }
                self.apply(Mutation::Update {
                    id,
                    patch: ElementPatch::image(ImagePatch { src: Some(src) }),
                })
            }
            UploadTarget::Background => {
                let mut background = self.doc.background().clone();
                match &mut background.fill {
                    BackgroundFill::Image { url, .. } => *url = src,
                    fill => {
                        *fill = BackgroundFill::Image {
                            url: src,
                            size: BackgroundSize::default(),
                            position: BackgroundPosition::default(),
                        }
                    }
                }
                self.apply(Mutation::SetBackground(background))
            }
        }
    }

    // ─── Export ──────────────────────────────────────────────────────────

    pub fn export(&self) -> String {
        emit_html(&self.doc)
    }

    /// Export and hand the markup to `sink`, propagating its error.
    pub fn save(&self, sink: &mut dyn SaveSink) -> Result<(), String> {
        let markup = self.export();
        sink.save(&markup)
            .map_err(|e| format!("Save error: {e}"))?;
        log::debug!("saved {} bytes of markup", markup.len());
        Ok(())
    }

    /// End any drag and release host listeners.
    pub fn teardown(&mut self) {
        self.controller.teardown();
    }
}
