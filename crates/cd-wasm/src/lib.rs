//! WASM bridge for CD — exposes the certificate editor to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the DOM; this
//! crate owns the layout, the drag state machine, and the HTML export.

mod views;

use cd_core::document::Document;
use cd_core::id::ElementId;
use cd_core::model::ElementType;
use cd_core::style::element_css;
use cd_core::transform::CanvasRect;
use cd_editor::input::InputEvent;
use cd_editor::interaction::GlobalListeners;
use cd_editor::properties::Field;
use cd_editor::session::{EditorSession, Mutation, StackMove};
use cd_editor::shortcuts::ShortcutMap;
use cd_editor::upload::{UploadTarget, UploadTicket};
use wasm_bindgen::prelude::*;

pub use views::{ElementView, action_to_name, background_value, element_views, panel_value};

/// Window-level pointer listeners, installed by the page.
///
/// The page passes two callbacks; they are invoked exactly when a drag
/// starts and when it ends, so `pointermove`/`pointerup` listeners exist
/// only while an element is being dragged.
#[derive(Default)]
pub struct JsListeners {
    on_attach: Option<js_sys::Function>,
    on_detach: Option<js_sys::Function>,
}

impl JsListeners {
    fn call(hook: Option<&js_sys::Function>, name: &str) {
        if let Some(f) = hook
            && let Err(e) = f.call0(&JsValue::NULL)
        {
            log::warn!("{name} hook threw: {e:?}");
        }
    }
}

impl GlobalListeners for JsListeners {
    fn attach(&mut self) {
        Self::call(self.on_attach.as_ref(), "attach");
    }

    fn detach(&mut self) {
        Self::call(self.on_detach.as_ref(), "detach");
    }
}

/// The main WASM-facing editor controller.
///
/// All interaction from the page goes through this struct. Pointer
/// coordinates are viewport pixels (`clientX`/`clientY`).
#[wasm_bindgen]
pub struct CertificateEditor {
    session: EditorSession<JsListeners>,
}

impl Default for CertificateEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl CertificateEditor {
    /// Create an editor with an empty default-size layout.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_setup();
        Self {
            session: EditorSession::new(Document::new(), JsListeners::default()),
        }
    }

    /// Install the drag listener hooks. If a drag is live, the old hooks
    /// are released first.
    pub fn set_drag_hooks(&mut self, on_attach: js_sys::Function, on_detach: js_sys::Function) {
        self.session.teardown();
        self.session.listeners_mut().on_attach = Some(on_attach);
        self.session.listeners_mut().on_detach = Some(on_detach);
    }

    // ─── Layout payload ──────────────────────────────────────────────────

    /// Replace the layout with a JSON payload `{ canvas, background, elements }`.
    pub fn load_json(&mut self, json: &str) -> Result<(), JsValue> {
        self.session
            .load_json(json)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Current layout as JSON (same shape as `load_json` accepts).
    pub fn layout_json(&self) -> Result<String, JsValue> {
        self.session
            .document()
            .to_json()
            .map_err(|e| JsValue::from_str(&e))
    }

    // ─── Transform ───────────────────────────────────────────────────────

    /// Record the canvas element's bounding client rect.
    pub fn measure(&mut self, left: f32, top: f32, width: f32, height: f32) {
        self.session.transform_mut().measure(CanvasRect {
            left,
            top,
            width,
            height,
        });
    }

    /// The canvas left the page; pointer input is ignored until re-measured.
    pub fn invalidate_measure(&mut self) {
        self.session.transform_mut().invalidate();
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.session.set_viewport(width, height);
    }

    pub fn zoom(&self) -> f32 {
        self.session.transform().zoom()
    }

    /// Set zoom; returns the clamped value actually applied.
    pub fn set_zoom(&mut self, zoom: f32) -> f32 {
        self.session.transform_mut().set_zoom(zoom)
    }

    pub fn zoom_to_fit(&mut self) -> bool {
        self.session.zoom_to_fit()
    }

    pub fn canvas_width(&self) -> f32 {
        self.session.document().canvas().width
    }

    pub fn canvas_height(&self) -> f32 {
        self.session.document().canvas().height
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    /// Handle pointer down. Returns true if the layout changed.
    pub fn handle_pointer_down(&mut self, x: f32, y: f32, pointer_id: i32) -> bool {
        self.session
            .handle_input(&InputEvent::pointer_down(x, y, pointer_id))
    }

    /// Handle pointer move. Returns true if the layout changed.
    pub fn handle_pointer_move(&mut self, x: f32, y: f32, pointer_id: i32) -> bool {
        self.session
            .handle_input(&InputEvent::pointer_move(x, y, pointer_id))
    }

    pub fn handle_pointer_up(&mut self, x: f32, y: f32, pointer_id: i32) -> bool {
        self.session
            .handle_input(&InputEvent::pointer_up(x, y, pointer_id))
    }

    pub fn handle_pointer_cancel(&mut self, pointer_id: i32) -> bool {
        self.session
            .handle_input(&InputEvent::PointerCancel { pointer_id })
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging()
    }

    // ─── Elements ────────────────────────────────────────────────────────

    /// Add an element (`text` | `image` | `shape`). Returns its id, or an
    /// empty string for an unknown kind.
    pub fn add_element(&mut self, kind: &str) -> String {
        match ElementType::parse(kind) {
            Some(ty) => self.session.add_element(ty).as_str().to_string(),
            None => {
                log::warn!("add_element: unknown kind {kind:?}");
                String::new()
            }
        }
    }

    /// Select by id; an empty id clears the selection.
    pub fn select_by_id(&mut self, id: &str) -> bool {
        if id.is_empty() {
            return self.session.apply(Mutation::Select(None));
        }
        match ElementId::lookup(id) {
            Some(id) => self.session.apply(Mutation::Select(Some(id))),
            None => false,
        }
    }

    pub fn get_selected_id(&self) -> String {
        self.session
            .document()
            .selected_id()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Duplicate the selection. Returns the copy's id, or an empty string.
    pub fn duplicate_selected(&mut self) -> String {
        self.session
            .duplicate_selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn delete_selected(&mut self) -> bool {
        self.session.delete_selected()
    }

    /// Restack the selection: `forward` | `backward` | `front` | `back`.
    pub fn restack_selected(&mut self, to: &str) -> bool {
        let to = match to {
            "forward" => StackMove::Forward,
            "backward" => StackMove::Backward,
            "front" => StackMove::Front,
            "back" => StackMove::Back,
            other => {
                log::warn!("restack_selected: unknown move {other:?}");
                return false;
            }
        };
        match self.session.document().selected_id() {
            Some(id) => self.session.apply(Mutation::Restack { id, to }),
            None => false,
        }
    }

    /// Render list in paint order as JSON:
    /// `[{"id","type","zIndex","selected","style","html"}, ...]`.
    pub fn elements_json(&self) -> String {
        serde_json::to_string(&element_views(self.session.document()))
            .unwrap_or_else(|e| {
                log::warn!("elements_json: {e}");
                "[]".to_string()
            })
    }

    /// Inline style for one element, identical to its exported style.
    pub fn preview_style(&self, id: &str) -> String {
        ElementId::lookup(id)
            .and_then(|id| self.session.document().get(id))
            .map(element_css)
            .unwrap_or_default()
    }

    // ─── Properties Panel API ────────────────────────────────────────────

    /// Selected element's fields as JSON; `{}` when nothing is selected.
    pub fn panel_json(&self) -> String {
        panel_value(&self.session.panel()).to_string()
    }

    /// Background and canvas fields as JSON.
    pub fn background_json(&self) -> String {
        background_value(self.session.document()).to_string()
    }

    /// Write a raw form value to `path` (`fontSize`, `background.url`,
    /// `canvas.width`, ...). Returns true if the layout changed.
    pub fn set_property(&mut self, path: &str, value: &str) -> bool {
        match Field::parse(path) {
            Some(field) => self.session.set_property(field, value),
            None => {
                log::warn!("set_property: unknown field {path:?}");
                false
            }
        }
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"changed":bool, "action":"<action_name>"}`
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        let Some(action) = ShortcutMap::resolve(key, ctrl, shift, alt, meta) else {
            return r#"{"changed":false,"action":"none"}"#.to_string();
        };
        let changed = self.session.dispatch(action);
        let name = action_to_name(action);
        format!(r#"{{"changed":{changed},"action":"{name}"}}"#)
    }

    // ─── Uploads ─────────────────────────────────────────────────────────

    /// Start reading an image for element `id`. Returns a ticket, or 0 if
    /// the element is not an image.
    pub fn begin_image_upload(&mut self, id: &str) -> f64 {
        let Some(id) = ElementId::lookup(id) else {
            return 0.0;
        };
        match self.session.document().get(id) {
            Some(el) if el.element_type() == ElementType::Image => {
                self.session
                    .begin_upload(UploadTarget::ElementImage(id))
                    .raw() as f64
            }
            _ => 0.0,
        }
    }

    /// Start reading a background image. Returns a ticket.
    pub fn begin_background_upload(&mut self) -> f64 {
        self.session.begin_upload(UploadTarget::Background).raw() as f64
    }

    /// The read for `ticket` produced `data_url`.
    pub fn complete_upload(&mut self, ticket: f64, data_url: &str) -> bool {
        self.session
            .complete_upload(ticket_from_js(ticket), Ok(data_url.to_string()))
    }

    /// The read for `ticket` failed; the layout is left unchanged.
    pub fn fail_upload(&mut self, ticket: f64, error: &str) -> bool {
        self.session
            .complete_upload(ticket_from_js(ticket), Err(error.to_string()))
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Standalone HTML document for the current layout.
    pub fn export_html(&self) -> String {
        self.session.export()
    }

    /// Export and pass the markup to `callback`. A throwing callback is
    /// reported back as an error.
    pub fn save(&self, callback: &js_sys::Function) -> Result<(), JsValue> {
        let mut sink = |markup: &str| -> Result<(), String> {
            callback
                .call1(&JsValue::NULL, &JsValue::from_str(markup))
                .map(|_| ())
                .map_err(|e| e.as_string().unwrap_or_else(|| format!("{e:?}")))
        };
        self.session
            .save(&mut sink)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Release drag listeners (call when the editor unmounts).
    pub fn teardown(&mut self) {
        self.session.teardown();
    }
}

fn ticket_from_js(ticket: f64) -> UploadTicket {
    let raw = if ticket.is_finite() && ticket > 0.0 {
        ticket as u64
    } else {
        0
    };
    UploadTicket::from_raw(raw)
}

// ─── Console wiring for WASM debugging ───────────────────────────────────

fn console_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("CD WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
            if console_log::init_with_level(log::Level::Info).is_err() {
                web_sys::console::warn_1(&"CD WASM: logger already set".into());
            }
        });
    }
}
