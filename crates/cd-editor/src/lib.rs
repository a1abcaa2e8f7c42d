pub mod input;
pub mod interaction;
pub mod properties;
pub mod session;
pub mod shortcuts;
pub mod upload;

pub use input::{InputEvent, Modifiers};
pub use interaction::{DragState, GlobalListeners, InteractionController, NoopListeners};
pub use properties::{BackgroundField, CanvasField, ElementField, Field, PanelView};
pub use session::{EditorSession, Mutation, SaveSink, StackMove};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use upload::{UploadTarget, UploadTicket};
