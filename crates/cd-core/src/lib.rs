pub mod document;
pub mod emitter;
pub mod hit;
pub mod id;
pub mod model;
pub mod patch;
pub mod style;
pub mod transform;

pub use document::{DUPLICATE_OFFSET, Document, DocumentPayload};
pub use emitter::{emit_element, emit_html};
pub use hit::hit_test;
pub use id::ElementId;
pub use model::*;
pub use patch::{CommonPatch, ElementPatch, ImagePatch, KindPatch, ShapePatch, TextPatch};
pub use transform::{CanvasRect, CanvasTransform, ZoomRange};
