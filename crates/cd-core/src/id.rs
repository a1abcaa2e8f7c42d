use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for element IDs — fast comparisons, low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for elements on the canvas.
/// Internally a `Spur` index — 4 bytes, Copy, Eq, Hash in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(Spur);

impl ElementId {
    /// Intern a string as an ElementId, or return existing if already interned.
    pub fn intern(s: &str) -> Self {
        ElementId(INTERNER.get_or_intern(s))
    }

    /// The id for `s` if it was ever interned. Never grows the interner.
    pub fn lookup(s: &str) -> Option<Self> {
        INTERNER.get(s).map(ElementId)
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a fresh ID with a kind prefix (e.g. `text_1`, `shape_2`).
    ///
    /// Uniqueness against a loaded document is the caller's job; see
    /// `Document::fresh_id`.
    pub fn with_prefix(prefix: &str) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{n}"))
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ElementId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = ElementId::intern("title_text");
        let b = ElementId::intern("title_text");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "title_text");
    }

    #[test]
    fn prefixed_ids_are_unique() {
        let a = ElementId::with_prefix("shape");
        let b = ElementId::with_prefix("shape");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("shape_"));
    }

    #[test]
    fn lookup_does_not_intern() {
        let id = ElementId::intern("border_frame");
        assert_eq!(ElementId::lookup("border_frame"), Some(id));
        assert_eq!(ElementId::lookup("never_seen_before_id"), None);
        assert_eq!(ElementId::lookup("never_seen_before_id"), None);
    }

    #[test]
    fn display_is_bare_string() {
        let id = ElementId::intern("seal");
        assert_eq!(id.to_string(), "seal");
        assert_eq!(format!("{id:?}"), "#seal");
    }
}
