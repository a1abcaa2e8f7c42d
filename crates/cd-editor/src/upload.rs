//! Pending image reads.
//!
//! Reading a picked file is asynchronous on every host. The queue hands out
//! a ticket when a read starts and resolves it to its target when the read
//! finishes, so the model is only ever written with a complete result.

use cd_core::id::ElementId;
use std::collections::HashMap;

/// Where a finished upload lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadTarget {
    /// `src` of an image element.
    ElementImage(ElementId),
    /// `url` of an image background.
    Background,
}

/// Handle for one in-flight read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadTicket(u64);

impl UploadTicket {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct UploadQueue {
    next: u64,
    pending: HashMap<UploadTicket, UploadTarget>,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, target: UploadTarget) -> UploadTicket {
        self.next += 1;
        let ticket = UploadTicket(self.next);
        self.pending.insert(ticket, target);
        log::debug!("upload {} started for {target:?}", ticket.0);
        ticket
    }

    /// Resolve a ticket to its target, consuming it. Unknown or already
    /// resolved tickets yield `None`.
    pub fn finish(&mut self, ticket: UploadTicket) -> Option<UploadTarget> {
        let target = self.pending.remove(&ticket);
        if target.is_none() {
            log::debug!("upload {} is not pending", ticket.0);
        }
        target
    }

    /// Drop every pending read aimed at `id` (the element went away).
    pub fn forget_element(&mut self, id: ElementId) {
        self.pending
            .retain(|_, target| *target != UploadTarget::ElementImage(id));
    }

    /// Drop every pending read. Ticket numbers keep counting up so a read
    /// started before the clear can never match a later ticket.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

/// Whether a finished read produced a usable image reference.
pub fn is_usable_source(src: &str) -> bool {
    let src = src.trim();
    if src.is_empty() {
        return false;
    }
    match src.strip_prefix("data:") {
        // `data:[<mediatype>][;base64],<data>` with a non-empty payload.
        Some(rest) => rest.split_once(',').is_some_and(|(_, data)| !data.is_empty()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_resolve_once() {
        let mut q = UploadQueue::new();
        let id = ElementId::intern("upload_img");
        let a = q.begin(UploadTarget::ElementImage(id));
        let b = q.begin(UploadTarget::Background);
        assert_ne!(a, b);
        assert_eq!(q.pending(), 2);

        assert_eq!(q.finish(a), Some(UploadTarget::ElementImage(id)));
        assert_eq!(q.finish(a), None);
        assert_eq!(q.finish(b), Some(UploadTarget::Background));
        assert_eq!(q.pending(), 0);
    }

    #[test]
    fn forget_drops_element_reads() {
        let mut q = UploadQueue::new();
        let id = ElementId::intern("upload_gone");
        let t = q.begin(UploadTarget::ElementImage(id));
        q.begin(UploadTarget::Background);
        q.forget_element(id);
        assert_eq!(q.finish(t), None);
        assert_eq!(q.pending(), 1);
    }

    #[test]
    fn clear_never_reissues_tickets() {
        let mut q = UploadQueue::new();
        let before = q.begin(UploadTarget::Background);
        q.clear();
        assert_eq!(q.pending(), 0);
        let after = q.begin(UploadTarget::Background);
        assert_ne!(before, after);
        assert_eq!(q.finish(before), None);
        assert_eq!(q.finish(after), Some(UploadTarget::Background));
    }

    #[test]
    fn usable_sources() {
        assert!(is_usable_source("data:image/png;base64,iVBORw0KGgo="));
        assert!(is_usable_source("https://cdn.example.com/seal.png"));
        assert!(!is_usable_source(""));
        assert!(!is_usable_source("data:image/png;base64,"));
        assert!(!is_usable_source("data:image/png"));
    }
}
