//! Project detail modal and the events that dismiss it.

/// Things that can close an open modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalEvent {
    CloseButton,
    Escape,
    /// A click on the dimmed overlay. Clicks inside the dialog carry
    /// `on_backdrop = false` and are ignored.
    OverlayClick { on_backdrop: bool },
}

/// Detail dialog holding one item. Background scrolling is locked while
/// the dialog is open.
#[derive(Debug, Clone, PartialEq)]
pub struct Modal<T> {
    content: Option<T>,
}

impl<T> Default for Modal<T> {
    fn default() -> Self {
        Self { content: None }
    }
}

impl<T> Modal<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `item`, replacing anything already displayed.
    pub fn open(&mut self, item: T) {
        self.content = Some(item);
    }

    /// Show the item if the lookup found one. Returns whether the modal is
    /// open afterwards.
    pub fn open_if_found(&mut self, item: Option<T>) -> bool {
        if let Some(item) = item {
            self.open(item);
        }
        self.is_open()
    }

    /// Apply a close event. Returns `true` if the modal closed.
    pub fn handle(&mut self, event: ModalEvent) -> bool {
        if self.content.is_none() {
            return false;
        }
        let closes = match event {
            ModalEvent::CloseButton | ModalEvent::Escape => true,
            ModalEvent::OverlayClick { on_backdrop } => on_backdrop,
        };
        if closes {
            self.content = None;
        }
        closes
    }

    pub fn is_open(&self) -> bool {
        self.content.is_some()
    }

    pub fn scroll_locked(&self) -> bool {
        self.is_open()
    }

    pub fn content(&self) -> Option<&T> {
        self.content.as_ref()
    }
}
