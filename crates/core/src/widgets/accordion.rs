//! Services accordion: opening a panel closes whichever one was open.

/// A set of panels of which at most one is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accordion {
    len: usize,
    open: Option<usize>,
}

impl Accordion {
    pub fn new(len: usize) -> Self {
        Self { len, open: None }
    }

    pub fn open_panel(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    /// Toggle a panel. Opening one closes any other; toggling the open panel
    /// closes it. Out-of-range indexes are ignored.
    ///
    /// Returns `true` when the panel ends up open.
    pub fn toggle(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        if self.open == Some(index) {
            self.open = None;
            false
        } else {
            self.open = Some(index);
            true
        }
    }
}
