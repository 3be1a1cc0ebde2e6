//! FocusController: holds the single focused key for an editing session.

use std::fmt::Debug;

use tracing::trace;

/// Tracks at most one focused key.
///
/// The controller performs no existence checks. It is decoupled from the
/// lifetime of whatever collection the keys point into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusController<K> {
    focused: Option<K>,
}

impl<K> FocusController<K>
where
    K: Clone + PartialEq + Debug,
{
    /// Create a controller with nothing focused.
    pub fn new() -> Self {
        Self { focused: None }
    }

    /// Focus `key`, replacing any previous focus.
    pub fn focus(&mut self, key: K) {
        trace!(?key, previous = ?self.focused, "focus");
        self.focused = Some(key);
    }

    /// Clear the focus.
    pub fn clear(&mut self) {
        if let Some(previous) = self.focused.take() {
            trace!(?previous, "focus cleared");
        }
    }

    /// True iff `key` is the focused key.
    pub fn is_focused(&self, key: &K) -> bool {
        self.focused.as_ref() == Some(key)
    }

    /// The focused key, if any.
    pub fn focused(&self) -> Option<&K> {
        self.focused.as_ref()
    }

    /// Clear the focus only if it currently points at `key`.
    ///
    /// Returns whether the focus was cleared.
    pub fn release(&mut self, key: &K) -> bool {
        if self.is_focused(key) {
            self.clear();
            true
        } else {
            false
        }
    }
}

impl<K> Default for FocusController<K>
where
    K: Clone + PartialEq + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
