//! Committed selection of a picker
//!
//! The label is captured when the user commits and is never re-derived, so it
//! stays visible after the option list changes or the collaborator goes away.

use crate::records::RecordId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected_id: Option<RecordId>,
    pub selected_label: Option<String>,
}

impl SelectionState {
    pub fn is_empty(&self) -> bool {
        self.selected_id.is_none()
    }
}

/// Callback notified with the new state after every change
pub type SelectionCallback = Box<dyn FnMut(&SelectionState) + Send>;

#[derive(Default)]
pub struct SelectionController {
    state: SelectionState,
    on_select: Option<SelectionCallback>,
}

impl std::fmt::Debug for SelectionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionController")
            .field("state", &self.state)
            .field("has_callback", &self.on_select.is_some())
            .finish()
    }
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the single consumer; replaces any previous one
    pub fn on_select(&mut self, callback: impl FnMut(&SelectionState) + Send + 'static) {
        self.on_select = Some(Box::new(callback));
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Set id and label together. Committing the current value again is
    /// accepted silently. Returns whether the state changed.
    pub fn commit(&mut self, id: RecordId, label: impl Into<String>) -> bool {
        let next = SelectionState {
            selected_id: Some(id),
            selected_label: Some(label.into()),
        };
        if next == self.state {
            return false;
        }
        tracing::debug!(
            id = ?next.selected_id,
            label = ?next.selected_label,
            "selection committed"
        );
        self.state = next;
        self.notify();
        true
    }

    /// Reset both fields. Returns whether anything was selected.
    pub fn clear(&mut self) -> bool {
        if self.state.is_empty() {
            return false;
        }
        self.state = SelectionState::default();
        self.notify();
        true
    }

    fn notify(&mut self) {
        if let Some(callback) = self.on_select.as_mut() {
            callback(&self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn recording() -> (SelectionController, Arc<Mutex<Vec<SelectionState>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut controller = SelectionController::new();
        controller.on_select(move |state| sink.lock().push(state.clone()));
        (controller, seen)
    }

    #[test]
    fn commit_then_clear_leaves_nothing_selected() {
        let (mut controller, _) = recording();
        controller.commit(RecordId::Number(4), "Ada Lovelace");
        controller.clear();
        assert_eq!(controller.state(), &SelectionState::default());
    }

    #[test]
    fn commit_sets_both_fields_and_notifies_once() {
        let (mut controller, seen) = recording();
        assert!(controller.commit(RecordId::Text("c-1".into()), "Grace Hopper"));

        let state = controller.state();
        assert_eq!(state.selected_id, Some(RecordId::Text("c-1".into())));
        assert_eq!(state.selected_label.as_deref(), Some("Grace Hopper"));
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn repeated_commit_is_idempotent() {
        let (mut controller, seen) = recording();
        assert!(controller.commit(RecordId::Number(1), "Ann"));
        assert!(!controller.commit(RecordId::Number(1), "Ann"));
        assert_eq!(seen.lock().len(), 1);

        assert!(controller.commit(RecordId::Number(1), "Ann Lee"));
        assert_eq!(seen.lock().len(), 2);
    }

    #[test]
    fn clearing_empty_selection_does_not_notify() {
        let (mut controller, seen) = recording();
        assert!(!controller.clear());
        assert!(seen.lock().is_empty());
    }
}
