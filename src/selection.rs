//! Selection state for the canvas.
//!
//! The manager owns the set of selected node names plus the notion of the
//! active node, which the host document uses to drive its parameter panel.
//! Every mutation reports whether anything actually changed so callers can
//! skip redundant repaints, and an optional callback observes transitions
//! with both the old and the new selection.
//!
//! Names are stored in a [`BTreeSet`], so iteration order is deterministic
//! regardless of selection order.

use std::collections::BTreeSet;

use slint::{Model, SharedString, VecModel};

use crate::model::Document;

/// Observer invoked with (previous, current) selection on every change.
pub type SelectionChanged = Box<dyn Fn(&[String], &[String])>;

#[derive(Default)]
pub struct SelectionManager {
    selected: BTreeSet<String>,
    active: Option<String>,
    on_changed: Option<SelectionChanged>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the change observer, replacing any previous one.
    pub fn set_on_changed(&mut self, callback: SelectionChanged) {
        self.on_changed = Some(callback);
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// The node most recently promoted to active, if it is still tracked.
    pub fn active_node(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Selected names in sorted order, filtered against the document so
    /// nodes deleted behind our back never leak out of the accessor.
    pub fn selected_nodes<D: Document>(&self, document: &D) -> Vec<String> {
        self.selected
            .iter()
            .filter(|name| document.has_child(name))
            .cloned()
            .collect()
    }

    /// Replaces the selection with exactly `name` and makes it active.
    ///
    /// Passing a name the document does not know (or `None`) clears the
    /// selection instead. Returns true when the selection changed.
    pub fn single_select<D: Document>(&mut self, document: &mut D, name: Option<&str>) -> bool {
        let name = name.filter(|n| document.has_child(n));
        let Some(name) = name else {
            return self.deselect_all(document);
        };
        if self.selected.len() == 1 && self.selected.contains(name) {
            return false;
        }
        let previous = self.snapshot();
        self.selected.clear();
        self.selected.insert(name.to_owned());
        self.active = Some(name.to_owned());
        document.set_active_node(Some(name));
        self.notify(&previous);
        true
    }

    /// Flips `name` in or out of the selection.
    ///
    /// Toggling into an empty selection behaves like [`single_select`], so a
    /// plain shift-click on a lone node still activates it. Toggling the
    /// active node off also deactivates it. Always requests a repaint.
    ///
    /// [`single_select`]: Self::single_select
    pub fn toggle<D: Document>(&mut self, document: &mut D, name: &str) -> bool {
        if !document.has_child(name) {
            return false;
        }
        if self.selected.is_empty() {
            return self.single_select(document, Some(name));
        }
        let previous = self.snapshot();
        if self.selected.remove(name) {
            if self.active.as_deref() == Some(name) {
                self.active = None;
                document.set_active_node(None);
            }
        } else {
            self.selected.insert(name.to_owned());
        }
        self.notify(&previous);
        true
    }

    /// Adds `name` without clearing the rest of the selection and without
    /// notifying the observer. For building up a selection programmatically.
    pub fn select(&mut self, name: &str) -> bool {
        self.selected.insert(name.to_owned())
    }

    /// Empties the selection and deactivates the active node.
    pub fn deselect_all<D: Document>(&mut self, document: &mut D) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        let previous = self.snapshot();
        self.selected.clear();
        if self.active.take().is_some() {
            document.set_active_node(None);
        }
        self.notify(&previous);
        true
    }

    /// Drops selected names the document no longer contains. Called after
    /// external edits to the network.
    pub fn prune<D: Document>(&mut self, document: &mut D) -> bool {
        let stale: Vec<String> = self
            .selected
            .iter()
            .filter(|name| !document.has_child(name))
            .cloned()
            .collect();
        if stale.is_empty() {
            return false;
        }
        let previous = self.snapshot();
        for name in &stale {
            self.selected.remove(name);
            if self.active.as_deref() == Some(name.as_str()) {
                self.active = None;
                document.set_active_node(None);
            }
        }
        self.notify(&previous);
        true
    }

    /// Mirrors the selection into a Slint model for binding in the UI.
    pub fn sync_to_model(&self, model: &VecModel<SharedString>) {
        while model.row_count() > 0 {
            model.remove(0);
        }
        for name in &self.selected {
            model.push(SharedString::from(name.as_str()));
        }
    }

    fn snapshot(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    fn notify(&self, previous: &[String]) {
        if let Some(callback) = &self.on_changed {
            let current = self.snapshot();
            callback(previous, &current);
        }
    }
}
