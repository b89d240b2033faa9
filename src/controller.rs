//! Pointer and keyboard handling for the canvas.
//!
//! [`NetworkView`] is the interaction core: it owns the view transform, the
//! selection, and a single [`Gesture`] value describing what the pointer is
//! currently doing. Exactly one gesture is in flight at any time, which the
//! enum enforces by construction. Every handler records whether the scene
//! needs repainting; the host polls [`NetworkView::take_redraw_request`]
//! once per frame.
//!
//! Screen coordinates arrive from the windowing layer; handlers convert them
//! to logical space before any hit testing. The anchor of a view pan stays in
//! screen space so panning is unaffected by the zoom level.

use std::collections::HashMap;

use crate::geometry::{Point, GRID_CELL_SIZE};
use crate::hit_test::{input_port_at, node_at, output_port_at};
use crate::model::{Document, NodePort};
use crate::selection::{SelectionChanged, SelectionManager};
use crate::transform::ViewTransform;

/// Which pointer button an event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// A pointer press or release, already translated to canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Position in screen space, relative to the canvas origin.
    pub pos: Point,
    pub button: PointerButton,
    pub click_count: u8,
    /// True when the platform considers this event a context menu request.
    pub popup_trigger: bool,
}

impl PointerEvent {
    pub fn primary(pos: Point) -> Self {
        Self {
            pos,
            button: PointerButton::Primary,
            click_count: 1,
            popup_trigger: false,
        }
    }

    pub fn with_clicks(mut self, click_count: u8) -> Self {
        self.click_count = click_count;
        self
    }

    pub fn popup(pos: Point) -> Self {
        Self {
            pos,
            button: PointerButton::Secondary,
            click_count: 1,
            popup_trigger: true,
        }
    }
}

/// The keys the canvas reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Shift,
    Backspace,
    Delete,
}

/// Cursor the host window should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    Pan,
}

/// The in-flight pointer gesture.
#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Idle,
    /// Space-drag panning. The anchor is the last pointer position in
    /// screen space.
    PanningView { anchor: Point },
    /// Pressed on a node body; becomes a node drag on the first move and a
    /// click on release.
    Armed,
    /// Dragging selected nodes. The snapshot holds each node's position at
    /// drag start so grid offsets never accumulate rounding error.
    DraggingNodes {
        anchor: Point,
        snapshot: HashMap<String, Point>,
    },
    /// Dragging a connection from `source`'s output port. `target` tracks
    /// the input port currently under the pointer.
    DraggingConnection {
        source: String,
        endpoint: Point,
        target: Option<NodePort>,
    },
}

/// Observer invoked with the canvas position of a context menu request.
pub type ContextMenuRequested = Box<dyn Fn(Point)>;

/// Interaction state for one canvas, generic over the document it edits.
pub struct NetworkView<D: Document> {
    document: D,
    transform: ViewTransform,
    selection: SelectionManager,
    gesture: Gesture,
    hover_output: Option<String>,
    hover_input: Option<NodePort>,
    space_panning: bool,
    shift_down: bool,
    cursor: CursorStyle,
    needs_redraw: bool,
    press_click_count: u8,
    press_moved: bool,
    on_context_menu: Option<ContextMenuRequested>,
}

impl<D: Document> NetworkView<D> {
    pub fn new(document: D) -> Self {
        Self {
            document,
            transform: ViewTransform::new(),
            selection: SelectionManager::new(),
            gesture: Gesture::Idle,
            hover_output: None,
            hover_input: None,
            space_panning: false,
            shift_down: false,
            cursor: CursorStyle::Default,
            needs_redraw: true,
            press_click_count: 0,
            press_moved: false,
            on_context_menu: None,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selection.is_selected(name)
    }

    /// Selected node names, sorted, with deleted nodes filtered out.
    pub fn selected_node_names(&self) -> Vec<String> {
        self.selection.selected_nodes(&self.document)
    }

    /// Output port currently under the pointer, by node name.
    pub fn hovered_output(&self) -> Option<&str> {
        self.hover_output.as_deref()
    }

    /// Input port currently under the pointer.
    pub fn hovered_input(&self) -> Option<&NodePort> {
        self.hover_input.as_ref()
    }

    /// Source node and current endpoint of an in-flight connection drag.
    pub fn connection_drag(&self) -> Option<(&str, Point)> {
        match &self.gesture {
            Gesture::DraggingConnection {
                source, endpoint, ..
            } => Some((source.as_str(), *endpoint)),
            _ => None,
        }
    }

    /// Returns and clears the pending repaint request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::replace(&mut self.needs_redraw, false)
    }

    pub fn set_on_selection_changed(&mut self, callback: SelectionChanged) {
        self.selection.set_on_changed(callback);
    }

    pub fn set_on_context_menu(&mut self, callback: ContextMenuRequested) {
        self.on_context_menu = Some(callback);
    }

    // ------------------------------------------------------------------
    // View control
    // ------------------------------------------------------------------

    pub fn set_zoom(&mut self, zoom: f32) {
        self.transform.set_zoom(zoom);
        self.request_redraw();
    }

    pub fn reset_view(&mut self) {
        self.transform.reset();
        self.request_redraw();
    }

    // ------------------------------------------------------------------
    // Selection passthrough
    // ------------------------------------------------------------------

    pub fn single_select(&mut self, name: Option<&str>) {
        if self.selection.single_select(&mut self.document, name) {
            self.request_redraw();
        }
    }

    pub fn deselect_all(&mut self) {
        if self.selection.deselect_all(&mut self.document) {
            self.request_redraw();
        }
    }

    /// Call after the document changed outside of this view, for example
    /// through undo or a script. Drops stale selection entries.
    pub fn network_changed(&mut self) {
        self.selection.prune(&mut self.document);
        self.request_redraw();
    }

    // ------------------------------------------------------------------
    // Pointer handlers
    // ------------------------------------------------------------------

    pub fn mouse_pressed(&mut self, event: PointerEvent) {
        self.press_click_count = event.click_count;
        self.press_moved = false;

        if event.popup_trigger {
            if let Some(callback) = &self.on_context_menu {
                callback(event.pos);
            }
            return;
        }
        if event.button != PointerButton::Primary {
            return;
        }

        let pt = self.transform.to_logical(event.pos);
        if let Some(node) = output_port_at(self.document.children(), pt) {
            let source = node.name.clone();
            log::debug!("connection drag from output of {source}");
            self.gesture = Gesture::DraggingConnection {
                source,
                endpoint: pt,
                target: None,
            };
            self.request_redraw();
        } else if let Some(port) = input_port_at(self.document.children(), pt) {
            self.press_input_port(port, pt);
        } else if node_at(self.document.children(), pt).is_some() {
            self.gesture = Gesture::Armed;
        } else if self.space_panning {
            self.gesture = Gesture::PanningView { anchor: event.pos };
        }
    }

    /// Pressing a connected input port detaches the connection and continues
    /// dragging its free end, so releasing on another port rewires it and
    /// releasing on nothing deletes it. Pressing an unconnected input port
    /// consumes the press without starting a gesture.
    fn press_input_port(&mut self, port: NodePort, pt: Point) {
        let Some(connection) = self
            .document
            .connection_to(&port.node, &port.port)
            .cloned()
        else {
            return;
        };
        log::debug!(
            "detaching {} -> {}.{} for rewire",
            connection.output_node,
            connection.input_node,
            connection.input_port
        );
        self.document.disconnect(&connection);
        self.hover_input = Some(port.clone());
        self.gesture = Gesture::DraggingConnection {
            source: connection.output_node,
            endpoint: pt,
            target: Some(port),
        };
        self.request_redraw();
    }

    pub fn mouse_dragged(&mut self, pos: Point) {
        self.press_moved = true;
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle => {}
            Gesture::PanningView { anchor } => {
                self.transform.pan(pos - anchor);
                self.gesture = Gesture::PanningView { anchor: pos };
                self.request_redraw();
            }
            Gesture::Armed => {
                let pt = self.transform.to_logical(pos);
                self.start_node_drag(pt);
            }
            Gesture::DraggingNodes { anchor, snapshot } => {
                let pt = self.transform.to_logical(pos);
                self.drag_nodes(anchor, &snapshot, pt);
                self.gesture = Gesture::DraggingNodes { anchor, snapshot };
            }
            Gesture::DraggingConnection {
                source,
                endpoint: _,
                target: _,
            } => {
                let pt = self.transform.to_logical(pos);
                let target = input_port_at(self.document.children(), pt);
                self.hover_input = target.clone();
                self.gesture = Gesture::DraggingConnection {
                    source,
                    endpoint: pt,
                    target,
                };
                self.request_redraw();
            }
        }
    }

    /// First movement after pressing a node body. Selects the node under the
    /// press unless it already belongs to the selection, then snapshots the
    /// positions of every selected node.
    fn start_node_drag(&mut self, pt: Point) {
        let Some(name) = node_at(self.document.children(), pt).map(|node| node.name.clone())
        else {
            return;
        };
        if !self.selection.is_selected(&name) {
            self.selection.single_select(&mut self.document, Some(&name));
        }
        let snapshot: HashMap<String, Point> = self
            .selection
            .selected_nodes(&self.document)
            .into_iter()
            .filter_map(|name| {
                let position = self.document.child(&name)?.position;
                Some((name, position))
            })
            .collect();
        log::debug!("node drag started with {} node(s)", snapshot.len());
        self.gesture = Gesture::DraggingNodes {
            anchor: pt,
            snapshot,
        };
        self.request_redraw();
    }

    /// Moves every snapshotted node by the pointer offset rounded to whole
    /// grid cells. Positions derive from the snapshot each time, so dragging
    /// back and forth never drifts.
    fn drag_nodes(&mut self, anchor: Point, snapshot: &HashMap<String, Point>, pt: Point) {
        let offset = pt - anchor;
        let dx = (offset.x / GRID_CELL_SIZE).round();
        let dy = (offset.y / GRID_CELL_SIZE).round();
        for (name, base) in snapshot {
            if self.document.has_child(name) {
                self.document
                    .set_node_position(name, Point::new(base.x + dx, base.y + dy));
            }
        }
        self.request_redraw();
    }

    pub fn mouse_moved(&mut self, pos: Point) {
        let pt = self.transform.to_logical(pos);
        let hover_output =
            output_port_at(self.document.children(), pt).map(|node| node.name.clone());
        let hover_input = input_port_at(self.document.children(), pt);
        if hover_output != self.hover_output || hover_input != self.hover_input {
            self.hover_output = hover_output;
            self.hover_input = hover_input;
            self.request_redraw();
        }
    }

    /// The gesture settles before any context menu shows, so a connection
    /// drag with a recorded destination commits even on a popup release.
    pub fn mouse_released(&mut self, event: PointerEvent) {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle | Gesture::Armed => {
                if event.button == PointerButton::Primary && !self.press_moved {
                    self.clicked(event.pos);
                }
            }
            Gesture::PanningView { .. } => {}
            Gesture::DraggingNodes { .. } => {
                // Positions were committed on every drag event.
                self.request_redraw();
            }
            Gesture::DraggingConnection { source, target, .. } => {
                if let Some(port) = target {
                    log::debug!("connecting {source} -> {}.{}", port.node, port.port);
                    self.document.connect(&source, &port.node, &port.port);
                }
                // A release without movement is still a click: the port
                // rectangle is outside the node body, so it lands on empty
                // space and clears the selection.
                if event.button == PointerButton::Primary && !self.press_moved {
                    self.clicked(event.pos);
                }
                self.request_redraw();
            }
        }

        if event.popup_trigger {
            if let Some(callback) = &self.on_context_menu {
                callback(event.pos);
            }
        }
    }

    /// Click dispatch after a press and release without movement.
    fn clicked(&mut self, pos: Point) {
        let pt = self.transform.to_logical(pos);
        match self.press_click_count {
            1 => {
                let hit = node_at(self.document.children(), pt).map(|node| node.name.clone());
                match hit {
                    Some(name) if self.shift_down => {
                        if self.selection.toggle(&mut self.document, &name) {
                            self.request_redraw();
                        }
                    }
                    Some(name) => {
                        if self.selection.single_select(&mut self.document, Some(&name)) {
                            self.request_redraw();
                        }
                    }
                    None => self.deselect_all(),
                }
            }
            count if count >= 2 => {
                let hit = node_at(self.document.children(), pt).map(|node| node.name.clone());
                match hit {
                    Some(name) => {
                        self.document.set_rendered_node(&name);
                        self.request_redraw();
                    }
                    None => {
                        let cell = self.transform.logical_to_grid(pt);
                        self.document.show_node_creation_dialog(cell);
                    }
                }
            }
            _ => {}
        }
    }

    /// Abandons the gesture in flight. A detached connection stays detached.
    pub fn cancel_gesture(&mut self) {
        if self.gesture != Gesture::Idle {
            self.gesture = Gesture::Idle;
            self.request_redraw();
        }
    }

    // ------------------------------------------------------------------
    // Keyboard handlers
    // ------------------------------------------------------------------

    pub fn key_pressed(&mut self, key: Key) {
        match key {
            Key::Space => {
                self.space_panning = true;
                self.cursor = CursorStyle::Pan;
                self.request_redraw();
            }
            Key::Shift => self.shift_down = true,
            Key::Backspace | Key::Delete => self.delete_selection(),
        }
    }

    pub fn key_released(&mut self, key: Key) {
        match key {
            Key::Space => {
                self.space_panning = false;
                self.cursor = CursorStyle::Default;
                self.request_redraw();
            }
            Key::Shift => self.shift_down = false,
            Key::Backspace | Key::Delete => {}
        }
    }

    fn delete_selection(&mut self) {
        let names = self.selection.selected_nodes(&self.document);
        if names.is_empty() {
            return;
        }
        log::debug!("deleting {} node(s)", names.len());
        self.document.remove_nodes(&names);
        self.selection.prune(&mut self.document);
        self.request_redraw();
    }

    fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }
}
