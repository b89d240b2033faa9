//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use slint_network_canvas::{
    Connection, Document, NetworkView, Node, Point, PointerEvent,
};

/// In-memory document standing in for the host application's graph.
///
/// Mutations behave the way a real host would: connecting to an occupied
/// input port replaces the old connection, and removing nodes also removes
/// every connection touching them.
#[derive(Default)]
pub struct TestDocument {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
    pub active: Option<String>,
    pub rendered: Option<String>,
    /// Grid cells passed to the node creation dialog, in call order.
    pub creation_dialog_cells: Vec<(i32, i32)>,
}

impl TestDocument {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            ..Self::default()
        }
    }

    pub fn with_connection(mut self, output: &str, input: &str, port: &str) -> Self {
        self.connections.push(Connection::new(output, input, port));
        self
    }
}

impl Document for TestDocument {
    fn children(&self) -> &[Node] {
        &self.nodes
    }

    fn connections(&self) -> &[Connection] {
        &self.connections
    }

    fn rendered_child(&self) -> Option<&str> {
        self.rendered.as_deref()
    }

    fn set_active_node(&mut self, node: Option<&str>) {
        self.active = node.map(str::to_owned);
    }

    fn remove_nodes(&mut self, names: &[String]) {
        self.nodes.retain(|node| !names.contains(&node.name));
        self.connections.retain(|connection| {
            !names.contains(&connection.output_node) && !names.contains(&connection.input_node)
        });
        if let Some(active) = &self.active {
            if names.contains(active) {
                self.active = None;
            }
        }
        if let Some(rendered) = &self.rendered {
            if names.contains(rendered) {
                self.rendered = None;
            }
        }
    }

    fn set_node_position(&mut self, name: &str, position: Point) {
        if let Some(node) = self.nodes.iter_mut().find(|node| node.name == name) {
            node.position = position;
        }
    }

    fn connect(&mut self, output_node: &str, input_node: &str, input_port: &str) {
        self.connections.retain(|connection| {
            !(connection.input_node == input_node && connection.input_port == input_port)
        });
        self.connections
            .push(Connection::new(output_node, input_node, input_port));
    }

    fn disconnect(&mut self, connection: &Connection) {
        self.connections.retain(|existing| existing != connection);
    }

    fn set_rendered_node(&mut self, name: &str) {
        self.rendered = Some(name.to_owned());
    }

    fn show_node_creation_dialog(&mut self, cell: (i32, i32)) {
        self.creation_dialog_cells.push(cell);
    }
}

/// Tracks callback invocations for testing.
#[derive(Default, Clone)]
pub struct CallbackTracker {
    /// Selection after each change notification.
    pub selection_changes: Rc<RefCell<Vec<Vec<String>>>>,
    /// Screen positions of context menu requests.
    pub context_menus: Rc<RefCell<Vec<(f32, f32)>>>,
}

impl CallbackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers this tracker on both of the view's callbacks.
    pub fn attach(&self, view: &mut NetworkView<TestDocument>) {
        let changes = self.selection_changes.clone();
        view.set_on_selection_changed(Box::new(move |_old, new| {
            changes.borrow_mut().push(new.to_vec());
        }));
        let menus = self.context_menus.clone();
        view.set_on_context_menu(Box::new(move |pos| {
            menus.borrow_mut().push((pos.x, pos.y));
        }));
    }
}

/// A node parked at the given grid cell, with the usual two input ports.
pub fn grid_node(name: &str, x: f32, y: f32) -> Node {
    Node::new(name, Point::new(x, y))
        .with_input("shape", "geometry")
        .with_input("position", "point")
}

pub fn view_with(document: TestDocument) -> NetworkView<TestDocument> {
    NetworkView::new(document)
}

/// Press and release at `pos` without moving the pointer.
pub fn click(view: &mut NetworkView<TestDocument>, pos: Point) {
    view.mouse_pressed(PointerEvent::primary(pos));
    view.mouse_released(PointerEvent::primary(pos));
}

/// A double click at `pos`.
pub fn double_click(view: &mut NetworkView<TestDocument>, pos: Point) {
    view.mouse_pressed(PointerEvent::primary(pos).with_clicks(2));
    view.mouse_released(PointerEvent::primary(pos).with_clicks(2));
}

/// Press at `from`, drag through each point, release at the last one.
pub fn drag(view: &mut NetworkView<TestDocument>, from: Point, path: &[Point]) {
    view.mouse_pressed(PointerEvent::primary(from));
    // The first drag event arrives at the press position, as it does from a
    // real pointer.
    view.mouse_dragged(from);
    for &pos in path {
        view.mouse_dragged(pos);
    }
    let end = path.last().copied().unwrap_or(from);
    view.mouse_released(PointerEvent::primary(end));
}
