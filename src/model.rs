//! Data model contracts between the canvas and the document layer.
//!
//! The canvas never owns nodes, ports, or connections: it reads them through
//! the [`Document`] trait and requests mutations through the same trait. The
//! value types here are plain read-only snapshots of what the document
//! exposes.

use crate::geometry::Point;

// Well-known port type tags. The set is open; tags only drive color coding.
pub const TYPE_INT: &str = "int";
pub const TYPE_FLOAT: &str = "float";
pub const TYPE_STRING: &str = "string";
pub const TYPE_BOOLEAN: &str = "boolean";
pub const TYPE_POINT: &str = "point";
pub const TYPE_COLOR: &str = "color";
pub const TYPE_GEOMETRY: &str = "geometry";
pub const TYPE_LIST: &str = "list";

/// An input port on a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Port {
    pub name: String,
    pub port_type: String,
}

impl Port {
    pub fn new(name: impl Into<String>, port_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            port_type: port_type.into(),
        }
    }
}

/// A node in the active network, read-only to the canvas.
///
/// `position` is in grid units (not pixels); the implicit output carries
/// `output_type` for color coding.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub name: String,
    pub position: Point,
    pub inputs: Vec<Port>,
    pub output_type: String,
}

impl Node {
    pub fn new(name: impl Into<String>, position: Point) -> Self {
        Self {
            name: name.into(),
            position,
            inputs: Vec::new(),
            output_type: TYPE_GEOMETRY.to_string(),
        }
    }

    pub fn with_input(mut self, name: impl Into<String>, port_type: impl Into<String>) -> Self {
        self.inputs.push(Port::new(name, port_type));
        self
    }

    pub fn with_output_type(mut self, output_type: impl Into<String>) -> Self {
        self.output_type = output_type.into();
        self
    }
}

/// A directed edge from a node's output to another node's input port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub output_node: String,
    pub input_node: String,
    pub input_port: String,
}

impl Connection {
    pub fn new(
        output_node: impl Into<String>,
        input_node: impl Into<String>,
        input_port: impl Into<String>,
    ) -> Self {
        Self {
            output_node: output_node.into(),
            input_node: input_node.into(),
            input_port: input_port.into(),
        }
    }
}

/// A (node, port) reference pair, used as a hit-test result and as the
/// target of connect requests. It is a lookup key and owns nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodePort {
    pub node: String,
    pub port: String,
}

impl NodePort {
    pub fn new(node: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            port: port.into(),
        }
    }
}

/// The external document collaborator.
///
/// Queries reflect the active network; mutation requests are fire-and-forget
/// and may be applied synchronously or queued. An invalid request (say,
/// disconnecting an edge that no longer exists) is the document's no-op, not
/// the canvas's error.
pub trait Document {
    /// Children of the active network, in insertion order. Later entries
    /// paint on top of earlier ones.
    fn children(&self) -> &[Node];

    /// All connections of the active network.
    fn connections(&self) -> &[Connection];

    /// Name of the rendered child, if the network has one.
    fn rendered_child(&self) -> Option<&str>;

    fn child(&self, name: &str) -> Option<&Node> {
        self.children().iter().find(|node| node.name == name)
    }

    fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    /// The at-most-one connection arriving at an input port.
    fn connection_to(&self, input_node: &str, input_port: &str) -> Option<&Connection> {
        self.connections()
            .iter()
            .find(|c| c.input_node == input_node && c.input_port == input_port)
    }

    fn set_active_node(&mut self, node: Option<&str>);
    fn remove_nodes(&mut self, names: &[String]);
    fn set_node_position(&mut self, name: &str, position: Point);
    fn connect(&mut self, output_node: &str, input_node: &str, input_port: &str);
    fn disconnect(&mut self, connection: &Connection);
    fn set_rendered_node(&mut self, name: &str);

    /// Present the node-creation affordance at a grid cell. The canvas only
    /// supplies the target cell; the UI belongs to the document layer.
    fn show_node_creation_dialog(&mut self, cell: (i32, i32));
}
