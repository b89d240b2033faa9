//! Interactive canvas logic for a node-graph editor, built for Slint UIs.
//!
//! The crate is the non-visual half of a network editor: it owns the view
//! transform, hit testing, selection and the pointer gesture state machine,
//! and produces a display list the Slint layer paints. The host application
//! implements the [`Document`] trait over its own graph structure and feeds
//! pointer and keyboard events to a [`NetworkView`]; everything else stays
//! inside this crate.
//!
//! Quick tour:
//!
//! - [`geometry`] holds the grid constants and node/port rectangle math.
//! - [`transform`] maps between screen and logical coordinates.
//! - [`model`] defines the node, port and connection value types plus the
//!   [`Document`] trait.
//! - [`hit_test`] resolves pointer positions to nodes and ports.
//! - [`selection`] tracks the selected set and the active node.
//! - [`controller`] is the gesture state machine driving everything.
//! - [`render`] builds the per-frame display list.

pub mod controller;
pub mod geometry;
pub mod model;
pub mod render;
pub mod selection;
pub mod transform;

pub use controller::{
    ContextMenuRequested, CursorStyle, Key, NetworkView, PointerButton, PointerEvent,
};
pub use geometry::{
    input_port_rect, node_origin, node_rect, output_port_rect, port_offset, Point, Rect,
    GRID_CELL_SIZE, NODE_HEIGHT, NODE_WIDTH, PORT_HEIGHT, PORT_HIT_MARGIN, PORT_SPACING,
    PORT_WIDTH,
};
pub use hit_test::{input_port_at, node_at, output_port_at};
pub use model::{Connection, Document, Node, NodePort, Port};
pub use render::{build_scene, connection_path, grid_commands, port_type_color, Scene, Shape};
pub use selection::{SelectionChanged, SelectionManager};
pub use transform::{ViewTransform, MAX_ZOOM, MIN_ZOOM};
