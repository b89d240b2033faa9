//! Scene building for the canvas.
//!
//! Rendering is split from interaction: the controller mutates state, and
//! [`build_scene`] turns that state into a display list the UI layer can
//! bind to. Rectangles and text are plain [`Shape`] values; curves and the
//! background grid are emitted as SVG path command strings, which Slint's
//! `Path` element consumes directly.
//!
//! The grid is computed in screen space and does not scale with the zoom
//! level; everything else is in logical space, and the host applies the view
//! transform to the shape layer as a whole.

use slint::{Color, Model, SharedString, VecModel};

use crate::controller::NetworkView;
use crate::geometry::{
    node_rect, port_offset, Point, GRID_CELL_SIZE, NODE_HEIGHT, NODE_WIDTH, PORT_HEIGHT,
    PORT_WIDTH, PORT_SPACING,
};
use crate::model::{
    Connection, Document, Node, TYPE_BOOLEAN, TYPE_COLOR, TYPE_FLOAT, TYPE_GEOMETRY, TYPE_INT,
    TYPE_LIST, TYPE_POINT, TYPE_STRING,
};
use crate::transform::ViewTransform;

/// One paint operation. Coordinates are logical unless noted otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    FillPath {
        commands: SharedString,
        color: Color,
    },
    StrokePath {
        commands: SharedString,
        color: Color,
        width: f32,
    },
    Text {
        x: f32,
        y: f32,
        text: SharedString,
        color: Color,
    },
}

/// Everything needed to repaint the canvas once.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub background: Color,
    /// Grid line commands in screen space.
    pub grid: SharedString,
    pub grid_color: Color,
    /// Node bodies, ports, connections and labels, in paint order.
    pub shapes: Vec<Shape>,
}

impl Scene {
    /// Mirrors the shape list into a Slint model for binding in the UI.
    pub fn sync_shapes_to_model(&self, model: &VecModel<Shape>) {
        while model.row_count() > 0 {
            model.remove(0);
        }
        for shape in &self.shapes {
            model.push(shape.clone());
        }
    }
}

pub fn background_color() -> Color {
    Color::from_rgb_u8(51, 51, 51)
}

pub fn grid_color() -> Color {
    Color::from_rgb_u8(69, 69, 69)
}

pub fn connection_color() -> Color {
    Color::from_rgb_u8(160, 160, 160)
}

pub fn port_hover_color() -> Color {
    Color::from_rgb_u8(255, 255, 0)
}

/// Fill color for a port or node body, keyed by data type. Unknown types
/// fall back to white.
pub fn port_type_color(port_type: &str) -> Color {
    match port_type {
        TYPE_INT | TYPE_FLOAT => Color::from_rgb_u8(128, 128, 128),
        TYPE_STRING => Color::from_rgb_u8(192, 192, 192),
        TYPE_BOOLEAN => Color::from_rgb_u8(64, 64, 64),
        TYPE_POINT => Color::from_rgb_u8(255, 0, 0),
        TYPE_COLOR => Color::from_rgb_u8(0, 255, 255),
        TYPE_GEOMETRY => Color::from_rgb_u8(135, 136, 162),
        TYPE_LIST => Color::from_rgb_u8(255, 175, 175),
        _ => Color::from_rgb_u8(255, 255, 255),
    }
}

const CONNECTION_STROKE_WIDTH: f32 = 2.0;

/// Path commands for a connection from `(x0, y0)` to `(x1, y1)`.
///
/// Nearly horizontal runs draw as a straight segment. Everything else is a
/// cubic whose control points sit directly below the start and above the
/// end, pushed apart by half the horizontal distance, which gives the line
/// its characteristic droop out of the output port.
pub fn connection_path(x0: f32, y0: f32, x1: f32, y1: f32) -> String {
    if (y1 - y0).abs() < GRID_CELL_SIZE {
        format!("M {x0} {y0} L {x1} {y1}")
    } else {
        let half_dx = (x1 - x0).abs() / 2.0;
        format!(
            "M {x0} {y0} C {x0} {} {x1} {} {x1} {y1}",
            y0 + half_dx,
            y1 - half_dx
        )
    }
}

/// Point where connections leave a node's output port.
fn output_anchor(node: &Node) -> Point {
    let r = node_rect(node.position);
    Point::new(r.x + 4.0, r.y + r.height + 4.0)
}

/// Point where a connection enters the input port at `index`.
fn input_anchor(node: &Node, index: usize) -> Point {
    let r = node_rect(node.position);
    Point::new(r.x + port_offset(index) + 4.0, r.y - 5.0)
}

/// Path for a committed connection, or `None` when either endpoint no
/// longer exists in the document.
pub fn committed_connection_path<D: Document>(
    document: &D,
    connection: &Connection,
) -> Option<String> {
    let output = document.child(&connection.output_node)?;
    let input = document.child(&connection.input_node)?;
    let index = input
        .inputs
        .iter()
        .position(|port| port.name == connection.input_port)?;
    let from = output_anchor(output);
    let to = input_anchor(input, index);
    Some(connection_path(from.x, from.y, to.x, to.y))
}

/// Grid line commands covering a `width` by `height` viewport.
///
/// Lines shift with the pan offset modulo one cell so the grid appears to
/// scroll, but cell size is fixed regardless of zoom. The 5 pixel shift
/// lines the grid up with node footprints.
pub fn grid_commands(width: f32, height: f32, transform: &ViewTransform) -> SharedString {
    let offset_x = (transform.translate().x % GRID_CELL_SIZE).trunc();
    let offset_y = (transform.translate().y % GRID_CELL_SIZE).trunc();
    let mut commands = String::new();

    let mut y = -GRID_CELL_SIZE;
    while y < height + GRID_CELL_SIZE {
        let line_y = y - 5.0 + offset_y;
        commands.push_str(&format!("M 0 {line_y} L {width} {line_y} "));
        y += GRID_CELL_SIZE;
    }
    let mut x = -GRID_CELL_SIZE;
    while x < width + GRID_CELL_SIZE {
        let line_x = x - 5.0 + offset_x;
        commands.push_str(&format!("M {line_x} 0 L {line_x} {height} "));
        x += GRID_CELL_SIZE;
    }
    SharedString::from(commands.trim_end())
}

/// Appends the shapes for one node: selection ring, body, render flag,
/// ports, icon swatch and name label.
fn paint_node(
    shapes: &mut Vec<Shape>,
    node: &Node,
    selected: bool,
    rendered: bool,
    hover_input_port: Option<&str>,
    hover_output: bool,
) {
    let r = node_rect(node.position);
    let body_color = port_type_color(&node.output_type);
    let white = Color::from_rgb_u8(255, 255, 255);

    if selected {
        shapes.push(Shape::Rect {
            x: r.x,
            y: r.y,
            width: NODE_WIDTH,
            height: NODE_HEIGHT,
            color: white,
        });
        shapes.push(Shape::Rect {
            x: r.x + 2.0,
            y: r.y + 2.0,
            width: NODE_WIDTH - 4.0,
            height: NODE_HEIGHT - 4.0,
            color: body_color,
        });
    } else {
        shapes.push(Shape::Rect {
            x: r.x,
            y: r.y,
            width: NODE_WIDTH,
            height: NODE_HEIGHT,
            color: body_color,
        });
    }

    if rendered {
        let commands = format!(
            "M {} {} L {} {} L {} {} Z",
            r.x + NODE_WIDTH - 2.0,
            r.y + NODE_HEIGHT - 20.0,
            r.x + NODE_WIDTH - 2.0,
            r.y + NODE_HEIGHT - 2.0,
            r.x + NODE_WIDTH - 20.0,
            r.y + NODE_HEIGHT - 2.0
        );
        shapes.push(Shape::FillPath {
            commands: SharedString::from(commands),
            color: white,
        });
    }

    let mut port_x = 0.0;
    for input in &node.inputs {
        let color = if hover_input_port == Some(input.name.as_str()) {
            port_hover_color()
        } else {
            port_type_color(&input.port_type)
        };
        shapes.push(Shape::Rect {
            x: r.x + port_x,
            y: r.y - PORT_HEIGHT,
            width: PORT_WIDTH,
            height: PORT_HEIGHT,
            color,
        });
        port_x += PORT_WIDTH + PORT_SPACING;
    }

    let output_color = if hover_output {
        port_hover_color()
    } else {
        body_color
    };
    shapes.push(Shape::Rect {
        x: r.x,
        y: r.y + NODE_HEIGHT,
        width: PORT_WIDTH,
        height: PORT_HEIGHT,
        color: output_color,
    });

    shapes.push(Shape::Rect {
        x: r.x + 5.0,
        y: r.y + 5.0,
        width: NODE_HEIGHT - 10.0,
        height: NODE_HEIGHT - 10.0,
        color: white,
    });
    shapes.push(Shape::Text {
        x: r.x + 30.0,
        y: r.y + 20.0,
        text: SharedString::from(node.name.as_str()),
        color: white,
    });
}

/// Builds the display list for one frame of `view` at the given viewport
/// size in screen pixels.
pub fn build_scene<D: Document>(view: &NetworkView<D>, width: f32, height: f32) -> Scene {
    let document = view.document();
    let mut shapes = Vec::new();

    for node in document.children() {
        let hover_input = view
            .hovered_input()
            .filter(|port| port.node == node.name)
            .map(|port| port.port.as_str());
        paint_node(
            &mut shapes,
            node,
            view.is_selected(&node.name),
            document.rendered_child() == Some(node.name.as_str()),
            hover_input,
            view.hovered_output() == Some(node.name.as_str()),
        );
    }

    for connection in document.connections() {
        if let Some(commands) = committed_connection_path(document, connection) {
            shapes.push(Shape::StrokePath {
                commands: SharedString::from(commands),
                color: connection_color(),
                width: CONNECTION_STROKE_WIDTH,
            });
        }
    }

    if let Some((source, endpoint)) = view.connection_drag() {
        if let Some(node) = document.child(source) {
            let from = output_anchor(node);
            shapes.push(Shape::StrokePath {
                commands: SharedString::from(connection_path(
                    from.x, from.y, endpoint.x, endpoint.y,
                )),
                color: connection_color(),
                width: CONNECTION_STROKE_WIDTH,
            });
        }
    }

    Scene {
        background: background_color(),
        grid: grid_commands(width, height, view.transform()),
        grid_color: grid_color(),
        shapes,
    }
}

impl<D: Document> NetworkView<D> {
    /// Display list for the current state at the given viewport size.
    pub fn scene(&self, width: f32, height: f32) -> Scene {
        build_scene(self, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubNetwork {
        children: Vec<Node>,
        connections: Vec<Connection>,
        rendered: Option<String>,
    }

    impl Document for StubNetwork {
        fn children(&self) -> &[Node] {
            &self.children
        }
        fn connections(&self) -> &[Connection] {
            &self.connections
        }
        fn rendered_child(&self) -> Option<&str> {
            self.rendered.as_deref()
        }
        fn set_active_node(&mut self, _node: Option<&str>) {}
        fn remove_nodes(&mut self, _names: &[String]) {}
        fn set_node_position(&mut self, _name: &str, _position: Point) {}
        fn connect(&mut self, _output_node: &str, _input_node: &str, _input_port: &str) {}
        fn disconnect(&mut self, _connection: &Connection) {}
        fn set_rendered_node(&mut self, _name: &str) {}
        fn show_node_creation_dialog(&mut self, _cell: (i32, i32)) {}
    }

    fn stub(children: Vec<Node>, connections: Vec<Connection>) -> StubNetwork {
        StubNetwork {
            children,
            connections,
            rendered: None,
        }
    }

    // ========================================================================
    // connection_path() - Straight vs curved
    // ========================================================================

    #[test]
    fn test_connection_path_straight_when_nearly_level() {
        assert_eq!(connection_path(0.0, 0.0, 100.0, 39.0), "M 0 0 L 100 39");
    }

    #[test]
    fn test_connection_path_curves_at_exactly_one_cell() {
        // The threshold is strict: a vertical distance of one full cell
        // already curves.
        assert!(connection_path(0.0, 0.0, 100.0, 40.0).contains(" C "));
    }

    #[test]
    fn test_connection_path_curves_past_one_cell() {
        // half_dx = 50, control points hang 50 below the start and 50 above
        // the end.
        assert_eq!(
            connection_path(0.0, 0.0, 100.0, 80.0),
            "M 0 0 C 0 50 100 30 100 80"
        );
    }

    #[test]
    fn test_connection_path_vertical_drop() {
        // Zero horizontal distance degenerates to a straight cubic.
        assert_eq!(
            connection_path(10.0, 0.0, 10.0, 120.0),
            "M 10 0 C 10 0 10 120 10 120"
        );
    }

    // ========================================================================
    // committed_connection_path() - Endpoint anchors
    // ========================================================================

    #[test]
    fn test_committed_path_uses_port_anchors() {
        let alpha = Node::new("alpha", Point::ZERO);
        let beta = Node::new("beta", Point::new(0.0, 4.0))
            .with_input("shape", TYPE_GEOMETRY)
            .with_input("position", TYPE_POINT);
        let doc = stub(
            vec![alpha, beta],
            vec![Connection::new("alpha", "beta", "position")],
        );
        let path = committed_connection_path(&doc, &doc.connections[0]);
        // Output anchor (4, 34), input anchor for port index 1 (24, 155).
        assert_eq!(path.as_deref(), Some("M 4 34 C 4 44 24 145 24 155"));
    }

    #[test]
    fn test_committed_path_none_when_node_missing() {
        let beta = Node::new("beta", Point::ZERO).with_input("shape", TYPE_GEOMETRY);
        let doc = stub(vec![beta], vec![Connection::new("ghost", "beta", "shape")]);
        assert!(committed_connection_path(&doc, &doc.connections[0]).is_none());
    }

    #[test]
    fn test_committed_path_none_when_port_missing() {
        let alpha = Node::new("alpha", Point::ZERO);
        let beta = Node::new("beta", Point::new(0.0, 4.0)).with_input("shape", TYPE_GEOMETRY);
        let doc = stub(
            vec![alpha, beta],
            vec![Connection::new("alpha", "beta", "missing")],
        );
        assert!(committed_connection_path(&doc, &doc.connections[0]).is_none());
    }

    // ========================================================================
    // grid_commands() - Screen-space grid
    // ========================================================================

    #[test]
    fn test_grid_identity_transform_shift() {
        let commands = grid_commands(80.0, 80.0, &ViewTransform::new());
        // First horizontal line sits at -45, first vertical at -45.
        assert!(commands.starts_with("M 0 -45 L 80 -45"));
        assert!(commands.contains("M -45 0 L -45 80"));
    }

    #[test]
    fn test_grid_scrolls_with_pan_modulo_cell() {
        let mut transform = ViewTransform::new();
        transform.pan(Point::new(100.0, 0.0));
        let panned = grid_commands(80.0, 80.0, &transform);
        // 100 % 40 = 20, so vertical lines shift right by 20.
        assert!(panned.contains("M -25 0 L -25 80"));

        transform.pan(Point::new(-60.0, 0.0));
        // Back at a multiple of the cell size, identical to no pan at all.
        assert_eq!(
            grid_commands(80.0, 80.0, &transform),
            grid_commands(80.0, 80.0, &ViewTransform::new())
        );
    }

    #[test]
    fn test_grid_ignores_zoom() {
        let mut transform = ViewTransform::new();
        transform.set_zoom(0.5);
        assert_eq!(
            grid_commands(80.0, 80.0, &transform),
            grid_commands(80.0, 80.0, &ViewTransform::new())
        );
    }

    // ========================================================================
    // port_type_color()
    // ========================================================================

    #[test]
    fn test_port_colors_by_type() {
        assert_eq!(port_type_color(TYPE_INT), port_type_color(TYPE_FLOAT));
        assert_eq!(port_type_color(TYPE_POINT), Color::from_rgb_u8(255, 0, 0));
        assert_eq!(port_type_color(TYPE_COLOR), Color::from_rgb_u8(0, 255, 255));
        assert_eq!(
            port_type_color("unknown"),
            Color::from_rgb_u8(255, 255, 255)
        );
    }

    // ========================================================================
    // build_scene() - Display list contents
    // ========================================================================

    fn shape_count<F: Fn(&Shape) -> bool>(scene: &Scene, pred: F) -> usize {
        scene.shapes.iter().filter(|shape| pred(shape)).count()
    }

    #[test]
    fn test_scene_plain_node_shape_budget() {
        let doc = stub(
            vec![Node::new("alpha", Point::ZERO).with_input("shape", TYPE_GEOMETRY)],
            vec![],
        );
        let view = NetworkView::new(doc);
        let scene = view.scene(200.0, 200.0);
        // Body, one input port, output port, icon swatch and the label.
        assert_eq!(
            shape_count(&scene, |s| matches!(s, Shape::Rect { .. })),
            4
        );
        assert_eq!(
            shape_count(&scene, |s| matches!(s, Shape::Text { .. })),
            1
        );
        assert_eq!(
            shape_count(&scene, |s| matches!(s, Shape::StrokePath { .. })),
            0
        );
    }

    #[test]
    fn test_scene_selected_node_gains_ring() {
        let doc = stub(vec![Node::new("alpha", Point::ZERO)], vec![]);
        let mut view = NetworkView::new(doc);
        let plain = view.scene(200.0, 200.0);
        view.single_select(Some("alpha"));
        let selected = view.scene(200.0, 200.0);
        assert_eq!(
            shape_count(&selected, |s| matches!(s, Shape::Rect { .. })),
            shape_count(&plain, |s| matches!(s, Shape::Rect { .. })) + 1
        );
        // The ring is white and full-size, painted before the inset body.
        assert_eq!(
            selected.shapes[0],
            Shape::Rect {
                x: 0.0,
                y: 0.0,
                width: NODE_WIDTH,
                height: NODE_HEIGHT,
                color: Color::from_rgb_u8(255, 255, 255),
            }
        );
    }

    #[test]
    fn test_scene_rendered_node_gains_flag() {
        let mut doc = stub(vec![Node::new("alpha", Point::ZERO)], vec![]);
        doc.rendered = Some("alpha".to_owned());
        let view = NetworkView::new(doc);
        let scene = view.scene(200.0, 200.0);
        assert_eq!(
            shape_count(&scene, |s| matches!(s, Shape::FillPath { .. })),
            1
        );
    }

    #[test]
    fn test_scene_connections_stroke() {
        let alpha = Node::new("alpha", Point::ZERO);
        let beta = Node::new("beta", Point::new(0.0, 4.0)).with_input("shape", TYPE_GEOMETRY);
        let doc = stub(
            vec![alpha, beta],
            vec![Connection::new("alpha", "beta", "shape")],
        );
        let view = NetworkView::new(doc);
        let scene = view.scene(200.0, 200.0);
        assert_eq!(
            shape_count(&scene, |s| matches!(s, Shape::StrokePath { .. })),
            1
        );
    }

    #[test]
    fn test_scene_dangling_connection_skipped() {
        let beta = Node::new("beta", Point::ZERO).with_input("shape", TYPE_GEOMETRY);
        let doc = stub(vec![beta], vec![Connection::new("ghost", "beta", "shape")]);
        let view = NetworkView::new(doc);
        let scene = view.scene(200.0, 200.0);
        assert_eq!(
            shape_count(&scene, |s| matches!(s, Shape::StrokePath { .. })),
            0
        );
    }

    #[test]
    fn test_sync_shapes_to_model_replaces_rows() {
        let doc = stub(vec![Node::new("alpha", Point::ZERO)], vec![]);
        let view = NetworkView::new(doc);
        let scene = view.scene(200.0, 200.0);
        let model = VecModel::from(vec![Shape::Text {
            x: 0.0,
            y: 0.0,
            text: SharedString::from("stale"),
            color: Color::from_rgb_u8(0, 0, 0),
        }]);
        scene.sync_shapes_to_model(&model);
        assert_eq!(model.row_count(), scene.shapes.len());
        let rows: Vec<Shape> = model.iter().collect();
        assert_eq!(rows, scene.shapes);
    }
}
