/// Brainstorming whiteboard model
///
/// Free-form canvas of typed shapes with a tool palette, pan, and zoom.
/// All state is client-local; nothing here touches the backend.
///
/// Coordinates come in two spaces: screen coordinates (pointer events) and
/// world coordinates (shape positions). The mapping is
/// `world = (screen - offset) / scale`.
///
/// # Example
///
/// ```
/// use nexus_client::canvas::{CanvasState, Tool};
///
/// let mut canvas = CanvasState::new();
/// canvas.handle_key("n");
/// assert_eq!(canvas.tool(), Tool::Sticky);
///
/// canvas.pointer_down(200.0, 150.0);
/// assert_eq!(canvas.shapes().len(), 1);
/// // Creation selects the shape and drops back to the select tool
/// assert_eq!(canvas.tool(), Tool::Select);
/// ```

use serde::{Deserialize, Serialize};

/// Smallest zoom factor
pub const MIN_ZOOM: f64 = 0.25;

/// Largest zoom factor
pub const MAX_ZOOM: f64 = 2.0;

/// Sticky note creation size
const STICKY_SIZE: (f64, f64) = (180.0, 150.0);

/// Creation size for every other shape
const SHAPE_SIZE: (f64, f64) = (100.0, 100.0);

/// Sticky note default color
const STICKY_COLOR: &str = "#BFB3FD";

/// Default color for every other shape
const SHAPE_COLOR: &str = "#8B5CF6";

/// Active tool in the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Select and drag shapes
    Select,

    /// Pan the canvas
    Hand,

    /// Draw a rectangle
    Rect,

    /// Draw a circle
    Circle,

    /// Draw a diamond
    Diamond,

    /// Draw a line
    Line,

    /// Draw an arrow
    Arrow,

    /// Place a text block
    Text,

    /// Place a sticky note
    Sticky,
}

impl Tool {
    /// Maps a keyboard shortcut to its tool
    pub fn from_key(key: &str) -> Option<Tool> {
        match key {
            "v" => Some(Tool::Select),
            "h" => Some(Tool::Hand),
            "r" => Some(Tool::Rect),
            "o" => Some(Tool::Circle),
            "d" => Some(Tool::Diamond),
            "l" => Some(Tool::Line),
            "a" => Some(Tool::Arrow),
            "t" => Some(Tool::Text),
            "n" => Some(Tool::Sticky),
            _ => None,
        }
    }

    /// Whether the tool creates a shape on pointer-down
    pub fn is_drawing(&self) -> bool {
        !matches!(self, Tool::Select | Tool::Hand)
    }

    /// Shape kind produced by a drawing tool
    fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            Tool::Rect => Some(ShapeKind::Rect),
            Tool::Circle => Some(ShapeKind::Circle),
            Tool::Diamond => Some(ShapeKind::Diamond),
            Tool::Line => Some(ShapeKind::Line),
            Tool::Arrow => Some(ShapeKind::Arrow),
            Tool::Text => Some(ShapeKind::Text),
            Tool::Sticky => Some(ShapeKind::Sticky),
            Tool::Select | Tool::Hand => None,
        }
    }
}

/// Kind of shape on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Sticky note
    Sticky,

    /// Rectangle
    Rect,

    /// Circle
    Circle,

    /// Diamond
    Diamond,

    /// Line
    Line,

    /// Arrow
    Arrow,

    /// Text block
    Text,
}

/// One shape on the canvas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    /// Canvas-local ID
    pub id: u64,

    /// Shape kind
    pub kind: ShapeKind,

    /// World-space X position
    pub x: f64,

    /// World-space Y position
    pub y: f64,

    /// Width
    pub width: f64,

    /// Height
    pub height: f64,

    /// Fill color
    pub color: String,

    /// Text content (sticky notes and text blocks)
    pub text: String,
}

/// In-flight drag of the selected shape
#[derive(Debug, Clone, Copy)]
struct DragState {
    shape_id: u64,

    /// World-space offset from the grab point to the shape origin
    grab_dx: f64,
    grab_dy: f64,
}

/// In-flight pan of the viewport
#[derive(Debug, Clone, Copy)]
struct PanState {
    /// Screen position where the viewport offset was when the pan began
    start_x: f64,
    start_y: f64,
}

/// Whiteboard state
#[derive(Debug)]
pub struct CanvasState {
    tool: Tool,
    shapes: Vec<Shape>,
    selected: Option<u64>,
    next_id: u64,

    /// Viewport offset in screen space
    offset: (f64, f64),

    /// Zoom factor, clamped to `[MIN_ZOOM, MAX_ZOOM]`
    scale: f64,

    drag: Option<DragState>,
    pan: Option<PanState>,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasState {
    /// Creates an empty canvas with the select tool active
    pub fn new() -> Self {
        Self {
            tool: Tool::Select,
            shapes: Vec::new(),
            selected: None,
            next_id: 1,
            offset: (0.0, 0.0),
            scale: 1.0,
            drag: None,
            pan: None,
        }
    }

    /// Active tool
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switches the active tool
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// All shapes in creation order
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Currently selected shape
    pub fn selected(&self) -> Option<&Shape> {
        let id = self.selected?;
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Viewport offset in screen space
    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    /// Current zoom factor
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Converts screen coordinates to world coordinates
    pub fn to_world(&self, screen_x: f64, screen_y: f64) -> (f64, f64) {
        (
            (screen_x - self.offset.0) / self.scale,
            (screen_y - self.offset.1) / self.scale,
        )
    }

    /// Handles a keyboard event
    ///
    /// Tool shortcuts switch the palette; `delete`/`backspace` remove the
    /// selection; `escape` deselects. Returns whether the key did anything.
    pub fn handle_key(&mut self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();

        if let Some(tool) = Tool::from_key(&key) {
            self.tool = tool;
            return true;
        }

        match key.as_str() {
            "delete" | "backspace" => self.delete_selected(),
            "escape" => {
                let had_selection = self.selected.is_some();
                self.selected = None;
                had_selection
            }
            _ => false,
        }
    }

    /// Handles pointer-down on empty canvas
    ///
    /// Hand tool starts a pan. A drawing tool creates its shape at the
    /// click point, selects it, and drops back to the select tool. The
    /// select tool does nothing on empty canvas.
    pub fn pointer_down(&mut self, screen_x: f64, screen_y: f64) {
        match self.tool {
            Tool::Hand => {
                self.pan = Some(PanState {
                    start_x: screen_x - self.offset.0,
                    start_y: screen_y - self.offset.1,
                });
            }
            Tool::Select => {}
            tool => {
                let (x, y) = self.to_world(screen_x, screen_y);
                // Drawing tools always map to a kind
                let Some(kind) = tool.shape_kind() else {
                    return;
                };

                let (width, height) = if kind == ShapeKind::Sticky {
                    STICKY_SIZE
                } else {
                    SHAPE_SIZE
                };

                let shape = Shape {
                    id: self.next_id,
                    kind,
                    x,
                    y,
                    width,
                    height,
                    color: if kind == ShapeKind::Sticky {
                        STICKY_COLOR.to_string()
                    } else {
                        SHAPE_COLOR.to_string()
                    },
                    text: if kind == ShapeKind::Sticky {
                        "New note".to_string()
                    } else {
                        String::new()
                    },
                };

                self.next_id += 1;
                self.selected = Some(shape.id);
                self.shapes.push(shape);
                self.tool = Tool::Select;
            }
        }
    }

    /// Handles pointer-down on a shape
    ///
    /// In select or hand mode this selects the shape and starts a drag,
    /// recording where on the shape it was grabbed so it does not jump to
    /// the cursor.
    pub fn shape_pointer_down(&mut self, shape_id: u64, screen_x: f64, screen_y: f64) {
        if !matches!(self.tool, Tool::Select | Tool::Hand) {
            return;
        }

        let (wx, wy) = self.to_world(screen_x, screen_y);
        if let Some(shape) = self.shapes.iter().find(|s| s.id == shape_id) {
            self.selected = Some(shape_id);
            self.drag = Some(DragState {
                shape_id,
                grab_dx: wx - shape.x,
                grab_dy: wy - shape.y,
            });
        }
    }

    /// Handles pointer movement
    ///
    /// Drives whichever gesture is in flight: panning moves the viewport
    /// offset, dragging moves the grabbed shape.
    pub fn pointer_move(&mut self, screen_x: f64, screen_y: f64) {
        if let Some(pan) = self.pan {
            self.offset = (screen_x - pan.start_x, screen_y - pan.start_y);
            return;
        }

        if let Some(drag) = self.drag {
            let (wx, wy) = self.to_world(screen_x, screen_y);
            if let Some(shape) = self.shapes.iter_mut().find(|s| s.id == drag.shape_id) {
                shape.x = wx - drag.grab_dx;
                shape.y = wy - drag.grab_dy;
            }
        }
    }

    /// Handles pointer release, ending any pan or drag
    pub fn pointer_up(&mut self) {
        self.pan = None;
        self.drag = None;
    }

    /// Adjusts zoom by a wheel delta, clamped to `[MIN_ZOOM, MAX_ZOOM]`
    pub fn zoom(&mut self, delta: f64) {
        self.scale = (self.scale + delta).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Removes the selected shape
    ///
    /// Returns whether a shape was removed.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selected.take() else {
            return false;
        };

        let before = self.shapes.len();
        self.shapes.retain(|s| s.id != id);
        self.shapes.len() < before
    }
}
