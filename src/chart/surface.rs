//! Drawing surfaces
//!
//! The renderer only talks to [`Surface`]. [`DisplayList`] records the calls as
//! serializable draw operations so a host UI can replay them on its own canvas.

use crate::levels::Rgb;
use serde::Serialize;

/// A position in surface pixels, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Line stroke
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub width: f64,
    pub color: Rgb,
}

/// Horizontal text alignment relative to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Text style; the anchor's y coordinate is the baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub size: f64,
    pub color: Rgb,
    pub align: TextAlign,
}

/// Something the chart can be drawn onto
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Erase everything and fill with the background color
    fn clear(&mut self, background: Rgb);

    /// Stroke connected line segments through `points`
    fn stroke_polyline(&mut self, points: &[Point], stroke: Stroke);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgb);

    fn fill_text(&mut self, text: &str, anchor: Point, style: TextStyle);
}

/// A recorded drawing call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Clear {
        background: Rgb,
    },
    Polyline {
        points: Vec<Point>,
        stroke: Stroke,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Rgb,
    },
    Text {
        text: String,
        anchor: Point,
        style: TextStyle,
    },
}

/// Surface that records draw operations instead of producing pixels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayList {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Number of filled circles, i.e. chart markers
    pub fn circle_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Circle { .. }))
            .count()
    }
}

impl Surface for DisplayList {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, background: Rgb) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear { background });
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: Stroke) {
        self.ops.push(DrawOp::Polyline {
            points: points.to_vec(),
            stroke,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgb) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, anchor: Point, style: TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            anchor,
            style,
        });
    }
}
