//! SVG surface

use super::surface::{Point, Stroke, Surface, TextAlign, TextStyle};
use crate::levels::Rgb;
use std::fmt::Write;

/// Surface that accumulates SVG elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgSurface {
    width: u32,
    height: u32,
    elements: Vec<String>,
}

impl SvgSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    /// Complete SVG document for the current contents
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        for element in &self.elements {
            out.push_str("  ");
            out.push_str(element);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }
}

impl Surface for SvgSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, background: Rgb) {
        self.elements.clear();
        self.elements.push(format!(
            r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
            self.width, self.height, background
        ));
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: Stroke) {
        if points.len() < 2 {
            return;
        }
        let coords: Vec<String> = points
            .iter()
            .map(|p| format!("{},{}", num(p.x), num(p.y)))
            .collect();
        self.elements.push(format!(
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round" stroke-linecap="round"/>"#,
            coords.join(" "),
            stroke.color,
            num(stroke.width)
        ));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgb) {
        self.elements.push(format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
            num(center.x),
            num(center.y),
            num(radius),
            color
        ));
    }

    fn fill_text(&mut self, text: &str, anchor: Point, style: TextStyle) {
        let text_anchor = match style.align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        self.elements.push(format!(
            r#"<text x="{}" y="{}" font-family="Arial, sans-serif" font-size="{}" fill="{}" text-anchor="{}">{}</text>"#,
            num(anchor.x),
            num(anchor.y),
            num(style.size),
            style.color,
            text_anchor,
            escape(text)
        ));
    }
}

/// Format a coordinate with at most two decimals and no trailing zeros
fn num(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
