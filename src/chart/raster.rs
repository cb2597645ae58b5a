//! RGBA raster surface
//!
//! Pixels are sampled at their centers: a pixel is painted when its center lies
//! inside the shape. Lines are painted by distance to each segment, which gives
//! round caps and joins. Output is deterministic for identical draw calls.

use super::font::{glyph, GLYPH_ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};
use super::surface::{Point, Stroke, Surface, TextAlign, TextStyle};
use crate::levels::Rgb;

/// In-memory RGBA8 image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterSurface {
    /// Create a fully transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// RGBA bytes, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA value at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Color at (x, y), ignoring alpha
    pub fn color_at(&self, x: u32, y: u32) -> Option<Rgb> {
        self.pixel(x, y).map(|[r, g, b, _]| Rgb::new(r, g, b))
    }

    /// Encode as binary PPM (P6); alpha is dropped
    pub fn to_ppm(&self) -> Vec<u8> {
        let header = format!("P6\n{} {}\n255\n", self.width, self.height);
        let mut out = Vec::with_capacity(header.len() + self.pixels.len() / 4 * 3);
        out.extend_from_slice(header.as_bytes());
        for rgba in self.pixels.chunks_exact(4) {
            out.extend_from_slice(&rgba[..3]);
        }
        out
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let i = self.offset(x as u32, y as u32);
        self.pixels[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, 255]);
    }

    /// Pixel index range covering `[lo, hi]`, clamped to `limit`
    fn span(lo: f64, hi: f64, limit: u32) -> std::ops::Range<i64> {
        let start = (lo.floor() as i64).max(0);
        let end = (hi.ceil() as i64 + 1).min(i64::from(limit));
        start..end.max(start)
    }

    fn stroke_segment(&mut self, a: Point, b: Point, stroke: Stroke) {
        let half = stroke.width / 2.0;
        let xs = Self::span(a.x.min(b.x) - half, a.x.max(b.x) + half, self.width);
        let ys = Self::span(a.y.min(b.y) - half, a.y.max(b.y) + half, self.height);
        for y in ys {
            for x in xs.clone() {
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if distance_to_segment(center, a, b) <= half {
                    self.put(x, y, stroke.color);
                }
            }
        }
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, background: Rgb) {
        for rgba in self.pixels.chunks_exact_mut(4) {
            rgba.copy_from_slice(&[background.r, background.g, background.b, 255]);
        }
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: Stroke) {
        for pair in points.windows(2) {
            self.stroke_segment(pair[0], pair[1], stroke);
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgb) {
        let xs = Self::span(center.x - radius, center.x + radius, self.width);
        let ys = Self::span(center.y - radius, center.y + radius, self.height);
        let r2 = radius * radius;
        for y in ys {
            for x in xs.clone() {
                let dx = x as f64 + 0.5 - center.x;
                let dy = y as f64 + 0.5 - center.y;
                if dx * dx + dy * dy <= r2 {
                    self.put(x, y, color);
                }
            }
        }
    }

    fn fill_text(&mut self, text: &str, anchor: Point, style: TextStyle) {
        // Glyphs never need to be taller than the surface
        let scale = ((style.size / GLYPH_HEIGHT as f64).floor() as i64)
            .min(i64::from(self.height))
            .max(1);
        let chars = text.chars().count() as i64;
        if chars == 0 {
            return;
        }
        let advance = GLYPH_ADVANCE as i64 * scale;
        let text_width = (chars * advance - scale) as f64;
        let left = match style.align {
            TextAlign::Left => anchor.x,
            TextAlign::Center => anchor.x - text_width / 2.0,
            TextAlign::Right => anchor.x - text_width,
        }
        .round() as i64;
        let top = (anchor.y - (GLYPH_HEIGHT as i64 * scale) as f64).round() as i64;

        for (ci, c) in text.chars().enumerate() {
            let origin_x = left + ci as i64 * advance;
            for (row, bits) in glyph(c).iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                        continue;
                    }
                    let px = origin_x + col as i64 * scale;
                    let py = top + row as i64 * scale;
                    for dy in 0..scale {
                        for dx in 0..scale {
                            self.put(px + dx, py + dy, style.color);
                        }
                    }
                }
            }
        }
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb = Rgb::new(255, 255, 255);
    const RED: Rgb = Rgb::new(255, 0, 0);

    #[test]
    fn test_clear_fills_background() {
        let mut surface = RasterSurface::new(4, 3);
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 0]));
        surface.clear(WHITE);
        assert!(surface.pixels().chunks_exact(4).all(|p| p == [255, 255, 255, 255]));
    }

    #[test]
    fn test_fill_circle() {
        let mut surface = RasterSurface::new(20, 20);
        surface.clear(WHITE);
        surface.fill_circle(Point::new(10.0, 10.0), 3.0, RED);
        assert_eq!(surface.color_at(10, 10), Some(RED));
        assert_eq!(surface.color_at(9, 9), Some(RED));
        assert_eq!(surface.color_at(10, 14), Some(WHITE));
        assert_eq!(surface.color_at(0, 0), Some(WHITE));
    }

    #[test]
    fn test_horizontal_line() {
        let mut surface = RasterSurface::new(20, 10);
        surface.clear(WHITE);
        surface.stroke_polyline(
            &[Point::new(2.0, 5.0), Point::new(18.0, 5.0)],
            Stroke {
                width: 2.0,
                color: RED,
            },
        );
        // Rows 4 and 5 have centers 0.5 from the line
        assert_eq!(surface.color_at(10, 4), Some(RED));
        assert_eq!(surface.color_at(10, 5), Some(RED));
        assert_eq!(surface.color_at(10, 7), Some(WHITE));
    }

    #[test]
    fn test_single_point_polyline_draws_nothing() {
        let mut surface = RasterSurface::new(10, 10);
        surface.clear(WHITE);
        let before = surface.clone();
        surface.stroke_polyline(
            &[Point::new(5.0, 5.0)],
            Stroke {
                width: 3.0,
                color: RED,
            },
        );
        assert_eq!(surface, before);
    }

    #[test]
    fn test_text_is_clipped_not_panicking() {
        let mut surface = RasterSurface::new(30, 20);
        surface.clear(WHITE);
        surface.fill_text(
            "Moderate",
            Point::new(5.0, 10.0),
            TextStyle {
                size: 12.0,
                color: RED,
                align: TextAlign::Right,
            },
        );
        surface.fill_text(
            "1/2",
            Point::new(15.0, 15.0),
            TextStyle {
                size: 12.0,
                color: RED,
                align: TextAlign::Center,
            },
        );
        assert!(surface
            .pixels()
            .chunks_exact(4)
            .any(|p| p == [255, 0, 0, 255]));
    }

    #[test]
    fn test_huge_text_is_capped_to_surface() {
        let mut surface = RasterSurface::new(40, 20);
        surface.clear(WHITE);
        surface.fill_text(
            "8",
            Point::new(0.0, 20.0),
            TextStyle {
                size: 1e9,
                color: RED,
                align: TextAlign::Left,
            },
        );
        // One glyph pixel scaled to the full surface height covers the top-left corner
        assert_eq!(surface.pixel(0, 0), Some([255, 255, 255, 255]));
        assert!(surface
            .pixels()
            .chunks_exact(4)
            .any(|p| p == [255, 0, 0, 255]));
    }

    #[test]
    fn test_ppm_encoding() {
        let mut surface = RasterSurface::new(2, 1);
        surface.clear(RED);
        let ppm = surface.to_ppm();
        assert!(ppm.starts_with(b"P6\n2 1\n255\n"));
        assert_eq!(&ppm[ppm.len() - 6..], &[255, 0, 0, 255, 0, 0]);
    }
}
