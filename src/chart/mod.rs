//! Stress history chart
//!
//! Renders a time-ordered stress history onto any [`Surface`]:
//! axes, one `month/day` label per sample, the four level labels on the
//! vertical axis, a connecting line, and a marker per sample colored by level.
//!
//! Rendering always starts by clearing the surface, so drawing the same history
//! twice produces the same output.

mod font;
mod raster;
mod surface;
mod svg;
mod view;

pub use raster::RasterSurface;
pub use surface::{DisplayList, DrawOp, Point, Stroke, Surface, TextAlign, TextStyle};
pub use svg::SvgSurface;
pub use view::ChartView;

use crate::error::ComputeError;
use crate::levels::{Rgb, LEVEL_BANDS};
use crate::types::StressSample;
use chrono::{Datelike, FixedOffset};
use serde::{Deserialize, Serialize};

/// Default chart width in pixels
pub const DEFAULT_WIDTH: u32 = 600;
/// Default chart height in pixels
pub const DEFAULT_HEIGHT: u32 = 300;

/// Chart layout and styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLayout {
    /// Uniform padding around the plot area
    pub padding: f64,
    pub marker_radius: f64,
    pub line_width: f64,
    pub axis_width: f64,
    pub font_size: f64,
    /// Gap between the vertical axis and the right edge of the level labels
    pub level_label_gap: f64,
    /// Vertical nudge applied to level labels so they sit centered on their row
    pub level_label_baseline: f64,
    /// Offset from UTC used for date labels, in minutes
    pub utc_offset_minutes: i32,
    pub background: Rgb,
    pub axis_color: Rgb,
    pub text_color: Rgb,
    pub line_color: Rgb,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            padding: 40.0,
            marker_radius: 6.0,
            line_width: 3.0,
            axis_width: 2.0,
            font_size: 12.0,
            level_label_gap: 10.0,
            level_label_baseline: 4.0,
            utc_offset_minutes: 0,
            background: Rgb::new(0xFF, 0xFF, 0xFF),
            axis_color: Rgb::new(0xCB, 0xD5, 0xE0),
            text_color: Rgb::new(0x4A, 0x55, 0x68),
            line_color: Rgb::new(0x3B, 0x82, 0xF6),
        }
    }
}

impl ChartLayout {
    /// Load a layout from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Text must be a positive size no taller than the surface
    fn check_font_size(&self, surface_height: f64) -> Result<(), ComputeError> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 || self.font_size > surface_height {
            return Err(ComputeError::InvalidInput(format!(
                "font size {} must be in (0, {}]",
                self.font_size, surface_height
            )));
        }
        Ok(())
    }

    fn utc_offset(&self) -> Result<FixedOffset, ComputeError> {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).ok_or_else(|| {
            ComputeError::InvalidInput(format!(
                "UTC offset of {} minutes is out of range",
                self.utc_offset_minutes
            ))
        })
    }
}

/// Plot-area geometry for a surface size and padding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl ChartGeometry {
    pub fn new(width: u32, height: u32, padding: f64) -> Result<Self, ComputeError> {
        let geometry = Self {
            width: f64::from(width),
            height: f64::from(height),
            padding,
        };
        if !padding.is_finite()
            || padding < 0.0
            || geometry.plot_width() <= 0.0
            || geometry.plot_height() <= 0.0
        {
            return Err(ComputeError::InvalidInput(format!(
                "padding {} leaves no plot area on a {}x{} surface",
                padding, width, height
            )));
        }
        Ok(geometry)
    }

    pub fn plot_width(&self) -> f64 {
        self.width - 2.0 * self.padding
    }

    pub fn plot_height(&self) -> f64 {
        self.height - 2.0 * self.padding
    }

    /// Bottom edge of the plot area (the horizontal axis)
    pub fn baseline(&self) -> f64 {
        self.height - self.padding
    }

    /// Horizontal distance between consecutive samples
    pub fn step(&self, count: usize) -> f64 {
        self.plot_width() / count.saturating_sub(1).max(1) as f64
    }

    pub fn x_at(&self, index: usize, count: usize) -> f64 {
        self.padding + index as f64 * self.step(count)
    }

    pub fn y_for_score(&self, score: f64) -> f64 {
        self.baseline() - (score / 100.0) * self.plot_height()
    }

    /// Vertical position of level row `rank` (0 = bottom)
    pub fn level_row_y(&self, rank: usize) -> f64 {
        let rows = LEVEL_BANDS.len() - 1;
        self.baseline() - rank as f64 * (self.plot_height() / rows as f64)
    }

    /// Marker positions for a history, in order
    pub fn points(&self, history: &[StressSample]) -> Vec<Point> {
        history
            .iter()
            .enumerate()
            .map(|(i, sample)| Point::new(self.x_at(i, history.len()), self.y_for_score(sample.score())))
            .collect()
    }
}

/// Check that timestamps never decrease
pub fn ensure_time_ordered(history: &[StressSample]) -> Result<(), ComputeError> {
    match history
        .windows(2)
        .position(|pair| pair[1].timestamp() < pair[0].timestamp())
    {
        Some(i) => Err(ComputeError::InvalidInput(format!(
            "history is not in ascending time order: sample {} ({}) precedes sample {} ({})",
            i,
            history[i].timestamp().to_rfc3339(),
            i + 1,
            history[i + 1].timestamp().to_rfc3339()
        ))),
        None => Ok(()),
    }
}

/// Render a stress history onto a surface.
///
/// Input is validated before anything is drawn: the history must be in
/// ascending time order, the layout must leave a plot area and its font size
/// must fit the surface. An empty history
/// draws only the axes and level labels.
pub fn render_history<S: Surface + ?Sized>(
    surface: &mut S,
    history: &[StressSample],
    layout: &ChartLayout,
) -> Result<(), ComputeError> {
    ensure_time_ordered(history)?;
    let geometry = ChartGeometry::new(surface.width(), surface.height(), layout.padding)?;
    layout.check_font_size(geometry.height)?;
    let offset = layout.utc_offset()?;

    surface.clear(layout.background);

    // Axes
    let p = geometry.padding;
    surface.stroke_polyline(
        &[
            Point::new(p, p),
            Point::new(p, geometry.baseline()),
            Point::new(geometry.width - p, geometry.baseline()),
        ],
        Stroke {
            width: layout.axis_width,
            color: layout.axis_color,
        },
    );

    // Date labels
    let date_style = TextStyle {
        size: layout.font_size,
        color: layout.text_color,
        align: TextAlign::Center,
    };
    let date_y = geometry.height - p / 2.0;
    for (i, sample) in history.iter().enumerate() {
        let local = sample.timestamp().with_timezone(&offset);
        let label = format!("{}/{}", local.month(), local.day());
        surface.fill_text(
            &label,
            Point::new(geometry.x_at(i, history.len()), date_y),
            date_style,
        );
    }

    // Level labels
    let level_style = TextStyle {
        size: layout.font_size,
        color: layout.text_color,
        align: TextAlign::Right,
    };
    for (rank, band) in LEVEL_BANDS.iter().enumerate() {
        surface.fill_text(
            band.label,
            Point::new(
                p - layout.level_label_gap,
                geometry.level_row_y(rank) + layout.level_label_baseline,
            ),
            level_style,
        );
    }

    if history.is_empty() {
        return Ok(());
    }

    // Line first so markers sit on top of it
    let points = geometry.points(history);
    if points.len() > 1 {
        surface.stroke_polyline(
            &points,
            Stroke {
                width: layout.line_width,
                color: layout.line_color,
            },
        );
    }
    for (point, sample) in points.iter().zip(history) {
        surface.fill_circle(*point, layout.marker_radius, sample.level().color());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StressLevel;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn at(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, 10, 0, 0).unwrap()
    }

    fn profile_history() -> Vec<StressSample> {
        [(25.0, 1), (45.0, 5), (75.0, 10), (55.0, 15), (30.0, 20)]
            .iter()
            .map(|&(score, day)| StressSample::from_score(score, at(3, day)).unwrap())
            .collect()
    }

    fn texts(list: &DisplayList) -> Vec<String> {
        list.ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_geometry() {
        let g = ChartGeometry::new(600, 300, 40.0).unwrap();
        assert_eq!(g.plot_width(), 520.0);
        assert_eq!(g.plot_height(), 220.0);
        assert_eq!(g.step(5), 130.0);
        assert_eq!(g.step(1), 520.0);
        assert_eq!(g.step(0), 520.0);
        assert_eq!(g.x_at(2, 5), 300.0);
        assert_eq!(g.y_for_score(0.0), 260.0);
        assert_eq!(g.y_for_score(100.0), 40.0);
        assert_eq!(g.y_for_score(50.0), 150.0);
        assert_eq!(g.level_row_y(0), 260.0);
        assert_eq!(g.level_row_y(3), 40.0);
    }

    #[test]
    fn test_geometry_rejects_oversized_padding() {
        assert!(ChartGeometry::new(80, 300, 40.0).is_err());
        assert!(ChartGeometry::new(600, 300, -1.0).is_err());
    }

    #[test]
    fn test_render_profile_history() {
        let history = profile_history();
        let mut list = DisplayList::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        render_history(&mut list, &history, &ChartLayout::default()).unwrap();

        let ops = list.ops();
        assert!(matches!(ops[0], DrawOp::Clear { .. }));

        // Axes: (P,P) -> (P,H-P) -> (W-P,H-P)
        match &ops[1] {
            DrawOp::Polyline { points, stroke } => {
                assert_eq!(
                    points,
                    &vec![
                        Point::new(40.0, 40.0),
                        Point::new(40.0, 260.0),
                        Point::new(560.0, 260.0)
                    ]
                );
                assert_eq!(stroke.width, 2.0);
            }
            other => panic!("expected axes, got {other:?}"),
        }

        assert_eq!(
            texts(&list),
            vec!["3/1", "3/5", "3/10", "3/15", "3/20", "Low", "Moderate", "High", "Severe"]
        );
        assert_eq!(list.circle_count(), 5);

        let circles: Vec<(Point, Rgb)> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Circle { center, color, .. } => Some((*center, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(circles[0].0, Point::new(40.0, 205.0));
        assert_eq!(circles[0].1, StressLevel::Low.color());
        assert_eq!(circles[2].0, Point::new(300.0, 95.0));
        assert_eq!(circles[2].1, StressLevel::High.color());
        assert_eq!(circles[4].1, StressLevel::Moderate.color());
    }

    #[test]
    fn test_line_drawn_once_before_markers() {
        let history = profile_history();
        let mut list = DisplayList::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        render_history(&mut list, &history, &ChartLayout::default()).unwrap();

        let polylines: Vec<usize> = list
            .ops()
            .iter()
            .enumerate()
            .filter(|(_, op)| matches!(op, DrawOp::Polyline { .. }))
            .map(|(i, _)| i)
            .collect();
        // Axes plus one data line
        assert_eq!(polylines.len(), 2);
        let first_circle = list
            .ops()
            .iter()
            .position(|op| matches!(op, DrawOp::Circle { .. }))
            .unwrap();
        assert!(polylines[1] < first_circle);

        match &list.ops()[polylines[1]] {
            DrawOp::Polyline { points, stroke } => {
                assert_eq!(points.len(), 5);
                assert_eq!(stroke.width, 3.0);
                assert_eq!(stroke.color, Rgb::new(0x3B, 0x82, 0xF6));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_empty_history_draws_axes_only() {
        let mut list = DisplayList::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        render_history(&mut list, &[], &ChartLayout::default()).unwrap();
        assert_eq!(list.circle_count(), 0);
        let polylines = list
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::Polyline { .. }))
            .count();
        assert_eq!(polylines, 1);
        assert_eq!(texts(&list), vec!["Low", "Moderate", "High", "Severe"]);
    }

    #[test]
    fn test_single_sample_has_marker_but_no_line() {
        let history = vec![StressSample::from_score(50.0, at(4, 2)).unwrap()];
        let mut list = DisplayList::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        render_history(&mut list, &history, &ChartLayout::default()).unwrap();
        assert_eq!(list.circle_count(), 1);
        let polylines = list
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::Polyline { .. }))
            .count();
        assert_eq!(polylines, 1);
        assert!(list.ops().iter().any(|op| matches!(
            op,
            DrawOp::Circle { center, .. } if *center == Point::new(40.0, 150.0)
        )));
    }

    #[test]
    fn test_out_of_order_history_rejected_without_drawing() {
        let mut history = profile_history();
        history.swap(1, 2);
        let mut list = DisplayList::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        let err = render_history(&mut list, &history, &ChartLayout::default()).unwrap_err();
        assert!(matches!(err, ComputeError::InvalidInput(_)));
        assert!(list.ops().is_empty());
    }

    #[test]
    fn test_equal_timestamps_allowed() {
        let history = vec![
            StressSample::from_score(20.0, at(5, 1)).unwrap(),
            StressSample::from_score(40.0, at(5, 1)).unwrap(),
        ];
        assert!(ensure_time_ordered(&history).is_ok());
    }

    #[test]
    fn test_date_labels_follow_utc_offset() {
        let late = Utc.with_ymd_and_hms(2024, 3, 31, 23, 30, 0).unwrap();
        let history = vec![StressSample::from_score(10.0, late).unwrap()];

        let mut list = DisplayList::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        render_history(&mut list, &history, &ChartLayout::default()).unwrap();
        assert_eq!(texts(&list)[0], "3/31");

        let layout = ChartLayout {
            utc_offset_minutes: 60,
            ..Default::default()
        };
        render_history(&mut list, &history, &layout).unwrap();
        assert_eq!(texts(&list)[0], "4/1");
    }

    #[test]
    fn test_raster_render_is_idempotent() {
        let history = profile_history();
        let layout = ChartLayout::default();

        let mut surface = RasterSurface::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        render_history(&mut surface, &history, &layout).unwrap();
        let first = surface.pixels().to_vec();
        render_history(&mut surface, &history, &layout).unwrap();
        assert!(first == surface.pixels());

        // A fresh surface produces the same pixels
        let mut fresh = RasterSurface::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        render_history(&mut fresh, &history, &layout).unwrap();
        assert!(fresh == surface);
    }

    #[test]
    fn test_raster_redraw_leaves_no_stale_markers() {
        let layout = ChartLayout::default();
        let mut surface = RasterSurface::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        render_history(&mut surface, &profile_history(), &layout).unwrap();
        render_history(&mut surface, &[], &layout).unwrap();

        let mut axes_only = RasterSurface::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        render_history(&mut axes_only, &[], &layout).unwrap();
        assert!(axes_only == surface);
    }

    #[test]
    fn test_raster_marker_colors() {
        let history = profile_history();
        let mut surface = RasterSurface::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        render_history(&mut surface, &history, &ChartLayout::default()).unwrap();
        // Marker centers: (40, 205) low, (300, 95) high
        assert_eq!(surface.color_at(40, 205), Some(StressLevel::Low.color()));
        assert_eq!(surface.color_at(300, 95), Some(StressLevel::High.color()));
        assert_eq!(surface.color_at(590, 10), Some(Rgb::new(255, 255, 255)));
    }

    #[test]
    fn test_font_size_must_fit_surface() {
        let history = profile_history();
        let oversized = ChartLayout::from_json(r#"{"font_size": 1e9}"#).unwrap();
        let degenerate = [0.0, -4.0, f64::NAN].map(|font_size| ChartLayout {
            font_size,
            ..Default::default()
        });
        for layout in std::iter::once(oversized).chain(degenerate) {
            let mut surface = RasterSurface::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
            let err = render_history(&mut surface, &history, &layout).unwrap_err();
            assert!(matches!(err, ComputeError::InvalidInput(_)));
            assert!(surface.pixels().iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_layout_from_partial_json() {
        let layout = ChartLayout::from_json(r##"{"padding": 30, "line_color": "#000000"}"##).unwrap();
        assert_eq!(layout.padding, 30.0);
        assert_eq!(layout.line_color, Rgb::new(0, 0, 0));
        assert_eq!(layout.marker_radius, 6.0);
        assert!(ChartLayout::from_json(r#"{"axis_color": "blue"}"#).is_err());
    }
}
