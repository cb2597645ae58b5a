//! Chart view bound to a surface
//!
//! Redraws only when it is handed a different history allocation than the one
//! it last drew, mirroring a UI that re-renders when its data reference changes.

use super::{render_history, ChartLayout, Surface};
use crate::error::ComputeError;
use crate::types::StressSample;
use std::sync::Arc;
use tracing::debug;

/// A surface plus the history last drawn on it
pub struct ChartView<S: Surface> {
    surface: S,
    layout: ChartLayout,
    current: Option<Arc<[StressSample]>>,
    renders: u64,
}

impl<S: Surface> ChartView<S> {
    pub fn new(surface: S) -> Self {
        Self::with_layout(surface, ChartLayout::default())
    }

    pub fn with_layout(surface: S, layout: ChartLayout) -> Self {
        Self {
            surface,
            layout,
            current: None,
            renders: 0,
        }
    }

    /// Show a history, redrawing only if it is not the allocation already shown.
    ///
    /// Returns whether a redraw happened. On error the previous frame and
    /// history are kept.
    pub fn show(&mut self, history: Arc<[StressSample]>) -> Result<bool, ComputeError> {
        if let Some(current) = &self.current {
            if Arc::ptr_eq(current, &history) {
                debug!(samples = history.len(), "chart data unchanged, skipping redraw");
                return Ok(false);
            }
        }

        render_history(&mut self.surface, &history, &self.layout)?;
        self.renders += 1;
        debug!(samples = history.len(), renders = self.renders, "chart redrawn");
        self.current = Some(history);
        Ok(true)
    }

    /// Redraw the current history unconditionally (an empty chart if none was shown)
    pub fn refresh(&mut self) -> Result<(), ComputeError> {
        let history = self.current.clone().unwrap_or_else(|| Arc::from(Vec::new()));
        render_history(&mut self.surface, &history, &self.layout)?;
        self.renders += 1;
        Ok(())
    }

    /// Replace the layout and redraw
    pub fn set_layout(&mut self, layout: ChartLayout) -> Result<(), ComputeError> {
        self.layout = layout;
        self.refresh()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Number of completed redraws
    pub fn renders(&self) -> u64 {
        self.renders
    }
}
