//! Stress Lens - On-device stress assessment scoring and history charting
//!
//! Stress Lens turns questionnaire answers into a stress score and level,
//! selects advice for the level, analyzes the trend of a stress history, and
//! renders that history as a time-series chart.
//!
//! ## Modules
//!
//! - **Scoring**: questionnaire → score/level (`classifier`), level → advice (`recommendations`)
//! - **History**: trend and summary over dated samples (`trend`), stateful sessions (`session`),
//!   generated demo histories (`history`)
//! - **Chart**: history → drawn chart on a display list, raster, or SVG surface (`chart`)
//!
//! Thresholds and colors for every component come from the table in [`levels`].

pub mod chart;
pub mod classifier;
pub mod error;
pub mod history;
pub mod indicator;
pub mod levels;
pub mod questionnaire;
pub mod recommendations;
pub mod session;
pub mod trend;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use chart::{render_history, ChartLayout, ChartView, DisplayList, RasterSurface, Surface, SvgSurface};
pub use classifier::{classify, classify_answers};
pub use error::ComputeError;
pub use history::generate_history;
pub use recommendations::recommendations_for;
pub use session::{assess, AssessmentSession};
pub use trend::{analyze_trend, summarize};
pub use types::{
    AssessmentOutcome, HistorySummary, QuestionnaireResponse, ScoreResult, StressLevel,
    StressSample, Trend, TrendDirection,
};

/// Library version embedded in CLI and FFI output
pub const LENS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for CLI and FFI output
pub const PRODUCER_NAME: &str = "stress-lens";
