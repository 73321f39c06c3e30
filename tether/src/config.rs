use crate::geometry::limits;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Distance a control point must sit from the chord midpoint before the
/// connector is drawn curved.
pub const DEFAULT_CURVE_TOLERANCE: f32 = 1.0;
pub const DEFAULT_STROKE_WIDTH: f32 = 4.0;
pub const DEFAULT_HANDLE_SIZE: f32 = 8.0;
pub const DEFAULT_MIN_PADDING: f32 = 50.0;
pub const DEFAULT_SELECTION_COLOR: &str = "#2f80ed";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub stroke_width: f32,
    pub handle_size: f32,
    pub min_padding: f32,
    pub selection_color: String,
    pub curve_tolerance: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stroke_width: DEFAULT_STROKE_WIDTH,
            handle_size: DEFAULT_HANDLE_SIZE,
            min_padding: DEFAULT_MIN_PADDING,
            selection_color: DEFAULT_SELECTION_COLOR.to_string(),
            curve_tolerance: DEFAULT_CURVE_TOLERANCE,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    StrokeWidth(f32),
    HandleSize(f32),
    MinPadding(f32),
    CurveTolerance(f32),
    EmptySelectionColor,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::StrokeWidth(v) => write!(f, "strokeWidth must be in (0, {}], got {v}", limits::STROKE_WIDTH_MAX),
            ConfigError::HandleSize(v) => write!(f, "handleSize must be finite and positive, got {v}"),
            ConfigError::MinPadding(v) => write!(f, "minPadding must be finite and non-negative, got {v}"),
            ConfigError::CurveTolerance(v) => write!(f, "curveTolerance must be finite and non-negative, got {v}"),
            ConfigError::EmptySelectionColor => write!(f, "selectionColor must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !limits::in_stroke_bounds(self.stroke_width) {
            return Err(ConfigError::StrokeWidth(self.stroke_width));
        }
        if !(self.handle_size.is_finite() && self.handle_size > 0.0) {
            return Err(ConfigError::HandleSize(self.handle_size));
        }
        if !(self.min_padding.is_finite() && self.min_padding >= 0.0) {
            return Err(ConfigError::MinPadding(self.min_padding));
        }
        if !(self.curve_tolerance.is_finite() && self.curve_tolerance >= 0.0) {
            return Err(ConfigError::CurveTolerance(self.curve_tolerance));
        }
        if self.selection_color.trim().is_empty() {
            return Err(ConfigError::EmptySelectionColor);
        }
        Ok(())
    }

    /// Arrowhead overshoot past the path end (six stroke widths).
    #[inline]
    pub fn marker_extension(&self) -> f32 {
        crate::marker::MARKER_SIZE * self.stroke_width
    }
}
