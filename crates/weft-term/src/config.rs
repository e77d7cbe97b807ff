// SPDX-License-Identifier: MIT
//
// Tunables for the mouse parser and the diff renderer.
//
// Both configs are plain `Copy` values with working defaults. Validation
// happens at construction, so a config that exists is a config that works.

use std::time::Duration;

use thiserror::Error;

/// Rejected configuration values.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// The double-click threshold was negative, NaN or too large to
    /// represent as a duration.
    #[error("invalid double-click threshold: {0} seconds")]
    InvalidThreshold(f64),
}

// ─── ParserConfig ────────────────────────────────────────────────────────────

/// Gesture-synthesis tunables for [`MouseEventParser`](crate::mouse::MouseEventParser).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Longest gap between two clicks that still counts as a double-click.
    /// The boundary itself counts.
    pub double_click_threshold: Duration,
    /// How far, in cells along each axis, a release may land from its press
    /// (or a click from the previous click) and still pair up.
    pub double_click_distance: u16,
}

impl ParserConfig {
    pub const DEFAULT_THRESHOLD: Duration = Duration::from_millis(500);
    pub const DEFAULT_DISTANCE: u16 = 2;

    /// Set the double-click threshold from fractional seconds.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidThreshold`] for negative, NaN or infinite
    /// values.
    pub fn with_threshold_secs(self, secs: f64) -> Result<Self, ConfigError> {
        let threshold =
            Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidThreshold(secs))?;
        Ok(self.with_threshold(threshold))
    }

    #[must_use]
    pub const fn with_threshold(self, threshold: Duration) -> Self {
        Self {
            double_click_threshold: threshold,
            ..self
        }
    }

    #[must_use]
    pub const fn with_distance(self, distance: u16) -> Self {
        Self {
            double_click_distance: distance,
            ..self
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            double_click_threshold: Self::DEFAULT_THRESHOLD,
            double_click_distance: Self::DEFAULT_DISTANCE,
        }
    }
}

// ─── RenderConfig ────────────────────────────────────────────────────────────

/// Output options for [`DiffRenderer`](crate::diff::DiffRenderer).
///
/// Both options only decorate frames that already produce output. An
/// unchanged frame stays empty regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Wrap each frame in DEC 2026 synchronized-output markers.
    pub synchronized_output: bool,
    /// End each frame with SGR 0 so the last run's style does not leak into
    /// whatever the terminal prints next.
    pub reset_after_frame: bool,
}

impl RenderConfig {
    #[must_use]
    pub const fn with_synchronized_output(self, on: bool) -> Self {
        Self {
            synchronized_output: on,
            ..self
        }
    }

    #[must_use]
    pub const fn with_reset_after_frame(self, on: bool) -> Self {
        Self {
            reset_after_frame: on,
            ..self
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            synchronized_output: false,
            reset_after_frame: true,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
