//! Text footprint measurement for word placement.
//!
//! The packer only needs an approximate bounding box per word, so measurement
//! is a replaceable strategy behind the [`TextMeasure`] trait.
//!
//! # Overview
//!
//! - [`TextMeasure`] - Trait returning the footprint of a single-line word
//! - [`GlyphEstimate`] - Deterministic estimate from glyph count and font size
//! - [`FontMeasure`] - Shaped measurement using real font metrics via cosmic-text
//!
//! # Quick Start
//!
//! ```
//! # use wordstream_core::text::{GlyphEstimate, TextMeasure};
//! let measure = GlyphEstimate::default();
//! let size = measure.measure("stream", 20.0);
//! assert!(size.width() > 0.0);
//! assert!(size.height() > 0.0);
//! ```

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::{info, warn};

use crate::geometry::Size;

/// Default average glyph width as a fraction of the font size.
pub const DEFAULT_GLYPH_WIDTH: f32 = 0.6;

/// Default line height as a fraction of the font size.
pub const DEFAULT_LINE_HEIGHT: f32 = 1.15;

/// Measures the rendered footprint of a single line of text.
///
/// Implementations must be deterministic: the same text and font size always
/// yield the same size, otherwise layouts are not reproducible.
pub trait TextMeasure: fmt::Debug + Send + Sync {
    /// Returns the width and height of `text` rendered at `font_size` pixels.
    fn measure(&self, text: &str, font_size: f32) -> Size;
}

/// Estimates a footprint as `glyph_width * chars * font_size` wide and
/// `line_height * font_size` tall.
///
/// # Examples
///
/// ```
/// # use wordstream_core::text::{GlyphEstimate, TextMeasure};
/// let measure = GlyphEstimate::new(0.5, 1.0);
/// let size = measure.measure("word", 10.0);
/// assert_eq!(size.width(), 20.0);
/// assert_eq!(size.height(), 10.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphEstimate {
    glyph_width: f32,
    line_height: f32,
}

impl GlyphEstimate {
    /// Creates an estimate with explicit glyph width and line height factors.
    ///
    /// # Arguments
    ///
    /// * `glyph_width` - Average glyph advance as a fraction of the font size.
    /// * `line_height` - Line box height as a fraction of the font size.
    pub fn new(glyph_width: f32, line_height: f32) -> Self {
        Self {
            glyph_width,
            line_height,
        }
    }

    pub fn glyph_width(&self) -> f32 {
        self.glyph_width
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }
}

impl Default for GlyphEstimate {
    fn default() -> Self {
        Self::new(DEFAULT_GLYPH_WIDTH, DEFAULT_LINE_HEIGHT)
    }
}

impl TextMeasure for GlyphEstimate {
    fn measure(&self, text: &str, font_size: f32) -> Size {
        if text.is_empty() {
            return Size::default();
        }
        let glyphs = text.chars().count() as f32;
        Size::new(
            glyphs * self.glyph_width * font_size,
            self.line_height * font_size,
        )
    }
}

/// Measures text by shaping it with a real font through cosmic-text.
///
/// All instances share one lazily created [`FontSystem`]; loading system
/// fonts is expensive and only happens on first use.
#[derive(Debug, Clone)]
pub struct FontMeasure {
    family: String,
    line_height: f32,
}

impl FontMeasure {
    /// Creates a measure for the given font family.
    ///
    /// # Arguments
    ///
    /// * `family` - The font family name (e.g., "Arial", "sans-serif")
    /// * `line_height` - Line box height as a fraction of the font size.
    pub fn new(family: &str, line_height: f32) -> Self {
        Self {
            family: family.to_string(),
            line_height,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }
}

impl TextMeasure for FontMeasure {
    fn measure(&self, text: &str, font_size: f32) -> Size {
        FONT_MANAGER
            .get_or_init(FontManager::new)
            .calculate_text_size(text, font_size, &self.family, self.line_height)
    }
}

/// Maps CSS generic family names to their cosmic-text counterparts.
fn font_family(family: &str) -> Family<'_> {
    match family {
        "serif" => Family::Serif,
        "sans-serif" => Family::SansSerif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        name => Family::Name(name),
    }
}

/// Owns the shared FontSystem used for shaping.
struct FontManager {
    font_system: Mutex<FontSystem>,
}

impl FontManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    /// Shape `text` and return the extent of its layout runs.
    ///
    /// Falls back to [`GlyphEstimate`] when shaping produces no runs (no
    /// matching font installed) or the font system lock is poisoned.
    fn calculate_text_size(
        &self,
        text: &str,
        font_size: f32,
        family: &str,
        line_height: f32,
    ) -> Size {
        if text.is_empty() {
            return Size::default();
        }
        let fallback = GlyphEstimate::new(DEFAULT_GLYPH_WIDTH, line_height);

        let Ok(mut font_system) = self.font_system.lock() else {
            warn!("FontSystem lock poisoned, estimating text size");
            return fallback.measure(text, font_size);
        };

        let metrics = Metrics::new(font_size, font_size * line_height);
        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(font_family(family));
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;
        for run in buffer.layout_runs() {
            if let Some(last) = run.glyphs.last() {
                max_width = max_width.max(last.x + last.w);
            }
            total_height += metrics.line_height;
        }

        if max_width <= 0.0 || total_height <= 0.0 {
            return fallback.measure(text, font_size);
        }
        Size::new(max_width, total_height)
    }
}

static FONT_MANAGER: OnceLock<FontManager> = OnceLock::new();

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_glyph_estimate_default_factors() {
        let measure = GlyphEstimate::default();
        assert_approx_eq!(f32, measure.glyph_width(), DEFAULT_GLYPH_WIDTH);
        assert_approx_eq!(f32, measure.line_height(), DEFAULT_LINE_HEIGHT);
    }

    #[test]
    fn test_glyph_estimate_empty_text() {
        let size = GlyphEstimate::default().measure("", 24.0);
        assert!(size.is_zero());
    }

    #[test]
    fn test_glyph_estimate_counts_chars_not_bytes() {
        let measure = GlyphEstimate::new(1.0, 1.0);
        let ascii = measure.measure("cafe", 10.0);
        let accented = measure.measure("café", 10.0);
        assert_approx_eq!(f32, ascii.width(), accented.width());
        assert_approx_eq!(f32, accented.width(), 40.0);
    }

    #[test]
    fn test_glyph_estimate_scales_with_font_size() {
        let measure = GlyphEstimate::default();
        let small = measure.measure("stream", 10.0);
        let large = measure.measure("stream", 20.0);
        assert_approx_eq!(f32, large.width(), small.width() * 2.0);
        assert_approx_eq!(f32, large.height(), small.height() * 2.0);
    }

    #[test]
    fn test_font_measure_is_positive_and_deterministic() {
        let measure = FontMeasure::new("sans-serif", DEFAULT_LINE_HEIGHT);
        let first = measure.measure("Hello", 16.0);
        let second = measure.measure("Hello", 16.0);

        assert!(first.width() > 0.0, "Width should be positive");
        assert!(first.height() > 0.0, "Height should be positive");
        assert_eq!(first, second);
        assert!(measure.measure("", 16.0).is_zero());
    }
}
