//! Frequency to font size mapping.

use serde::Deserialize;

/// Interpolation from the frequency domain `[0, max_freq]` to the font range
/// `[min_font_size, max_font_size]`.
///
/// Every variant is monotone non-decreasing and maps a frequency of zero (or
/// an empty dataset) to the minimum font size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontScale {
    #[default]
    Linear,
    Sqrt,
    Log,
}

impl FontScale {
    /// Maps `frequency` to a font size.
    ///
    /// # Examples
    ///
    /// ```
    /// # use wordstream::layout::FontScale;
    /// let scale = FontScale::Linear;
    /// assert_eq!(scale.font_size(0, 10, 10.0, 30.0), 10.0);
    /// assert_eq!(scale.font_size(5, 10, 10.0, 30.0), 20.0);
    /// assert_eq!(scale.font_size(10, 10, 10.0, 30.0), 30.0);
    /// ```
    pub fn font_size(self, frequency: i64, max_frequency: i64, min_size: f32, max_size: f32) -> f32 {
        if max_frequency <= 0 {
            return min_size;
        }
        let frequency = frequency.clamp(0, max_frequency) as f64;
        let max_frequency = max_frequency as f64;

        let t = match self {
            FontScale::Linear => frequency / max_frequency,
            FontScale::Sqrt => (frequency / max_frequency).sqrt(),
            FontScale::Log => frequency.ln_1p() / max_frequency.ln_1p(),
        };
        min_size + (max_size - min_size) * t as f32
    }
}
