//! Band stacking.
//!
//! Topic totals are stacked per period in a fixed topic order, offset by a
//! streamgraph baseline and scaled so the whole stack spans the configured
//! height.

use log::debug;
use serde::Deserialize;

use wordstream_core::{
    geometry::Size,
    model::{Layer, LayerPoint, Period, Word},
};

use super::normalize::{clamped_frequency, clamped_sudden};

/// Selects the numeric contribution of a word to its band thickness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightMetric {
    /// Sum of word frequencies.
    #[default]
    Frequency,
    /// Number of words in the cell.
    WordCount,
    /// Sum of word suddenness.
    Sudden,
}

impl WeightMetric {
    /// Returns the weight `word` contributes under this metric.
    pub fn weight(self, word: &Word) -> f64 {
        match self {
            WeightMetric::Frequency => clamped_frequency(word) as f64,
            WeightMetric::WordCount => 1.0,
            WeightMetric::Sudden => clamped_sudden(word),
        }
    }
}

/// Baseline of the stack at each period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackOffset {
    /// Centers every period's stack around the same midline.
    #[default]
    Silhouette,
    /// Minimizes the weighted change in slope between neighbouring periods.
    Wiggle,
    /// Every stack starts at the top edge.
    Zero,
}

impl StackOffset {
    /// Returns the unscaled baseline per period for the given period sums.
    ///
    /// `totals` is indexed `[topic][period]`. The smallest returned baseline
    /// is always zero.
    fn baselines(self, totals: &[Vec<f64>], sums: &[f64]) -> Vec<f64> {
        match self {
            StackOffset::Zero => vec![0.0; sums.len()],
            StackOffset::Silhouette => {
                let max = sums.iter().copied().fold(0.0, f64::max);
                sums.iter().map(|sum| (max - sum) / 2.0).collect()
            }
            StackOffset::Wiggle => wiggle(totals, sums),
        }
    }
}

/// Weighted wiggle baseline with unit spacing between periods.
fn wiggle(totals: &[Vec<f64>], sums: &[f64]) -> Vec<f64> {
    let mut baselines = vec![0.0; sums.len()];
    let mut offset = 0.0;
    let mut lowest: f64 = 0.0;

    for t in 1..sums.len() {
        if sums[t] > 0.0 {
            let mut weighted = 0.0;
            let mut below = 0.0;
            for layer in totals {
                let change = layer[t] - layer[t - 1];
                weighted += (below + change / 2.0) * layer[t];
                below += change;
            }
            offset -= weighted / sums[t];
        }
        baselines[t] = offset;
        lowest = lowest.min(offset);
    }

    for baseline in &mut baselines {
        *baseline -= lowest;
    }
    baselines
}

/// Sums each topic's weight per period, indexed `[topic][period]`.
///
/// A topic missing from a period contributes zero.
pub(crate) fn topic_totals(
    periods: &[Period],
    topics: &[String],
    metric: WeightMetric,
) -> Vec<Vec<f64>> {
    topics
        .iter()
        .map(|topic| {
            periods
                .iter()
                .map(|period| {
                    period
                        .words_in(topic)
                        .iter()
                        .map(|word| metric.weight(word))
                        .sum()
                })
                .collect()
        })
        .collect()
}

/// Rescales `totals` so the largest entry is 1.
///
/// Totals that overflowed to infinity are first clamped to `f64::MAX`, so
/// period sums and offsets stay finite for any weights.
fn relative_totals(totals: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let peak = totals
        .iter()
        .flatten()
        .map(|total| total.min(f64::MAX))
        .fold(0.0, f64::max);
    totals
        .iter()
        .map(|layer| {
            layer
                .iter()
                .map(|total| {
                    if peak > 0.0 {
                        total.min(f64::MAX) / peak
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect()
}

/// Stacks `totals` into one [`Layer`] per topic.
///
/// Each layer has `period_count + 2` points: the period points at evenly
/// spaced slot centers, framed by copies of the first and last period at
/// `x = 0` and `x = size.width()`. Within a period, topic `i + 1` starts
/// exactly where topic `i` ends.
pub(crate) fn stack(
    totals: &[Vec<f64>],
    period_count: usize,
    offset: StackOffset,
    size: Size,
) -> Vec<Layer> {
    if period_count == 0 {
        return vec![Layer::new(); totals.len()];
    }

    let totals = &relative_totals(totals);
    let sums: Vec<f64> = (0..period_count)
        .map(|t| totals.iter().map(|layer| layer[t]).sum())
        .collect();
    let baselines = offset.baselines(totals, &sums);

    let extent = baselines
        .iter()
        .zip(&sums)
        .map(|(baseline, sum)| baseline + sum)
        .fold(0.0, f64::max);
    let scale = if extent > 0.0 {
        size.height() as f64 / extent
    } else {
        0.0
    };
    debug!(periods = period_count, topics = totals.len(), scale = scale; "Stacking bands");

    let slot = size.width() / period_count as f32;
    let mut layers: Vec<Layer> = totals
        .iter()
        .map(|_| Vec::with_capacity(period_count + 2))
        .collect();

    for t in 0..period_count {
        let x = (t as f32 + 0.5) * slot;
        let mut cursor = (baselines[t] * scale) as f32;
        for (layer, totals) in layers.iter_mut().zip(totals) {
            let thickness = (totals[t] * scale) as f32;
            layer.push(LayerPoint::new(x, cursor, thickness));
            cursor += thickness;
        }
    }

    for layer in &mut layers {
        if let (Some(&first), Some(&last)) = (layer.first(), layer.last()) {
            layer.insert(0, LayerPoint::new(0.0, first.y0, first.y));
            layer.push(LayerPoint::new(size.width(), last.y0, last.y));
        }
    }

    layers
}
