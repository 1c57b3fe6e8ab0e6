//! Streamgraph layout engine.
//!
//! The engine turns a sequence of [`Period`](crate::model::Period)s into
//! stacked topic bands and packed word positions. It runs in four stages:
//!
//! 1. `normalize` repairs invalid word values and derives the scale domains.
//! 2. `stack` sums topic weights per period and stacks them into bands.
//! 3. [`pack`] places each cell's words inside its band, most frequent first.
//! 4. [`WordStream`] configures and orchestrates the stages and memoizes the
//!    result.

mod engine;
mod normalize;
mod pack;
mod scale;
mod stack;

pub use engine::WordStream;
pub use normalize::{Domains, SUDDEN_EPSILON, clamped_frequency, clamped_sudden};
pub use pack::{PackItem, Packing, pack};
pub use scale::FontScale;
pub use stack::{StackOffset, WeightMetric};
