//! # WordStream
//!
//! A layout engine for word streams: streamgraphs whose bands are filled
//! with the words that made each topic's volume at each point in time.
//!
//! ## Pipeline
//!
//! 1. [`corpus`] turns dated raw documents into a [`dataset::Dataset`] of
//!    per-period, per-topic word frequencies.
//! 2. [`layout::WordStream`] stacks the topics into bands and packs the
//!    words of every period into its slice of each band.
//! 3. The resulting [`model::Boxes`] serializes to JSON for rendering.
//!
//! ## Example
//!
//! ```
//! use wordstream::{layout::WordStream, model::{Period, Word}};
//!
//! let mut january = Period::new("2024-01");
//! january.push_word("politics", Word::new("election", 12, 2.5));
//! january.push_word("sports", Word::new("final", 4, 1.0));
//!
//! let layout = WordStream::new().with_size(400.0, 200.0).with_data(vec![january]);
//! let boxes = layout.boxes().expect("configured");
//!
//! assert_eq!(boxes.topics, vec!["politics", "sports"]);
//! assert_eq!(layout.max_freq().expect("configured"), 12);
//! ```

pub use wordstream_core::{geometry, model, text};

pub mod config;
pub mod corpus;
pub mod dataset;
pub mod layout;

mod error;

pub use error::{InvalidWord, LayoutError, WordIssue, WordStreamError};
