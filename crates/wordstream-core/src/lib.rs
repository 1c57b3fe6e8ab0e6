//! WordStream Core Types and Definitions
//!
//! This crate provides the foundational types shared by the WordStream layout
//! engine and its consumers. It includes:
//!
//! - **Model**: The dataset and layout output types ([`model`] module)
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Text**: Text footprint measurement ([`text`] module)

pub mod geometry;
pub mod model;
pub mod text;
