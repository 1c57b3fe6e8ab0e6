//! CLI logic for the WordStream layout tool.
//!
//! Two commands share one configuration file: `preprocess` turns a raw
//! corpus into a dataset, and `layout` lays a dataset out for rendering.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::fs;

use log::info;
use serde::Serialize;

use wordstream::{
    WordStreamError,
    config::AppConfig,
    corpus,
    dataset::Dataset,
    layout::WordStream,
    model::{Boxes, Period},
};

/// The JSON document written by the `layout` command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutDocument<'a> {
    boxes: &'a Boxes,
    min_sud: f64,
    max_sud: f64,
    max_freq: i64,
}

/// Run the WordStream CLI application
///
/// # Errors
///
/// Returns `WordStreamError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Corpus or dataset parsing errors
/// - Layout errors
pub fn run(args: &Args) -> Result<(), WordStreamError> {
    let app_config = config::load_config(args.config.as_ref())?;

    match &args.command {
        Command::Layout {
            input,
            output,
            pretty,
        } => layout(&app_config, input, output, *pretty),
        Command::Preprocess {
            input,
            output,
            name,
            pretty,
        } => preprocess(&app_config, input, output, name.as_deref(), *pretty),
    }
}

fn layout(
    app_config: &AppConfig,
    input: &str,
    output: &str,
    pretty: bool,
) -> Result<(), WordStreamError> {
    info!(input_path = input, output_path = output; "Laying out dataset");

    let dataset = Dataset::from_path(input)?;
    let engine =
        WordStream::from_config(app_config.layout(), app_config.text()).with_data(dataset.data);

    let boxes = engine.boxes()?;
    let document = LayoutDocument {
        boxes,
        min_sud: engine.min_sud()?,
        max_sud: engine.max_sud()?,
        max_freq: engine.max_freq()?,
    };
    let json = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    fs::write(output, json)?;

    let placed = boxes
        .data
        .iter()
        .flat_map(Period::all_words)
        .filter(|word| word.is_placed())
        .count();
    info!(output_file = output, placed_words = placed; "Layout exported successfully");

    Ok(())
}

fn preprocess(
    app_config: &AppConfig,
    input: &str,
    output: &str,
    name: Option<&str>,
    pretty: bool,
) -> Result<(), WordStreamError> {
    info!(input_path = input, output_path = output; "Preprocessing corpus");

    let mut dataset = corpus::preprocess_file(input, app_config.corpus())?;
    if let Some(name) = name {
        dataset.metadata.dataset_name = Some(name.to_string());
    }
    fs::write(output, dataset.to_json(pretty)?)?;

    info!(output_file = output, periods = dataset.data.len(); "Dataset exported successfully");

    Ok(())
}
