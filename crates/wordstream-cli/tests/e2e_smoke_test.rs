use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use wordstream_cli::{Args, Command, run};

/// Demo inputs live at the workspace root, not in the crate
fn demos_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .canonicalize()
        .expect("demos directory exists")
}

fn collect_corpus_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .expect("readable demos directory")
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|s| s.to_str()),
                Some("txt" | "csv" | "tsv")
            )
        })
        .collect();

    // Sort for consistent test output
    files.sort();
    files
}

fn args(command: Command, config: Option<&Path>) -> Args {
    Args {
        command,
        config: config.map(|path| path.to_string_lossy().to_string()),
        log_level: "off".to_string(),
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    let text = fs::read_to_string(path).expect("output written");
    serde_json::from_str(&text).expect("output is JSON")
}

#[test]
fn e2e_preprocess_then_layout_demo_corpora() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demos = demos_dir();
    let corpora = collect_corpus_files(&demos);
    let config = demos.join("wordstream.toml");

    assert!(!corpora.is_empty(), "No demo corpora found in demos/");

    for corpus in &corpora {
        let stem = corpus.file_stem().expect("file stem").to_string_lossy();
        let dataset_path = temp_dir.path().join(format!("{stem}.dataset.json"));
        let layout_path = temp_dir.path().join(format!("{stem}.layout.json"));

        run(&args(
            Command::Preprocess {
                input: corpus.to_string_lossy().to_string(),
                output: dataset_path.to_string_lossy().to_string(),
                name: None,
                pretty: true,
            },
            Some(&config),
        ))
        .unwrap_or_else(|err| panic!("preprocess {} failed: {err}", corpus.display()));

        let dataset = read_json(&dataset_path);
        assert_eq!(dataset["metadata"]["dataset_name"], stem.as_ref());
        assert!(!dataset["data"].as_array().expect("periods").is_empty());

        run(&args(
            Command::Layout {
                input: dataset_path.to_string_lossy().to_string(),
                output: layout_path.to_string_lossy().to_string(),
                pretty: false,
            },
            Some(&config),
        ))
        .unwrap_or_else(|err| panic!("layout {} failed: {err}", corpus.display()));

        let layout = read_json(&layout_path);
        assert!(layout["maxFreq"].as_i64().expect("maxFreq") > 0);
        assert!(layout["minSud"].as_f64().expect("minSud") > 0.0);
        assert_eq!(
            layout["boxes"]["layers"].as_array().expect("layers").len(),
            layout["boxes"]["topics"].as_array().expect("topics").len()
        );
    }
}

#[test]
fn e2e_layout_demo_dataset() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("layout.json");

    run(&args(
        Command::Layout {
            input: demos_dir().join("dataset.json").to_string_lossy().to_string(),
            output: output.to_string_lossy().to_string(),
            pretty: true,
        },
        None,
    ))
    .expect("demo dataset lays out");

    let layout = read_json(&output);
    assert_eq!(layout["maxFreq"], 20);
    assert_eq!(layout["boxes"]["topics"], serde_json::json!(["politics", "sports", "science"]));

    let layers = layout["boxes"]["layers"].as_array().expect("layers");
    for layer in layers {
        // Three periods plus the two duplicated end points.
        assert_eq!(layer.as_array().expect("points").len(), 5);
    }

    let election = &layout["boxes"]["data"][0]["words"]["politics"][0];
    assert_eq!(election["text"], "election");
    assert_eq!(election["topic"], "politics");
    assert_eq!(election["timeStep"], 0);
    assert!(election["fontSize"].as_f64().expect("fontSize") > 0.0);
}

#[test]
fn e2e_dataset_name_override() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("named.json");

    run(&args(
        Command::Preprocess {
            input: demos_dir().join("news.txt").to_string_lossy().to_string(),
            output: output.to_string_lossy().to_string(),
            name: Some("pandemic news".to_string()),
            pretty: false,
        },
        None,
    ))
    .expect("demo corpus preprocesses");

    assert_eq!(read_json(&output)["metadata"]["dataset_name"], "pandemic news");
}

#[test]
fn e2e_invalid_corpus_reports_every_record() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("broken.csv");
    fs::write(
        &input,
        "date,text,sentiment\n2020-01-01,\"unterminated\n",
    )
    .expect("write corpus");
    let second = temp_dir.path().join("short.csv");
    fs::write(&second, "date,text\n2020\n2021\n").expect("write corpus");

    let err = run(&args(
        Command::Preprocess {
            input: input.to_string_lossy().to_string(),
            output: temp_dir.path().join("out.json").to_string_lossy().to_string(),
            name: None,
            pretty: false,
        },
        None,
    ))
    .expect_err("unterminated quote");
    assert_eq!(wordstream_cli::error_adapter::reports(&err).len(), 1);

    let err = run(&args(
        Command::Preprocess {
            input: second.to_string_lossy().to_string(),
            output: temp_dir.path().join("out.json").to_string_lossy().to_string(),
            name: None,
            pretty: false,
        },
        None,
    ))
    .expect_err("rows without text");
    assert_eq!(wordstream_cli::error_adapter::reports(&err).len(), 2);
    assert!(!temp_dir.path().join("out.json").exists());
}

#[test]
fn e2e_missing_input_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let result = run(&args(
        Command::Layout {
            input: temp_dir.path().join("absent.json").to_string_lossy().to_string(),
            output: temp_dir.path().join("out.json").to_string_lossy().to_string(),
            pretty: false,
        },
        None,
    ));

    assert!(result.is_err());
}
