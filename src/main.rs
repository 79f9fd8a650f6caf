use std::{fs, path::PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_json::json;

use kzg_bench_report::{artifacts, names::NameTable, results, sheets};

#[derive(Parser, Serialize, Deserialize)]
#[command(author, version, about)]
struct Args {
    /// Path to the benchmark log file to parse
    input: PathBuf,

    /// Path to a directory containing artifact metadata files
    #[arg(short, long, default_value = "artifacts")]
    artifacts: PathBuf,

    #[arg(short, long, default_value = "output")]
    /// Path to a directory to dump outputs in
    output: PathBuf,

    /// Path to a JSON file with additional raw-to-canonical name mappings
    #[arg(long)]
    name_table: Option<PathBuf>,

    /// If true, invokes each artifact's configured external renderer
    #[arg(long)]
    render: bool,
}

fn main() -> anyhow::Result<()> {
    human_panic::setup_panic!();
    env_logger::init();

    let args = Args::parse();

    let start_time = Utc::now();

    let mut names = NameTable::builtin();
    if let Some(path) = &args.name_table {
        names
            .extend_from_file(path)
            .context("could not load name table extension")?;
    }

    log::info!("parsing benchmark log {}...", args.input.display());
    let log_text = fs::read_to_string(&args.input).context(format!(
        "could not read benchmark log {}",
        args.input.display()
    ))?;
    let parsed = results::parse(&log_text, &names);
    log::info!(
        "parsed {} groups with {} sections in total",
        parsed.groups.len(),
        parsed
            .groups
            .values()
            .map(|group| group.sections.len())
            .sum::<usize>(),
    );

    fs::create_dir_all(&args.output).context("could not create output directory structure")?;

    let output = serde_json::to_string_pretty(&json!({
        "results": parsed,
    }))?;
    let output_file_path = args.output.join(format!(
        "results.{}.json",
        start_time.format("%Y-%m-%dT%H-%M-%S%z")
    ));
    log::info!(
        "writing parsed results to {}...",
        output_file_path.to_string_lossy()
    );
    fs::write(&output_file_path, output).context(format!(
        "could not write to output file {}",
        output_file_path.to_string_lossy()
    ))?;

    let metadatas = artifacts::find_all_metadata(&args.artifacts).map_err(|err| {
        log::error!("{err}");
        err
    })?;
    let metrics: Vec<Vec<String>> = metadatas
        .iter()
        .map(|(metadata, _)| metadata.metric.clone())
        .collect();

    sheets::write_all(&parsed, &metrics, &args.output)?;
    artifacts::generate(&parsed, &metadatas, &args.output, args.render)?;

    results::print_summary(&parsed);

    Ok(())
}
