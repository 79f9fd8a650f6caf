//! Generation of templated report artifacts (graphs, tables).
//!
//! An *artifact* is one rendered document: a text template (typically a
//! LaTeX picture or table) whose `${...}` placeholders are filled in from
//! the aggregated benchmark data, plus a small metadata file describing the
//! metric alias lists, display unit, and optional axis overrides. Metadata
//! files are discovered by globbing for [`FILE_PATTERN`] under the artifact
//! directory.
//!
//! An unresolvable template path stops generation of that one artifact with
//! a path-identifying error; a failing external renderer likewise only
//! skips that artifact. Neither aborts the run.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use kzg_bench_report::{artifacts, names::NameTable, results};
//!
//! # fn main() -> anyhow::Result<()> {
//! let log = std::fs::read_to_string("linode_benchmarks.txt")?;
//! let parsed = results::parse(&log, &NameTable::builtin());
//!
//! let metadatas = artifacts::find_all_metadata(&PathBuf::from("artifacts"))?;
//! artifacts::generate(&parsed, &metadatas, &PathBuf::from("output"), false)?;
//! #     Ok(())
//! # }
//! ```

use std::{
    collections::HashMap,
    ffi::OsStr,
    fs,
    fs::File,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::Context;

mod metadata;

pub use metadata::ArtifactMetadata;

use crate::{
    aggregate::{aggregate, resolve_first_present, AggregatedMetric},
    results::ResultSet,
    template::{self, ResolveError},
    units,
};

/// Glob pattern for artifact metadata files.
pub const FILE_PATTERN: &str = "**/*.artifact.json";

/// Finds all artifact metadata files under the given path.
///
/// Searches for all files matching the [`FILE_PATTERN`] pattern under the
/// given path and attempts to deserialize them into [`ArtifactMetadata`]
/// structs. Returns the metadata paired with the resolved path of the
/// template it references.
///
/// # Errors
///
/// If the glob pattern cannot be constructed or the glob search fails, then
/// the error is returned.
///
/// If any of the files matching the pattern cannot be opened, deserialized,
/// or canonicalized, then the error is logged and the file is skipped.
pub fn find_all_metadata(path: &Path) -> anyhow::Result<Vec<(ArtifactMetadata, PathBuf)>> {
    log::info!(
        "finding all artifact metadata files under {}...",
        path.display()
    );
    let metadatas: Vec<(ArtifactMetadata, PathBuf)> = glob::glob(
        path.join(FILE_PATTERN)
            .to_str()
            .context("could not convert artifact metadata pattern to string")?,
    )
    .context("searching for all artifact metadata files")?
    .filter_map(|r| {
        let path = r
            .map_err(|err| {
                log::warn!("could not get globbed path: {err}, skipping...");
            })
            .ok()?;

        log::debug!("processing artifact metadata file ({})...", path.display());

        let metadata: ArtifactMetadata = serde_json::from_reader(
            File::open(&path)
                .map_err(|err| {
                    log::warn!("could not open artifact metadata file: {err}, skipping...");
                })
                .ok()?,
        )
        .map_err(|err| {
            log::warn!("could not deserialize artifact metadata: {err}, skipping...");
        })
        .ok()?;

        let template_path = path
            .parent()
            .or_else(|| {
                log::warn!("could not get parent of artifact metadata file, skipping...");
                None
            })?
            .join(&metadata.template)
            .canonicalize()
            .map_err(|err| {
                log::warn!("could not canonicalize template path: {err}, skipping...");
            })
            .ok()?;

        log::debug!("processed artifact metadata file");
        Some((metadata, template_path))
    })
    .collect();
    log::info!("found {} artifact metadata files", metadatas.len());
    log::trace!("artifact metadatas: {metadatas:#?}");

    Ok(metadatas)
}

/// Makes an artifact or sheet name safe to use as a file name.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    name.replace(['(', ')', '=', '/', ' '], "_")
}

fn axis_max(override_value: Option<f64>, metric: &AggregatedMetric, unit: &str) -> Option<String> {
    if let Some(value) = override_value {
        return Some(value.to_string());
    }
    metric.max_nanos().map(|nanos| {
        // 10% headroom above the slowest reading.
        let headroom = units::from_nanos(nanos, unit) * 1.1;
        (((headroom * 1000.0).round()) / 1000.0).to_string()
    })
}

/// Expands one artifact's template against the result set.
///
/// Single-segment paths are checked against the named scalar overrides
/// (`title`, `time_unit`, `max_time`, `max_time_2`) first; everything else
/// is a `config>backend>metric` walk through the result set, with the
/// artifact's alias lists applied to the metric segment.
///
/// # Errors
///
/// Returns [`ResolveError`] for any path that does not resolve; the caller
/// must skip the artifact.
pub fn render_template(
    results: &ResultSet,
    metadata: &ArtifactMetadata,
    template: &str,
) -> Result<String, ResolveError> {
    let metric = aggregate(results, &metadata.metric);
    let extra_metric = metadata
        .extra_metric
        .as_ref()
        .map(|aliases| aggregate(results, aliases));

    let mut scalars: HashMap<&str, String> = HashMap::new();
    scalars.insert("title", metadata.name.replace('_', " "));
    scalars.insert("time_unit", metadata.time_unit.clone());
    if let Some(value) = axis_max(metadata.max_time, &metric, &metadata.time_unit) {
        scalars.insert("max_time", value);
    }
    if let Some(extra) = &extra_metric {
        if let Some(value) = axis_max(metadata.max_time_2, extra, &metadata.time_unit) {
            scalars.insert("max_time_2", value);
        }
    } else if let Some(value) = metadata.max_time_2 {
        scalars.insert("max_time_2", value.to_string());
    }

    let mut alias_lists: HashMap<&str, &[String]> = HashMap::new();
    if let Some(first) = metadata.metric.first() {
        alias_lists.insert(first.as_str(), &metadata.metric);
    }
    if let Some(aliases) = &metadata.extra_metric {
        if let Some(first) = aliases.first() {
            alias_lists.insert(first.as_str(), aliases);
        }
    }

    template::resolve(template, &mut |segments| {
        if segments.len() == 1 {
            if let Some(value) = scalars.get(segments[0]) {
                return Ok(value.clone());
            }
        }
        let [config, backend, metric_name] = segments else {
            return Err(ResolveError::UnresolvedPath(segments.join(">")));
        };

        let fallback = [(*metric_name).to_string()];
        let aliases = alias_lists
            .get(metric_name)
            .copied()
            .unwrap_or(&fallback[..]);
        results
            .groups
            .get(*config)
            .and_then(|group| group.sections.get(*backend))
            .and_then(|section| resolve_first_present(aliases, &section.values))
            .map(|nanos| units::from_nanos(*nanos, &metadata.time_unit).to_string())
            .ok_or_else(|| ResolveError::UnresolvedPath(segments.join(">")))
    })
}

/// Generates every artifact, writing rendered files into the output path.
///
/// Artifacts whose template cannot be read or whose placeholders do not all
/// resolve are logged and skipped; when `render` is set, each written
/// artifact's configured external renderer is invoked synchronously and a
/// failure there also only skips that artifact. Returns the paths of all
/// rendered files that were written.
///
/// # Errors
///
/// Only failing to create the output directory structure is fatal.
pub fn generate(
    results: &ResultSet,
    metadatas: &[(ArtifactMetadata, PathBuf)],
    output_path: &Path,
    render: bool,
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(output_path).context("could not create output directory structure")?;

    log::info!("generating {} artifacts...", metadatas.len());
    let mut written = Vec::new();
    for (metadata, template_path) in metadatas {
        let template = match fs::read_to_string(template_path) {
            Ok(template) => template,
            Err(err) => {
                log::error!(
                    "[{}] could not read template {}: {err}, skipping artifact...",
                    metadata.name,
                    template_path.display()
                );
                continue;
            }
        };

        let rendered = match render_template(results, metadata, &template) {
            Ok(rendered) => rendered,
            Err(err) => {
                log::error!("[{}] {err}, skipping artifact...", metadata.name);
                continue;
            }
        };

        let extension = template_path
            .extension()
            .and_then(OsStr::to_str)
            .unwrap_or("txt");
        let file_path =
            output_path.join(format!("{}.{extension}", sanitize_file_name(&metadata.name)));
        if let Err(err) = fs::write(&file_path, rendered) {
            log::error!(
                "[{}] could not write {}: {err}, skipping artifact...",
                metadata.name,
                file_path.display()
            );
            continue;
        }
        log::info!("[{}] wrote artifact to {}", metadata.name, file_path.display());

        if render {
            if let Some(program) = &metadata.renderer {
                run_renderer(&metadata.name, program, &file_path, output_path);
            }
        }
        written.push(file_path);
    }
    log::info!("generated {} artifacts", written.len());

    Ok(written)
}

fn validate_renderer(name: &str, program: &str) -> bool {
    log::trace!("validating renderer `{program}` ({name})");
    match Command::new(program).arg("--version").output() {
        Ok(out) => {
            log::debug!(
                "found renderer `{program}`: {}",
                String::from_utf8_lossy(&out.stdout).trim_end_matches('\n')
            );
            true
        }
        Err(err) => {
            match err.kind() {
                std::io::ErrorKind::NotFound => {
                    log::error!("[{name}] renderer `{program}` not found, skipping render...");
                }
                _ => {
                    log::error!("[{name}] could not probe renderer `{program}`: {err}, skipping render...");
                }
            }
            false
        }
    }
}

fn run_renderer(name: &str, program: &str, file_path: &Path, output_path: &Path) {
    if !validate_renderer(name, program) {
        return;
    }
    let absolute = file_path
        .canonicalize()
        .unwrap_or_else(|_| file_path.to_path_buf());
    log::debug!("[{name}] rendering {} with `{program}`...", absolute.display());
    match Command::new(program)
        .arg(&absolute)
        .current_dir(output_path)
        .status()
    {
        Ok(status) if status.success() => {
            log::info!("[{name}] renderer finished successfully");
        }
        Ok(status) => {
            log::error!("[{name}] renderer exited with {status}, skipping render...");
        }
        Err(err) => {
            log::error!("[{name}] could not launch renderer `{program}`: {err}, skipping render...");
        }
    }
}
