//! Spreadsheet output: one CSV file per logical sheet.
//!
//! Two families of sheets are produced from one parse:
//!
//! - one sheet per machine configuration, rows = canonical benchmark names
//!   in file order, columns = backends, and
//! - one sheet per aggregated metric, rows = backends, columns = machine
//!   configurations.
//!
//! A metric with no resolvable cells still gets its (header-only) sheet so
//! the expected artifact set is reproducible run to run.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    aggregate::aggregate,
    artifacts::sanitize_file_name,
    results::{Group, ResultSet},
};

/// Writes the per-configuration sheet for one group.
fn write_group_sheet(group: &Group, output_path: &Path) -> anyhow::Result<PathBuf> {
    let file_path = output_path.join(format!("{}.csv", sanitize_file_name(&group.title())));
    let mut writer = csv::Writer::from_path(&file_path)
        .with_context(|| format!("could not create sheet {}", file_path.display()))?;

    let mut header = vec![group.title()];
    header.extend(group.sections.keys().cloned());
    writer.write_record(&header)?;

    let mut row_names: Vec<&String> = Vec::new();
    for section in group.sections.values() {
        for name in section.values.keys() {
            if !row_names.contains(&name) {
                row_names.push(name);
            }
        }
    }

    for name in row_names {
        let mut record = vec![name.clone()];
        record.extend(group.sections.values().map(|section| {
            section
                .values
                .get(name)
                .map(u64::to_string)
                .unwrap_or_default()
        }));
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .with_context(|| format!("could not flush sheet {}", file_path.display()))?;
    Ok(file_path)
}

/// Writes the pivoted sheet for one metric alias list.
fn write_metric_sheet(
    results: &ResultSet,
    aliases: &[String],
    output_path: &Path,
) -> anyhow::Result<PathBuf> {
    let metric = aggregate(results, aliases);
    let file_path = output_path.join(format!("{}.csv", sanitize_file_name(&metric.name)));
    let mut writer = csv::Writer::from_path(&file_path)
        .with_context(|| format!("could not create sheet {}", file_path.display()))?;

    let configs: Vec<&String> = results.groups.keys().collect();
    let mut header = vec![metric.name.clone()];
    header.extend(results.groups.values().map(Group::title));
    writer.write_record(&header)?;

    for (backend, by_config) in &metric.series {
        let mut record = vec![backend.clone()];
        record.extend(configs.iter().map(|config| {
            by_config
                .get(*config)
                .map(u64::to_string)
                .unwrap_or_default()
        }));
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .with_context(|| format!("could not flush sheet {}", file_path.display()))?;
    Ok(file_path)
}

/// Writes all configuration and metric sheets into the output path.
///
/// Returns the paths of all sheets written.
///
/// # Errors
///
/// Sheet files that cannot be created or written are fatal for the run: the
/// output directory is expected to be writable once created.
pub fn write_all(
    results: &ResultSet,
    metrics: &[Vec<String>],
    output_path: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_path).context("could not create output directory structure")?;

    log::debug!("writing all sheets out...");
    let mut written = Vec::new();
    for group in results.groups.values() {
        written.push(write_group_sheet(group, output_path)?);
    }
    for aliases in metrics {
        written.push(write_metric_sheet(results, aliases, output_path)?);
    }
    log::info!("wrote {} sheets to {}", written.len(), output_path.display());

    Ok(written)
}
