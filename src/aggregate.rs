//! Pivoting of parsed results into per-metric series.
//!
//! A metric is named by an ordered list of acceptable canonical names: the
//! harnesses do not all report the same variant of an operation, so a
//! metric like `verify_blob_kzg_proof_batch/4` may prefer a
//! "with precomputation" reading and fall back to the plain one. The
//! [`aggregate`] function resolves that alias list independently for every
//! (backend, config) cell of a [`ResultSet`] and produces one pivoted table
//! per metric.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::results::ResultSet;

/// One metric pivoted across backends and machine configurations.
///
/// Cells with no resolvable value are omitted, not zeroed. A metric with no
/// resolvable cells at all is retained as an empty table so the expected
/// artifact set stays reproducible.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AggregatedMetric {
    /// Externally visible metric name: the first alias in the list.
    pub name: String,
    /// Backend label to (config label to nanoseconds), in file order.
    pub series: IndexMap<String, IndexMap<String, u64>>,
}

impl AggregatedMetric {
    /// Largest value across all cells, if any cell resolved.
    #[must_use]
    pub fn max_nanos(&self) -> Option<u64> {
        self.series
            .values()
            .flat_map(|by_config| by_config.values())
            .max()
            .copied()
    }
}

/// Returns the value for the first key present in the mapping.
///
/// The ordered-fallback lookup shared by aggregation and template path
/// resolution.
#[must_use]
pub fn resolve_first_present<'a, T>(
    keys: &[String],
    mapping: &'a IndexMap<String, T>,
) -> Option<&'a T> {
    keys.iter().find_map(|key| mapping.get(key))
}

/// Builds the pivoted series for one metric alias list.
///
/// For every (backend, config) cell across the whole result set the first
/// alias present in that cell wins; the produced table is keyed by the
/// first alias in the list.
#[must_use]
pub fn aggregate(results: &ResultSet, aliases: &[String]) -> AggregatedMetric {
    let mut metric = AggregatedMetric {
        name: aliases.first().cloned().unwrap_or_default(),
        series: IndexMap::new(),
    };

    for group in results.groups.values() {
        for section in group.sections.values() {
            if let Some(nanos) = resolve_first_present(aliases, &section.values) {
                metric
                    .series
                    .entry(section.backend.clone())
                    .or_default()
                    .insert(group.label.clone(), *nanos);
            }
        }
    }

    if metric.series.is_empty() {
        log::debug!("metric `{}` resolved no cells", metric.name);
    }
    metric
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{names::NameTable, results};

    fn sample() -> ResultSet {
        let log = "\
**** BENCHMARKING ON 1 CORES ****
~~~~ alpha ~~~~
x\t1\t100 ns/op
x_precomp\t1\t90 ns/op
~~~~ beta ~~~~
x\t1\t200 ns/op
**** BENCHMARKING ON 2 CORES ****
~~~~ alpha ~~~~
x\t1\t50 ns/op
";
        results::parse(log, &NameTable::builtin())
    }

    #[test]
    fn first_present_alias_wins_per_cell() {
        let results = sample();
        let aliases = vec!["x_precomp".to_string(), "x".to_string()];
        let metric = aggregate(&results, &aliases);

        assert_eq!(metric.name, "x_precomp");
        // alpha@1 has the preferred variant, beta@1 and alpha@2 fall back.
        assert_eq!(metric.series["alpha"]["1"], 90);
        assert_eq!(metric.series["beta"]["1"], 200);
        assert_eq!(metric.series["alpha"]["2"], 50);
    }

    #[test]
    fn unresolvable_cells_are_omitted() {
        let results = sample();
        let metric = aggregate(&results, &["x_precomp".to_string()]);
        assert_eq!(metric.series["alpha"]["1"], 90);
        assert!(!metric.series.contains_key("beta"));
        assert!(!metric.series["alpha"].contains_key("2"));
    }

    #[test]
    fn empty_metrics_are_retained() {
        let results = sample();
        let metric = aggregate(&results, &["nonexistent".to_string()]);
        assert_eq!(metric.name, "nonexistent");
        assert!(metric.series.is_empty());
        assert_eq!(metric.max_nanos(), None);
    }

    #[test]
    fn max_spans_all_cells() {
        let results = sample();
        let metric = aggregate(&results, &["x".to_string()]);
        assert_eq!(metric.max_nanos(), Some(200));
    }

    #[test]
    fn resolve_first_present_respects_order() {
        let mut mapping = IndexMap::new();
        mapping.insert("b".to_string(), 2);
        mapping.insert("a".to_string(), 1);
        let keys = vec!["a".to_string(), "b".to_string()];
        assert_eq!(resolve_first_present(&keys, &mapping), Some(&1));
        assert_eq!(resolve_first_present(&["z".to_string()], &mapping), None);
    }
}
