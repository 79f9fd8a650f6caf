//! Parsing of a benchmark log into a nested, typed result structure.
//!
//! A log file is a sequence of *groups* (one per machine configuration,
//! opened by a `**** BENCHMARKING ... ****` delimiter line) each containing
//! *sections* (one per backend, opened by a `~~~~ ... ~~~~` delimiter line)
//! whose body lines are handed to the record extractor. The primary
//! entrypoint is [`parse`], which walks the whole file and returns a
//! [`ResultSet`].
//!
//! # Examples
//!
//! ```
//! use kzg_bench_report::{names::NameTable, results};
//!
//! let log = "\
//! **** BENCHMARKING ON 4 CORES ****
//! ~~~~ backend-A ~~~~
//! Benchmark/VerifyKZGProof-4\t100\t5000 ns/op
//! ";
//!
//! let results = results::parse(log, &NameTable::builtin());
//! assert_eq!(
//!     results.groups["4"].sections["backend-A"].values["verify_kzg_proof"],
//!     5000,
//! );
//! ```

use std::time::Duration;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tabled::{builder::Builder, settings::Style};

use crate::{names::NameTable, records};

/// Results for one backend within one machine configuration.
///
/// Keys are canonical benchmark names; no raw names survive normalization.
/// A raw name reported more than once within one section keeps only its
/// final reading.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Section {
    /// Backend label as read from the section delimiter line.
    pub backend: String,
    /// Canonical benchmark name to timing in nanoseconds, in file order.
    pub values: IndexMap<String, u64>,
}

impl Section {
    /// Creates an empty section for the given backend label.
    #[must_use]
    pub fn new(backend: String) -> Self {
        Self {
            backend,
            values: IndexMap::new(),
        }
    }
}

/// All sections collected under one machine-configuration label.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Group {
    /// Configuration label: a core count (`"4"`) or a device name.
    pub label: String,
    /// Backend label to section, in file order.
    pub sections: IndexMap<String, Section>,
}

impl Group {
    /// Creates an empty group for the given configuration label.
    #[must_use]
    pub fn new(label: String) -> Self {
        Self {
            label,
            sections: IndexMap::new(),
        }
    }

    /// Human-facing title for this group, used for sheet and table headers.
    ///
    /// Purely numeric labels came from `ON <N> CORES` delimiters and are
    /// titled accordingly; anything else (a device name) is used verbatim.
    #[must_use]
    pub fn title(&self) -> String {
        if !self.label.is_empty() && self.label.chars().all(|c| c.is_ascii_digit()) {
            format!("{} cores", self.label)
        } else {
            self.label.clone()
        }
    }
}

/// The full output of parsing one benchmark log file.
///
/// Built once per input file and read-only afterwards. Group and section
/// order follows file order; it matters for display only.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ResultSet {
    /// Configuration label to group, in file order.
    pub groups: IndexMap<String, Group>,
}

static GROUP_DELIMITER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\*{4} BENCHMARKING (?:ON )?(?P<label>.+?) \*{4}\s*$")
        .expect("group delimiter pattern must compile")
});

static SECTION_DELIMITER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^~{4} (?P<label>.+?) ~{4}\s*$").expect("section delimiter pattern must compile")
});

/// One-line-lookahead cursor over the input lines.
///
/// The walker needs to peek at the next line to decide whether it belongs to
/// the current section body or ends it; delimiter lines must never be
/// consumed by body collection. Buffering a single peeked line keeps the
/// walker independent of seekable-stream semantics.
struct Cursor<'a> {
    lines: std::str::Lines<'a>,
    peeked: Option<Option<&'a str>>,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines(),
            peeked: None,
        }
    }

    fn peek(&mut self) -> Option<&'a str> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lines.next());
        }
        self.peeked.flatten()
    }

    fn advance(&mut self) -> Option<&'a str> {
        match self.peeked.take() {
            Some(line) => line,
            None => self.lines.next(),
        }
    }
}

fn group_label(line: &str) -> Option<String> {
    let raw = GROUP_DELIMITER.captures(line)?["label"].to_string();
    Some(raw.strip_suffix(" CORES").unwrap_or(&raw).trim().to_string())
}

fn section_label(line: &str) -> Option<String> {
    Some(SECTION_DELIMITER.captures(line)?["label"].to_string())
}

fn is_delimiter(line: &str) -> bool {
    GROUP_DELIMITER.is_match(line) || SECTION_DELIMITER.is_match(line)
}

/// Collects section body lines up to (but not including) the next delimiter
/// line of either kind, or end of input.
fn collect_block(cursor: &mut Cursor<'_>) -> String {
    let mut block = String::new();
    while let Some(line) = cursor.peek() {
        if is_delimiter(line) {
            break;
        }
        block.push_str(line);
        block.push('\n');
        cursor.advance();
    }
    block
}

/// Parses a whole benchmark log into a [`ResultSet`].
///
/// Parsing anomalies (unrecognized section bodies, unconvertible values,
/// unknown benchmark names, sections outside any group) are logged and the
/// offending piece is skipped; they never abort the walk. An input with no
/// delimiters at all simply yields an empty result set.
#[must_use]
pub fn parse(input: &str, names: &NameTable) -> ResultSet {
    let mut results = ResultSet::default();
    let mut cursor = Cursor::new(input);
    let mut current_group: Option<String> = None;

    while let Some(line) = cursor.advance() {
        if let Some(label) = group_label(line) {
            log::debug!("benchmarking group `{label}`");
            results
                .groups
                .entry(label.clone())
                .or_insert_with(|| Group::new(label.clone()));
            current_group = Some(label);
        } else if let Some(backend) = section_label(line) {
            let block = collect_block(&mut cursor);
            let Some(group_key) = current_group.as_ref() else {
                log::warn!("section `{backend}` appears outside of any group, skipping...");
                continue;
            };

            let extracted = records::extract(&block);
            if extracted.is_empty() && block.lines().any(|l| !l.trim().is_empty()) {
                log::warn!(
                    "unrecognized log format in section `{backend}` of group `{group_key}`, section left empty"
                );
            }

            if let Some(group) = results.groups.get_mut(group_key) {
                let section = group
                    .sections
                    .entry(backend.clone())
                    .or_insert_with(|| Section::new(backend.clone()));
                for record in extracted {
                    let canonical = names.normalize(&record.name);
                    // Last write wins within a section.
                    section.values.insert(canonical, record.nanos);
                }
                log::debug!(
                    "section `{backend}` of group `{group_key}` holds {} benchmarks",
                    section.values.len()
                );
            }
        }
        // Anything else between sections (blank lines, harness chatter) is
        // ignored without ending the current group.
    }

    results
}

/// Prints one markdown table per group to stdout.
///
/// Rows are canonical benchmark names in file order, columns are backends,
/// cells are humanized durations.
pub fn print_summary(results: &ResultSet) {
    for group in results.groups.values() {
        let mut row_names: Vec<&String> = Vec::new();
        for section in group.sections.values() {
            for name in section.values.keys() {
                if !row_names.contains(&name) {
                    row_names.push(name);
                }
            }
        }

        let mut builder = Builder::default();
        let mut header = vec![group.title()];
        header.extend(group.sections.keys().cloned());
        builder.push_record(header);
        for name in row_names {
            let mut record = vec![name.clone()];
            record.extend(group.sections.values().map(|section| {
                section
                    .values
                    .get(name)
                    .map(|nanos| format!("{:?}", Duration::from_nanos(*nanos)))
                    .unwrap_or_default()
            }));
            builder.push_record(record);
        }

        let mut table = builder.build();
        table.with(Style::markdown());
        println!("{table}");
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> NameTable {
        NameTable::builtin()
    }

    #[test]
    fn parses_nested_groups_and_sections() {
        let log = "\
**** BENCHMARKING ON 4 CORES ****
~~~~ backend-A ~~~~
Benchmark/Foo-4\t100\t5000 ns/op
";
        let results = parse(log, &names());
        assert_eq!(results.groups.len(), 1);
        assert_eq!(
            results.groups["4"].sections["backend-A"].values["Benchmark/Foo"],
            5000
        );
    }

    #[test]
    fn core_count_suffix_is_stripped_from_group_labels() {
        let log = "**** BENCHMARKING ON 16 CORES ****\n~~~~ b ~~~~\n";
        let results = parse(log, &names());
        assert!(results.groups.contains_key("16"));
        assert_eq!(results.groups["16"].title(), "16 cores");
    }

    #[test]
    fn device_labels_are_kept_verbatim() {
        let log = "**** BENCHMARKING NVIDIA RTX 4090 ****\n~~~~ gpu-backend ~~~~\n";
        let results = parse(log, &names());
        assert!(results.groups.contains_key("NVIDIA RTX 4090"));
        assert_eq!(results.groups["NVIDIA RTX 4090"].title(), "NVIDIA RTX 4090");
    }

    #[test]
    fn outer_delimiter_closes_the_current_group() {
        let log = "\
**** BENCHMARKING ON 1 CORES ****
~~~~ a ~~~~
verify_kzg_proof time:   [1.0 ms 2.0 ms 3.0 ms]
**** BENCHMARKING ON 2 CORES ****
~~~~ a ~~~~
verify_kzg_proof time:   [4.0 ms 5.0 ms 6.0 ms]
";
        let results = parse(log, &names());
        assert_eq!(
            results.groups["1"].sections["a"].values["verify_kzg_proof"],
            2_000_000
        );
        assert_eq!(
            results.groups["2"].sections["a"].values["verify_kzg_proof"],
            5_000_000
        );
    }

    #[test]
    fn section_body_stops_at_the_next_delimiter() {
        let log = "\
**** BENCHMARKING ON 1 CORES ****
~~~~ a ~~~~
foo time:   [1.0 ms 1.0 ms 1.0 ms]
~~~~ b ~~~~
bar time:   [2.0 ms 2.0 ms 2.0 ms]
";
        let results = parse(log, &names());
        let group = &results.groups["1"];
        assert_eq!(group.sections["a"].values.len(), 1);
        assert_eq!(group.sections["b"].values["bar"], 2_000_000);
    }

    #[test]
    fn duplicate_names_keep_the_last_reading() {
        let log = "\
**** BENCHMARKING ON 1 CORES ****
~~~~ a ~~~~
foo\t10\t10 ns/op
foo\t10\t20 ns/op
";
        let results = parse(log, &names());
        assert_eq!(results.groups["1"].sections["a"].values["foo"], 20);
    }

    #[test]
    fn blank_lines_do_not_end_a_group() {
        let log = "\
**** BENCHMARKING ON 1 CORES ****

~~~~ a ~~~~
foo\t1\t5 ns/op

~~~~ b ~~~~
bar\t1\t6 ns/op
";
        let results = parse(log, &names());
        let group = &results.groups["1"];
        assert_eq!(group.sections.len(), 2);
        assert_eq!(group.sections["b"].values["bar"], 6);
    }

    #[test]
    fn unrecognized_section_body_yields_an_empty_section() {
        let log = "\
**** BENCHMARKING ON 1 CORES ****
~~~~ a ~~~~
this is not a benchmark line
neither is this
";
        let results = parse(log, &names());
        assert!(results.groups["1"].sections["a"].values.is_empty());
    }

    #[test]
    fn section_outside_any_group_is_skipped() {
        let log = "\
~~~~ stray ~~~~
foo\t1\t5 ns/op
**** BENCHMARKING ON 1 CORES ****
~~~~ a ~~~~
foo\t1\t7 ns/op
";
        let results = parse(log, &names());
        assert_eq!(results.groups.len(), 1);
        assert!(!results.groups["1"].sections.contains_key("stray"));
        assert_eq!(results.groups["1"].sections["a"].values["foo"], 7);
    }

    #[test]
    fn file_order_is_preserved() {
        let log = "\
**** BENCHMARKING ON 2 CORES ****
~~~~ z-backend ~~~~
foo\t1\t1 ns/op
~~~~ a-backend ~~~~
foo\t1\t2 ns/op
**** BENCHMARKING ON 1 CORES ****
";
        let results = parse(log, &names());
        let group_order: Vec<&String> = results.groups.keys().collect();
        assert_eq!(group_order, ["2", "1"]);
        let section_order: Vec<&String> = results.groups["2"].sections.keys().collect();
        assert_eq!(section_order, ["z-backend", "a-backend"]);
    }
}
