//! Reporting pipeline for heterogeneous KZG benchmark logs.
//!
//! kzg-bench-report ingests the free-form text log produced by running the
//! KZG benchmark suites of several library implementations (Rust criterion
//! harnesses, Go testing harnesses, language bindings) across machine
//! configurations, and turns it into normalized tabular data and templated
//! report artifacts: CSV sheets, LaTeX graphs and tables.
//!
//! # Pipeline
//! The raw log is walked into nested groups (machine configuration) and
//! sections (backend), each section's text is pattern-matched into timing
//! records with unit conversion, benchmark names are normalized onto one
//! canonical vocabulary, and the resulting structure is pivoted per metric
//! and substituted into text templates.
//!
//! Parsing is deliberately forgiving: benchmark logs are noisy, so unknown
//! names, unrecognized blocks, and malformed values are logged and skipped.
//! Template rendering is deliberately strict: a template path that does not
//! resolve stops that artifact with an error naming the path.
//!
//! # Usage
//! kzg-bench-report is primarily designed to be used as an executable, but
//! it is modular and can also be used as a library for more granular control
//! over parsing and report generation.
//!
//! ## As an executable
//! Refer to the output of the `--help` flag for information on how to use
//! the kzg-bench-report binary:
//! ```console
//! $ cargo install kzg-bench-report
//! $ kzg-bench-report --help
//! 📊 kzg-bench-report turns heterogeneous KZG benchmark logs into normalized tables, graphs, and spreadsheets.
//!
//! Usage: kzg-bench-report [OPTIONS] <INPUT>
//!
//! Arguments:
//!   <INPUT>  Path to the benchmark log file to parse
//!
//! Options:
//!   -a, --artifacts <ARTIFACTS>    Path to a directory containing artifact metadata files [default: artifacts]
//!   -o, --output <OUTPUT>          Path to a directory to dump outputs in [default: output]
//!       --name-table <NAME_TABLE>  Path to a JSON file with additional raw-to-canonical name mappings
//!       --render                   If true, invokes each artifact's configured external renderer
//!   -h, --help                     Print help
//!   -V, --version                  Print version
//! ```
//!
//! ## As a library
//! ```no_run
//! use std::path::PathBuf;
//!
//! use kzg_bench_report::{artifacts, names::NameTable, results, sheets};
//!
//! # fn main() -> anyhow::Result<()> {
//! let log = std::fs::read_to_string("linode_benchmarks.txt")?;
//!
//! let parsed = results::parse(&log, &NameTable::builtin());
//!
//! let metadatas = artifacts::find_all_metadata(&PathBuf::from("artifacts"))?;
//! let metrics: Vec<Vec<String>> =
//!     metadatas.iter().map(|(m, _)| m.metric.clone()).collect();
//!
//! sheets::write_all(&parsed, &metrics, &PathBuf::from("output"))?;
//! artifacts::generate(&parsed, &metadatas, &PathBuf::from("output"), false)?;
//! #     Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]

pub mod aggregate;
pub mod artifacts;
pub mod names;
pub mod records;
pub mod results;
pub mod sheets;
pub mod template;
pub mod units;

pub use aggregate::{aggregate, resolve_first_present, AggregatedMetric};
pub use names::NameTable;
pub use results::{parse, Group, ResultSet, Section};
