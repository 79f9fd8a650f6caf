//! Extraction of raw benchmark records from one section of log text.
//!
//! Each harness family prints timings in its own shape. Two line-pattern
//! families cover everything the supported harnesses produce:
//!
//! - *throughput* lines, `<name> <iterations> <N> ns/op`, where the trailing
//!   numeric token is already a nanosecond count, and
//! - *distribution* lines, `<name> time: [<lo> <unit> <mid> <unit> <hi>
//!   <unit>]`, where only the median reading is of interest.
//!
//! The harness kind is detected, not declared: [`extract`] tries the
//! throughput family against the whole block first and falls back to the
//! distribution family. A non-empty block matching neither yields no records
//! and is up to the caller to report.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::units;

/// A single benchmark reading as it came out of the log, before name
/// normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRecord {
    /// Benchmark name as printed by the harness, parallelism suffix removed.
    pub name: String,
    /// Timing in nanoseconds.
    pub nanos: u64,
}

static THROUGHPUT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<name>\S+)\s+(?P<iters>\d+)\s+(?P<nanos>\d+(?:\.\d+)?)\s+ns/op")
        .expect("throughput pattern must compile")
});

static DISTRIBUTION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?P<name>.+?)\s+time:\s*\[(?P<lo>[\d.]+)\s+(?P<lo_unit>\S+)\s+(?P<mid>[\d.]+)\s+(?P<mid_unit>\S+)\s+(?P<hi>[\d.]+)\s+(?P<hi_unit>\S+)\]",
    )
    .expect("distribution pattern must compile")
});

static PARALLELISM_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-\d+$").expect("suffix pattern must compile"));

/// Extracts all recognizable records from one section's worth of raw text.
///
/// Records whose timing cannot be converted are dropped with a warning. An
/// empty return with a non-blank block means the block matched neither line
/// family.
#[must_use]
pub fn extract(block: &str) -> Vec<RawRecord> {
    let throughput = extract_throughput(block);
    if !throughput.is_empty() {
        return throughput;
    }
    extract_distribution(block)
}

fn extract_throughput(block: &str) -> Vec<RawRecord> {
    block
        .lines()
        .filter_map(|line| {
            let caps = THROUGHPUT_LINE.captures(line)?;
            let name = PARALLELISM_SUFFIX.replace(&caps["name"], "").into_owned();
            let nanos = caps["nanos"]
                .parse::<f64>()
                .map_err(units::MalformedValue::from)
                .and_then(|value| units::to_nanos(value, "ns"))
                .map_err(|err| {
                    log::warn!("could not read timing for `{name}`: {err}, skipping...");
                })
                .ok()?;
            Some(RawRecord { name, nanos })
        })
        .collect()
}

fn extract_distribution(block: &str) -> Vec<RawRecord> {
    block
        .lines()
        .filter_map(|line| {
            let caps = DISTRIBUTION_LINE.captures(line)?;
            let name = caps["name"].trim_end().to_string();
            let nanos = caps["mid"]
                .parse::<f64>()
                .map_err(units::MalformedValue::from)
                .and_then(|value| units::to_nanos(value, &caps["mid_unit"]))
                .map_err(|err| {
                    log::warn!("could not read timing for `{name}`: {err}, skipping...");
                })
                .ok()?;
            Some(RawRecord { name, nanos })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throughput_lines_yield_nanosecond_values() {
        let block = "Benchmark/Foo-4\t100\t5000 ns/op\n";
        let records = extract(block);
        assert_eq!(
            records,
            vec![RawRecord {
                name: "Benchmark/Foo".to_string(),
                nanos: 5000,
            }]
        );
    }

    #[test]
    fn throughput_alloc_stats_are_ignored() {
        let block = "Benchmark/Bar-16    	  50	 123456 ns/op	 7890 B/op	  12 allocs/op";
        let records = extract(block);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Benchmark/Bar");
        assert_eq!(records[0].nanos, 123_456);
    }

    #[test]
    fn parallelism_suffix_is_stripped() {
        let block = "Benchmark/VerifyBlobKZGProofBatch(count=32)-8   20  999 ns/op";
        let records = extract(block);
        assert_eq!(records[0].name, "Benchmark/VerifyBlobKZGProofBatch(count=32)");
    }

    #[test]
    fn distribution_lines_keep_the_median() {
        let block = "verify_kzg_proof        time:   [1.0210 ms 1.0344 ms 1.0482 ms]\n";
        let records = extract(block);
        assert_eq!(
            records,
            vec![RawRecord {
                name: "verify_kzg_proof".to_string(),
                nanos: 1_034_400,
            }]
        );
    }

    #[test]
    fn distribution_names_may_contain_spaces() {
        let block = "bench_fft_fr scale: '15' time:   [228.52 ms 230.01 ms 231.67 ms]";
        let records = extract(block);
        assert_eq!(records[0].name, "bench_fft_fr scale: '15'");
        assert_eq!(records[0].nanos, 230_010_000);
    }

    #[test]
    fn unknown_unit_drops_the_record() {
        let block = "fast_op time:   [10.0 us 11.0 us 12.0 us]";
        assert!(extract(block).is_empty());
    }

    #[test]
    fn unrecognized_block_yields_no_records() {
        let block = "Gnuplot not found, using plotters backend\nrunning 3 tests\n";
        assert!(extract(block).is_empty());
    }

    #[test]
    fn seconds_distribution_converts() {
        let block = "bench_fft_g1 scale: '15' time:   [10.100 s 10.200 s 10.300 s]";
        let records = extract(block);
        assert_eq!(records[0].nanos, 10_200_000_000);
    }
}
