//! Normalization of harness-specific benchmark names onto one canonical
//! vocabulary.
//!
//! The same logical operation is reported under a different name by every
//! harness: the Go harness prints `Benchmark/VerifyBlobKZGProofBatch(count=4)`
//! where the criterion harness prints `verify_blob_kzg_proof_batch/4`. The
//! [`NameTable`] maps every known raw variant onto a single canonical name so
//! results can be compared across backends.
//!
//! A raw name missing from the table is never an error: it is used verbatim
//! as its own canonical name and a diagnostic is logged, so the pipeline
//! still produces output for benchmarks it has never seen.
//!
//! # Examples
//!
//! ```
//! use kzg_bench_report::names::NameTable;
//!
//! let names = NameTable::builtin();
//! assert_eq!(names.normalize("Benchmark/VerifyKZGProof"), "verify_kzg_proof");
//! assert_eq!(names.normalize("verify_kzg_proof"), "verify_kzg_proof");
//! ```

use std::{collections::HashMap, fs::File, path::Path};

use anyhow::Context;

/// Raw-name variants and the canonical name each maps to.
///
/// Hand-maintained; extending the vocabulary never requires touching the
/// parsing logic. Canonical names themselves are added as identity entries
/// when the table is built.
const BUILTIN: &[(&str, &str)] = &[
    // Go harness (go-kzg-4844 and the Go binding), parallelism suffix
    // already stripped by the extractor.
    ("Benchmark/BlobToKZGCommitment", "blob_to_kzg_commitment"),
    ("Benchmark/ComputeKZGProof", "compute_kzg_proof"),
    ("Benchmark/ComputeBlobKZGProof", "compute_blob_kzg_proof"),
    ("Benchmark/VerifyKZGProof", "verify_kzg_proof"),
    ("Benchmark/VerifyBlobKZGProof", "verify_blob_kzg_proof"),
    ("Benchmark/VerifyBlobKZGProofBatch(count=1)", "verify_blob_kzg_proof_batch/1"),
    ("Benchmark/VerifyBlobKZGProofBatch(count=2)", "verify_blob_kzg_proof_batch/2"),
    ("Benchmark/VerifyBlobKZGProofBatch(count=4)", "verify_blob_kzg_proof_batch/4"),
    ("Benchmark/VerifyBlobKZGProofBatch(count=8)", "verify_blob_kzg_proof_batch/8"),
    ("Benchmark/VerifyBlobKZGProofBatch(count=16)", "verify_blob_kzg_proof_batch/16"),
    ("Benchmark/VerifyBlobKZGProofBatch(count=32)", "verify_blob_kzg_proof_batch/32"),
    ("Benchmark/VerifyBlobKZGProofBatch(count=64)", "verify_blob_kzg_proof_batch/64"),
    ("Benchmark/VerifyBlobKZGProofBatchPar(count=1)", "verify_blob_kzg_proof_batch_par/1"),
    ("Benchmark/VerifyBlobKZGProofBatchPar(count=2)", "verify_blob_kzg_proof_batch_par/2"),
    ("Benchmark/VerifyBlobKZGProofBatchPar(count=4)", "verify_blob_kzg_proof_batch_par/4"),
    ("Benchmark/VerifyBlobKZGProofBatchPar(count=8)", "verify_blob_kzg_proof_batch_par/8"),
    ("Benchmark/VerifyBlobKZGProofBatchPar(count=16)", "verify_blob_kzg_proof_batch_par/16"),
    ("Benchmark/VerifyBlobKZGProofBatchPar(count=32)", "verify_blob_kzg_proof_batch_par/32"),
    ("Benchmark/VerifyBlobKZGProofBatchPar(count=64)", "verify_blob_kzg_proof_batch_par/64"),
    // Criterion harness, non-EIP-4844 benches carry their parameters in the
    // raw name.
    ("bench_DAS_extension scale: '15'", "das_extension"),
    ("bench_fft_fr scale: '15'", "fft_fr"),
    ("bench_fft_g1 scale: '15'", "fft_g1"),
    ("bench_commit_to_poly scale: '15'", "commit_to_poly"),
    ("bench_compute_proof_single scale: '15'", "compute_proof_single"),
    ("bench_g1_lincomb points: '4096'", "g1_lincomb"),
    ("bench_new_poly_div scale: '15'", "new_poly_div"),
    ("bench_recover scale: '15'", "recover"),
    ("bench_zero_poly scale: '15'", "zero_poly"),
];

/// Lookup table from raw benchmark names to canonical names.
#[derive(Clone, Debug, Default)]
pub struct NameTable {
    entries: HashMap<String, String>,
}

impl NameTable {
    /// Builds the table from the built-in vocabulary, including an identity
    /// entry for every canonical name so normalization is idempotent.
    #[must_use]
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        for (raw, canonical) in BUILTIN {
            entries.insert((*raw).to_string(), (*canonical).to_string());
            entries.insert((*canonical).to_string(), (*canonical).to_string());
        }
        Self { entries }
    }

    /// Merges additional raw-to-canonical entries from a JSON object file.
    ///
    /// Entries in the file override built-in ones with the same raw name.
    /// Each new canonical name also gets an identity entry.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened or does not deserialize to a map
    /// of strings.
    pub fn extend_from_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let extra: HashMap<String, String> = serde_json::from_reader(
            File::open(path)
                .with_context(|| format!("could not open name table file {}", path.display()))?,
        )
        .with_context(|| format!("could not deserialize name table file {}", path.display()))?;
        log::debug!(
            "merging {} name table entries from {}",
            extra.len(),
            path.display()
        );
        for (raw, canonical) in extra {
            self.entries.insert(canonical.clone(), canonical.clone());
            self.entries.insert(raw, canonical);
        }
        Ok(())
    }

    /// Maps a raw benchmark name to its canonical name.
    ///
    /// A name absent from the table is returned verbatim with a logged
    /// warning, never an error.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        if let Some(canonical) = self.entries.get(raw) {
            canonical.clone()
        } else {
            log::warn!("no canonical name for `{raw}`, using it verbatim");
            raw.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn maps_go_variants_to_canonical_names() {
        let names = NameTable::builtin();
        assert_eq!(
            names.normalize("Benchmark/BlobToKZGCommitment"),
            "blob_to_kzg_commitment"
        );
        assert_eq!(
            names.normalize("Benchmark/VerifyBlobKZGProofBatch(count=64)"),
            "verify_blob_kzg_proof_batch/64"
        );
    }

    #[test]
    fn maps_criterion_variants_to_canonical_names() {
        let names = NameTable::builtin();
        assert_eq!(names.normalize("bench_fft_fr scale: '15'"), "fft_fr");
        assert_eq!(names.normalize("bench_g1_lincomb points: '4096'"), "g1_lincomb");
    }

    #[test]
    fn canonical_names_are_fixed_points() {
        let names = NameTable::builtin();
        for (_, canonical) in BUILTIN {
            assert_eq!(names.normalize(canonical), *canonical);
        }
    }

    #[test]
    fn unknown_names_pass_through_verbatim() {
        let names = NameTable::builtin();
        assert_eq!(names.normalize("some_new_bench"), "some_new_bench");
    }

    #[test]
    fn extension_file_overrides_and_extends() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"multi_scalar_multiplication": "msm", "Benchmark/VerifyKZGProof": "verify_proof"}}"#
        )
        .unwrap();

        let mut names = NameTable::builtin();
        names.extend_from_file(file.path()).unwrap();
        assert_eq!(names.normalize("multi_scalar_multiplication"), "msm");
        assert_eq!(names.normalize("msm"), "msm");
        assert_eq!(names.normalize("Benchmark/VerifyKZGProof"), "verify_proof");
    }

    #[test]
    fn missing_extension_file_is_an_error() {
        let mut names = NameTable::builtin();
        assert!(names
            .extend_from_file(Path::new("/nonexistent/names.json"))
            .is_err());
    }
}
