#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

/// Metadata describing one templated report artifact.
///
/// Lives in a `*.artifact.json` file next to the template it references.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Artifact name, also used (sanitized) for the output file name.
    pub name: String,
    /// Template file path, relative to the metadata file.
    pub template: String,
    /// Ordered alias list for the primary metric; first entry is the
    /// metric's display name, later entries are fallbacks.
    pub metric: Vec<String>,
    /// Optional alias list for a secondary series in the same template.
    #[serde(default)]
    pub extra_metric: Option<Vec<String>>,
    /// Display time unit for substituted values: `ns`, `ms`, or `s`.
    pub time_unit: String,
    /// Axis maximum override in display units; computed from the data when
    /// absent.
    #[serde(default)]
    pub max_time: Option<f64>,
    /// Axis maximum override for the secondary series.
    #[serde(default)]
    pub max_time_2: Option<f64>,
    /// External program to run on the rendered file.
    #[serde(default)]
    pub renderer: Option<String>,
}
