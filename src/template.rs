//! Placeholder expansion for report templates.
//!
//! Templates are plain text (typically LaTeX) with `${seg1>seg2>...>segN}`
//! placeholders. Each placeholder is replaced, independently and left to
//! right, with whatever string the caller-supplied resolver produces for the
//! path segments. Placeholders never span lines.
//!
//! Unlike raw-name normalization, a path the resolver cannot satisfy is a
//! hard failure: a broken template reference means the template and the
//! data disagree, and the artifact must not be generated from it.
//!
//! # Examples
//!
//! ```
//! use kzg_bench_report::template::{resolve, ResolveError};
//!
//! let rendered = resolve("time: ${a>b} ms", &mut |segments| {
//!     assert_eq!(segments, ["a", "b"]);
//!     Ok("1.5".to_string())
//! })
//! .unwrap();
//! assert_eq!(rendered, "time: 1.5 ms");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Failure to expand a template.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A placeholder path did not resolve to a value.
    #[error("unresolvable template path `{0}`")]
    UnresolvedPath(String),
}

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}\n]*)\}").expect("placeholder pattern must compile"));

/// Expands every `${...}` placeholder in the template.
///
/// The resolver receives the `>`-separated path segments of one placeholder
/// and returns the replacement string.
///
/// # Errors
///
/// The first [`ResolveError`] returned by the resolver aborts the expansion;
/// the error identifies the offending path.
pub fn resolve(
    template: &str,
    resolver: &mut dyn FnMut(&[&str]) -> Result<String, ResolveError>,
) -> Result<String, ResolveError> {
    let mut rendered = String::with_capacity(template.len());
    let mut position = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let whole = caps.get(0).expect("capture 0 always exists");
        let path = &caps[1];
        let segments: Vec<&str> = path.split('>').map(str::trim).collect();

        rendered.push_str(&template[position..whole.start()]);
        rendered.push_str(&resolver(&segments)?);
        position = whole.end();
    }
    rendered.push_str(&template[position..]);

    Ok(rendered)
}
