//! npm range normalization and evaluation
//!
//! Handles range formats:
//! - Strict npm ranges: `^16.8.0`, `>=16.8.0 <19`, `^16.8.0 || ^17.0.0`, `1.0.0 - 2.0.0`
//! - Sloppy separators: `^16.8.0 | ^17.0.0`, `^16||^17`
//! - Partial versions: `>=16.8` (-> `>=16.8.0`), `^16` (-> `^16.0.0`)
//!
//! Partial versions inside hyphen ranges or carrying a prerelease tag are
//! left untouched by the rewrite.

use crate::domain::CompatibilityStatus;
use node_semver::{Range, Version as NpmVersion};
use regex::Regex;
use semver::Version;
use std::sync::LazyLock;

/// Any run of `|` with surrounding whitespace
static OR_SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\|+\s*").unwrap());

/// Version body with one or two numeric components
static PARTIAL_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.(\d+))?$").unwrap());

/// First numeric run of up to three components
static COERCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?").unwrap());

fn is_operator_char(c: char) -> bool {
    matches!(c, '^' | '~' | '<' | '>' | '=' | 'v' | 'V')
}

/// Evaluate whether `candidate` satisfies the peer `range`
pub fn evaluate(candidate: &str, range: Option<&str>) -> CompatibilityStatus {
    let Some(range) = range else {
        return CompatibilityStatus::Unknown;
    };
    let Some(range) = normalize_range(range) else {
        return CompatibilityStatus::Unknown;
    };
    let Some(candidate) = coerce_version(candidate) else {
        return CompatibilityStatus::Unknown;
    };

    match satisfies(&range, &candidate) {
        Some(true) => CompatibilityStatus::Compatible,
        Some(false) => CompatibilityStatus::Incompatible,
        None => CompatibilityStatus::Unknown,
    }
}

/// Parse a range strictly, falling back to the tolerant rewrite
///
/// Blank ranges yield `None` rather than the npm meaning of "any version".
pub fn normalize_range(range: &str) -> Option<Range> {
    let trimmed = range.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = Range::parse(trimmed) {
        return Some(parsed);
    }

    let rewritten = rewrite_range(trimmed);
    if rewritten.trim().is_empty() {
        return None;
    }
    Range::parse(&rewritten).ok()
}

/// Rewrite a range into npm syntax: standard `||` separators, padded versions
pub fn rewrite_range(range: &str) -> String {
    let collapsed = OR_SEPARATOR_RE.replace_all(range.trim(), " || ");
    collapsed
        .split(" || ")
        .map(pad_alternative)
        .filter(|alt| !alt.is_empty())
        .collect::<Vec<_>>()
        .join(" || ")
}

fn pad_alternative(alternative: &str) -> String {
    let tokens: Vec<&str> = alternative.split_whitespace().collect();
    if tokens.contains(&"-") {
        return tokens.join(" ");
    }
    tokens
        .iter()
        .map(|token| pad_token(token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn pad_token(token: &str) -> String {
    let body_start = token
        .find(|c: char| !is_operator_char(c))
        .unwrap_or(token.len());
    let (operator, body) = token.split_at(body_start);

    match PARTIAL_VERSION_RE.captures(body) {
        Some(caps) if caps.get(1).is_some() => format!("{}{}.0", operator, body),
        Some(_) => format!("{}{}.0.0", operator, body),
        None => token.to_string(),
    }
}

/// Coerce a loose version string to `MAJOR.MINOR.PATCH`
///
/// Leading noise is discarded and missing components are zero:
/// `v16.8` -> `16.8.0`, `^18` -> `18.0.0`, `19.0.0-rc.1` -> `19.0.0`.
pub fn coerce_version(input: &str) -> Option<Version> {
    let caps = COERCE_RE.captures(input)?;
    let component = |idx: usize| -> Option<u64> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    Some(Version::new(component(1)?, component(2)?, component(3)?))
}

/// Check a semver version against a parsed npm range
pub fn satisfies(range: &Range, version: &Version) -> Option<bool> {
    let npm_version = NpmVersion::parse(&version.to_string()).ok()?;
    Some(range.satisfies(&npm_version))
}

/// Strip range operators from a declared version
///
/// Takes the first `||` alternative and its first version token:
/// `^1.2.3 || ^2.0.0` -> `1.2.3`, `>= 4.0.0 <5` -> `4.0.0`.
pub fn strip_range_prefix(range: &str) -> String {
    let first = range.split("||").next().unwrap_or_default();
    first
        .trim_start_matches(|c: char| is_operator_char(c) || c.is_whitespace())
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use CompatibilityStatus::{Compatible, Incompatible, Unknown};

    #[test]
    fn test_absent_range_is_unknown() {
        assert_eq!(evaluate("19.0.0", None), Unknown);
        assert_eq!(evaluate("1.0.0", None), Unknown);
    }

    #[test]
    fn test_blank_range_is_unknown() {
        assert_eq!(evaluate("19.0.0", Some("")), Unknown);
        assert_eq!(evaluate("19.0.0", Some("   ")), Unknown);
    }

    #[test]
    fn test_partial_lower_bound() {
        assert_eq!(evaluate("19.0.0", Some(">=16.8")), Compatible);
    }

    #[test]
    fn test_caret_mismatch() {
        assert_eq!(evaluate("19.0.0", Some("^18.0.0")), Incompatible);
    }

    #[test]
    fn test_or_ranges() {
        assert_eq!(
            evaluate("19.0.0", Some("^16.8.0 || ^17.0.0 || ^18.0.0")),
            Incompatible
        );
        assert_eq!(evaluate("19.0.0", Some("^16.8.0 || ^19.0.0")), Compatible);
    }

    #[test]
    fn test_single_pipe_separator() {
        assert_eq!(evaluate("19.0.0", Some("^18.0.0 | ^19.0.0")), Compatible);
        assert_eq!(evaluate("17.0.2", Some("^16.8.0|^18.0.0")), Incompatible);
    }

    #[test]
    fn test_and_range() {
        assert_eq!(evaluate("18.2.0", Some(">=16.8.0 <19.0.0")), Compatible);
        assert_eq!(evaluate("19.0.0", Some(">=16.8.0 <19.0.0")), Incompatible);
    }

    #[test]
    fn test_wildcard_range() {
        assert_eq!(evaluate("19.0.0", Some("*")), Compatible);
    }

    #[test]
    fn test_garbage_range_is_unknown() {
        assert_eq!(evaluate("19.0.0", Some("not a range")), Unknown);
    }

    #[test]
    fn test_candidate_coercion() {
        assert_eq!(evaluate("v19", Some("^19.0.0")), Compatible);
        assert_eq!(evaluate("^18.2", Some("^18.0.0")), Compatible);
        assert_eq!(evaluate("latest", Some("^18.0.0")), Unknown);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let range = "^16.8.0 || ^17.0.0";
        let first = evaluate("17.0.2", Some(range));
        for _ in 0..10 {
            assert_eq!(evaluate("17.0.2", Some(range)), first);
        }
    }

    #[test]
    fn test_rewrite_collapses_separators() {
        assert_eq!(rewrite_range("^16.8.0 | ^17.0.0"), "^16.8.0 || ^17.0.0");
        assert_eq!(rewrite_range("^16.8.0|||^17.0.0"), "^16.8.0 || ^17.0.0");
    }

    #[test]
    fn test_rewrite_pads_partial_versions() {
        assert_eq!(rewrite_range(">=16.8"), ">=16.8.0");
        assert_eq!(rewrite_range("^16 | ^17.1"), "^16.0.0 || ^17.1.0");
        assert_eq!(rewrite_range(">=16 <19"), ">=16.0.0 <19.0.0");
    }

    #[test]
    fn test_rewrite_leaves_hyphen_ranges() {
        assert_eq!(rewrite_range("16 - 18"), "16 - 18");
    }

    #[test]
    fn test_rewrite_leaves_prerelease_tags() {
        assert_eq!(rewrite_range(">=19.0-rc"), ">=19.0-rc");
        assert_eq!(rewrite_range("^19.0.0-rc.1"), "^19.0.0-rc.1");
    }

    #[test]
    fn test_coerce_version() {
        assert_eq!(coerce_version("16.8"), Some(Version::new(16, 8, 0)));
        assert_eq!(coerce_version("v18"), Some(Version::new(18, 0, 0)));
        assert_eq!(coerce_version("~4.20.0"), Some(Version::new(4, 20, 0)));
        assert_eq!(coerce_version("19.0.0-rc.1"), Some(Version::new(19, 0, 0)));
        assert_eq!(coerce_version("workspace:*"), None);
    }

    #[test]
    fn test_strip_range_prefix() {
        assert_eq!(strip_range_prefix("^1.2.3 || ^2.0.0"), "1.2.3");
        assert_eq!(strip_range_prefix("~4.20.0"), "4.20.0");
        assert_eq!(strip_range_prefix(">= 4.0.0 <5"), "4.0.0");
        assert_eq!(strip_range_prefix("4.20.0"), "4.20.0");
        assert_eq!(strip_range_prefix(""), "");
    }
}
