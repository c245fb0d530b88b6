//! Framework compatibility ranges.
//!
//! Bundles declare ranges in npm syntax (`~0.7.0`, `>=1.0 <2`, `1.x || 2.x`,
//! `1.2.3 - 2.0.0`). `semver::VersionReq` only understands comma-separated
//! comparators, so each `||` alternative is normalized before parsing.

use semver::{Version, VersionReq};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A parsed version range, kept alongside the text it was declared with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibleRange {
    raw: String,
    alternatives: Vec<VersionReq>,
}

impl CompatibleRange {
    /// Parse an npm-style range expression.
    ///
    /// Returns the reason on failure so callers can put it in their own error.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("range is empty".to_string());
        }

        let alternatives = trimmed
            .split("||")
            .map(|set| {
                let normalized = normalize_comparator_set(set.trim())?;
                VersionReq::parse(&normalized).map_err(|e| format!("\"{}\": {e}", set.trim()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: raw.to_string(),
            alternatives,
        })
    }

    /// The range exactly as declared.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Check whether a framework version satisfies this range.
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

impl FromStr for CompatibleRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CompatibleRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for CompatibleRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Turn one npm comparator set into the comma-separated form `semver` accepts.
fn normalize_comparator_set(set: &str) -> Result<String, String> {
    if set.is_empty() {
        return Ok("*".to_string());
    }

    if let Some((low, high)) = set.split_once(" - ") {
        let low = strip_v(low.trim());
        let high = strip_v(high.trim());
        if low.is_empty() || high.is_empty() {
            return Err(format!("\"{set}\": incomplete hyphen range"));
        }
        return Ok(format!(">={low}, <={high}"));
    }

    let mut comparators = Vec::new();
    let mut pending_op: Option<&str> = None;

    for token in set.split_whitespace() {
        let token = token.trim_end_matches(',');
        if token.is_empty() {
            continue;
        }

        let op_len = token
            .find(|c: char| !matches!(c, '<' | '>' | '=' | '~' | '^'))
            .unwrap_or(token.len());
        let (op, version) = token.split_at(op_len);

        // npm tolerates whitespace between an operator and its version
        if version.is_empty() {
            if pending_op.is_some() {
                return Err(format!("\"{set}\": dangling operator"));
            }
            pending_op = Some(op);
            continue;
        }

        let op = match pending_op.take() {
            Some(pending) if op.is_empty() => pending,
            Some(_) => return Err(format!("\"{set}\": dangling operator")),
            None => op,
        };
        let version = strip_v(version);

        // A bare version is exact in npm but caret in semver
        let op = if op.is_empty() && !is_wildcard(version) {
            "="
        } else {
            op
        };
        comparators.push(format!("{op}{version}"));
    }

    if pending_op.is_some() {
        return Err(format!("\"{set}\": dangling operator"));
    }

    Ok(comparators.join(", "))
}

fn is_wildcard(version: &str) -> bool {
    version
        .split('.')
        .any(|part| matches!(part, "*" | "x" | "X"))
}

fn strip_v(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version)
}

#[cfg(test)]
#[path = "range/range_parameterized_tests.rs"]
mod range_parameterized_tests;
