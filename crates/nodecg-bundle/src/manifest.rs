//! Manifest reading and validation.
//!
//! A bundle's manifest is its npm `package.json`. The fields the framework
//! cares about live in a sub-object (by default `"nodecg"`), which is kept
//! verbatim for the panel, graphic and list validators.

use crate::{BundleError, BundleResult, CompatibleRange, MANIFEST_FILE, ParseOptions};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Normalized bundle manifest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Bundle name; always equal to the bundle's folder name.
    pub name: String,

    /// Bundle version, if declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Short description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Homepage URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    /// Primary author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Person>,

    /// Additional contributors.
    pub contributors: Vec<Person>,

    /// License identifier (e.g., "MIT").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    /// npm dependencies, name to version range.
    pub dependencies: BTreeMap<String, String>,

    /// Framework versions this bundle works with.
    pub compatible_range: CompatibleRange,

    /// Other bundles this bundle needs, name to version range.
    pub bundle_dependencies: BTreeMap<String, CompatibleRange>,

    /// Whether operators may create their own sound cues.
    pub enable_custom_cues: bool,

    /// The framework sub-object, untouched.
    #[serde(skip)]
    pub framework: Map<String, Value>,

    /// The manifest file's text, verbatim.
    #[serde(skip)]
    pub raw: String,
}

/// A person entry from `author` or `contributors`.
///
/// npm accepts both `"Name <email> (url)"` and `{ "name", "email", "url" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Person {
    /// The single-string form.
    Text(String),
    /// The object form.
    Detailed {
        #[serde(default)]
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

impl Person {
    /// The person's name, without email or URL.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Person::Text(text) => text
                .split(['<', '('])
                .next()
                .map(str::trim)
                .unwrap_or_default(),
            Person::Detailed { name, .. } => name,
        }
    }

    /// The person's email, if given.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        match self {
            Person::Text(text) => delimited(text, '<', '>'),
            Person::Detailed { email, .. } => email.as_deref(),
        }
    }

    /// The person's URL, if given.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Person::Text(text) => delimited(text, '(', ')'),
            Person::Detailed { url, .. } => url.as_deref(),
        }
    }
}

fn delimited(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)? + open.len_utf8();
    let end = text[start..].find(close)? + start;
    Some(text[start..end].trim()).filter(|s| !s.is_empty())
}

impl Manifest {
    /// Read and validate the manifest of the bundle in `bundle_dir`.
    ///
    /// `bundle_dir` should already be absolute; its final component is
    /// compared against the manifest's `name`.
    pub fn read(bundle_dir: &Path, options: &ParseOptions) -> BundleResult<Self> {
        let path = bundle_dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(BundleError::ManifestMissing {
                dir: bundle_dir.to_path_buf(),
                file: MANIFEST_FILE.to_string(),
            });
        }

        let raw = fs::read_to_string(&path)?;
        let manifest = Self::from_json(&raw, &path, options)?;
        manifest.validate_folder_name(bundle_dir)?;

        Ok(manifest)
    }

    /// Parse manifest text; `path` is only used in diagnostics.
    pub fn from_json(raw: &str, path: &Path, options: &ParseOptions) -> BundleResult<Self> {
        let malformed = |reason: String| BundleError::ManifestMalformed {
            path: path.to_path_buf(),
            reason,
        };

        let value: Value = serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))?;
        if !value.is_object() {
            return Err(malformed("expected a JSON object".to_string()));
        }

        let framework = match value.get(&options.framework_key) {
            Some(Value::Object(framework)) => framework.clone(),
            _ => {
                return Err(BundleError::ManifestIncompatible {
                    path: path.to_path_buf(),
                    key: options.framework_key.clone(),
                });
            }
        };

        let Some(name) = value.get("name").and_then(Value::as_str) else {
            return Err(malformed("\"name\" must be a string".to_string()));
        };
        let name = name.to_string();

        let compatible_range = parse_compatible_range(&name, &framework, options)?;
        let bundle_dependencies = parse_bundle_dependencies(&name, &framework, path, options)?;
        let enable_custom_cues = framework
            .get("enableCustomCues")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Ok(Self {
            name,
            version: string_field(&value, "version"),
            description: string_field(&value, "description"),
            homepage: string_field(&value, "homepage"),
            author: value.get("author").and_then(person),
            contributors: value
                .get("contributors")
                .and_then(Value::as_array)
                .map(|people| people.iter().filter_map(person).collect())
                .unwrap_or_default(),
            license: license(value.get("license")),
            dependencies: dependencies(value.get("dependencies")),
            compatible_range,
            bundle_dependencies,
            enable_custom_cues,
            framework,
            raw: raw.to_string(),
        })
    }

    /// Look up a property of the framework sub-object.
    #[must_use]
    pub fn framework_property(&self, property: &str) -> Option<&Value> {
        self.framework.get(property)
    }

    fn validate_folder_name(&self, bundle_dir: &Path) -> BundleResult<()> {
        let folder = bundle_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        if folder != self.name {
            return Err(BundleError::NameMismatch {
                bundle: self.name.clone(),
                folder,
            });
        }

        Ok(())
    }
}

/// npm fields are passed through; a mistyped one is dropped rather than fatal.
fn string_field(package: &Value, field: &str) -> Option<String> {
    package.get(field).and_then(Value::as_str).map(str::to_string)
}

fn person(value: &Value) -> Option<Person> {
    serde_json::from_value(value.clone()).ok()
}

/// SPDX string, or the `type` of the legacy `{ "type", "url" }` object.
fn license(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(license) => Some(license.clone()),
        Value::Object(legacy) => legacy.get("type").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

fn dependencies(value: Option<&Value>) -> BTreeMap<String, String> {
    value
        .and_then(Value::as_object)
        .map(|deps| {
            deps.iter()
                .filter_map(|(name, range)| Some((name.clone(), range.as_str()?.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

fn parse_compatible_range(
    bundle: &str,
    framework: &Map<String, Value>,
    options: &ParseOptions,
) -> BundleResult<CompatibleRange> {
    let invalid = |reason: String| BundleError::InvalidCompatibilityRange {
        bundle: bundle.to_string(),
        key: options.framework_key.clone(),
        reason,
    };

    match framework.get("compatibleRange") {
        Some(Value::String(raw)) => CompatibleRange::parse(raw).map_err(invalid),
        Some(other) => Err(invalid(format!("expected a string, got {other}"))),
        None => Err(invalid("property is missing".to_string())),
    }
}

fn parse_bundle_dependencies(
    bundle: &str,
    framework: &Map<String, Value>,
    path: &Path,
    options: &ParseOptions,
) -> BundleResult<BTreeMap<String, CompatibleRange>> {
    let Some(declared) = framework.get("bundleDependencies") else {
        return Ok(BTreeMap::new());
    };

    let Some(declared) = declared.as_object() else {
        return Err(BundleError::ManifestMalformed {
            path: path.to_path_buf(),
            reason: format!(
                "{} must be an object of bundle names to version ranges",
                options.property_path("bundleDependencies")
            ),
        });
    };

    declared
        .iter()
        .map(|(dependency, range)| {
            let invalid = |reason: String| BundleError::InvalidBundleDependency {
                bundle: bundle.to_string(),
                dependency: dependency.clone(),
                reason,
            };
            let raw = range
                .as_str()
                .ok_or_else(|| invalid(format!("expected a string, got {range}")))?;
            let range = CompatibleRange::parse(raw).map_err(invalid)?;
            Ok((dependency.clone(), range))
        })
        .collect()
}
