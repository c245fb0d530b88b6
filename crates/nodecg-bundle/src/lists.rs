//! Validation of the named lists in the framework sub-object.
//!
//! Sound cues, upload categories and asset categories share one shape: an
//! array of objects with a `name`, an optional `allowedTypes` array, and a
//! few kind-specific fields. Each kind is described by a [`ListSpec`] and run
//! through the same validator.

use crate::{
    BundleError, BundleResult, Category, Manifest, ParseOptions, RESERVED_CATEGORY_NAME, SoundCue,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// A boolean field and the value it takes when omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagDefault {
    pub field: &'static str,
    pub default: bool,
}

/// A numeric field silently clamped into `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clamp {
    pub field: &'static str,
    pub min: i64,
    pub max: i64,
}

/// How one manifest list is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSpec {
    /// Property name inside the framework sub-object.
    pub property: &'static str,
    /// Singular name used in diagnostics.
    pub entity: &'static str,
    /// Whether every entry needs a string `title`.
    pub require_title: bool,
    /// Names entries may not use, compared case-insensitively.
    pub reserved_names: &'static [&'static str],
    /// Whether entry names must be unique within the list.
    pub unique_names: bool,
    pub flags: &'static [FlagDefault],
    pub clamps: &'static [Clamp],
    /// Fields holding bundle-relative paths that must exist.
    pub file_refs: &'static [&'static str],
}

/// `{framework}.soundCues`
pub const SOUND_CUES: ListSpec = ListSpec {
    property: "soundCues",
    entity: "soundCue",
    require_title: false,
    reserved_names: &[],
    unique_names: false,
    flags: &[FlagDefault {
        field: "assignable",
        default: true,
    }],
    clamps: &[Clamp {
        field: "defaultVolume",
        min: 0,
        max: 100,
    }],
    file_refs: &["defaultFile"],
};

/// `{framework}.uploadCategories`
pub const UPLOAD_CATEGORIES: ListSpec = ListSpec {
    property: "uploadCategories",
    entity: "uploadCategory",
    require_title: true,
    reserved_names: &[RESERVED_CATEGORY_NAME],
    unique_names: true,
    flags: &[],
    clamps: &[],
    file_refs: &[],
};

/// `{framework}.assetCategories`
pub const ASSET_CATEGORIES: ListSpec = ListSpec {
    property: "assetCategories",
    entity: "assetCategory",
    require_title: true,
    reserved_names: &[RESERVED_CATEGORY_NAME],
    unique_names: true,
    flags: &[],
    clamps: &[],
    file_refs: &[],
};

/// One validated list entry, before conversion to its typed form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub title: Option<String>,
    pub allowed_types: Option<Vec<String>>,
    /// Every field of [`ListSpec::flags`], defaulted.
    pub flags: BTreeMap<&'static str, bool>,
    /// Clamped values of the [`ListSpec::clamps`] fields that were present.
    pub numbers: BTreeMap<&'static str, i64>,
    /// The [`ListSpec::file_refs`] fields that were present, as declared.
    pub files: BTreeMap<&'static str, String>,
}

/// Validate the list described by `spec` in the bundle's manifest.
///
/// An absent (or `null`) property is an empty list.
pub fn validate_list(
    spec: &ListSpec,
    manifest: &Manifest,
    bundle_dir: &Path,
    options: &ParseOptions,
) -> BundleResult<Vec<ListEntry>> {
    let validator = ListValidator {
        spec,
        bundle: &manifest.name,
        bundle_dir,
        property: options.property_path(spec.property),
    };

    let entries = match manifest.framework_property(spec.property) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(BundleError::PropertyNotArray {
                bundle: manifest.name.clone(),
                property: validator.property,
            });
        }
    };

    let mut accepted: Vec<ListEntry> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let entry = validator.validate(index, entry, &accepted)?;
        accepted.push(entry);
    }

    tracing::debug!(
        bundle = %manifest.name,
        property = spec.property,
        count = accepted.len(),
        "Parsed list property"
    );
    Ok(accepted)
}

/// Validate `{framework}.soundCues`.
pub fn parse_sound_cues(
    manifest: &Manifest,
    bundle_dir: &Path,
    options: &ParseOptions,
) -> BundleResult<Vec<SoundCue>> {
    let entries = validate_list(&SOUND_CUES, manifest, bundle_dir, options)?;

    Ok(entries
        .into_iter()
        .map(|mut entry| SoundCue {
            assignable: entry.flags.get("assignable").copied().unwrap_or(true),
            default_volume: entry
                .numbers
                .get("defaultVolume")
                .and_then(|volume| u8::try_from(*volume).ok()),
            default_file: entry.files.remove("defaultFile"),
            allowed_types: entry.allowed_types,
            name: entry.name,
        })
        .collect())
}

/// Validate `{framework}.uploadCategories`.
pub fn parse_upload_categories(
    manifest: &Manifest,
    bundle_dir: &Path,
    options: &ParseOptions,
) -> BundleResult<Vec<Category>> {
    parse_categories(&UPLOAD_CATEGORIES, manifest, bundle_dir, options)
}

/// Validate `{framework}.assetCategories`.
pub fn parse_asset_categories(
    manifest: &Manifest,
    bundle_dir: &Path,
    options: &ParseOptions,
) -> BundleResult<Vec<Category>> {
    parse_categories(&ASSET_CATEGORIES, manifest, bundle_dir, options)
}

fn parse_categories(
    spec: &ListSpec,
    manifest: &Manifest,
    bundle_dir: &Path,
    options: &ParseOptions,
) -> BundleResult<Vec<Category>> {
    let entries = validate_list(spec, manifest, bundle_dir, options)?;

    Ok(entries
        .into_iter()
        .map(|entry| Category {
            name: entry.name,
            title: entry.title.unwrap_or_default(),
            allowed_types: entry.allowed_types,
        })
        .collect())
}

struct ListValidator<'a> {
    spec: &'a ListSpec,
    bundle: &'a str,
    bundle_dir: &'a Path,
    property: String,
}

impl ListValidator<'_> {
    fn validate(
        &self,
        index: usize,
        entry: &Value,
        accepted: &[ListEntry],
    ) -> BundleResult<ListEntry> {
        let Some(name) = entry.get("name").and_then(Value::as_str) else {
            return Err(BundleError::EntryMissingName {
                bundle: self.bundle.to_string(),
                property: self.property.clone(),
                index,
            });
        };

        if let Some(reserved) = self
            .spec
            .reserved_names
            .iter()
            .copied()
            .find(|reserved| name.eq_ignore_ascii_case(reserved))
        {
            return Err(BundleError::ReservedName {
                bundle: self.bundle.to_string(),
                property: self.property.clone(),
                entity: self.spec.entity,
                index,
                reserved,
            });
        }

        if self.spec.unique_names && accepted.iter().any(|other| other.name == name) {
            return Err(BundleError::DuplicateEntryName {
                bundle: self.bundle.to_string(),
                property: self.property.clone(),
                index,
                name: name.to_string(),
            });
        }

        let title = entry.get("title").and_then(Value::as_str).map(str::to_string);
        if self.spec.require_title && title.is_none() {
            return Err(BundleError::EntryMissingTitle {
                bundle: self.bundle.to_string(),
                property: self.property.clone(),
                index,
            });
        }

        Ok(ListEntry {
            name: name.to_string(),
            title,
            allowed_types: self.allowed_types(index, entry.get("allowedTypes"))?,
            flags: self.flags(index, entry)?,
            numbers: self.numbers(index, entry)?,
            files: self.files(index, entry)?,
        })
    }

    fn allowed_types(
        &self,
        index: usize,
        value: Option<&Value>,
    ) -> BundleResult<Option<Vec<String>>> {
        let items = match value {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(BundleError::AllowedTypesNotArray {
                    bundle: self.bundle.to_string(),
                    property: self.property.clone(),
                    index,
                });
            }
        };

        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.invalid(index, "allowedTypes", "an array of strings"))
            })
            .collect::<BundleResult<Vec<_>>>()
            .map(Some)
    }

    fn flags(&self, index: usize, entry: &Value) -> BundleResult<BTreeMap<&'static str, bool>> {
        self.spec
            .flags
            .iter()
            .map(|flag| match entry.get(flag.field) {
                None | Some(Value::Null) => Ok((flag.field, flag.default)),
                Some(Value::Bool(value)) => Ok((flag.field, *value)),
                Some(_) => Err(self.invalid(index, flag.field, "a boolean")),
            })
            .collect()
    }

    fn numbers(&self, index: usize, entry: &Value) -> BundleResult<BTreeMap<&'static str, i64>> {
        let mut numbers = BTreeMap::new();

        for clamp in self.spec.clamps {
            let declared = match entry.get(clamp.field) {
                None | Some(Value::Null) => continue,
                Some(value) => value
                    .as_f64()
                    .ok_or_else(|| self.invalid(index, clamp.field, "a number"))?,
            };

            let clamped = clamp_to(declared, clamp.min, clamp.max);
            if was_clamped(declared, clamped) {
                tracing::warn!(
                    bundle = self.bundle,
                    property = %self.property,
                    index,
                    field = clamp.field,
                    declared,
                    clamped,
                    "Clamped out-of-range value"
                );
            }
            numbers.insert(clamp.field, clamped);
        }

        Ok(numbers)
    }

    fn files(&self, index: usize, entry: &Value) -> BundleResult<BTreeMap<&'static str, String>> {
        let mut files = BTreeMap::new();

        for &field in self.spec.file_refs {
            let declared = match entry.get(field) {
                None | Some(Value::Null) => continue,
                Some(Value::String(path)) => path,
                Some(_) => return Err(self.invalid(index, field, "a string")),
            };

            let resolved = self.bundle_dir.join(declared);
            if !resolved.exists() {
                return Err(BundleError::DefaultFileNotFound {
                    bundle: self.bundle.to_string(),
                    property: self.property.clone(),
                    index,
                    field,
                    path: resolved,
                });
            }
            files.insert(field, declared.clone());
        }

        Ok(files)
    }

    fn invalid(&self, index: usize, field: &'static str, expected: &'static str) -> BundleError {
        BundleError::EntryInvalidField {
            bundle: self.bundle.to_string(),
            property: self.property.clone(),
            index,
            field,
            expected,
        }
    }
}

/// Whether clamping moved `declared` beyond what rounding alone would.
pub(crate) fn was_clamped(declared: f64, clamped: i64) -> bool {
    declared.round() != clamped as f64
}

/// Round to the nearest integer and clamp into `min..=max`.
pub(crate) fn clamp_to(value: f64, min: i64, max: i64) -> i64 {
    if value.is_nan() {
        return min;
    }
    let rounded = value.round();
    if rounded <= min as f64 {
        min
    } else if rounded >= max as f64 {
        max
    } else {
        rounded as i64
    }
}
