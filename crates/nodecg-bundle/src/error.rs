//! Error types for bundle operations.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of a [`BundleError`].
///
/// Every failure is terminal for the load that raised it; the kind only tells
/// the bundle author what sort of fix is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bundle metadata is missing, unparsable or inconsistent with its folder.
    Structural,
    /// A declaration and the on-disk layout disagree, or a list entry is incomplete.
    DeclarativeInconsistency,
    /// A declared file does not exist or cannot be read.
    Referential,
    /// The config failed schema validation, or a reserved name was used.
    SemanticValidation,
}

/// A single diagnostic reported by the JSON Schema validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON pointer to the offending value in the config ("" for the root).
    pub instance_path: String,
    /// Validator message, verbatim.
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  - {}", self.message)
        } else {
            write!(f, "  - {}: {}", self.instance_path, self.message)
        }
    }
}

/// Errors that can occur while loading a bundle.
#[derive(Debug, Error)]
pub enum BundleError {
    /// I/O error outside of any declared file lookup.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bundle directory has no manifest.
    #[error("Bundle at path {} does not contain a {file}!", .dir.display())]
    ManifestMissing { dir: PathBuf, file: String },

    /// The manifest could not be parsed.
    #[error("{} is not a valid package.json: {reason}", .path.display())]
    ManifestMalformed { path: PathBuf, reason: String },

    /// The manifest lacks the framework sub-object.
    #[error("{} lacks a \"{key}\" property, and therefore cannot be parsed", .path.display())]
    ManifestIncompatible { path: PathBuf, key: String },

    /// The framework compatibility range is missing or unparsable.
    #[error("{bundle} does not have a valid \"{key}.compatibleRange\" property: {reason}")]
    InvalidCompatibilityRange {
        bundle: String,
        key: String,
        reason: String,
    },

    /// A declared bundle dependency has an unparsable version range.
    #[error("{bundle}'s bundle dependency \"{dependency}\" has an invalid version range: {reason}")]
    InvalidBundleDependency {
        bundle: String,
        dependency: String,
        reason: String,
    },

    /// The bundle's folder name differs from its manifest name.
    #[error(
        "Bundle \"{bundle}\" lives in a folder named \"{folder}\". Please rename it to \"{bundle}\"."
    )]
    NameMismatch { bundle: String, folder: String },

    /// The caller-supplied config file does not exist.
    #[error("bundleCfgPath \"{}\" does not exist", .path.display())]
    ConfigFileMissing { path: PathBuf },

    /// The config file could not be parsed.
    #[error(
        "bundleCfgPath \"{}\" could not be read. Ensure that it is valid JSON. ({reason})",
        .path.display()
    )]
    ConfigMalformed { path: PathBuf, reason: String },

    /// The bundle's config schema could not be parsed or compiled.
    #[error(
        "{} for bundle {bundle} could not be read. Ensure that it is a valid JSON Schema. ({reason})",
        .path.display()
    )]
    SchemaMalformed {
        bundle: String,
        path: PathBuf,
        reason: String,
    },

    /// The config does not satisfy the bundle's schema.
    #[error(
        "{bundle}'s config (from {}) is invalid:\n{}",
        .path.display(),
        join_lines(.violations)
    )]
    ConfigInvalid {
        bundle: String,
        path: PathBuf,
        violations: Vec<SchemaViolation>,
    },

    /// A `dashboard` folder exists but no panels are declared.
    #[error(
        "{bundle} has a \"dashboard\" folder, but no \"{key}.dashboardPanels\" property was found in its package.json"
    )]
    DashboardFolderWithoutDeclaration { bundle: String, key: String },

    /// Panels are declared but there is no `dashboard` folder.
    #[error(
        "{bundle} has a \"{key}.dashboardPanels\" property in its package.json, but no \"dashboard\" folder"
    )]
    DeclarationWithoutDashboardFolder { bundle: String, key: String },

    /// A panel entry lacks required properties.
    #[error(
        "Panel #{index} in bundle {bundle} could not be parsed as it is missing the following properties: {}",
        .missing.join(", ")
    )]
    PanelMissingProperties {
        bundle: String,
        index: usize,
        missing: Vec<&'static str>,
    },

    /// A panel property is present but has the wrong type or value.
    #[error("Panel #{index} in bundle {bundle} has an invalid \"{property}\": expected {expected}")]
    PanelInvalidProperty {
        bundle: String,
        index: usize,
        property: &'static str,
        expected: &'static str,
    },

    /// Two panels share a name.
    #[error("Panel #{index} ({name}) has the same name as another panel in {bundle}.")]
    DuplicatePanelName {
        bundle: String,
        index: usize,
        name: String,
    },

    /// A panel's file is missing or unreadable.
    #[error("Panel \"{panel}\" in bundle \"{bundle}\" points to {}, which does not exist or cannot be read: {reason}", .path.display())]
    PanelFileNotFound {
        bundle: String,
        panel: String,
        path: PathBuf,
        reason: String,
    },

    /// A panel's HTML has no `<head>`.
    #[error(
        "Panel \"{file}\" in bundle \"{bundle}\" has no <head>, and therefore cannot have scripts injected. Add a <head> tag to it."
    )]
    PanelMissingHead { bundle: String, file: String },

    /// A panel's HTML has no doctype.
    #[error(
        "Panel \"{file}\" in bundle \"{bundle}\" has no DOCTYPE, panel resizing will not work. Add <!DOCTYPE html> to it."
    )]
    PanelMissingDoctype { bundle: String, file: String },

    /// A panel's HTML could not be processed.
    #[error("Panel \"{file}\" in bundle \"{bundle}\" could not be processed: {reason}")]
    PanelHtml {
        bundle: String,
        file: String,
        reason: String,
    },

    /// A `graphics` folder exists but no graphics are declared.
    #[error(
        "{bundle} has a \"graphics\" folder, but no \"{key}.graphics\" property was found in its package.json"
    )]
    GraphicsFolderWithoutDeclaration { bundle: String, key: String },

    /// Graphics are declared but there is no `graphics` folder.
    #[error(
        "{bundle} has a \"{key}.graphics\" property in its package.json, but no \"graphics\" folder"
    )]
    DeclarationWithoutGraphicsFolder { bundle: String, key: String },

    /// A graphic entry lacks required properties.
    #[error(
        "Graphic #{index} in bundle {bundle} could not be parsed as it is missing the following properties: {}",
        .missing.join(", ")
    )]
    GraphicMissingProperties {
        bundle: String,
        index: usize,
        missing: Vec<&'static str>,
    },

    /// A graphic property is present but has the wrong type or value.
    #[error("Graphic #{index} in bundle {bundle} has an invalid \"{property}\": expected {expected}")]
    GraphicInvalidProperty {
        bundle: String,
        index: usize,
        property: &'static str,
        expected: &'static str,
    },

    /// Two graphics share a file.
    #[error("Graphic #{index} ({file}) has the same file as another graphic in {bundle}")]
    DuplicateGraphicFile {
        bundle: String,
        index: usize,
        file: String,
    },

    /// A graphic's file is missing or unreadable.
    #[error("Graphic \"{file}\" in bundle \"{bundle}\" points to {}, which does not exist or cannot be read: {reason}", .path.display())]
    GraphicFileNotFound {
        bundle: String,
        file: String,
        path: PathBuf,
        reason: String,
    },

    /// A declared manifest property is not an array.
    #[error("{bundle}'s {property} is not an Array")]
    PropertyNotArray { bundle: String, property: String },

    /// A list entry has no string `name`.
    #[error("{property}[{index}] in bundle {bundle} lacks a \"name\" property")]
    EntryMissingName {
        bundle: String,
        property: String,
        index: usize,
    },

    /// A list entry has no string `title`.
    #[error("{property}[{index}] in bundle {bundle} lacks a \"title\" property")]
    EntryMissingTitle {
        bundle: String,
        property: String,
        index: usize,
    },

    /// A list entry uses a reserved name.
    #[error(
        "\"{reserved}\" is a reserved {entity} name. Please change {property}[{index}].name in bundle {bundle}"
    )]
    ReservedName {
        bundle: String,
        property: String,
        entity: &'static str,
        index: usize,
        reserved: &'static str,
    },

    /// Two entries of a uniquely-named list share a name.
    #[error("{property}[{index}] ({name}) has the same name as another entry in bundle {bundle}")]
    DuplicateEntryName {
        bundle: String,
        property: String,
        index: usize,
        name: String,
    },

    /// A list entry's `allowedTypes` is not an array of strings.
    #[error("{property}[{index}].allowedTypes in bundle {bundle} is not an Array")]
    AllowedTypesNotArray {
        bundle: String,
        property: String,
        index: usize,
    },

    /// A list entry field has the wrong type.
    #[error("{property}[{index}].{field} in bundle {bundle} must be {expected}")]
    EntryInvalidField {
        bundle: String,
        property: String,
        index: usize,
        field: &'static str,
        expected: &'static str,
    },

    /// A list entry references a file that does not exist.
    #[error("{property}[{index}].{field} in bundle {bundle} does not exist ({})", .path.display())]
    DefaultFileNotFound {
        bundle: String,
        property: String,
        index: usize,
        field: &'static str,
        path: PathBuf,
    },

    /// Something named `extension` exists but is not a usable extension.
    #[error(
        "{bundle} has an illegal file named \"{name}\" in its root. Either rename it to \"extension.js\", or make a directory named \"extension\""
    )]
    IllegalExtensionLayout { bundle: String, name: &'static str },

    /// Both `extension.js` and `extension/` exist.
    #[error(
        "{bundle} has both \"extension.js\" and a folder named \"extension\". There can only be one of these, not both."
    )]
    ConflictingExtensionLayout { bundle: String },
}

impl BundleError {
    /// Classify this error into one of the four failure kinds.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            BundleError::Io(_)
            | BundleError::ManifestMissing { .. }
            | BundleError::ManifestMalformed { .. }
            | BundleError::ManifestIncompatible { .. }
            | BundleError::InvalidCompatibilityRange { .. }
            | BundleError::InvalidBundleDependency { .. }
            | BundleError::NameMismatch { .. }
            | BundleError::ConfigMalformed { .. }
            | BundleError::SchemaMalformed { .. }
            | BundleError::PanelMissingHead { .. }
            | BundleError::PanelMissingDoctype { .. }
            | BundleError::PanelHtml { .. }
            | BundleError::IllegalExtensionLayout { .. }
            | BundleError::ConflictingExtensionLayout { .. } => ErrorKind::Structural,

            BundleError::DashboardFolderWithoutDeclaration { .. }
            | BundleError::DeclarationWithoutDashboardFolder { .. }
            | BundleError::PanelMissingProperties { .. }
            | BundleError::PanelInvalidProperty { .. }
            | BundleError::DuplicatePanelName { .. }
            | BundleError::GraphicsFolderWithoutDeclaration { .. }
            | BundleError::DeclarationWithoutGraphicsFolder { .. }
            | BundleError::GraphicMissingProperties { .. }
            | BundleError::GraphicInvalidProperty { .. }
            | BundleError::DuplicateGraphicFile { .. }
            | BundleError::PropertyNotArray { .. }
            | BundleError::EntryMissingName { .. }
            | BundleError::EntryMissingTitle { .. }
            | BundleError::DuplicateEntryName { .. }
            | BundleError::AllowedTypesNotArray { .. }
            | BundleError::EntryInvalidField { .. } => ErrorKind::DeclarativeInconsistency,

            BundleError::ConfigFileMissing { .. }
            | BundleError::PanelFileNotFound { .. }
            | BundleError::GraphicFileNotFound { .. }
            | BundleError::DefaultFileNotFound { .. } => ErrorKind::Referential,

            BundleError::ConfigInvalid { .. } | BundleError::ReservedName { .. } => {
                ErrorKind::SemanticValidation
            }
        }
    }
}

fn join_lines(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "error/error_tests.rs"]
mod error_tests;
