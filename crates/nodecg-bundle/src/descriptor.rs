//! The fully resolved bundle handed to the host framework.

use crate::{CompatibleRange, Manifest, Person};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A successfully loaded bundle.
///
/// Built in one go by [`BundleLoader`](crate::BundleLoader); there is no way
/// to obtain a partially validated descriptor, and its contents are only
/// reachable through shared references.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleDescriptor {
    #[serde(flatten)]
    manifest: Manifest,
    #[serde(rename = "rawManifest")]
    raw_manifest: String,
    dir: PathBuf,
    config: Value,
    dashboard: Dashboard,
    graphics: Vec<Graphic>,
    sound_cues: Vec<SoundCue>,
    upload_categories: Vec<Category>,
    asset_categories: Vec<Category>,
    has_extension: bool,
}

/// Parts the loader assembles a descriptor from.
pub(crate) struct DescriptorParts {
    pub manifest: Manifest,
    pub dir: PathBuf,
    pub config: Value,
    pub dashboard: Dashboard,
    pub graphics: Vec<Graphic>,
    pub sound_cues: Vec<SoundCue>,
    pub upload_categories: Vec<Category>,
    pub asset_categories: Vec<Category>,
    pub has_extension: bool,
}

impl BundleDescriptor {
    pub(crate) fn new(parts: DescriptorParts) -> Self {
        Self {
            raw_manifest: parts.manifest.raw.clone(),
            manifest: parts.manifest,
            dir: parts.dir,
            config: parts.config,
            dashboard: parts.dashboard,
            graphics: parts.graphics,
            sound_cues: parts.sound_cues,
            upload_categories: parts.upload_categories,
            asset_categories: parts.asset_categories,
            has_extension: parts.has_extension,
        }
    }

    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    pub fn version(&self) -> Option<&str> {
        self.manifest.version.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.manifest.description.as_deref()
    }

    pub fn homepage(&self) -> Option<&str> {
        self.manifest.homepage.as_deref()
    }

    pub fn author(&self) -> Option<&Person> {
        self.manifest.author.as_ref()
    }

    pub fn contributors(&self) -> &[Person] {
        &self.manifest.contributors
    }

    pub fn license(&self) -> Option<&str> {
        self.manifest.license.as_deref()
    }

    pub fn dependencies(&self) -> &BTreeMap<String, String> {
        &self.manifest.dependencies
    }

    pub fn compatible_range(&self) -> &CompatibleRange {
        &self.manifest.compatible_range
    }

    pub fn bundle_dependencies(&self) -> &BTreeMap<String, CompatibleRange> {
        &self.manifest.bundle_dependencies
    }

    pub fn enable_custom_cues(&self) -> bool {
        self.manifest.enable_custom_cues
    }

    /// The framework sub-object of the manifest, untouched.
    pub fn framework(&self) -> &Map<String, Value> {
        &self.manifest.framework
    }

    /// The manifest file's text, verbatim.
    pub fn raw_manifest(&self) -> &str {
        &self.raw_manifest
    }

    /// Absolute path of the bundle directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The resolved bundle config.
    pub fn config(&self) -> &Value {
        &self.config
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn graphics(&self) -> &[Graphic] {
        &self.graphics
    }

    pub fn sound_cues(&self) -> &[SoundCue] {
        &self.sound_cues
    }

    pub fn upload_categories(&self) -> &[Category] {
        &self.upload_categories
    }

    pub fn asset_categories(&self) -> &[Category] {
        &self.asset_categories
    }

    /// Whether the bundle ships `extension.js` or an `extension/` directory.
    pub fn has_extension(&self) -> bool {
        self.has_extension
    }
}

/// The dashboard directory and its panels, in declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub(crate) dir: PathBuf,
    pub(crate) panels: Vec<Panel>,
}

impl Dashboard {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Find a panel by name.
    pub fn panel(&self, name: &str) -> Option<&Panel> {
        self.panels.iter().find(|panel| panel.name == name)
    }
}

/// A dashboard panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    /// Unique within the bundle.
    pub name: String,
    pub title: String,
    /// Path relative to the dashboard directory.
    pub file: String,
    /// Absolute path of the panel's file.
    pub path: PathBuf,
    /// Width in dashboard columns.
    pub width: u32,
    pub dialog: bool,
    pub header_color: String,
    /// The panel's HTML, with the dialog heading injected when `dialog` is set.
    pub html: String,
}

/// A broadcast graphic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Graphic {
    /// Path relative to the graphics directory; unique within the bundle.
    pub file: String,
    /// Pixels, as declared; fractional sizes are kept.
    pub width: f64,
    pub height: f64,
    /// `/graphics/{bundle}/{file}`
    pub url: String,
}

/// A sound cue operators can trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundCue {
    pub name: String,
    /// Whether operators may assign a different file to the cue.
    pub assignable: bool,
    /// Always within 0..=100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_volume: Option<u8>,
    /// Path relative to the bundle directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_types: Option<Vec<String>>,
}

/// An upload or asset category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    pub title: String,
    /// File extensions accepted in this category; `None` accepts anything.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_types: Option<Vec<String>>,
}
