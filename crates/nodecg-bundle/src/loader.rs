//! Bundle loading.
//!
//! The [`BundleLoader`] runs every validator over one bundle directory and
//! assembles the resulting [`BundleDescriptor`].

use crate::config::ConfigResolver;
use crate::descriptor::DescriptorParts;
use crate::extension::probe_extension;
use crate::graphics::parse_graphics;
use crate::lists::{parse_asset_categories, parse_sound_cues, parse_upload_categories};
use crate::panels::parse_dashboard;
use crate::{
    BundleDescriptor, BundleError, BundleResult, DASHBOARD_DIR, GRAPHICS_DIR, MANIFEST_FILE,
    Manifest, ParseOptions,
};
use std::fs;
use std::path::Path;

/// Loader for bundle directories.
///
/// A loader holds no state between calls, so one instance can be shared by
/// any number of threads loading different bundles.
///
/// # Example
///
/// ```no_run
/// use nodecg_bundle::{BundleLoader, ParseOptions};
///
/// let loader = BundleLoader::new(ParseOptions::default());
/// let bundle = loader.load("bundles/my-bundle", None)?;
///
/// for graphic in bundle.graphics() {
///     println!("{} ({}x{})", graphic.url, graphic.width, graphic.height);
/// }
/// # Ok::<(), nodecg_bundle::BundleError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct BundleLoader {
    options: ParseOptions,
}

impl BundleLoader {
    /// Create a loader with the given options.
    #[must_use]
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Get the loader's options.
    #[must_use]
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Load and validate the bundle in `bundle_dir`.
    ///
    /// `config_path` is the host-supplied config file for this bundle. Without
    /// one, the config is built from the bundle's schema defaults.
    pub fn load(
        &self,
        bundle_dir: impl AsRef<Path>,
        config_path: Option<&Path>,
    ) -> BundleResult<BundleDescriptor> {
        let bundle_dir = bundle_dir.as_ref();
        if !bundle_dir.join(MANIFEST_FILE).is_file() {
            return Err(BundleError::ManifestMissing {
                dir: bundle_dir.to_path_buf(),
                file: MANIFEST_FILE.to_string(),
            });
        }
        let dir = fs::canonicalize(bundle_dir)?;

        let manifest = Manifest::read(&dir, &self.options)?;
        tracing::debug!(bundle = %manifest.name, dir = %dir.display(), "Read manifest");

        let resolver = ConfigResolver::new(&manifest.name, &dir, &self.options);
        let config = match config_path {
            Some(config_path) => resolver.resolve_with_file(config_path)?,
            None => resolver.resolve_defaults()?,
        };

        let dashboard = parse_dashboard(&dir.join(DASHBOARD_DIR), &manifest, &self.options)?;
        let graphics = parse_graphics(&dir.join(GRAPHICS_DIR), &manifest, &self.options)?;
        let sound_cues = parse_sound_cues(&manifest, &dir, &self.options)?;
        let upload_categories = parse_upload_categories(&manifest, &dir, &self.options)?;
        let asset_categories = parse_asset_categories(&manifest, &dir, &self.options)?;
        let has_extension = probe_extension(&dir, &manifest.name)?;

        tracing::info!(
            bundle = %manifest.name,
            version = manifest.version.as_deref().unwrap_or("unversioned"),
            panels = dashboard.panels().len(),
            graphics = graphics.len(),
            has_extension,
            "Loaded bundle"
        );

        Ok(BundleDescriptor::new(DescriptorParts {
            manifest,
            dir,
            config,
            dashboard,
            graphics,
            sound_cues,
            upload_categories,
            asset_categories,
            has_extension,
        }))
    }
}

/// Load the bundle in `bundle_dir` with default options.
pub fn parse_bundle(
    bundle_dir: impl AsRef<Path>,
    config_path: Option<&Path>,
) -> BundleResult<BundleDescriptor> {
    BundleLoader::default().load(bundle_dir, config_path)
}

#[cfg(test)]
#[path = "loader/loader_tests.rs"]
mod loader_tests;
