//! Bundle parsing and validation for NodeCG
//!
//! This crate loads a bundle from its directory, validates the declarations in
//! its `package.json` against the files on disk, and produces an immutable
//! [`BundleDescriptor`] for the host framework.
//!
//! # Bundle Structure
//!
//! ```text
//! my-bundle/
//! ├── package.json              # manifest, with a "nodecg" sub-object
//! ├── configschema.json         # optional JSON Schema for the bundle config
//! ├── dashboard/
//! │   └── panel.html            # one file per declared dashboard panel
//! ├── graphics/
//! │   └── index.html            # one file per declared graphic
//! └── extension.js              # or extension/, never both
//! ```
//!
//! # Example
//!
//! ```no_run
//! use nodecg_bundle::BundleLoader;
//! use std::path::Path;
//!
//! let config = Path::new("cfg/my-bundle.json");
//! let bundle = BundleLoader::default().load("bundles/my-bundle", Some(config))?;
//!
//! println!("{} v{}", bundle.name(), bundle.version().unwrap_or("0.0.0"));
//! for panel in bundle.dashboard().panels() {
//!     println!("panel {} ({})", panel.name, panel.file);
//! }
//! # Ok::<(), nodecg_bundle::BundleError>(())
//! ```

mod defaults;
mod descriptor;
mod error;
mod html;
mod options;
mod range;

pub mod config;
pub mod extension;
pub mod graphics;
pub mod lists;
pub mod loader;
pub mod manifest;
pub mod panels;

pub use defaults::{deep_merge, schema_defaults};
pub use descriptor::{BundleDescriptor, Category, Dashboard, Graphic, Panel, SoundCue};
pub use error::{BundleError, ErrorKind, SchemaViolation};
pub use loader::{BundleLoader, parse_bundle};
pub use manifest::{Manifest, Person};
pub use options::ParseOptions;
pub use range::CompatibleRange;

/// Result type for bundle operations.
pub type BundleResult<T> = Result<T, BundleError>;

/// Manifest file name within the bundle.
pub const MANIFEST_FILE: &str = "package.json";

/// Directory holding dashboard panel fragments.
pub const DASHBOARD_DIR: &str = "dashboard";

/// Directory holding graphic assets.
pub const GRAPHICS_DIR: &str = "graphics";

/// Single-file form of a bundle extension.
pub const EXTENSION_FILE: &str = "extension.js";

/// Directory form of a bundle extension.
pub const EXTENSION_DIR: &str = "extension";

/// Category name reserved for the framework's own sound uploads.
pub const RESERVED_CATEGORY_NAME: &str = "sounds";
