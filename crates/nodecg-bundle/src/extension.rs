//! Extension layout probing.
//!
//! A bundle may ship server-side code either as a single `extension.js` or as
//! an `extension/` directory (entered through its own `index.js`). Anything
//! else using one of those names is rejected.

use crate::{BundleError, BundleResult, EXTENSION_DIR, EXTENSION_FILE};
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

/// Report whether the bundle in `bundle_dir` has an extension.
///
/// Entries are inspected without following symlinks, so a link named
/// `extension` is treated as a file regardless of its target.
pub fn probe_extension(bundle_dir: &Path, bundle: &str) -> BundleResult<bool> {
    let file = entry_metadata(&bundle_dir.join(EXTENSION_FILE))?;
    let dir = entry_metadata(&bundle_dir.join(EXTENSION_DIR))?;

    if dir.as_ref().is_some_and(|meta| !meta.is_dir()) {
        return Err(BundleError::IllegalExtensionLayout {
            bundle: bundle.to_string(),
            name: EXTENSION_DIR,
        });
    }

    if file.as_ref().is_some_and(Metadata::is_dir) {
        return Err(BundleError::IllegalExtensionLayout {
            bundle: bundle.to_string(),
            name: EXTENSION_FILE,
        });
    }

    let has_extension = match (file, dir) {
        (Some(_), Some(_)) => {
            return Err(BundleError::ConflictingExtensionLayout {
                bundle: bundle.to_string(),
            });
        }
        (Some(_), None) | (None, Some(_)) => true,
        (None, None) => false,
    };

    tracing::debug!(bundle, has_extension, "Probed extension layout");
    Ok(has_extension)
}

fn entry_metadata(path: &Path) -> BundleResult<Option<Metadata>> {
    match fs::symlink_metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
