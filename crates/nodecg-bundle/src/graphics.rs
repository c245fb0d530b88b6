//! Graphic validation.

use crate::{BundleError, BundleResult, Graphic, Manifest, ParseOptions};
use serde_json::Value;
use std::fs::File;
use std::path::Path;

const PROPERTY: &str = "graphics";

/// Validate the bundle's declared graphics against `graphics_dir`.
///
/// Graphics are plain assets; their contents are only checked for
/// readability.
pub fn parse_graphics(
    graphics_dir: &Path,
    manifest: &Manifest,
    options: &ParseOptions,
) -> BundleResult<Vec<Graphic>> {
    let declared = match (graphics_dir.exists(), manifest.framework_property(PROPERTY)) {
        (true, Some(declared)) => declared,
        (true, None) => {
            return Err(BundleError::GraphicsFolderWithoutDeclaration {
                bundle: manifest.name.clone(),
                key: options.framework_key.clone(),
            });
        }
        (false, Some(_)) => {
            return Err(BundleError::DeclarationWithoutGraphicsFolder {
                bundle: manifest.name.clone(),
                key: options.framework_key.clone(),
            });
        }
        (false, None) => return Ok(Vec::new()),
    };

    let entries = declared
        .as_array()
        .ok_or_else(|| BundleError::PropertyNotArray {
            bundle: manifest.name.clone(),
            property: options.property_path(PROPERTY),
        })?;

    let mut graphics: Vec<Graphic> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let graphic = parse_graphic(index, entry, &manifest.name, graphics_dir, &graphics)?;
        graphics.push(graphic);
    }

    tracing::debug!(bundle = %manifest.name, count = graphics.len(), "Parsed graphics");
    Ok(graphics)
}

fn parse_graphic(
    index: usize,
    entry: &Value,
    bundle: &str,
    graphics_dir: &Path,
    accepted: &[Graphic],
) -> BundleResult<Graphic> {
    let missing: Vec<&'static str> = ["file", "width", "height"]
        .into_iter()
        .filter(|property| matches!(entry.get(*property), None | Some(Value::Null)))
        .collect();
    if !missing.is_empty() {
        return Err(BundleError::GraphicMissingProperties {
            bundle: bundle.to_string(),
            index,
            missing,
        });
    }

    let invalid = |property: &'static str, expected: &'static str| {
        BundleError::GraphicInvalidProperty {
            bundle: bundle.to_string(),
            index,
            property,
            expected,
        }
    };
    let dimension = |property: &'static str| {
        entry
            .get(property)
            .and_then(Value::as_f64)
            .filter(|n| n.is_finite() && *n >= 0.0)
            .ok_or_else(|| invalid(property, "a non-negative number"))
    };

    let file = entry
        .get("file")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("file", "a string"))?
        .to_string();
    let width = dimension("width")?;
    let height = dimension("height")?;

    if accepted.iter().any(|graphic| graphic.file == file) {
        return Err(BundleError::DuplicateGraphicFile {
            bundle: bundle.to_string(),
            index,
            file,
        });
    }

    let path = graphics_dir.join(&file);
    let readable = File::open(&path).and_then(|f| {
        if f.metadata()?.is_file() {
            Ok(())
        } else {
            Err(std::io::Error::other("not a file"))
        }
    });
    if let Err(e) = readable {
        return Err(BundleError::GraphicFileNotFound {
            bundle: bundle.to_string(),
            file,
            path,
            reason: e.to_string(),
        });
    }

    Ok(Graphic {
        url: format!("/graphics/{bundle}/{file}"),
        file,
        width,
        height,
    })
}
