//! Dashboard panel validation.
//!
//! Panels are declared in `{framework}.dashboardPanels` and backed by HTML
//! files in the bundle's `dashboard/` directory. The declaration and the
//! directory must both exist or both be absent.

use crate::descriptor::Dashboard;
use crate::html::process_panel;
use crate::{BundleError, BundleResult, Manifest, Panel, ParseOptions};
use serde_json::Value;
use std::fs;
use std::path::Path;

const PROPERTY: &str = "dashboardPanels";

/// Validate the bundle's declared panels against `dashboard_dir`.
pub fn parse_dashboard(
    dashboard_dir: &Path,
    manifest: &Manifest,
    options: &ParseOptions,
) -> BundleResult<Dashboard> {
    Ok(Dashboard {
        dir: dashboard_dir.to_path_buf(),
        panels: parse_panels(dashboard_dir, manifest, options)?,
    })
}

/// Validate the bundle's declared panels, returning them in declaration order.
pub fn parse_panels(
    dashboard_dir: &Path,
    manifest: &Manifest,
    options: &ParseOptions,
) -> BundleResult<Vec<Panel>> {
    let declared = manifest.framework_property(PROPERTY);

    let declared = match (dashboard_dir.exists(), declared) {
        (true, Some(declared)) => declared,
        (true, None) => {
            return Err(BundleError::DashboardFolderWithoutDeclaration {
                bundle: manifest.name.clone(),
                key: options.framework_key.clone(),
            });
        }
        (false, Some(_)) => {
            return Err(BundleError::DeclarationWithoutDashboardFolder {
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

    let parser = PanelParser {
        bundle: &manifest.name,
        dashboard_dir,
        options,
    };

    let mut panels: Vec<Panel> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let panel = parser.parse(index, entry, &panels)?;
        panels.push(panel);
    }

    tracing::debug!(bundle = %manifest.name, count = panels.len(), "Parsed dashboard panels");
    Ok(panels)
}

struct PanelParser<'a> {
    bundle: &'a str,
    dashboard_dir: &'a Path,
    options: &'a ParseOptions,
}

impl PanelParser<'_> {
    fn parse(&self, index: usize, entry: &Value, accepted: &[Panel]) -> BundleResult<Panel> {
        let missing: Vec<&'static str> = ["name", "title", "file"]
            .into_iter()
            .filter(|property| is_absent(entry.get(*property)))
            .collect();
        if !missing.is_empty() {
            return Err(BundleError::PanelMissingProperties {
                bundle: self.bundle.to_string(),
                index,
                missing,
            });
        }

        let name = self.string(index, entry, "name")?;
        let title = self.string(index, entry, "title")?;
        let file = self.string(index, entry, "file")?;

        if accepted.iter().any(|panel| panel.name == name) {
            return Err(BundleError::DuplicatePanelName {
                bundle: self.bundle.to_string(),
                index,
                name,
            });
        }

        let width = self.width(index, entry.get("width"))?;
        let dialog = entry.get("dialog").is_some_and(is_truthy);
        let header_color = self.header_color(index, entry.get("headerColor"))?;

        let path = self.dashboard_dir.join(&file);
        let source = fs::read(&path).map_err(|e| BundleError::PanelFileNotFound {
            bundle: self.bundle.to_string(),
            panel: name.clone(),
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let display_file = Path::new(&file)
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.clone());
        let source = String::from_utf8(source).map_err(|e| BundleError::PanelHtml {
            bundle: self.bundle.to_string(),
            file: display_file.clone(),
            reason: e.to_string(),
        })?;

        let document = process_panel(&source, dialog.then_some(title.as_str())).map_err(|e| {
            BundleError::PanelHtml {
                bundle: self.bundle.to_string(),
                file: display_file.clone(),
                reason: e.to_string(),
            }
        })?;

        if !document.has_head {
            return Err(BundleError::PanelMissingHead {
                bundle: self.bundle.to_string(),
                file: display_file,
            });
        }

        if !document.has_doctype {
            return Err(BundleError::PanelMissingDoctype {
                bundle: self.bundle.to_string(),
                file: display_file,
            });
        }

        Ok(Panel {
            name,
            title,
            file,
            path,
            width,
            dialog,
            header_color,
            html: document.html,
        })
    }

    fn string(&self, index: usize, entry: &Value, property: &'static str) -> BundleResult<String> {
        entry
            .get(property)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| self.invalid(index, property, "a string"))
    }

    fn width(&self, index: usize, width: Option<&Value>) -> BundleResult<u32> {
        match width {
            Some(value) if is_truthy(value) => value
                .as_u64()
                .and_then(|w| u32::try_from(w).ok())
                .ok_or_else(|| self.invalid(index, "width", "a positive integer")),
            _ => Ok(1),
        }
    }

    fn header_color(&self, index: usize, color: Option<&Value>) -> BundleResult<String> {
        match color {
            Some(Value::String(color)) if !color.is_empty() => Ok(color.clone()),
            Some(value) if is_truthy(value) => {
                Err(self.invalid(index, "headerColor", "a color string"))
            }
            _ => Ok(self.options.default_header_color.clone()),
        }
    }

    fn invalid(&self, index: usize, property: &'static str, expected: &'static str) -> BundleError {
        BundleError::PanelInvalidProperty {
            bundle: self.bundle.to_string(),
            index,
            property,
            expected,
        }
    }
}

fn is_absent(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// JavaScript truthiness, which is how manifest flags have always been read.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
#[path = "panels/panels_tests.rs"]
mod panels_tests;
