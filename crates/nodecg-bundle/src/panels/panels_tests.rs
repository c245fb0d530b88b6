#![allow(non_snake_case)]

use super::*;
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;

const PANEL_HTML: &str =
    "<!DOCTYPE html>\n<html>\n<head></head>\n<body>\n<p>This is a test panel!</p>\n</body>\n</html>\n";

fn manifest(framework: Value) -> Manifest {
    let raw = json!({ "name": "test-bundle", "version": "0.0.1", "nodecg": framework }).to_string();
    Manifest::from_json(&raw, Path::new("package.json"), &ParseOptions::default()).unwrap()
}

fn dashboard_with(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let dashboard = temp_dir.path().join("dashboard");
    fs::create_dir(&dashboard).unwrap();
    for (name, contents) in files {
        fs::write(dashboard.join(name), contents).unwrap();
    }
    (temp_dir, dashboard)
}

fn parse(dashboard: &Path, panels: Value) -> BundleResult<Vec<Panel>> {
    let manifest = manifest(json!({ "compatibleRange": "*", "dashboardPanels": panels }));
    parse_panels(dashboard, &manifest, &ParseOptions::default())
}

#[test]
fn parse_panels___defaults___are_applied() {
    let (_temp, dashboard) = dashboard_with(&[("panel.html", PANEL_HTML)]);

    let panels = parse(
        &dashboard,
        json!([{ "name": "test", "title": "Test Panel", "file": "panel.html" }]),
    )
    .unwrap();

    assert_eq!(panels.len(), 1);
    let panel = &panels[0];
    assert_eq!(panel.name, "test");
    assert_eq!(panel.width, 1);
    assert!(!panel.dialog);
    assert_eq!(panel.header_color, "#9f9bbd");
    assert_eq!(panel.path, dashboard.join("panel.html"));
    assert_eq!(panel.html, PANEL_HTML);
}

#[test]
fn parse_panels___declared_values___are_kept() {
    let (_temp, dashboard) = dashboard_with(&[("panel.html", PANEL_HTML)]);

    let panels = parse(
        &dashboard,
        json!([{
            "name": "test",
            "title": "Test Panel",
            "file": "panel.html",
            "width": 3,
            "headerColor": "#525F78"
        }]),
    )
    .unwrap();

    assert_eq!(panels[0].width, 3);
    assert_eq!(panels[0].header_color, "#525F78");
}

#[test]
fn parse_panels___dialog___injects_heading_once() {
    let (_temp, dashboard) = dashboard_with(&[("dialog.html", PANEL_HTML)]);

    let panels = parse(
        &dashboard,
        json!([{ "name": "d", "title": "Are you sure?", "file": "dialog.html", "dialog": true }]),
    )
    .unwrap();

    let html = &panels[0].html;
    assert!(panels[0].dialog);
    assert_eq!(html.matches("<h2>Are you sure?</h2>").count(), 1);
    assert!(html.contains("<body><h2>Are you sure?</h2>\n<p>"));
}

#[test]
fn parse_panels___keeps_declaration_order() {
    let (_temp, dashboard) = dashboard_with(&[("a.html", PANEL_HTML), ("b.html", PANEL_HTML)]);

    let panels = parse(
        &dashboard,
        json!([
            { "name": "second", "title": "B", "file": "b.html" },
            { "name": "first", "title": "A", "file": "a.html" }
        ]),
    )
    .unwrap();

    let names: Vec<&str> = panels.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["second", "first"]);
}

#[test]
fn parse_panels___missing_properties___names_all_of_them() {
    let (_temp, dashboard) = dashboard_with(&[]);

    let err = parse(&dashboard, json!([{ "file": "panel.html" }])).unwrap_err();

    assert!(matches!(
        err,
        BundleError::PanelMissingProperties { index: 0, ref missing, .. } if missing == &["name", "title"]
    ));
    assert!(err.to_string().contains("in bundle test-bundle"));
}

#[test]
fn parse_panels___duplicate_name___returns_duplicate_panel_name() {
    let (_temp, dashboard) = dashboard_with(&[("panel.html", PANEL_HTML)]);

    let err = parse(
        &dashboard,
        json!([
            { "name": "test", "title": "One", "file": "panel.html" },
            { "name": "test", "title": "Two", "file": "panel.html" }
        ]),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        BundleError::DuplicatePanelName { index: 1, ref name, .. } if name == "test"
    ));
}

#[test]
fn parse_panels___names_differing_in_case___are_distinct() {
    let (_temp, dashboard) = dashboard_with(&[("panel.html", PANEL_HTML)]);

    let panels = parse(
        &dashboard,
        json!([
            { "name": "test", "title": "One", "file": "panel.html" },
            { "name": "Test", "title": "Two", "file": "panel.html" }
        ]),
    )
    .unwrap();

    assert_eq!(panels.len(), 2);
}

#[test]
fn parse_panels___missing_file___returns_panel_file_not_found() {
    let (_temp, dashboard) = dashboard_with(&[]);

    let err = parse(
        &dashboard,
        json!([{ "name": "test", "title": "Test", "file": "nope.html" }]),
    )
    .unwrap_err();

    assert!(matches!(err, BundleError::PanelFileNotFound { ref path, .. } if path.ends_with("nope.html")));
}

#[test]
fn parse_panels___no_head___returns_panel_missing_head() {
    let (_temp, dashboard) = dashboard_with(&[("panel.html", "<!DOCTYPE html><body></body>")]);

    let err = parse(
        &dashboard,
        json!([{ "name": "test", "title": "Test", "file": "panel.html" }]),
    )
    .unwrap_err();

    assert!(matches!(err, BundleError::PanelMissingHead { ref file, .. } if file == "panel.html"));
}

#[test]
fn parse_panels___no_doctype___returns_panel_missing_doctype() {
    let (_temp, dashboard) =
        dashboard_with(&[("panel.html", "<html><head></head><body></body></html>")]);

    let err = parse(
        &dashboard,
        json!([{ "name": "test", "title": "Test", "file": "panel.html" }]),
    )
    .unwrap_err();

    assert!(matches!(err, BundleError::PanelMissingDoctype { .. }));
    assert!(err.to_string().contains("Add <!DOCTYPE html> to it."));
}

#[test]
fn parse_panels___invalid_utf8___returns_panel_html() {
    let (_temp, dashboard) = dashboard_with(&[]);
    fs::write(
        dashboard.join("panel.html"),
        b"<!DOCTYPE html><head></head><body>\xff</body>",
    )
    .unwrap();

    let err = parse(
        &dashboard,
        json!([{ "name": "test", "title": "Test", "file": "panel.html" }]),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        BundleError::PanelHtml { ref file, .. } if file == "panel.html"
    ));
}

#[test]
fn parse_panels___non_string_title___returns_invalid_property() {
    let (_temp, dashboard) = dashboard_with(&[("panel.html", PANEL_HTML)]);

    let err = parse(
        &dashboard,
        json!([{ "name": "test", "title": 5, "file": "panel.html" }]),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        BundleError::PanelInvalidProperty { property: "title", .. }
    ));
}

#[test]
fn parse_panels___declaration_not_array___returns_property_not_array() {
    let (_temp, dashboard) = dashboard_with(&[]);

    let err = parse(&dashboard, json!({ "name": "test" })).unwrap_err();

    assert!(matches!(
        err,
        BundleError::PropertyNotArray { ref property, .. } if property == "nodecg.dashboardPanels"
    ));
}

#[test]
fn parse_panels___folder_without_declaration___fails() {
    let (_temp, dashboard) = dashboard_with(&[]);
    let manifest = manifest(json!({ "compatibleRange": "*" }));

    let err = parse_panels(&dashboard, &manifest, &ParseOptions::default()).unwrap_err();

    assert!(matches!(err, BundleError::DashboardFolderWithoutDeclaration { .. }));
}

#[test]
fn parse_panels___declaration_without_folder___fails() {
    let temp_dir = TempDir::new().unwrap();

    let err = parse(&temp_dir.path().join("dashboard"), json!([])).unwrap_err();

    assert!(matches!(err, BundleError::DeclarationWithoutDashboardFolder { .. }));
}

#[test]
fn parse_dashboard___neither_folder_nor_declaration___is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let dashboard_dir = temp_dir.path().join("dashboard");
    let manifest = manifest(json!({ "compatibleRange": "*" }));

    let dashboard = parse_dashboard(&dashboard_dir, &manifest, &ParseOptions::default()).unwrap();

    assert!(dashboard.panels().is_empty());
    assert_eq!(dashboard.dir(), dashboard_dir);
}

#[test]
fn parse_dashboard___panel___finds_by_name() {
    let (_temp, dashboard_dir) = dashboard_with(&[("panel.html", PANEL_HTML)]);
    let manifest = manifest(json!({
        "compatibleRange": "*",
        "dashboardPanels": [{ "name": "test", "title": "Test", "file": "panel.html" }]
    }));

    let dashboard = parse_dashboard(&dashboard_dir, &manifest, &ParseOptions::default()).unwrap();

    assert_eq!(dashboard.panel("test").map(|p| p.title.as_str()), Some("Test"));
    assert!(dashboard.panel("other").is_none());
}
