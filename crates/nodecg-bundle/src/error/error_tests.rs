#![allow(non_snake_case)]

use super::*;

#[test]
fn BundleError___manifest_missing___names_directory_and_file() {
    let err = BundleError::ManifestMissing {
        dir: PathBuf::from("/bundles/test-bundle"),
        file: "package.json".to_string(),
    };

    assert_eq!(
        err.to_string(),
        "Bundle at path /bundles/test-bundle does not contain a package.json!"
    );
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn BundleError___panel_missing_properties___lists_every_missing_field() {
    let err = BundleError::PanelMissingProperties {
        bundle: "test-bundle".to_string(),
        index: 0,
        missing: vec!["name", "title", "file"],
    };

    assert_eq!(
        err.to_string(),
        "Panel #0 in bundle test-bundle could not be parsed as it is missing the following properties: name, title, file"
    );
    assert_eq!(err.kind(), ErrorKind::DeclarativeInconsistency);
}

#[test]
fn BundleError___config_invalid___renders_one_violation_per_line() {
    let err = BundleError::ConfigInvalid {
        bundle: "test-bundle".to_string(),
        path: PathBuf::from("cfg/test-bundle.json"),
        violations: vec![
            SchemaViolation {
                instance_path: "/port".to_string(),
                message: "\"abc\" is not of type \"integer\"".to_string(),
            },
            SchemaViolation {
                instance_path: String::new(),
                message: "\"host\" is a required property".to_string(),
            },
        ],
    };

    assert_eq!(
        err.to_string(),
        "test-bundle's config (from cfg/test-bundle.json) is invalid:\n  \
         - /port: \"abc\" is not of type \"integer\"\n  \
         - \"host\" is a required property"
    );
    assert_eq!(err.kind(), ErrorKind::SemanticValidation);
}

#[test]
fn BundleError___reserved_name___points_at_entry() {
    let err = BundleError::ReservedName {
        bundle: "test-bundle".to_string(),
        property: "nodecg.uploadCategories".to_string(),
        entity: "uploadCategory",
        index: 2,
        reserved: "sounds",
    };

    assert_eq!(
        err.to_string(),
        "\"sounds\" is a reserved uploadCategory name. Please change nodecg.uploadCategories[2].name in bundle test-bundle"
    );
    assert_eq!(err.kind(), ErrorKind::SemanticValidation);
}

#[test]
fn BundleError___default_file_not_found___is_referential() {
    let err = BundleError::DefaultFileNotFound {
        bundle: "test-bundle".to_string(),
        property: "nodecg.soundCues".to_string(),
        index: 0,
        field: "defaultFile",
        path: PathBuf::from("/bundles/test-bundle/missing.ogg"),
    };

    assert_eq!(
        err.to_string(),
        "nodecg.soundCues[0].defaultFile in bundle test-bundle does not exist (/bundles/test-bundle/missing.ogg)"
    );
    assert_eq!(err.kind(), ErrorKind::Referential);
}

#[test]
fn BundleError___io___converts_from_io_error() {
    let err: BundleError = std::io::Error::other("disk on fire").into();

    assert!(matches!(err, BundleError::Io(_)));
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn BundleError___extension_layouts___are_structural() {
    let illegal = BundleError::IllegalExtensionLayout {
        bundle: "test-bundle".to_string(),
        name: "extension",
    };
    let conflicting = BundleError::ConflictingExtensionLayout {
        bundle: "test-bundle".to_string(),
    };

    assert_eq!(illegal.kind(), ErrorKind::Structural);
    assert_eq!(conflicting.kind(), ErrorKind::Structural);
    assert!(conflicting.to_string().contains("both \"extension.js\""));
}

#[test]
fn SchemaViolation___root_path___omits_pointer() {
    let violation = SchemaViolation {
        instance_path: String::new(),
        message: "oops".to_string(),
    };

    assert_eq!(violation.to_string(), "  - oops");
}
