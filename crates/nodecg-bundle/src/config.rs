//! Bundle configuration resolution.
//!
//! A bundle's config comes from a file supplied by the host. When the bundle
//! ships a JSON Schema, the config is merged over the schema's defaults and
//! validated; without a schema the file is taken as-is.

use crate::{BundleError, BundleResult, ParseOptions, SchemaViolation, deep_merge, schema_defaults};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves the config of one bundle.
#[derive(Debug, Clone)]
pub struct ConfigResolver<'a> {
    bundle: &'a str,
    schema_path: PathBuf,
}

impl<'a> ConfigResolver<'a> {
    /// Create a resolver for the bundle `bundle` living in `bundle_dir`.
    #[must_use]
    pub fn new(bundle: &'a str, bundle_dir: &Path, options: &ParseOptions) -> Self {
        Self {
            bundle,
            schema_path: bundle_dir.join(&options.schema_file),
        }
    }

    /// Path of the bundle's config schema, whether or not it exists.
    #[must_use]
    pub fn schema_path(&self) -> &Path {
        &self.schema_path
    }

    /// Load the config at `config_path` and resolve it against the schema.
    ///
    /// With a schema, user values are merged over the schema defaults and the
    /// merged config must validate. Without one, the file is returned verbatim.
    pub fn resolve_with_file(&self, config_path: &Path) -> BundleResult<Value> {
        if !config_path.exists() {
            return Err(BundleError::ConfigFileMissing {
                path: config_path.to_path_buf(),
            });
        }

        let malformed = |reason: String| BundleError::ConfigMalformed {
            path: config_path.to_path_buf(),
            reason,
        };
        let text = fs::read_to_string(config_path).map_err(|e| malformed(e.to_string()))?;
        let user_config: Value = serde_json::from_str(&text).map_err(|e| malformed(e.to_string()))?;

        let Some(schema) = self.load_schema()? else {
            tracing::debug!(bundle = self.bundle, "No config schema, using config as-is");
            return Ok(user_config);
        };

        let config = deep_merge(schema_defaults(&schema), user_config);
        self.validate(&schema, &config, config_path)?;

        Ok(config)
    }

    /// Resolve the config of a bundle that was given no config file.
    ///
    /// Returns the schema defaults, or an empty object if there is no schema.
    pub fn resolve_defaults(&self) -> BundleResult<Value> {
        match self.load_schema()? {
            Some(schema) => Ok(schema_defaults(&schema)),
            None => Ok(Value::Object(Map::new())),
        }
    }

    fn load_schema(&self) -> BundleResult<Option<Value>> {
        if !self.schema_path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(&self.schema_path).map_err(|e| self.schema_error(e))?;
        let schema = serde_json::from_str(&text).map_err(|e| self.schema_error(e))?;

        Ok(Some(schema))
    }

    fn validate(&self, schema: &Value, config: &Value, config_path: &Path) -> BundleResult<()> {
        let validator = jsonschema::validator_for(schema).map_err(|e| self.schema_error(e))?;

        let violations: Vec<SchemaViolation> = validator
            .iter_errors(config)
            .map(|e| SchemaViolation {
                instance_path: e.instance_path().to_string(),
                message: e.to_string(),
            })
            .collect();

        if !violations.is_empty() {
            return Err(BundleError::ConfigInvalid {
                bundle: self.bundle.to_string(),
                path: config_path.to_path_buf(),
                violations,
            });
        }

        Ok(())
    }

    fn schema_error(&self, err: impl ToString) -> BundleError {
        BundleError::SchemaMalformed {
            bundle: self.bundle.to_string(),
            path: self.schema_path.clone(),
            reason: err.to_string(),
        }
    }
}
