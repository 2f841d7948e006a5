use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;

use crate::coordinator::CleanError;

/// Options exactly as a host supplied them.
///
/// Every field is optional; [`CleanOptions::resolve`] applies the defaults.
/// Wire names are camelCase, and the names used by older releases are
/// accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCleanOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,

    #[serde(
        default,
        alias = "cleanStaleWebpackAssets",
        skip_serializing_if = "Option::is_none"
    )]
    pub clean_stale_assets: Option<bool>,

    #[serde(
        default,
        alias = "protectWebpackAssets",
        skip_serializing_if = "Option::is_none"
    )]
    pub protect_assets: Option<bool>,

    #[serde(
        default,
        alias = "cleanOnceBeforeBuildPatterns",
        skip_serializing_if = "Option::is_none"
    )]
    pub clean_once_before_patterns: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean_after_every_build_patterns: Option<Vec<String>>,

    #[serde(
        default,
        alias = "dangerouslyAllowCleanPatternsOutsideProject",
        skip_serializing_if = "Option::is_none"
    )]
    pub allow_outside_project_root: Option<bool>,
}

/// Resolved, immutable cleanup options.
///
/// Built once from [`RawCleanOptions`]. Two couplings are applied during
/// resolution:
/// - an unset `dry` takes the value of `allow_outside_project_root`
/// - `verbose` is always on when `dry` is on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOptions {
    dry: bool,
    verbose: bool,
    clean_stale_assets: bool,
    protect_assets: bool,
    clean_once_before_patterns: Vec<String>,
    clean_after_every_build_patterns: Vec<String>,
    allow_outside_project_root: bool,
}

impl CleanOptions {
    /// Apply defaults to raw options.
    pub fn resolve(raw: &RawCleanOptions) -> Self {
        let allow_outside_project_root = raw.allow_outside_project_root.unwrap_or(false);
        let dry = raw.dry.unwrap_or(allow_outside_project_root);
        let verbose = dry || raw.verbose.unwrap_or(false);

        Self {
            dry,
            verbose,
            clean_stale_assets: raw.clean_stale_assets.unwrap_or(true),
            protect_assets: raw.protect_assets.unwrap_or(true),
            clean_once_before_patterns: raw
                .clean_once_before_patterns
                .clone()
                .unwrap_or_else(default_clean_once_before_patterns),
            clean_after_every_build_patterns: raw
                .clean_after_every_build_patterns
                .clone()
                .unwrap_or_default(),
            allow_outside_project_root,
        }
    }

    /// Validate and resolve an untyped options value.
    ///
    /// `null` stands for "no options given". Anything other than a mapping is
    /// rejected, as is a mapping whose fields have the wrong type.
    pub fn from_value(value: &Value) -> Result<Self, CleanError> {
        let raw = match value {
            Value::Null => RawCleanOptions::default(),
            Value::Mapping(_) => serde_yaml_ng::from_value(value.clone())
                .map_err(|e| CleanError::InvalidConfiguration(e.to_string()))?,
            Value::Sequence(_) => {
                return Err(CleanError::InvalidConfiguration(
                    "options must be a mapping; the positional pattern list form is no longer \
                     supported, pass the patterns as `cleanOnceBeforePatterns` instead"
                        .to_string(),
                ));
            }
            other => {
                return Err(CleanError::InvalidConfiguration(format!(
                    "options must be a mapping, got {}",
                    describe(other)
                )));
            }
        };

        Ok(Self::resolve(&raw))
    }

    /// Parse options from YAML (or JSON) text.
    pub fn from_yaml_str(text: &str) -> Result<Self, CleanError> {
        let value: Value = serde_yaml_ng::from_str(text)
            .map_err(|e| CleanError::InvalidConfiguration(e.to_string()))?;
        Self::from_value(&value)
    }

    pub fn dry(&self) -> bool {
        self.dry
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn clean_stale_assets(&self) -> bool {
        self.clean_stale_assets
    }

    pub fn protect_assets(&self) -> bool {
        self.protect_assets
    }

    pub fn clean_once_before_patterns(&self) -> &[String] {
        &self.clean_once_before_patterns
    }

    pub fn clean_after_every_build_patterns(&self) -> &[String] {
        &self.clean_after_every_build_patterns
    }

    pub fn allow_outside_project_root(&self) -> bool {
        self.allow_outside_project_root
    }
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self::resolve(&RawCleanOptions::default())
    }
}

impl From<RawCleanOptions> for CleanOptions {
    fn from(raw: RawCleanOptions) -> Self {
        Self::resolve(&raw)
    }
}

fn default_clean_once_before_patterns() -> Vec<String> {
    vec!["**/*".to_string()]
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
